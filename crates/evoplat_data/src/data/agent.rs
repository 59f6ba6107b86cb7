use super::moves::{ActionKind, Move};
use serde::{Deserialize, Serialize};

/// World position of an agent's centre.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// Velocity of an agent in units per second.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Velocity {
    pub vx: f64,
    pub vy: f64,
}

/// Input bits currently held by an agent.
///
/// `jump` is a one-shot request: the physics step reads it through
/// [`InputState::take_jump`], which clears it in the same call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InputState {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
}

impl InputState {
    /// Raises the bit belonging to `action`. Non-movement actions hold nothing.
    pub fn press(&mut self, action: &ActionKind) {
        match action {
            ActionKind::Left => self.left = true,
            ActionKind::Right => self.right = true,
            ActionKind::Jump => self.jump = true,
            ActionKind::Pause | ActionKind::Unknown(_) => {}
        }
    }

    /// Drops the bit belonging to `action`.
    pub fn release(&mut self, action: &ActionKind) {
        match action {
            ActionKind::Left => self.left = false,
            ActionKind::Right => self.right = false,
            ActionKind::Jump => self.jump = false,
            ActionKind::Pause | ActionKind::Unknown(_) => {}
        }
    }

    /// Returns whether a jump was pending and clears it.
    pub fn take_jump(&mut self) -> bool {
        std::mem::take(&mut self.jump)
    }

    /// Horizontal direction implied by the held bits: -1, 0 or 1.
    #[must_use]
    pub fn horizontal(&self) -> f64 {
        match (self.left, self.right) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Lifecycle of an agent within one round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AgentStatus {
    #[default]
    Running,
    /// Landed on a winning platform.
    Won,
    /// Ran out of moves or reached a `pause`.
    Lost,
    /// Reached an action the evaluator does not understand.
    Invalid,
}

impl AgentStatus {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        self != Self::Running
    }
}

/// Mutable simulation record of one candidate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    /// Position of the candidate in the population.
    pub index: usize,
    pub position: Position,
    pub velocity: Velocity,
    pub input: InputState,
    /// Airborne flag; gravity only applies while set.
    pub is_jumping: bool,
    pub moves: Vec<Move>,
    pub move_index: usize,
    /// Round time (seconds) at which the active move expires.
    pub move_deadline: f64,
    /// Seconds this agent has been simulated.
    pub elapsed: f64,
    /// Whether the first move has been activated.
    pub started: bool,
    status: AgentStatus,
}

impl Agent {
    /// Creates an agent at `spawn`, at rest and airborne.
    #[must_use]
    pub fn new(index: usize, moves: Vec<Move>, spawn: Position) -> Self {
        Self {
            index,
            position: spawn,
            velocity: Velocity::default(),
            input: InputState::default(),
            is_jumping: true,
            moves,
            move_index: 0,
            move_deadline: 0.0,
            elapsed: 0.0,
            started: false,
            status: AgentStatus::Running,
        }
    }

    #[must_use]
    pub fn status(&self) -> AgentStatus {
        self.status
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Moves a running agent into a terminal status and drops its inputs.
    ///
    /// Returns `false` without changing anything if the agent had already
    /// terminated or `status` is `Running`.
    pub fn finish(&mut self, status: AgentStatus) -> bool {
        if self.is_terminal() || !status.is_terminal() {
            return false;
        }
        self.status = status;
        self.input.clear();
        true
    }

    #[must_use]
    pub fn current_move(&self) -> Option<&Move> {
        self.moves.get(self.move_index)
    }
}
