//! Per-agent move timelines.
//!
//! Each agent walks its own move list against the shared round clock. The
//! scheduler only touches input bits and status; motion is left to
//! [`crate::physics`].

use evoplat_data::{ActionKind, Agent, AgentStatus};

/// Outcome of advancing one agent's timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The active move is still running.
    Hold,
    /// A new move became active.
    Activated(usize),
    Terminated(AgentStatus),
}

/// Advances `agent`'s timeline to `round_elapsed` seconds.
///
/// The first call activates move 0. Every move whose deadline `round_elapsed`
/// has passed is retired in the same call, so a long frame can skip several
/// short moves. Returns the last transition made.
pub fn advance(agent: &mut Agent, delta_time: f64, round_elapsed: f64) -> Transition {
    if agent.is_terminal() {
        return Transition::Hold;
    }
    agent.elapsed += delta_time;

    let mut transition = Transition::Hold;
    if !agent.started {
        agent.started = true;
        agent.move_deadline = 0.0;
        transition = activate(agent);
    }

    while !agent.is_terminal() && round_elapsed > agent.move_deadline {
        if let Some(current) = agent.current_move() {
            let action = current.action.clone();
            agent.input.release(&action);
        }
        agent.move_index += 1;
        transition = activate(agent);
    }
    transition
}

/// Applies the move at `agent.move_index`, or terminates the agent.
fn activate(agent: &mut Agent) -> Transition {
    let Some(next) = agent.current_move() else {
        agent.finish(AgentStatus::Lost);
        return Transition::Terminated(AgentStatus::Lost);
    };
    let action = next.action.clone();
    let duration = next.duration;

    match action {
        ActionKind::Pause => {
            agent.finish(AgentStatus::Lost);
            Transition::Terminated(AgentStatus::Lost)
        }
        ActionKind::Unknown(ref raw) => {
            tracing::debug!(agent = agent.index, action = %raw, "Unrecognised action");
            agent.finish(AgentStatus::Invalid);
            Transition::Terminated(AgentStatus::Invalid)
        }
        _ => {
            agent.input.press(&action);
            agent.move_deadline += duration;
            Transition::Activated(agent.move_index)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use evoplat_data::{InputState, Move, Position};

    fn agent(moves: Vec<Move>) -> Agent {
        Agent::new(0, moves, Position::default())
    }

    const DT: f64 = 0.1;

    #[test]
    fn test_first_tick_activates_first_move() {
        let mut a = agent(vec![Move::new("left", 1.0)]);
        assert_eq!(advance(&mut a, DT, DT), Transition::Activated(0));
        assert!(a.input.left);
        assert_eq!(a.move_deadline, 1.0);
    }

    #[test]
    fn test_move_held_until_deadline() {
        let mut a = agent(vec![Move::new("right", 0.3), Move::new("left", 1.0)]);
        advance(&mut a, DT, 0.1);
        assert_eq!(advance(&mut a, DT, 0.2), Transition::Hold);
        assert_eq!(advance(&mut a, DT, 0.3), Transition::Hold);
        assert!(a.input.right);

        assert_eq!(advance(&mut a, DT, 0.4), Transition::Activated(1));
        assert!(!a.input.right);
        assert!(a.input.left);
        assert!((a.move_deadline - 1.3).abs() < 1e-9);
    }

    #[test]
    fn test_running_out_of_moves_loses() {
        let mut a = agent(vec![Move::new("jump", 0.1)]);
        advance(&mut a, DT, 0.1);
        assert_eq!(
            advance(&mut a, DT, 0.2),
            Transition::Terminated(AgentStatus::Lost)
        );
        assert_eq!(a.move_index, 1);
        assert_eq!(a.input, InputState::default());
    }

    #[test]
    fn test_empty_sequence_loses_immediately() {
        let mut a = agent(vec![]);
        assert_eq!(
            advance(&mut a, DT, DT),
            Transition::Terminated(AgentStatus::Lost)
        );
    }

    #[test]
    fn test_pause_loses_without_pressing() {
        let mut a = agent(vec![Move::new("left", 0.1), Move::new("pause", 1.0)]);
        advance(&mut a, DT, 0.1);
        assert_eq!(
            advance(&mut a, DT, 0.2),
            Transition::Terminated(AgentStatus::Lost)
        );
        assert!(!a.input.left);
        assert_eq!(a.status(), AgentStatus::Lost);
    }

    #[test]
    fn test_leading_pause_loses_on_first_tick() {
        let mut a = agent(vec![Move::new("pause", 1.0)]);
        assert_eq!(
            advance(&mut a, DT, DT),
            Transition::Terminated(AgentStatus::Lost)
        );
    }

    #[test]
    fn test_unknown_action_is_invalid() {
        let mut a = agent(vec![Move::new("left", 0.1), Move::new("teleport", 1.0)]);
        advance(&mut a, DT, 0.1);
        assert_eq!(
            advance(&mut a, DT, 0.2),
            Transition::Terminated(AgentStatus::Invalid)
        );
    }

    #[test]
    fn test_terminal_agent_is_left_alone() {
        let mut a = agent(vec![Move::new("pause", 1.0), Move::new("left", 1.0)]);
        advance(&mut a, DT, 0.1);
        let index = a.move_index;
        assert_eq!(advance(&mut a, DT, 5.0), Transition::Hold);
        assert_eq!(a.move_index, index);
        assert_eq!(a.status(), AgentStatus::Lost);
    }

    #[test]
    fn test_long_frame_skips_expired_moves() {
        let mut a = agent(vec![
            Move::new("left", 0.1),
            Move::new("right", 0.1),
            Move::new("jump", 1.0),
        ]);
        advance(&mut a, DT, 0.1);
        assert_eq!(advance(&mut a, DT, 0.35), Transition::Activated(2));
        assert_eq!(a.move_index, 2);
        assert!(!a.input.left);
        assert!(!a.input.right);
        assert!(a.input.jump);
        assert!((a.move_deadline - 1.2).abs() < 1e-9);
    }

    #[test]
    fn test_sub_frame_moves_finish_in_one_tick() {
        let mut a = agent(vec![Move::new("left", 0.01); 5]);
        assert_eq!(
            advance(&mut a, DT, DT),
            Transition::Terminated(AgentStatus::Lost)
        );
        assert_eq!(a.move_index, 5);
        assert_eq!(a.input, InputState::default());
    }

    #[test]
    fn test_catch_up_stops_at_unknown_action() {
        let mut a = agent(vec![
            Move::new("left", 0.01),
            Move::new("teleport", 0.01),
            Move::new("right", 0.01),
        ]);
        assert_eq!(
            advance(&mut a, DT, DT),
            Transition::Terminated(AgentStatus::Invalid)
        );
        assert_eq!(a.move_index, 1);
    }
}
