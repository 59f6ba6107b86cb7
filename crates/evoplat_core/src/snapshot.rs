//! Immutable copies of round state for renderers and observers.

use evoplat_data::{AgentStatus, Position, Velocity};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct AgentSnapshot {
    pub index: usize,
    pub position: Position,
    pub velocity: Velocity,
    pub status: AgentStatus,
    pub move_index: usize,
    pub score: Option<f64>,
}

/// State of the active round after its latest tick.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct RoundSnapshot {
    pub generation: u64,
    pub tick: u64,
    pub elapsed: f64,
    pub deadline: f64,
    pub completed: usize,
    pub agents: Vec<AgentSnapshot>,
}

impl RoundSnapshot {
    #[must_use]
    pub fn population_size(&self) -> usize {
        self.agents.len()
    }

    #[must_use]
    pub fn count_status(&self, status: AgentStatus) -> usize {
        self.agents.iter().filter(|a| a.status == status).count()
    }

    /// Best score recorded so far, if any agent has finished.
    #[must_use]
    pub fn best_score(&self) -> Option<f64> {
        self.agents
            .iter()
            .filter_map(|a| a.score)
            .fold(None, |best, s| Some(best.map_or(s, |b: f64| b.max(s))))
    }
}
