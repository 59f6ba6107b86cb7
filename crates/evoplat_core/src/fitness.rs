//! Converts a finished agent into the number reported to the optimizer.

use crate::config::ScoringConfig;
use evoplat_data::{distinct_actions, Agent, AgentStatus};

#[derive(Debug, Clone, Default)]
pub struct FitnessScorer {
    config: ScoringConfig,
}

impl FitnessScorer {
    #[must_use]
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    /// Scores `agent` from its final state.
    ///
    /// Invalid candidates get a flat penalty. Everything else earns its final
    /// height plus a win bonus and a bonus per distinct action kind in its
    /// original sequence. Pure: the same agent always yields the same score.
    #[must_use]
    pub fn score(&self, agent: &Agent) -> f64 {
        let c = &self.config;
        if agent.status() == AgentStatus::Invalid {
            return c.invalid_score;
        }
        let height = agent.position.y + c.height_offset;
        let win = if agent.status() == AgentStatus::Won {
            c.win_bonus
        } else {
            0.0
        };
        let variety = c.variety_weight * distinct_actions(&agent.moves) as f64;
        height * c.height_weight + win + variety
    }
}
