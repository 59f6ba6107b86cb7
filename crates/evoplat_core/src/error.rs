//! Error types for the evaluator.

use thiserror::Error;

/// Failures surfaced by [`crate::orchestrator::Evaluator`] and its handles.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    /// A round is already active; the new population was not accepted.
    #[error("Generation {active_generation} is still being evaluated")]
    RoundInProgress { active_generation: u64 },

    /// The evaluator went away before the round resolved.
    #[error("Round for generation {generation} was dropped before resolving")]
    RoundDropped { generation: u64 },
}

/// Result type alias for evaluator operations.
pub type Result<T> = std::result::Result<T, EvalError>;
