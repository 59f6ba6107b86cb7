//! # Evoplat Core
//!
//! The evaluation engine for Evoplat - a platformer fitness evaluator driven
//! by a remote genetic-algorithm optimizer.
//!
//! This crate contains the simulation and scoring logic, including:
//! - The static world (floor, bounds, platforms)
//! - Per-agent move timelines
//! - One-frame physics with one-sided platform landing
//! - Fitness scoring
//! - The round orchestrator and its deadline policy
//! - Metrics collection and structured logging
//!
//! ## Architecture
//!
//! A single [`Evaluator`] owns at most one round. The caller feeds it wall
//! clock deltas through [`Evaluator::tick`]; every running agent is advanced
//! by its scheduler and then by the physics step, in population order. When
//! the last agent finishes, the [`RoundHandle`] returned by
//! [`Evaluator::start_round`] resolves with one score per candidate.
//!
//! ## Example
//!
//! ```
//! use evoplat_core::{AppConfig, Evaluator, RoundOutcome};
//! use evoplat_data::Move;
//!
//! let mut evaluator = Evaluator::from_config(&AppConfig::default());
//! let mut handle = evaluator
//!     .start_round(vec![vec![Move::new("pause", 1.0)]], 1)
//!     .unwrap();
//! evaluator.tick(1.0 / 60.0);
//!
//! match handle.try_outcome() {
//!     Some(Ok(RoundOutcome::Completed(result))) => assert_eq!(result.scores, vec![50.0]),
//!     other => panic!("unexpected outcome: {other:?}"),
//! }
//! ```

/// Frame delta measurement
pub mod clock;
/// Configuration management for world, scoring and transport parameters
pub mod config;
/// Evaluator error types
pub mod error;
/// Fitness scoring of finished agents
pub mod fitness;
/// Performance metrics collection and logging
pub mod metrics;
/// Round lifecycle, tick driver and deadline handling
pub mod orchestrator;
/// Per-agent motion and collision
pub mod physics;
/// Random candidate generation
pub mod population;
/// Move timelines
pub mod scheduler;
/// Round snapshots for observers
pub mod snapshot;
/// Agent records for the active round
pub mod store;
/// Static world geometry and physics constants
pub mod world;

pub use clock::FrameClock;
pub use config::{AppConfig, TimeoutPolicy};
pub use error::EvalError;
pub use fitness::FitnessScorer;
pub use metrics::{init_logging, EvalMetrics};
pub use orchestrator::{
    Evaluator, PartialResult, RoundHandle, RoundOutcome, RoundResult, RoundSummary, TickStatus,
};
pub use snapshot::{AgentSnapshot, RoundSnapshot};
pub use world::World;
