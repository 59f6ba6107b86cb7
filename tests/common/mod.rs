pub mod macros;

use evoplat_core::{AppConfig, Evaluator, RoundOutcome, TickStatus, TimeoutPolicy};
use evoplat_data::{Candidate, Move, Platform, Population};

/// Nominal 60 FPS frame.
pub const DT: f64 = 1.0 / 60.0;

/// Upper bound on ticks for any round driven by these helpers.
pub const MAX_TICKS: usize = 100_000;

#[allow(dead_code)]
pub struct EvaluatorBuilder {
    config: AppConfig,
}

#[allow(dead_code)]
impl EvaluatorBuilder {
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
        }
    }

    pub fn with_config<F>(mut self, modifier: F) -> Self
    where
        F: FnOnce(&mut AppConfig),
    {
        modifier(&mut self.config);
        self
    }

    /// Floor and bounds only.
    pub fn without_platforms(mut self) -> Self {
        self.config.world.platforms.clear();
        self
    }

    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.config.world.platforms.push(platform);
        self
    }

    pub fn with_timeout_policy(mut self, policy: TimeoutPolicy) -> Self {
        self.config.evaluation.timeout_policy = policy;
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn build(self) -> Evaluator {
        self.config
            .validate()
            .expect("Test config should be valid");
        Evaluator::from_config(&self.config)
    }
}

/// Builds a candidate from `(action, duration)` pairs.
#[allow(dead_code)]
pub fn candidate(moves: &[(&str, f64)]) -> Candidate {
    moves
        .iter()
        .map(|&(action, duration)| Move::new(action, duration))
        .collect()
}

/// Ticks at `dt` until the evaluator goes idle. Returns the final status and
/// the number of ticks taken.
#[allow(dead_code)]
pub fn run_to_idle(evaluator: &mut Evaluator, dt: f64) -> (TickStatus, usize) {
    for ticks in 1..=MAX_TICKS {
        let status = evaluator.tick(dt);
        if !matches!(status, TickStatus::Running { .. }) {
            return (status, ticks);
        }
    }
    panic!("Round did not finish within {MAX_TICKS} ticks");
}

/// Evaluates `population` as generation 1 at 60 FPS and returns the outcome.
#[allow(dead_code)]
pub fn evaluate(evaluator: &mut Evaluator, population: Population) -> RoundOutcome {
    let mut handle = evaluator
        .start_round(population, 1)
        .expect("Evaluator should be idle");
    if evaluator.is_active() {
        run_to_idle(evaluator, DT);
    }
    handle
        .try_outcome()
        .expect("Round should have resolved")
        .expect("Round should not be dropped")
}
