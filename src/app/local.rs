//! Offline evaluation of a random population, without an optimizer.

use anyhow::{bail, Result};
use evoplat_core::population::random_population;
use evoplat_core::{AppConfig, Evaluator, RoundOutcome, TickStatus};
use evoplat_data::Population;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocalReport {
    pub seed: u64,
    pub population_size: usize,
    pub dimension: usize,
    pub scores: Vec<f64>,
    pub best: Option<f64>,
    pub won: usize,
    pub lost: usize,
    pub invalid: usize,
    pub ticks: u64,
    pub simulated_secs: f64,
}

/// Generates a seeded population and evaluates it with a fixed frame step.
pub fn run_local(
    config: &AppConfig,
    population_size: usize,
    dimension: usize,
    seed: u64,
) -> Result<LocalReport> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let population = random_population(&mut rng, population_size, dimension);
    let mut report = evaluate_fixed_step(config, population)?;
    report.seed = seed;
    report.dimension = dimension;
    Ok(report)
}

/// Runs one round to completion at `1 / target_fps` seconds per tick.
pub fn evaluate_fixed_step(config: &AppConfig, population: Population) -> Result<LocalReport> {
    let delta_time = 1.0 / config.evaluation.target_fps.max(1) as f64;
    let population_size = population.len();
    let dimension = population.first().map_or(0, Vec::len);

    let mut evaluator = Evaluator::from_config(config);
    let mut handle = evaluator.start_round(population, 0)?;
    while evaluator.is_active() {
        if let TickStatus::TimedOut { generation } = evaluator.tick(delta_time) {
            tracing::warn!(generation = generation, "Local round hit its deadline");
        }
    }

    match handle.try_outcome() {
        Some(Ok(RoundOutcome::Completed(result))) => Ok(LocalReport {
            seed: 0,
            population_size,
            dimension,
            best: result.best(),
            won: result.summary.won,
            lost: result.summary.lost,
            invalid: result.summary.invalid,
            ticks: result.summary.ticks,
            simulated_secs: result.summary.elapsed,
            scores: result.scores,
        }),
        Some(Ok(RoundOutcome::TimedOut(partial))) => bail!(
            "Round timed out after {:.3}s with {} of {} agents finished",
            partial.elapsed,
            partial.scores.iter().flatten().count(),
            partial.scores.len()
        ),
        Some(Err(e)) => Err(e.into()),
        None => bail!("Round was abandoned at its deadline"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use evoplat_core::TimeoutPolicy;
    use evoplat_data::Move;

    #[test]
    fn test_local_run_scores_every_candidate() {
        let report = run_local(&AppConfig::default(), 20, 4, 42).expect("Local run should finish");
        assert_eq!(report.scores.len(), 20);
        assert_eq!(report.won + report.lost + report.invalid, 20);
        assert_eq!(report.invalid, 0);
        assert!(report.best.is_some());
    }

    #[test]
    fn test_fixed_step_pause_candidate() {
        let report = evaluate_fixed_step(
            &AppConfig::default(),
            vec![vec![Move::new("pause", 1.0)]],
        )
        .expect("Round should finish");
        assert_eq!(report.scores, vec![50.0]);
        assert_eq!(report.ticks, 1);
    }

    #[test]
    fn test_sub_frame_moves_complete() {
        let report = evaluate_fixed_step(
            &AppConfig::default(),
            vec![vec![Move::new("right", 0.004); 12]],
        )
        .expect("Short moves should finish before the deadline");
        assert_eq!(report.scores.len(), 1);
        assert_eq!(report.lost, 1);
    }

    #[test]
    fn test_empty_population() {
        let report =
            evaluate_fixed_step(&AppConfig::default(), vec![]).expect("Empty round resolves");
        assert!(report.scores.is_empty());
        assert_eq!(report.best, None);
    }

    #[test]
    fn test_partial_policy_reports_timeout() {
        let mut config = AppConfig::default();
        config.evaluation.timeout_policy = TimeoutPolicy::ResolvePartial;
        config.evaluation.deadline_multiplier = 0.5;
        let moves = vec![Move::new("left", 1.0)];
        let err = evaluate_fixed_step(&config, vec![moves]).expect_err("Should time out");
        assert!(err.to_string().contains("timed out"));
    }
}
