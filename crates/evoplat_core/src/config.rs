//! Configuration management for evaluator parameters.
//!
//! This module provides strongly-typed configuration structures that map to
//! the `config.toml` file. Physics constants, the platform layout, scoring
//! weights and client endpoints can all be customised through it.
//!
//! ## Configuration Hierarchy
//!
//! 1. Default values (hardcoded in `Default` impls)
//! 2. `config.toml` file (overrides defaults)
//! 3. Command-line flags (override individual values in the binary)
//!
//! ## Example `config.toml`
//!
//! ```toml
//! [world]
//! gravity = 60.0
//! move_speed = 6.0
//! jump_force = 20.0
//!
//! [[world.platforms]]
//! x = 0.0
//! y = 2.0
//! width = 2.0
//! height = 1.0
//! winning = true
//!
//! [evaluation]
//! timeout_policy = "abandon"
//! target_fps = 60
//! ```

use evoplat_data::Platform;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Static layout and physical constants of the platform world.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct WorldConfig {
    /// Lowest height an agent's centre can reach.
    pub floor_y: f64,
    pub min_x: f64,
    pub max_x: f64,
    pub spawn_x: f64,
    pub spawn_y: f64,
    /// Downward acceleration in units/s², applied while airborne.
    pub gravity: f64,
    /// Horizontal speed in units/s while a direction is held.
    pub move_speed: f64,
    /// Upward velocity set by a jump, in units/s.
    pub jump_force: f64,
    pub agent_width: f64,
    pub agent_height: f64,
    /// Collision order matters: the first platform that catches an agent wins.
    pub platforms: Vec<Platform>,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            floor_y: -3.0,
            min_x: -9.0,
            max_x: 9.0,
            spawn_x: 0.0,
            spawn_y: 0.0,
            gravity: 60.0,
            move_speed: 6.0,
            jump_force: 20.0,
            agent_width: 1.0,
            agent_height: 1.0,
            platforms: default_platforms(),
        }
    }
}

/// The reference platform layout; the centre-top ledge is the goal.
#[must_use]
pub fn default_platforms() -> Vec<Platform> {
    vec![
        Platform::new(0.0, -2.0, 5.0, 1.0),
        Platform::new(-5.0, 0.0, 3.0, 1.0),
        Platform::new(5.0, 0.0, 3.0, 1.0),
        Platform::new(0.0, 2.0, 2.0, 1.0).winning(),
        Platform::new(-7.0, 3.0, 2.0, 1.0),
        Platform::new(7.0, 3.0, 2.0, 1.0),
    ]
}

/// Weights of the fitness formula.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ScoringConfig {
    /// Added to the final height so a resting agent scores non-negative.
    pub height_offset: f64,
    pub height_weight: f64,
    pub win_bonus: f64,
    /// Bonus per distinct action kind in the candidate's sequence.
    pub variety_weight: f64,
    pub invalid_score: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            height_offset: 4.0,
            height_weight: 10.0,
            win_bonus: 100.0,
            variety_weight: 10.0,
            invalid_score: -1000.0,
        }
    }
}

/// What happens to a round that outlives its deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TimeoutPolicy {
    /// Drop the round without answering the caller.
    #[default]
    Abandon,
    /// Answer the caller with whatever scores exist, flagged as timed out.
    ResolvePartial,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct EvaluationConfig {
    /// Safety factor applied to the longest candidate's total duration.
    /// Values below 1.0 cut rounds short of their longest timeline.
    pub deadline_multiplier: f64,
    pub timeout_policy: TimeoutPolicy,
    pub target_fps: u64,
    /// Upper bound on a single wall-clock frame delta, in seconds.
    pub max_frame_delta: f64,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            deadline_multiplier: 1.005,
            timeout_policy: TimeoutPolicy::Abandon,
            target_fps: 60,
            max_frame_delta: 0.1,
        }
    }
}

/// Endpoints of the remote optimizer.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ClientConfig {
    pub api_url: String,
    pub ws_url: String,
    pub request_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8000".to_string(),
            ws_url: "ws://localhost:8000".to_string(),
            request_timeout_secs: 10,
        }
    }
}

/// Parameters of the optimization task requested from the optimizer.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct OptimizationConfig {
    pub problem_type: String,
    pub population_size: usize,
    /// Moves per candidate.
    pub dimension: usize,
    pub mutation_rate: f64,
    pub crossover_rate: f64,
    pub max_generations: u32,
}

impl Default for OptimizationConfig {
    fn default() -> Self {
        Self {
            problem_type: "GPA".to_string(),
            population_size: 50,
            dimension: 10,
            mutation_rate: 0.1,
            crossover_rate: 0.8,
            max_generations: 100,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct AppConfig {
    pub world: WorldConfig,
    pub scoring: ScoringConfig,
    pub evaluation: EvaluationConfig,
    pub client: ClientConfig,
    pub optimization: OptimizationConfig,
}

impl AppConfig {
    /// Validates all configuration parameters.
    ///
    /// Returns `Ok(())` if all parameters are valid, or `Err` with a description
    /// of the first validation failure.
    ///
    /// # Validation Rules
    /// - Physical constants must be finite and non-negative
    /// - Horizontal bounds must be ordered and contain the spawn point
    /// - Platforms must have positive size
    /// - Optimization bounds mirror what the optimizer accepts
    pub fn validate(&self) -> anyhow::Result<()> {
        let w = &self.world;
        anyhow::ensure!(w.min_x < w.max_x, "World min_x must be below max_x");
        anyhow::ensure!(
            w.spawn_x >= w.min_x && w.spawn_x <= w.max_x,
            "Spawn point must lie within the horizontal bounds"
        );
        anyhow::ensure!(
            w.spawn_y >= w.floor_y,
            "Spawn point must not be below the floor"
        );
        anyhow::ensure!(
            w.gravity.is_finite() && w.gravity >= 0.0,
            "Gravity must be finite and non-negative"
        );
        anyhow::ensure!(
            w.move_speed.is_finite() && w.move_speed >= 0.0,
            "Move speed must be finite and non-negative"
        );
        anyhow::ensure!(
            w.jump_force.is_finite() && w.jump_force >= 0.0,
            "Jump force must be finite and non-negative"
        );
        anyhow::ensure!(
            w.agent_width > 0.0 && w.agent_height > 0.0,
            "Agent size must be positive"
        );
        for (i, p) in w.platforms.iter().enumerate() {
            anyhow::ensure!(
                p.width > 0.0 && p.height > 0.0,
                "Platform {} must have positive size",
                i
            );
        }

        // Scoring validation
        let s = &self.scoring;
        anyhow::ensure!(
            [
                s.height_offset,
                s.height_weight,
                s.win_bonus,
                s.variety_weight,
                s.invalid_score
            ]
            .iter()
            .all(|v| v.is_finite()),
            "Scoring weights must be finite"
        );

        // Evaluation validation
        let e = &self.evaluation;
        anyhow::ensure!(
            e.deadline_multiplier.is_finite() && e.deadline_multiplier > 0.0,
            "Deadline multiplier must be positive"
        );
        anyhow::ensure!(e.target_fps > 0, "Target FPS must be positive");
        anyhow::ensure!(e.target_fps <= 240, "Target FPS too high (max 240)");
        anyhow::ensure!(
            e.max_frame_delta > 0.0,
            "Max frame delta must be positive"
        );

        // Optimization validation
        let o = &self.optimization;
        anyhow::ensure!(
            (10..=1000).contains(&o.population_size),
            "Population size must be in [10, 1000]"
        );
        anyhow::ensure!(
            (2..=100).contains(&o.dimension),
            "Dimension must be in [2, 100]"
        );
        anyhow::ensure!(
            (0.0..=1.0).contains(&o.mutation_rate),
            "Mutation rate must be in [0.0, 1.0]"
        );
        anyhow::ensure!(
            (0.0..=1.0).contains(&o.crossover_rate),
            "Crossover rate must be in [0.0, 1.0]"
        );
        anyhow::ensure!(
            (1..=1000).contains(&o.max_generations),
            "Max generations must be in [1, 1000]"
        );

        Ok(())
    }

    /// Parses and validates configuration from TOML text.
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config = toml::from_str::<Self>(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `path`, writing the default configuration there if it is missing.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            let content = fs::read_to_string(path)?;
            return Self::from_toml(&content);
        }
        let default = Self::default();
        if let Err(e) = fs::write(path, toml::to_string(&default)?) {
            tracing::warn!(path = %path.display(), error = %e, "Could not write default config");
        }
        Ok(default)
    }

    /// Hash of everything that influences scores. Two evaluators with the same
    /// fingerprint score a population the same way, up to frame timing.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(format!("{:?}", self.world).as_bytes());
        hasher.update(format!("{:?}", self.scoring).as_bytes());
        hex::encode(hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validates() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_layout_has_single_winning_platform() {
        let platforms = default_platforms();
        assert_eq!(platforms.len(), 6);
        assert_eq!(platforms.iter().filter(|p| p.winning).count(), 1);
        assert!(platforms[3].winning);
    }

    #[test]
    fn test_inverted_bounds() {
        let config = AppConfig {
            world: WorldConfig {
                min_x: 9.0,
                max_x: -9.0,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_negative_gravity() {
        let config = AppConfig {
            world: WorldConfig {
                gravity: -1.0,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_degenerate_platform() {
        let config = AppConfig {
            world: WorldConfig {
                platforms: vec![Platform::new(0.0, 0.0, 0.0, 1.0)],
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_deadline_multiplier_must_be_positive() {
        let config = AppConfig {
            evaluation: EvaluationConfig {
                deadline_multiplier: 0.0,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());

        // Below one caps the round short of the longest timeline.
        let capped = AppConfig {
            evaluation: EvaluationConfig {
                deadline_multiplier: 0.5,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(capped.validate().is_ok());
    }

    #[test]
    fn test_invalid_target_fps() {
        let config = AppConfig {
            evaluation: EvaluationConfig {
                target_fps: 0,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_population_bounds() {
        let config = AppConfig {
            optimization: OptimizationConfig {
                population_size: 5,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = AppConfig::from_toml(
            r#"
            [world]
            gravity = 30.0

            [evaluation]
            timeout_policy = "resolve_partial"
            "#,
        )
        .expect("Failed to parse partial config");
        assert_eq!(config.world.gravity, 30.0);
        assert_eq!(config.world.move_speed, 6.0);
        assert_eq!(config.world.platforms.len(), 6);
        assert_eq!(config.evaluation.timeout_policy, TimeoutPolicy::ResolvePartial);
    }

    #[test]
    fn test_toml_roundtrip_preserves_platforms() {
        let text = toml::to_string(&AppConfig::default()).expect("Failed to serialize config");
        let parsed = AppConfig::from_toml(&text).expect("Failed to parse config");
        assert_eq!(parsed, AppConfig::default());
    }

    #[test]
    fn test_fingerprint_consistency() {
        let config1 = AppConfig::default();
        let config2 = AppConfig::default();
        assert_eq!(config1.fingerprint(), config2.fingerprint());
    }

    #[test]
    fn test_fingerprint_ignores_client_settings() {
        let mut config = AppConfig::default();
        let before = config.fingerprint();
        config.client.api_url = "http://example.invalid".to_string();
        assert_eq!(before, config.fingerprint());
        config.world.gravity = 10.0;
        assert_ne!(before, config.fingerprint());
    }
}
