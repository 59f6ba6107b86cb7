//! The static platform world shared by every agent of a round.

use crate::config::WorldConfig;
use evoplat_data::{Platform, Position};

/// Physical constants read by the physics step.
#[derive(Debug, Clone, PartialEq)]
pub struct PhysicsConstants {
    pub gravity: f64,
    pub move_speed: f64,
    pub jump_force: f64,
}

/// Read-only world layout. Never mutated after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct World {
    pub constants: PhysicsConstants,
    pub floor_y: f64,
    pub min_x: f64,
    pub max_x: f64,
    pub spawn: Position,
    pub agent_half_width: f64,
    pub agent_half_height: f64,
    platforms: Vec<Platform>,
}

impl World {
    #[must_use]
    pub fn from_config(config: &WorldConfig) -> Self {
        Self {
            constants: PhysicsConstants {
                gravity: config.gravity,
                move_speed: config.move_speed,
                jump_force: config.jump_force,
            },
            floor_y: config.floor_y,
            min_x: config.min_x,
            max_x: config.max_x,
            spawn: Position {
                x: config.spawn_x,
                y: config.spawn_y,
            },
            agent_half_width: config.agent_width / 2.0,
            agent_half_height: config.agent_height / 2.0,
            platforms: config.platforms.clone(),
        }
    }

    /// Platforms in collision order.
    #[must_use]
    pub fn platforms(&self) -> &[Platform] {
        &self.platforms
    }

    #[must_use]
    pub fn clamp_x(&self, x: f64) -> f64 {
        x.clamp(self.min_x, self.max_x)
    }
}

impl Default for World {
    fn default() -> Self {
        Self::from_config(&WorldConfig::default())
    }
}
