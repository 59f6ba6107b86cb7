//! One-frame motion and collision for a single agent.

use crate::world::World;
use evoplat_data::{Agent, AgentStatus};

/// What held the agent up at the end of a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Support {
    Airborne,
    Floor,
    /// Index of the platform the agent landed on.
    Platform(usize),
    /// Agent was already terminal; nothing moved.
    Skipped,
}

/// Advances `agent` by `delta_time` seconds.
///
/// Platforms are one-sided: an agent only lands while not rising, and the
/// first platform in world order that catches it wins. Only the position is
/// clamped to the horizontal bounds.
pub fn step(agent: &mut Agent, world: &World, delta_time: f64) -> Support {
    if agent.is_terminal() {
        return Support::Skipped;
    }
    let c = &world.constants;

    if agent.is_jumping {
        agent.velocity.vy -= c.gravity * delta_time;
    }
    agent.velocity.vx = agent.input.horizontal() * c.move_speed;
    if agent.input.take_jump() {
        agent.velocity.vy = c.jump_force;
    }
    let falling = agent.velocity.vy <= 0.0;

    agent.position.x += agent.velocity.vx * delta_time;
    agent.position.y += agent.velocity.vy * delta_time;

    let mut support = Support::Airborne;

    if agent.position.y <= world.floor_y {
        agent.position.y = world.floor_y;
        agent.velocity.vy = 0.0;
        support = Support::Floor;
    }

    let foot = agent.position.y - world.agent_half_height;
    let landing = world.platforms().iter().position(|p| {
        falling && p.overlaps_x(agent.position.x, world.agent_half_width) && p.contains_foot(foot)
    });
    if let Some(i) = landing {
        let platform = &world.platforms()[i];
        agent.position.y = platform.top() + world.agent_half_height;
        agent.velocity.vy = 0.0;
        support = Support::Platform(i);
        if platform.winning {
            agent.finish(AgentStatus::Won);
        }
    }

    agent.position.x = world.clamp_x(agent.position.x);
    agent.is_jumping = support == Support::Airborne;
    support
}
