//! Wall-clock frame deltas for the tick driver.

use std::time::{Duration, Instant};

/// Measures the time between frames, clamped so a stalled host does not
/// produce one enormous step.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Option<Instant>,
    max_delta: f64,
    frame_interval: Duration,
}

impl FrameClock {
    #[must_use]
    pub fn new(target_fps: u64, max_delta: f64) -> Self {
        Self {
            last: None,
            max_delta,
            frame_interval: Duration::from_secs_f64(1.0 / target_fps.max(1) as f64),
        }
    }

    /// Nominal spacing of frames.
    #[must_use]
    pub fn frame_interval(&self) -> Duration {
        self.frame_interval
    }

    /// Seconds since the previous call. The first call returns the nominal
    /// frame interval.
    pub fn delta(&mut self) -> f64 {
        self.delta_at(Instant::now())
    }

    pub fn delta_at(&mut self, now: Instant) -> f64 {
        let delta = match self.last {
            Some(prev) => now.saturating_duration_since(prev).as_secs_f64(),
            None => self.frame_interval.as_secs_f64(),
        };
        self.last = Some(now);
        delta.min(self.max_delta)
    }

    /// Forgets the previous frame, e.g. when a new round starts after idling.
    pub fn reset(&mut self) {
        self.last = None;
    }
}
