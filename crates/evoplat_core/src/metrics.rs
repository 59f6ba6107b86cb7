//! Evaluation metrics and logging setup.
//!
//! Provides structured logging and counters for monitoring how rounds are
//! progressing.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Ticks between periodic progress lines.
const TICK_LOG_INTERVAL: u64 = 600;

/// Counters for one evaluator's lifetime.
pub struct EvalMetrics {
    tick_count: AtomicU64,
    rounds_started: AtomicU64,
    rounds_completed: AtomicU64,
    rounds_timed_out: AtomicU64,
    rejected_starts: AtomicU64,
    start_time: Instant,
}

impl Default for EvalMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl EvalMetrics {
    #[must_use]
    pub fn new() -> Self {
        Self {
            tick_count: AtomicU64::new(0),
            rounds_started: AtomicU64::new(0),
            rounds_completed: AtomicU64::new(0),
            rounds_timed_out: AtomicU64::new(0),
            rejected_starts: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    /// Records a simulated tick with its wall-clock cost.
    pub fn record_tick(&self, duration: Duration, running: usize, total: usize) {
        let tick = self.tick_count.fetch_add(1, Ordering::Relaxed) + 1;
        if tick % TICK_LOG_INTERVAL == 0 {
            tracing::debug!(
                tick = tick,
                running = running,
                total = total,
                duration_us = duration.as_micros() as u64,
                "Evaluation tick"
            );
        }
    }

    pub fn record_round_started(&self) {
        self.rounds_started.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_round_completed(&self) {
        self.rounds_completed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_round_timed_out(&self) {
        self.rounds_timed_out.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_rejected_start(&self) {
        self.rejected_starts.fetch_add(1, Ordering::Relaxed);
    }

    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.tick_count.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn rounds_started(&self) -> u64 {
        self.rounds_started.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn rounds_completed(&self) -> u64 {
        self.rounds_completed.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn rounds_timed_out(&self) -> u64 {
        self.rounds_timed_out.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn rejected_starts(&self) -> u64 {
        self.rejected_starts.load(Ordering::Relaxed)
    }

    /// Gets elapsed time since metrics creation.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

/// Initialize tracing subscriber for logging.
///
/// Honours `RUST_LOG`; falls back to `default_filter` (e.g. `"evoplat=info"`).
pub fn init_logging(default_filter: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));
    tracing::subscriber::set_global_default(
        tracing_subscriber::FmtSubscriber::builder()
            .with_env_filter(filter)
            .finish(),
    )
    .ok();
}
