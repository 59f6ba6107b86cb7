//! The evaluation session: one cooperative loop that joins the optimizer
//! channel, the frame clock and the evaluator.
//!
//! The loop is the only code that ticks the [`Evaluator`]. Waiting for a
//! round's scores happens in a spawned task so frames keep flowing while a
//! round runs.

use super::progress::ProgressHistory;
use evoplat_core::{
    AppConfig, Evaluator, FrameClock, RoundHandle, RoundOutcome, RoundSnapshot, TickStatus,
};
use evoplat_net::{parse_inbound, EvaluateRequest, Inbound, Outbound, ProgressUpdate, TaskId};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::time::MissedTickBehavior;

/// Latest state of the active round, `None` while idle.
pub type SnapshotReceiver = watch::Receiver<Option<Arc<RoundSnapshot>>>;

/// Counters reported when the session ends.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SessionSummary {
    pub frames: u64,
    pub rounds_started: u64,
    pub rounds_rejected: u64,
    pub rounds_completed: u64,
    pub rounds_timed_out: u64,
    pub results_sent: u64,
    pub progress_updates: u64,
    pub ignored_messages: u64,
    pub malformed_messages: u64,
    pub best_reported_fitness: Option<f64>,
}

pub struct Session {
    evaluator: Evaluator,
    clock: FrameClock,
    /// Reported for agents a partial round never finished.
    unfinished_score: f64,
    progress: ProgressHistory,
    snapshots: watch::Sender<Option<Arc<RoundSnapshot>>>,
    summary: SessionSummary,
    results_sent: Arc<AtomicU64>,
}

impl Session {
    #[must_use]
    pub fn new(config: &AppConfig) -> Self {
        let (snapshots, _) = watch::channel(None);
        Self {
            evaluator: Evaluator::from_config(config),
            clock: FrameClock::new(
                config.evaluation.target_fps,
                config.evaluation.max_frame_delta,
            ),
            unfinished_score: config.scoring.invalid_score,
            progress: ProgressHistory::default(),
            snapshots,
            summary: SessionSummary::default(),
            results_sent: Arc::new(AtomicU64::new(0)),
        }
    }

    #[must_use]
    pub fn evaluator(&self) -> &Evaluator {
        &self.evaluator
    }

    #[must_use]
    pub fn progress(&self) -> &ProgressHistory {
        &self.progress
    }

    /// Subscribes a renderer to per-frame snapshots.
    #[must_use]
    pub fn subscribe(&self) -> SnapshotReceiver {
        self.snapshots.subscribe()
    }

    #[must_use]
    pub fn summary(&self) -> SessionSummary {
        let metrics = self.evaluator.metrics();
        SessionSummary {
            rounds_completed: metrics.rounds_completed(),
            rounds_timed_out: metrics.rounds_timed_out(),
            results_sent: self.results_sent.load(Ordering::Relaxed),
            best_reported_fitness: self.progress.best_fitness(),
            ..self.summary.clone()
        }
    }

    /// Runs until the inbound channel closes or shutdown is signalled.
    ///
    /// Must be called inside a tokio runtime; score delivery is spawned onto
    /// it.
    pub async fn run(
        mut self,
        mut inbound: mpsc::UnboundedReceiver<String>,
        outbound: mpsc::UnboundedSender<String>,
        mut shutdown: watch::Receiver<bool>,
    ) -> SessionSummary {
        let mut frames = tokio::time::interval(self.clock.frame_interval());
        frames.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tracing::info!(
            frame_interval_ms = self.clock.frame_interval().as_millis() as u64,
            "Evaluation session started"
        );

        loop {
            tokio::select! {
                frame = inbound.recv() => match frame {
                    Some(text) => self.handle_text(&text, &outbound),
                    None => {
                        tracing::info!("Optimizer channel ended");
                        break;
                    }
                },
                _ = frames.tick() => {
                    self.on_frame();
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        tracing::info!("Session stopping on shutdown");
                        break;
                    }
                }
            }
        }

        if let Some(generation) = self.evaluator.active_generation() {
            tracing::warn!(generation = generation, "Session ended with a round still active");
        }
        let summary = self.summary();
        tracing::info!(
            rounds = summary.rounds_started,
            completed = summary.rounds_completed,
            results_sent = summary.results_sent,
            "Evaluation session finished"
        );
        summary
    }

    /// Dispatches one inbound text frame.
    pub fn handle_text(&mut self, text: &str, outbound: &mpsc::UnboundedSender<String>) {
        match parse_inbound(text) {
            Ok(Inbound::Evaluate(request)) => self.on_evaluate(request, outbound),
            Ok(Inbound::Progress(update)) => self.on_progress(update),
            Ok(Inbound::Unknown { kind }) => {
                self.summary.ignored_messages += 1;
                tracing::warn!(kind = %kind, "Ignoring message of unknown type");
            }
            Err(e) => {
                self.summary.malformed_messages += 1;
                tracing::warn!(error = %e, "Dropping malformed message");
            }
        }
    }

    fn on_evaluate(&mut self, request: EvaluateRequest, outbound: &mpsc::UnboundedSender<String>) {
        let EvaluateRequest {
            task_id,
            generation,
            population,
        } = request;

        match self.evaluator.start_round(population, generation) {
            Ok(handle) => {
                self.summary.rounds_started += 1;
                self.clock.reset();
                tokio::spawn(deliver_scores(
                    handle,
                    task_id,
                    self.unfinished_score,
                    outbound.clone(),
                    self.results_sent.clone(),
                ));
            }
            Err(e) => {
                self.summary.rounds_rejected += 1;
                tracing::warn!(task_id = %task_id, generation = generation, error = %e, "Population rejected");
            }
        }
    }

    fn on_progress(&mut self, update: ProgressUpdate) {
        self.summary.progress_updates += 1;
        tracing::info!(
            generation = update.generation,
            best_fitness = update.best_fitness,
            average_fitness = ?update.average_fitness,
            diversity = ?update.population_diversity,
            "Optimizer progress"
        );
        self.progress.record(update);
    }

    /// Advances the active round by one wall-clock frame.
    pub fn on_frame(&mut self) -> TickStatus {
        self.summary.frames += 1;
        if !self.evaluator.is_active() {
            return TickStatus::Idle;
        }
        let status = self.evaluator.tick(self.clock.delta());
        self.publish_snapshot();
        status
    }

    /// Advances the active round by a fixed `delta_time`, bypassing the clock.
    pub fn step(&mut self, delta_time: f64) -> TickStatus {
        let status = self.evaluator.tick(delta_time);
        self.publish_snapshot();
        status
    }

    fn publish_snapshot(&self) {
        let snapshot = self.evaluator.snapshot().map(Arc::new);
        self.snapshots.send_replace(snapshot);
    }
}

/// Waits for a round and sends its `FITNESS_RESULTS` frame.
///
/// An abandoned round never resolves, so its task stays parked until the
/// runtime shuts down.
async fn deliver_scores(
    handle: RoundHandle,
    task_id: TaskId,
    unfinished_score: f64,
    outbound: mpsc::UnboundedSender<String>,
    results_sent: Arc<AtomicU64>,
) {
    let generation = handle.generation();
    let scores = match handle.await {
        Ok(RoundOutcome::Completed(result)) => result.scores,
        Ok(RoundOutcome::TimedOut(partial)) => partial
            .scores
            .into_iter()
            .map(|s| s.unwrap_or(unfinished_score))
            .collect(),
        Err(e) => {
            tracing::warn!(generation = generation, error = %e, "No scores to send");
            return;
        }
    };

    let text = match Outbound::fitness_results(task_id, generation, scores).to_json() {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(generation = generation, error = %e, "Could not encode scores");
            return;
        }
    };
    if outbound.send(text).is_err() {
        tracing::warn!(generation = generation, "Channel closed before scores were sent");
        return;
    }
    results_sent.fetch_add(1, Ordering::Relaxed);
    tracing::info!(generation = generation, "Fitness results sent");
}
