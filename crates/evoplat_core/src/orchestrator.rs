//! Round lifecycle: accepts a population, drives it tick by tick and hands
//! back one score per candidate.
//!
//! The [`Evaluator`] is either idle or owns exactly one [`EvaluationRound`].
//! All agent state lives inside that round and is only touched by
//! [`Evaluator::tick`]; observers get owned [`RoundSnapshot`] copies.

use crate::config::{AppConfig, EvaluationConfig, TimeoutPolicy};
use crate::error::{EvalError, Result};
use crate::fitness::FitnessScorer;
use crate::metrics::EvalMetrics;
use crate::physics;
use crate::scheduler;
use crate::snapshot::{AgentSnapshot, RoundSnapshot};
use crate::store::AgentStore;
use crate::world::World;
use evoplat_data::{total_duration, AgentStatus, Population};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Instant;
use tokio::sync::oneshot;

/// Counts describing how a completed round went.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundSummary {
    pub won: usize,
    pub lost: usize,
    pub invalid: usize,
    pub ticks: u64,
    pub elapsed: f64,
}

/// Scores of a round in which every agent terminated.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundResult {
    pub generation: u64,
    /// `scores[i]` belongs to `population[i]`.
    pub scores: Vec<f64>,
    pub summary: RoundSummary,
}

impl RoundResult {
    #[must_use]
    pub fn best(&self) -> Option<f64> {
        self.scores.iter().copied().reduce(f64::max)
    }
}

/// Scores of a round cut short by its deadline. `None` marks agents that
/// were still running.
#[derive(Debug, Clone, PartialEq)]
pub struct PartialResult {
    pub generation: u64,
    pub scores: Vec<Option<f64>>,
    pub elapsed: f64,
    pub deadline: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RoundOutcome {
    Completed(RoundResult),
    TimedOut(PartialResult),
}

/// Future side of [`Evaluator::start_round`].
///
/// Resolves once the round completes. Under [`TimeoutPolicy::Abandon`] an
/// expired round never resolves its handle.
#[derive(Debug)]
pub struct RoundHandle {
    generation: u64,
    receiver: oneshot::Receiver<RoundOutcome>,
}

impl RoundHandle {
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Non-blocking check, for drivers that tick and poll from the same loop.
    pub fn try_outcome(&mut self) -> Option<Result<RoundOutcome>> {
        match self.receiver.try_recv() {
            Ok(outcome) => Some(Ok(outcome)),
            Err(oneshot::error::TryRecvError::Empty) => None,
            Err(oneshot::error::TryRecvError::Closed) => Some(Err(EvalError::RoundDropped {
                generation: self.generation,
            })),
        }
    }
}

impl Future for RoundHandle {
    type Output = Result<RoundOutcome>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        let generation = this.generation;
        Pin::new(&mut this.receiver)
            .poll(cx)
            .map(|r| r.map_err(|_| EvalError::RoundDropped { generation }))
    }
}

/// What a call to [`Evaluator::tick`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickStatus {
    /// No round is active.
    Idle,
    Running { completed: usize, total: usize },
    /// The round finished during this tick and its handle was resolved.
    Completed { generation: u64 },
    /// The round hit its deadline during this tick.
    TimedOut { generation: u64 },
}

/// The single in-flight evaluation.
struct EvaluationRound {
    generation: u64,
    agents: AgentStore,
    scores: Vec<Option<f64>>,
    completed: usize,
    elapsed: f64,
    deadline: f64,
    ticks: u64,
    responder: oneshot::Sender<RoundOutcome>,
}

/// Seconds a population may run: its longest candidate's total duration
/// times `multiplier`.
#[must_use]
pub fn round_deadline(population: &Population, multiplier: f64) -> f64 {
    population
        .iter()
        .map(|moves| total_duration(moves))
        .fold(0.0, f64::max)
        * multiplier
}

pub struct Evaluator {
    world: Arc<World>,
    scorer: FitnessScorer,
    config: EvaluationConfig,
    round: Option<EvaluationRound>,
    /// Responders of abandoned rounds, held so their handles stay pending.
    /// Grows by one per abandoned round for the life of the evaluator; the
    /// count is logged with every abandonment.
    stalled: Vec<oneshot::Sender<RoundOutcome>>,
    metrics: EvalMetrics,
    /// Config fingerprint logged with every round.
    fingerprint: Option<String>,
}

impl Evaluator {
    #[must_use]
    pub fn new(world: World, scorer: FitnessScorer, config: EvaluationConfig) -> Self {
        Self {
            world: Arc::new(world),
            scorer,
            config,
            round: None,
            stalled: Vec::new(),
            metrics: EvalMetrics::new(),
            fingerprint: None,
        }
    }

    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        let mut evaluator = Self::new(
            World::from_config(&config.world),
            FitnessScorer::new(config.scoring.clone()),
            config.evaluation.clone(),
        );
        evaluator.fingerprint = Some(config.fingerprint());
        evaluator
    }

    #[must_use]
    pub fn world(&self) -> &Arc<World> {
        &self.world
    }

    #[must_use]
    pub fn metrics(&self) -> &EvalMetrics {
        &self.metrics
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.round.is_some()
    }

    #[must_use]
    pub fn active_generation(&self) -> Option<u64> {
        self.round.as_ref().map(|r| r.generation)
    }

    /// Number of abandoned rounds whose callers are still waiting.
    #[must_use]
    pub fn stalled_rounds(&self) -> usize {
        self.stalled.len()
    }

    /// Starts evaluating `population`.
    ///
    /// Fails without touching any state if a round is already active. An
    /// empty population resolves immediately with no scores.
    pub fn start_round(&mut self, population: Population, generation: u64) -> Result<RoundHandle> {
        if let Some(active) = self.active_generation() {
            self.metrics.record_rejected_start();
            tracing::warn!(
                generation = generation,
                active_generation = active,
                "Rejected population: a round is already active"
            );
            return Err(EvalError::RoundInProgress {
                active_generation: active,
            });
        }

        let (responder, receiver) = oneshot::channel();
        let handle = RoundHandle {
            generation,
            receiver,
        };
        let deadline = round_deadline(&population, self.config.deadline_multiplier);
        let agents = AgentStore::from_population(&population, self.world.spawn);
        let size = agents.len();

        self.metrics.record_round_started();
        tracing::info!(
            generation = generation,
            population = size,
            deadline_secs = deadline,
            config = self.fingerprint.as_deref().unwrap_or("custom"),
            "Round started"
        );

        self.round = Some(EvaluationRound {
            generation,
            agents,
            scores: vec![None; size],
            completed: 0,
            elapsed: 0.0,
            deadline,
            ticks: 0,
            responder,
        });

        if size == 0 {
            self.finish_round();
        }
        Ok(handle)
    }

    /// Advances every running agent by `delta_time` seconds.
    ///
    /// Each agent gets its move scheduler then its physics step, all with the
    /// same delta. Agents that terminate are scored on the spot.
    pub fn tick(&mut self, delta_time: f64) -> TickStatus {
        let Some(round) = self.round.as_mut() else {
            return TickStatus::Idle;
        };
        let started = Instant::now();
        round.elapsed += delta_time;
        round.ticks += 1;
        let elapsed = round.elapsed;

        for agent in round.agents.iter_mut() {
            if agent.is_terminal() {
                continue;
            }
            scheduler::advance(agent, delta_time, elapsed);
            physics::step(agent, &self.world, delta_time);
            if agent.is_terminal() {
                let score = self.scorer.score(agent);
                round.scores[agent.index] = Some(score);
                round.completed += 1;
                tracing::debug!(
                    generation = round.generation,
                    agent = agent.index,
                    status = ?agent.status(),
                    score = score,
                    "Agent finished"
                );
            }
        }

        let total = round.agents.len();
        let completed = round.completed;
        let deadline = round.deadline;
        self.metrics
            .record_tick(started.elapsed(), total - completed, total);

        if completed == total {
            return self.finish_round();
        }
        if elapsed > deadline {
            return self.expire_round();
        }
        TickStatus::Running { completed, total }
    }

    fn finish_round(&mut self) -> TickStatus {
        let Some(round) = self.round.take() else {
            return TickStatus::Idle;
        };
        let scores: Vec<f64> = round
            .scores
            .iter()
            .zip(round.agents.iter())
            .map(|(score, agent)| score.unwrap_or_else(|| self.scorer.score(agent)))
            .collect();
        let result = RoundResult {
            generation: round.generation,
            summary: RoundSummary {
                won: round.agents.count_status(AgentStatus::Won),
                lost: round.agents.count_status(AgentStatus::Lost),
                invalid: round.agents.count_status(AgentStatus::Invalid),
                ticks: round.ticks,
                elapsed: round.elapsed,
            },
            scores,
        };

        self.metrics.record_round_completed();
        tracing::info!(
            generation = result.generation,
            won = result.summary.won,
            lost = result.summary.lost,
            invalid = result.summary.invalid,
            best = ?result.best(),
            elapsed_secs = result.summary.elapsed,
            "Round completed"
        );

        let generation = round.generation;
        if round.responder.send(RoundOutcome::Completed(result)).is_err() {
            tracing::warn!(generation = generation, "Round completed but its caller is gone");
        }
        TickStatus::Completed { generation }
    }

    fn expire_round(&mut self) -> TickStatus {
        let Some(round) = self.round.take() else {
            return TickStatus::Idle;
        };
        let generation = round.generation;
        self.metrics.record_round_timed_out();

        match self.config.timeout_policy {
            TimeoutPolicy::Abandon => {
                tracing::warn!(
                    generation = generation,
                    completed = round.completed,
                    total = round.agents.len(),
                    deadline_secs = round.deadline,
                    stalled = self.stalled.len() + 1,
                    "Round deadline passed; abandoning without a result"
                );
                self.stalled.push(round.responder);
            }
            TimeoutPolicy::ResolvePartial => {
                tracing::warn!(
                    generation = generation,
                    completed = round.completed,
                    total = round.agents.len(),
                    deadline_secs = round.deadline,
                    "Round deadline passed; resolving with partial scores"
                );
                let partial = PartialResult {
                    generation,
                    scores: round.scores,
                    elapsed: round.elapsed,
                    deadline: round.deadline,
                };
                if round.responder.send(RoundOutcome::TimedOut(partial)).is_err() {
                    tracing::warn!(generation = generation, "Round timed out but its caller is gone");
                }
            }
        }
        TickStatus::TimedOut { generation }
    }

    /// Owned copy of the active round, or `None` when idle.
    #[must_use]
    pub fn snapshot(&self) -> Option<RoundSnapshot> {
        let round = self.round.as_ref()?;
        Some(RoundSnapshot {
            generation: round.generation,
            tick: round.ticks,
            elapsed: round.elapsed,
            deadline: round.deadline,
            completed: round.completed,
            agents: round
                .agents
                .iter()
                .map(|a| AgentSnapshot {
                    index: a.index,
                    position: a.position,
                    velocity: a.velocity,
                    status: a.status(),
                    move_index: a.move_index,
                    score: round.scores[a.index],
                })
                .collect(),
        })
    }
}
