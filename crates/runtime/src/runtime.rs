//! High-level runtime orchestrator.
//!
//! The runtime owns the battle worker, wires up command/event channels, and
//! exposes a builder-based API for clients to play floors.

use std::sync::Arc;

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use tower_core::{BattleOutcome, BattlePhase, PcgRng, RngOracle, TowerConfig};

use crate::api::{
    BattleProvider, FloorRequest, FloorSummary, Result, RuntimeError, RuntimeHandle, SessionId,
    Settlement,
};
use crate::events::{Event, EventBus, Topic};
use crate::repository::{BossCatalog, PlayerRepository, QuizRepository, Repositories};
use crate::workers::{BattleWorker, Command};

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub tower: TowerConfig,
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
    /// Seed for per-floor battle seeds. `None` draws from OS entropy.
    pub rng_seed: Option<u64>,
    /// Resolve a due boss attack right after the answer that triggered it
    /// (default: true)
    pub auto_boss_attack: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            tower: TowerConfig::default(),
            event_buffer_size: 100,
            command_buffer_size: 32,
            rng_seed: None,
            auto_boss_attack: true,
        }
    }
}

/// Main runtime that hosts floor sessions
///
/// Runtime owns the worker; [`RuntimeHandle`] provides a cloneable façade
/// for clients.
pub struct Runtime {
    handle: RuntimeHandle,
    worker_handle: JoinHandle<()>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.handle.subscribe(topic)
    }

    /// Play one floor to the end with decisions from `provider`.
    ///
    /// A defeat is settled and then offered to the provider for a retry
    /// against the same boss. The floor ends on a victory, a declined retry,
    /// or a settlement that could not be persisted; in the last case the
    /// session stays open for [`RuntimeHandle::retry_settlement`].
    pub async fn play_floor(
        &self,
        request: FloorRequest,
        provider: &dyn BattleProvider,
    ) -> Result<FloorSummary> {
        let handle = &self.handle;
        let mut session = handle.start_floor(request).await?;
        let id = session.id;
        let mut attempts = 1;

        // A player without HP loses and settles as soon as the floor opens.
        let mut settled = match &session.settlement {
            Settlement::Open => session.last_report.map(Settlement::Applied),
            other => Some(other.clone()),
        };

        loop {
            if let Some(settlement) = settled.take() {
                let retry = match &settlement {
                    Settlement::Applied(report) if report.outcome == BattleOutcome::Lose => {
                        provider.retry_after_defeat(report).await?
                    }
                    _ => false,
                };
                if !retry {
                    return finish(handle, id, attempts, settlement).await;
                }

                attempts += 1;
                debug!("{} retrying, attempt {}", id, attempts);
                session = handle.session(id).await?;
                continue;
            }

            settled = match &session.battle.phase {
                BattlePhase::AwaitingAction => {
                    let mode = provider.choose_action(&session).await?;
                    let question = handle.submit_action(id, mode).await?;
                    let option = provider.choose_answer(&session, &question).await?;
                    let turn = handle.submit_answer(id, option).await?;
                    provider.observe_turn(&turn);
                    turn.settlement
                }
                BattlePhase::AwaitingAnswer(pending) => {
                    let option = provider.choose_answer(&session, &pending.question).await?;
                    let turn = handle.submit_answer(id, option).await?;
                    provider.observe_turn(&turn);
                    turn.settlement
                }
                BattlePhase::BossAttackDue => {
                    let attack = handle.boss_attack(id).await?;
                    provider.observe_boss_attack(&attack);
                    attack.settlement
                }
                BattlePhase::Finished(_) => Some(session.settlement.clone()),
            };

            if settled.is_none() {
                session = handle.session(id).await?;
            }
        }
    }

    /// Shutdown the runtime gracefully
    pub async fn shutdown(self) -> Result<()> {
        drop(self.handle);

        self.worker_handle
            .await
            .map_err(RuntimeError::WorkerJoin)?;

        Ok(())
    }
}

async fn finish(
    handle: &RuntimeHandle,
    id: SessionId,
    attempts: u32,
    settlement: Settlement,
) -> Result<FloorSummary> {
    let outcome = match &settlement {
        Settlement::Applied(report) => report.outcome,
        Settlement::Pending { outcome, .. } => *outcome,
        Settlement::Open => {
            return Err(RuntimeError::NothingToSettle { session: id });
        }
    };

    // A settled defeat leaves the session reset for another attempt.
    if outcome == BattleOutcome::Lose && !settlement.is_pending() {
        match handle.abandon(id).await {
            Ok(()) | Err(RuntimeError::SessionNotFound { .. }) => {}
            Err(error) => return Err(error),
        }
    }

    info!("{} ended: {} after {} attempt(s)", id, outcome, attempts);
    Ok(FloorSummary {
        session: id,
        outcome,
        attempts,
        settlement,
    })
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    repos: Repositories,
    oracle: Option<Arc<dyn RngOracle>>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            repos: Repositories::default(),
            oracle: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn repositories(mut self, repos: Repositories) -> Self {
        self.repos = repos;
        self
    }

    pub fn players(mut self, players: Arc<dyn PlayerRepository>) -> Self {
        self.repos.players = players;
        self
    }

    pub fn catalog(mut self, catalog: Arc<dyn BossCatalog>) -> Self {
        self.repos.catalog = catalog;
        self
    }

    pub fn quizzes(mut self, quizzes: Arc<dyn QuizRepository>) -> Self {
        self.repos.quizzes = quizzes;
        self
    }

    /// Replace the random source used for every battle roll
    /// (default: [`PcgRng`])
    pub fn oracle(mut self, oracle: Arc<dyn RngOracle>) -> Self {
        self.oracle = Some(oracle);
        self
    }

    /// Build the runtime and spawn its worker.
    ///
    /// Must be called from within a tokio runtime.
    pub fn build(self) -> Result<Runtime> {
        let (command_tx, command_rx) = mpsc::channel::<Command>(self.config.command_buffer_size);
        let event_bus = EventBus::with_capacity(self.config.event_buffer_size);

        let handle = RuntimeHandle::new(command_tx, event_bus.clone(), self.repos.clone());

        let oracle = self.oracle.unwrap_or_else(|| Arc::new(PcgRng));
        let worker = BattleWorker::new(
            self.config.tower,
            self.config.auto_boss_attack,
            self.repos,
            oracle,
            self.config.rng_seed,
            command_rx,
            event_bus,
        );

        let worker_handle = tokio::spawn(async move {
            worker.run().await;
        });

        Ok(Runtime {
            handle,
            worker_handle,
        })
    }
}
