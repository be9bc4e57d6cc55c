//! Battle worker that owns the authoritative floor sessions.
//!
//! Receives commands from [`RuntimeHandle`](crate::RuntimeHandle), drives
//! each session through [`tower_core::BattleEngine`], settles finished floors
//! and publishes events to the EventBus.

use std::collections::HashMap;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use tower_core::{
    ActionMode, BattleEngine, BattlePhase, BattleState, BossAttackReport, OptionId, Question,
    QuestionPool, RngOracle, RosterRules, TowerConfig, available_floors, difficulty_for_floor,
    select_floor_bosses,
};

use crate::api::{
    BossAttackResult, FloorRequest, FloorSession, Result, RuntimeError, SessionId, Settlement,
    SettlementReport, TurnResult,
};
use crate::events::{Event, EventBus, FloorEvent};
use crate::repository::{BossFilter, Repositories};

/// Commands that can be sent to the battle worker
pub enum Command {
    StartFloor {
        request: FloorRequest,
        reply: oneshot::Sender<Result<FloorSession>>,
    },
    SubmitAction {
        session: SessionId,
        mode: ActionMode,
        reply: oneshot::Sender<Result<Question>>,
    },
    SubmitAnswer {
        session: SessionId,
        option: OptionId,
        reply: oneshot::Sender<Result<TurnResult>>,
    },
    BossAttack {
        session: SessionId,
        reply: oneshot::Sender<Result<BossAttackResult>>,
    },
    RetrySettlement {
        session: SessionId,
        reply: oneshot::Sender<Result<SettlementReport>>,
    },
    QuerySession {
        session: SessionId,
        reply: oneshot::Sender<Result<FloorSession>>,
    },
    Abandon {
        session: SessionId,
        reply: oneshot::Sender<Result<()>>,
    },
}

/// Background task that processes battle commands one at a time.
pub struct BattleWorker {
    pub(super) config: TowerConfig,
    pub(super) auto_boss_attack: bool,
    pub(super) repos: Repositories,
    pub(super) oracle: Arc<dyn RngOracle>,
    pub(super) event_bus: EventBus,
    seeds: StdRng,
    sessions: HashMap<SessionId, FloorSession>,
    last_session: u64,
    command_rx: mpsc::Receiver<Command>,
}

impl BattleWorker {
    pub fn new(
        config: TowerConfig,
        auto_boss_attack: bool,
        repos: Repositories,
        oracle: Arc<dyn RngOracle>,
        rng_seed: Option<u64>,
        command_rx: mpsc::Receiver<Command>,
        event_bus: EventBus,
    ) -> Self {
        let seeds = match rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            config,
            auto_boss_attack,
            repos,
            oracle,
            event_bus,
            seeds,
            sessions: HashMap::new(),
            last_session: 0,
            command_rx,
        }
    }

    /// Main worker loop. Ends when every handle is dropped.
    pub async fn run(mut self) {
        while let Some(cmd) = self.command_rx.recv().await {
            self.handle_command(cmd);
        }
        debug!("battle worker stopped with {} open sessions", self.sessions.len());
    }

    fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::StartFloor { request, reply } => {
                let result = self.start_floor(request);
                if reply.send(result).is_err() {
                    debug!("StartFloor reply channel closed (caller dropped)");
                }
            }
            Command::SubmitAction {
                session,
                mode,
                reply,
            } => {
                let result = self.submit_action(session, mode);
                if reply.send(result).is_err() {
                    debug!("SubmitAction reply channel closed (caller dropped)");
                }
            }
            Command::SubmitAnswer {
                session,
                option,
                reply,
            } => {
                let result = self.submit_answer(session, option);
                if reply.send(result).is_err() {
                    debug!("SubmitAnswer reply channel closed (caller dropped)");
                }
            }
            Command::BossAttack { session, reply } => {
                let result = self.boss_attack(session);
                if reply.send(result).is_err() {
                    debug!("BossAttack reply channel closed (caller dropped)");
                }
            }
            Command::RetrySettlement { session, reply } => {
                let result = self.retry_settlement(session);
                if reply.send(result).is_err() {
                    debug!("RetrySettlement reply channel closed (caller dropped)");
                }
            }
            Command::QuerySession { session, reply } => {
                let result = self
                    .sessions
                    .get(&session)
                    .cloned()
                    .ok_or(RuntimeError::SessionNotFound { session });
                if reply.send(result).is_err() {
                    debug!("QuerySession reply channel closed (caller dropped)");
                }
            }
            Command::Abandon { session, reply } => {
                let result = self.abandon(session);
                if reply.send(result).is_err() {
                    debug!("Abandon reply channel closed (caller dropped)");
                }
            }
        }
    }

    /// Validates the request, builds the roster and question pool, and opens
    /// a session. Nothing is stored when any step fails.
    fn start_floor(&mut self, request: FloorRequest) -> Result<FloorSession> {
        validate_request(&request)?;

        let stats = self
            .repos
            .players
            .fetch(request.player)?
            .ok_or(RuntimeError::PlayerNotFound {
                player: request.player,
            })?
            .normalized();
        check_floor_access(&request, stats.level, &self.config.roster)?;

        let catalog = self
            .repos
            .catalog
            .list(BossFilter::AtMost(request.difficulty))?;
        let seed: u64 = self.seeds.r#gen();
        let bosses = select_floor_bosses(
            &catalog,
            request.difficulty,
            stats.level,
            &self.config.roster,
            &*self.oracle,
            seed,
        )?;

        let quizzes = self.repos.quizzes.fetch_with_questions(&request.quizzes)?;
        if quizzes.is_empty() {
            return Err(RuntimeError::QuizzesNotFound {
                quizzes: request.quizzes,
            });
        }
        for id in &request.quizzes {
            if !quizzes.iter().any(|quiz| quiz.id == *id) {
                warn!("{} does not exist; skipping it for {}", id, request.player);
            }
        }

        let id = SessionId(self.last_session + 1);
        let pool = QuestionPool::from_quizzes(&quizzes);
        let battle = BattleState::new(stats, bosses, pool, seed)
            .map_err(|source| RuntimeError::battle(id, source))?;
        self.last_session = id.0;

        let mut session = FloorSession {
            id,
            player: request.player,
            difficulty: request.difficulty,
            floor_level: request.floor_level,
            battle,
            settlement: Settlement::Open,
            last_report: None,
        };

        info!(
            "{} opened for {}: floor {}, difficulty {}, {} bosses, {} questions",
            id,
            session.player,
            session.floor_level,
            session.difficulty,
            session.battle.boss_count(),
            session.battle.pool.len()
        );
        self.publish(FloorEvent::Started {
            session: id,
            player: session.player,
            difficulty: session.difficulty,
            floor_level: session.floor_level,
            bosses: session.boss_ids(),
        });

        // A player snapshot without HP starts lost.
        self.settle_if_finished(&mut session);
        let snapshot = session.clone();
        self.sessions.insert(id, session);
        Ok(snapshot)
    }

    fn submit_action(&mut self, id: SessionId, mode: ActionMode) -> Result<Question> {
        self.with_session(id, |worker, session| {
            let question = worker
                .engine(&mut session.battle)
                .request_action(mode)
                .map_err(|source| RuntimeError::battle(id, source))?;

            debug!("{}: {} drew {}", id, mode, question.id);
            worker.publish(FloorEvent::ActionDrawn {
                session: id,
                mode,
                question: question.id,
            });
            Ok(question)
        })
    }

    fn submit_answer(&mut self, id: SessionId, option: OptionId) -> Result<TurnResult> {
        self.with_session(id, |worker, session| {
            let answer = worker
                .engine(&mut session.battle)
                .answer(option)
                .map_err(|source| RuntimeError::battle(id, source))?;

            debug!(
                "{}: {} answer {} -> boss hp {}, player hp {}",
                id,
                answer.mode,
                if answer.correct { "correct" } else { "wrong" },
                answer.boss_hp,
                answer.player_hp
            );
            worker.publish(FloorEvent::AnswerResolved {
                session: id,
                report: answer.clone(),
            });

            let boss_attack = if worker.auto_boss_attack
                && session.battle.phase == BattlePhase::BossAttackDue
            {
                Some(worker.run_boss_attack(id, &mut session.battle)?)
            } else {
                None
            };

            Ok(TurnResult {
                session: id,
                answer,
                boss_attack,
                settlement: worker.settle_if_finished(session),
            })
        })
    }

    fn boss_attack(&mut self, id: SessionId) -> Result<BossAttackResult> {
        self.with_session(id, |worker, session| {
            let attack = worker.run_boss_attack(id, &mut session.battle)?;
            Ok(BossAttackResult {
                session: id,
                attack,
                settlement: worker.settle_if_finished(session),
            })
        })
    }

    fn abandon(&mut self, id: SessionId) -> Result<()> {
        let session = self
            .sessions
            .remove(&id)
            .ok_or(RuntimeError::SessionNotFound { session: id })?;

        if session.settlement.is_pending() {
            warn!("{} abandoned with an unsettled result", id);
        } else {
            info!("{} abandoned", id);
        }
        self.publish(FloorEvent::Abandoned { session: id });
        Ok(())
    }

    pub(super) fn run_boss_attack(
        &self,
        id: SessionId,
        battle: &mut BattleState,
    ) -> Result<BossAttackReport> {
        let report = self
            .engine(battle)
            .boss_attack()
            .map_err(|source| RuntimeError::battle(id, source))?;

        debug!(
            "{}: {} hits for {}{}",
            id,
            report.boss,
            report.damage,
            if report.critical { " (critical)" } else { "" }
        );
        self.publish(FloorEvent::BossAttacked {
            session: id,
            report: report.clone(),
        });
        Ok(report)
    }

    /// Runs `f` on a session taken out of the map.
    ///
    /// The session goes back unless it was won and settled.
    pub(super) fn with_session<T>(
        &mut self,
        id: SessionId,
        f: impl FnOnce(&mut Self, &mut FloorSession) -> Result<T>,
    ) -> Result<T> {
        let mut session = self
            .sessions
            .remove(&id)
            .ok_or(RuntimeError::SessionNotFound { session: id })?;

        let result = f(self, &mut session);

        if is_complete(&session) {
            info!("{} completed and discarded", id);
        } else {
            self.sessions.insert(id, session);
        }
        result
    }

    pub(super) fn engine<'a>(&'a self, battle: &'a mut BattleState) -> BattleEngine<'a> {
        BattleEngine::new(battle, &self.config.combat, &*self.oracle)
    }

    pub(super) fn publish(&self, event: FloorEvent) {
        self.event_bus.publish(Event::Floor(event));
    }
}

fn is_complete(session: &FloorSession) -> bool {
    matches!(session.settlement, Settlement::Applied(_)) && session.battle.is_finished()
}

fn validate_request(request: &FloorRequest) -> Result<()> {
    if request.floor_level == 0 {
        return Err(RuntimeError::invalid("floor_level", "must be at least 1"));
    }
    if request.difficulty == 0 {
        return Err(RuntimeError::invalid("difficulty", "must be at least 1"));
    }
    if request.quizzes.is_empty() {
        return Err(RuntimeError::invalid("quizzes", "at least one quiz is required"));
    }
    let mut seen = std::collections::HashSet::new();
    if let Some(duplicate) = request.quizzes.iter().find(|id| !seen.insert(**id)) {
        return Err(RuntimeError::invalid(
            "quizzes",
            format!("{} is listed twice", duplicate),
        ));
    }
    Ok(())
}

/// Floors open up one per level, and each floor has a fixed difficulty.
fn check_floor_access(request: &FloorRequest, level: u32, rules: &RosterRules) -> Result<()> {
    if !available_floors(level).contains(&request.floor_level) {
        return Err(RuntimeError::invalid(
            "floor_level",
            format!("floor {} is locked at level {}", request.floor_level, level),
        ));
    }
    let expected = difficulty_for_floor(request.floor_level, rules);
    if request.difficulty != expected {
        return Err(RuntimeError::invalid(
            "difficulty",
            format!("floor {} has difficulty {}", request.floor_level, expected),
        ));
    }
    Ok(())
}
