//! Outcome settlement for finished floors.
//!
//! A finished floor turns into a signed experience delta that is applied to
//! the persisted player stats with one read-modify-write. A failed write
//! leaves the battle outcome in place and parks the delta until
//! `retry_settlement` succeeds.

use tracing::{info, warn};

use tower_core::{
    BattleOutcome, BattlePhase, PlayerId, apply_experience_delta, experience_delta_for,
};

use super::BattleWorker;
use crate::api::{FloorSession, Result, RuntimeError, SessionId, Settlement, SettlementReport};
use crate::events::{Event, FloorEvent, SettlementEvent};

impl BattleWorker {
    /// Settles a session whose battle just ended.
    ///
    /// Returns `None` while the battle is running or when the result was
    /// already handled.
    pub(super) fn settle_if_finished(&self, session: &mut FloorSession) -> Option<Settlement> {
        let outcome = session.battle.outcome()?;
        if session.settlement != Settlement::Open {
            return None;
        }

        info!("{} finished: {}", session.id, outcome);
        self.publish(FloorEvent::Finished {
            session: session.id,
            outcome,
        });

        let delta = experience_delta_for(
            outcome,
            session.difficulty,
            session.floor_level,
            &self.config.settlement,
        );
        Some(match self.write_back(session.player, outcome, delta) {
            Ok(report) => self.apply(session, report),
            Err(error) => self.park(session, outcome, delta, &error),
        })
    }

    /// Re-runs a failed settlement with the delta computed at the time.
    pub(super) fn retry_settlement(&mut self, id: SessionId) -> Result<SettlementReport> {
        self.with_session(id, |worker, session| {
            let Settlement::Pending { outcome, delta, .. } = session.settlement else {
                return Err(RuntimeError::NothingToSettle { session: id });
            };

            match worker.write_back(session.player, outcome, delta) {
                Ok(report) => {
                    worker.apply(session, report);
                    Ok(report)
                }
                Err(error) => {
                    worker.park(session, outcome, delta, &error);
                    Err(error)
                }
            }
        })
    }

    fn write_back(
        &self,
        player: PlayerId,
        outcome: BattleOutcome,
        delta: i64,
    ) -> Result<SettlementReport> {
        let before = self
            .repos
            .players
            .fetch(player)
            .map_err(|source| RuntimeError::PersistenceFailure { player, source })?
            .ok_or(RuntimeError::PlayerNotFound { player })?;

        let after = apply_experience_delta(&before, delta, &self.config.progression);
        self.repos
            .players
            .persist(player, &after)
            .map_err(|source| RuntimeError::PersistenceFailure { player, source })?;

        Ok(SettlementReport {
            outcome,
            delta,
            before,
            after,
        })
    }

    /// Records a successful write. A lost floor restarts against the same
    /// boss with the freshly settled stats; with automatic boss attacks on, a
    /// counter-attack the boss still owes lands right away.
    fn apply(&self, session: &mut FloorSession, report: SettlementReport) -> Settlement {
        info!(
            "{} settled for {}: {:+} exp, level {} -> {}",
            session.id, session.player, report.delta, report.before.level, report.after.level
        );
        self.event_bus
            .publish(Event::Settlement(SettlementEvent::Settled {
                session: session.id,
                player: session.player,
                report,
            }));

        session.last_report = Some(report);
        let applied = Settlement::Applied(report);
        if report.outcome == BattleOutcome::Win {
            session.settlement = applied.clone();
            return applied;
        }

        let reset = self
            .engine(&mut session.battle)
            .retry_after_defeat(report.after);
        match reset {
            Ok(()) => {
                session.settlement = Settlement::Open;
                self.publish(FloorEvent::Retried {
                    session: session.id,
                });
                if self.auto_boss_attack && session.battle.phase == BattlePhase::BossAttackDue {
                    self.resume_after_retry(session);
                }
            }
            Err(error) => {
                warn!("{} could not be reset after defeat: {}", session.id, error);
                session.settlement = applied.clone();
            }
        }
        applied
    }

    /// The attack resets the boss countdown, so a second retry never owes
    /// another one.
    fn resume_after_retry(&self, session: &mut FloorSession) {
        if let Err(error) = self.run_boss_attack(session.id, &mut session.battle) {
            warn!("{} owed boss attack failed after retry: {}", session.id, error);
            return;
        }
        self.settle_if_finished(session);
    }

    fn park(
        &self,
        session: &mut FloorSession,
        outcome: BattleOutcome,
        delta: i64,
        error: &RuntimeError,
    ) -> Settlement {
        warn!(
            "{} settlement of {:+} exp for {} failed: {}",
            session.id, delta, session.player, error
        );
        self.event_bus
            .publish(Event::Settlement(SettlementEvent::Failed {
                session: session.id,
                player: session.player,
                delta,
                reason: error.to_string(),
            }));

        session.settlement = Settlement::Pending {
            outcome,
            delta,
            reason: error.to_string(),
        };
        session.settlement.clone()
    }
}
