//! Asynchronous abstraction for sourcing player decisions.
//!
//! Runtime users plug in [`BattleProvider`] implementations so a floor can be
//! played with human input, scripted fixtures, or automated policies.
use async_trait::async_trait;
use tower_core::{ActionMode, OptionId, Question};

use super::errors::{Result, RuntimeError};
use super::session::{BossAttackResult, FloorSession, SettlementReport, TurnResult};

/// Trait for providing player decisions during a floor.
///
/// Different implementations can handle:
/// - Player input (from a terminal or UI)
/// - Scripted answers
/// - Testing fixtures
#[async_trait]
pub trait BattleProvider: Send + Sync {
    /// Choose attack or heal for the next question.
    async fn choose_action(&self, session: &FloorSession) -> Result<ActionMode>;

    /// Pick an option for the drawn question.
    async fn choose_answer(&self, session: &FloorSession, question: &Question)
    -> Result<OptionId>;

    /// Whether to fight the same boss again after a settled defeat.
    async fn retry_after_defeat(&self, _report: &SettlementReport) -> Result<bool> {
        Ok(false)
    }

    fn observe_turn(&self, _turn: &TurnResult) {}

    fn observe_boss_attack(&self, _attack: &BossAttackResult) {}
}

/// Always answers correctly; heals below half HP and attacks otherwise.
/// Useful for testing or as an autoplay fallback.
pub struct CorrectAnswerProvider;

#[async_trait]
impl BattleProvider for CorrectAnswerProvider {
    async fn choose_action(&self, session: &FloorSession) -> Result<ActionMode> {
        let battle = &session.battle;
        if battle.player_hp.saturating_mul(2) < battle.player.max_hp {
            Ok(ActionMode::Heal)
        } else {
            Ok(ActionMode::Attack)
        }
    }

    async fn choose_answer(
        &self,
        _session: &FloorSession,
        question: &Question,
    ) -> Result<OptionId> {
        question
            .options
            .iter()
            .find(|option| option.is_correct)
            .or_else(|| question.options.first())
            .map(|option| option.id)
            .ok_or_else(|| RuntimeError::invalid("question", format!("{} has no options", question.id)))
    }
}
