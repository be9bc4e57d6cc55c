use serde::{Deserialize, Serialize};
use tower_core::{
    ActionMode, AnswerReport, BattleOutcome, BossAttackReport, BossId, PlayerId, QuestionId,
};

use crate::api::{SessionId, SettlementReport};

/// Battle progress of a floor session.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum FloorEvent {
    Started {
        session: SessionId,
        player: PlayerId,
        difficulty: u32,
        floor_level: u32,
        bosses: Vec<BossId>,
    },
    ActionDrawn {
        session: SessionId,
        mode: ActionMode,
        question: QuestionId,
    },
    AnswerResolved {
        session: SessionId,
        report: AnswerReport,
    },
    BossAttacked {
        session: SessionId,
        report: BossAttackReport,
    },
    Finished {
        session: SessionId,
        outcome: BattleOutcome,
    },
    /// A lost floor was reset for another attempt against the same boss.
    Retried { session: SessionId },
    Abandoned { session: SessionId },
}

/// Writes of finished floors back to player stats.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum SettlementEvent {
    Settled {
        session: SessionId,
        player: PlayerId,
        report: SettlementReport,
    },
    Failed {
        session: SessionId,
        player: PlayerId,
        delta: i64,
        reason: String,
    },
}
