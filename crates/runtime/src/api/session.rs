//! Session value objects exchanged between the runtime and its clients.

use std::fmt;

use serde::{Deserialize, Serialize};
use tower_core::{
    AnswerReport, BattleOutcome, BattleState, BossAttackReport, BossId, PlayerId, PlayerStats,
    QuizId,
};

/// Identifier of a floor session held by the battle worker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session#{}", self.0)
    }
}

/// Parameters for opening a floor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FloorRequest {
    pub player: PlayerId,
    pub difficulty: u32,
    pub floor_level: u32,
    pub quizzes: Vec<QuizId>,
}

impl FloorRequest {
    pub fn new(player: PlayerId, difficulty: u32, floor_level: u32, quizzes: Vec<QuizId>) -> Self {
        Self {
            player,
            difficulty,
            floor_level,
            quizzes,
        }
    }
}

/// Result of writing a finished floor back to the player's stats.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementReport {
    pub outcome: BattleOutcome,
    pub delta: i64,
    pub before: PlayerStats,
    pub after: PlayerStats,
}

impl SettlementReport {
    pub fn levels_gained(&self) -> i64 {
        i64::from(self.after.level) - i64::from(self.before.level)
    }
}

/// Settlement state of a session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Settlement {
    /// The floor is still running.
    Open,
    /// Persistence failed; `retry_settlement` re-applies `delta`.
    Pending {
        outcome: BattleOutcome,
        delta: i64,
        reason: String,
    },
    Applied(SettlementReport),
}

impl Settlement {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending { .. })
    }

    pub fn report(&self) -> Option<&SettlementReport> {
        match self {
            Self::Applied(report) => Some(report),
            _ => None,
        }
    }
}

/// Read-only snapshot of a floor session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FloorSession {
    pub id: SessionId,
    pub player: PlayerId,
    pub difficulty: u32,
    pub floor_level: u32,
    pub battle: BattleState,
    pub settlement: Settlement,
    /// Most recent write-back, kept across retries after a defeat.
    pub last_report: Option<SettlementReport>,
}

impl FloorSession {
    pub fn boss_ids(&self) -> Vec<BossId> {
        self.battle.bosses.iter().map(|boss| boss.id).collect()
    }
}

/// Everything that happened in response to one answer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnResult {
    pub session: SessionId,
    pub answer: AnswerReport,
    /// Set when the boss attacked right after the answer.
    pub boss_attack: Option<BossAttackReport>,
    /// Set when the floor ended during this turn.
    pub settlement: Option<Settlement>,
}

impl TurnResult {
    pub fn outcome(&self) -> Option<BattleOutcome> {
        self.boss_attack
            .as_ref()
            .and_then(|attack| attack.outcome)
            .or(self.answer.outcome)
    }

    pub fn player_hp(&self) -> u32 {
        self.boss_attack
            .as_ref()
            .map_or(self.answer.player_hp, |attack| attack.player_hp)
    }
}

/// Response to an explicit boss attack.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BossAttackResult {
    pub session: SessionId,
    pub attack: BossAttackReport,
    pub settlement: Option<Settlement>,
}

/// How a floor played through [`Runtime::play_floor`](crate::Runtime::play_floor) ended.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FloorSummary {
    pub session: SessionId,
    pub outcome: BattleOutcome,
    /// Attempts made, counting retries after a defeat.
    pub attempts: u32,
    pub settlement: Settlement,
}
