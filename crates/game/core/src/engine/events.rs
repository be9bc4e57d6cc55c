//! Event log and reports produced by battle transitions.

use crate::state::{ActionMode, BattleOutcome, BossId, QuestionId};

/// One observable effect of a transition, in the order it happened.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BattleEvent {
    PlayerStrike {
        boss: BossId,
        damage: u32,
        critical: bool,
    },
    /// A wrong answer on an attack hurts the player.
    Backfire { damage: u32 },
    PlayerHealed { amount: u32, special: bool },
    /// A wrong answer on a heal does nothing.
    HealFizzled,
    BossStrike {
        boss: BossId,
        damage: u32,
        critical: bool,
    },
    BossDefeated { boss: BossId, index: usize },
    BossEngaged { boss: BossId, index: usize },
    Victory,
    Defeat,
}

/// Result of resolving a pending action.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnswerReport {
    pub mode: ActionMode,
    pub question: QuestionId,
    pub correct: bool,
    pub events: Vec<BattleEvent>,
    pub boss_hp: u32,
    pub player_hp: u32,
    pub remaining_boss_turns: u32,
    pub turn_count: u32,
    /// Set when this answer ended the floor.
    pub outcome: Option<BattleOutcome>,
    pub feedback: Option<String>,
    /// Texts of the correct options; empty when the answer was correct.
    pub correct_answers: Vec<String>,
}

impl AnswerReport {
    /// True when the boss is owed an attack before the next action.
    pub fn boss_attack_due(&self) -> bool {
        self.outcome.is_none() && self.remaining_boss_turns == 0
    }
}

/// Result of a boss counter-attack.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BossAttackReport {
    pub boss: BossId,
    pub damage: u32,
    pub critical: bool,
    pub events: Vec<BattleEvent>,
    pub player_hp: u32,
    pub outcome: Option<BattleOutcome>,
}
