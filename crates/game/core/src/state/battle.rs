use std::fmt;

use super::boss::BossTemplate;
use super::ids::BossId;
use super::player::PlayerStats;
use super::quiz::{Question, QuestionPool};
use crate::engine::BattleError;

/// What the player wants to do with the next question.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionMode {
    Attack,
    Heal,
}

impl ActionMode {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Attack => "attack",
            Self::Heal => "heal",
        }
    }
}

impl fmt::Display for ActionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An action waiting for the player's answer. Consumed exactly once.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PendingAction {
    pub mode: ActionMode,
    pub question: Question,
}

/// Terminal result of a floor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BattleOutcome {
    Win,
    Lose,
}

impl BattleOutcome {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Win => "win",
            Self::Lose => "lose",
        }
    }
}

impl fmt::Display for BattleOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Phase of the battle state machine.
///
/// ```text
/// AwaitingAction --request_action--> AwaitingAnswer
/// AwaitingAnswer --answer--> AwaitingAction | BossAttackDue | Finished
/// BossAttackDue  --boss_attack--> AwaitingAction | Finished(Lose)
/// Finished(Lose) --retry_after_defeat--> AwaitingAction | BossAttackDue
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BattlePhase {
    AwaitingAction,
    AwaitingAnswer(PendingAction),
    BossAttackDue,
    Finished(BattleOutcome),
}

impl BattlePhase {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::AwaitingAction => "awaiting_action",
            Self::AwaitingAnswer(_) => "awaiting_answer",
            Self::BossAttackDue => "boss_attack_due",
            Self::Finished(_) => "finished",
        }
    }

    pub const fn outcome(&self) -> Option<BattleOutcome> {
        match self {
            Self::Finished(outcome) => Some(*outcome),
            _ => None,
        }
    }

    pub const fn is_finished(&self) -> bool {
        matches!(self, Self::Finished(_))
    }
}

impl fmt::Display for BattlePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mutable state of one floor.
///
/// `player` is a read-only snapshot of the persisted stats; only `player_hp`
/// changes while the battle runs.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleState {
    /// Base seed for every roll in this battle. Never modified.
    pub seed: u64,
    /// Transition counter mixed into roll seeds.
    pub nonce: u64,
    pub player: PlayerStats,
    pub player_hp: u32,
    pub bosses: Vec<BossTemplate>,
    pub boss_index: usize,
    pub boss_hp: u32,
    pub remaining_boss_turns: u32,
    pub turn_count: u32,
    pub phase: BattlePhase,
    pub pool: QuestionPool,
    /// Bosses defeated so far, in order.
    pub defeated: Vec<BossId>,
}

impl BattleState {
    /// Creates a battle against the first boss of `bosses`.
    ///
    /// A player snapshot with no HP left starts in `Finished(Lose)`.
    pub fn new(
        player: PlayerStats,
        bosses: Vec<BossTemplate>,
        pool: QuestionPool,
        seed: u64,
    ) -> Result<Self, BattleError> {
        let first = bosses.first().ok_or(BattleError::EmptyRoster)?;
        let boss_hp = first.hp;
        let remaining_boss_turns = first.attack_turn.max(1);
        let player_hp = player.hp.min(player.max_hp);
        let phase = if player_hp == 0 {
            BattlePhase::Finished(BattleOutcome::Lose)
        } else {
            BattlePhase::AwaitingAction
        };

        Ok(Self {
            seed,
            nonce: 0,
            player,
            player_hp,
            bosses,
            boss_index: 0,
            boss_hp,
            remaining_boss_turns,
            turn_count: 1,
            phase,
            pool,
            defeated: Vec::new(),
        })
    }

    pub fn current_boss(&self) -> Option<&BossTemplate> {
        self.bosses.get(self.boss_index)
    }

    pub fn boss_count(&self) -> usize {
        self.bosses.len()
    }

    pub fn outcome(&self) -> Option<BattleOutcome> {
        self.phase.outcome()
    }

    pub fn is_finished(&self) -> bool {
        self.phase.is_finished()
    }

    pub fn pending(&self) -> Option<&PendingAction> {
        match &self.phase {
            BattlePhase::AwaitingAnswer(pending) => Some(pending),
            _ => None,
        }
    }

    /// Maximum HP of the boss currently fought.
    pub fn current_boss_max_hp(&self) -> u32 {
        self.current_boss().map(|boss| boss.max_hp).unwrap_or(0)
    }
}
