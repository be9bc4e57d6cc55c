//! Error types for battle transitions.

use std::fmt;

use crate::error::{ErrorSeverity, TowerError};
use crate::state::{OptionId, QuestionId};

/// Identifies which battle transition produced an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TransitionKind {
    RequestAction,
    Answer,
    BossAttack,
    Retry,
}

impl TransitionKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::RequestAction => "request_action",
            Self::Answer => "answer",
            Self::BossAttack => "boss_attack",
            Self::Retry => "retry",
        }
    }
}

impl fmt::Display for TransitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors surfaced while driving a battle through the engine.
///
/// A failed transition never mutates the battle state.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BattleError {
    #[error("a battle needs at least one boss")]
    EmptyRoster,

    #[error("no questions available for this floor")]
    NoQuestionsAvailable,

    #[error("{transition} is not allowed while the battle is {phase}")]
    IllegalStateTransition {
        transition: TransitionKind,
        phase: &'static str,
    },

    #[error("{option} is not an option of {question}")]
    UnknownOption {
        question: QuestionId,
        option: OptionId,
    },
}

impl BattleError {
    pub fn illegal(transition: TransitionKind, phase: &'static str) -> Self {
        Self::IllegalStateTransition { transition, phase }
    }
}

impl TowerError for BattleError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::EmptyRoster => ErrorSeverity::Internal,
            Self::NoQuestionsAvailable => ErrorSeverity::Recoverable,
            Self::IllegalStateTransition { .. } => ErrorSeverity::Recoverable,
            Self::UnknownOption { .. } => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyRoster => "BATTLE_EMPTY_ROSTER",
            Self::NoQuestionsAvailable => "BATTLE_NO_QUESTIONS",
            Self::IllegalStateTransition { .. } => "BATTLE_ILLEGAL_TRANSITION",
            Self::UnknownOption { .. } => "BATTLE_UNKNOWN_OPTION",
        }
    }
}
