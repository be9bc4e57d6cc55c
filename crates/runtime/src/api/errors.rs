//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from the battle rules, repositories and worker coordination
//! so clients can bubble them up with consistent context.
use std::fmt;

use thiserror::Error;
use tokio::sync::oneshot;

use tower_core::{
    BattleError, BossId, CatalogError, ErrorSeverity, PlayerId, QuizId, RosterError, TowerError,
};

pub use crate::repository::RepositoryError;

use super::session::SessionId;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("{player} not found")]
    PlayerNotFound { player: PlayerId },

    #[error("{boss} not found")]
    BossNotFound { boss: BossId },

    #[error("none of the quizzes {quizzes:?} exist")]
    QuizzesNotFound { quizzes: Vec<QuizId> },

    #[error("{session} not found")]
    SessionNotFound { session: SessionId },

    #[error("invalid {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },

    #[error(transparent)]
    Roster(#[from] RosterError),

    #[error("{session}: {source}")]
    Battle {
        session: SessionId,
        #[source]
        source: BattleError,
    },

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("{session}: nothing to settle")]
    NothingToSettle { session: SessionId },

    #[error("failed to persist stats of {player}")]
    PersistenceFailure {
        player: PlayerId,
        #[source]
        source: RepositoryError,
    },

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("battle provider closed")]
    ProviderClosed,

    #[error("battle worker command channel closed")]
    CommandChannelClosed,

    #[error("battle worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("battle worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),
}

/// Coarse classification of [`RuntimeError`] for callers that only need to
/// decide how to react.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    InvalidInput,
    NoBossesAvailable,
    NoQuestionsAvailable,
    IllegalStateTransition,
    PersistenceFailure,
    Internal,
}

impl ErrorKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::InvalidInput => "invalid_input",
            Self::NoBossesAvailable => "no_bosses_available",
            Self::NoQuestionsAvailable => "no_questions_available",
            Self::IllegalStateTransition => "illegal_state_transition",
            Self::PersistenceFailure => "persistence_failure",
            Self::Internal => "internal",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl RuntimeError {
    pub(crate) fn battle(session: SessionId, source: BattleError) -> Self {
        Self::Battle { session, source }
    }

    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field,
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::PlayerNotFound { .. }
            | Self::BossNotFound { .. }
            | Self::QuizzesNotFound { .. }
            | Self::SessionNotFound { .. } => ErrorKind::NotFound,
            Self::InvalidInput { .. } | Self::Catalog(_) => ErrorKind::InvalidInput,
            Self::Roster(RosterError::NoBossesAvailable { .. }) => ErrorKind::NoBossesAvailable,
            Self::Battle { source, .. } => match source {
                BattleError::NoQuestionsAvailable => ErrorKind::NoQuestionsAvailable,
                BattleError::IllegalStateTransition { .. } => ErrorKind::IllegalStateTransition,
                BattleError::UnknownOption { .. } => ErrorKind::InvalidInput,
                BattleError::EmptyRoster => ErrorKind::Internal,
            },
            Self::NothingToSettle { .. } => ErrorKind::IllegalStateTransition,
            Self::PersistenceFailure { .. } | Self::Repository(_) => ErrorKind::PersistenceFailure,
            Self::ProviderClosed
            | Self::CommandChannelClosed
            | Self::ReplyChannelClosed(_)
            | Self::WorkerJoin(_) => ErrorKind::Internal,
        }
    }

    /// Severity and code of the underlying rule error, when there is one.
    pub fn rule_error(&self) -> Option<(ErrorSeverity, &'static str)> {
        let source: &dyn TowerError = match self {
            Self::Roster(source) => source,
            Self::Battle { source, .. } => source,
            Self::Catalog(source) => source,
            _ => return None,
        };
        Some((source.severity(), source.error_code()))
    }
}
