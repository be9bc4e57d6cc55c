//! Common error infrastructure for tower-core.
//!
//! Domain-specific errors (`RosterError`, `BattleError`, `CatalogError`) live
//! next to the rules they validate. This module provides the classification
//! shared by all of them so the runtime can decide between retry and abort.

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: the same request may succeed later or with another choice
/// - **Validation**: invalid input, should not be retried unchanged
/// - **Internal**: unexpected state inconsistency
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Recoverable error - can retry with same or alternative request.
    ///
    /// Examples: action requested while the boss attack is pending
    Recoverable,

    /// Validation error - invalid input, should not retry without changes.
    ///
    /// Examples: unknown option id, malformed boss entry
    Validation,

    /// Internal error - unexpected state inconsistency.
    ///
    /// Examples: session phase that does not match its counters
    Internal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates an internal bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal)
    }
}

/// Common trait for all tower-core errors.
///
/// # Implementation Guidelines
///
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Carry the boss, question or phase involved in the variant fields
/// - Classify severity based on recoverability, not impact
pub trait TowerError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// Default implementation uses the error type name.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
