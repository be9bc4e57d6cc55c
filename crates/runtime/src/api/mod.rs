//! Public runtime API surface.
//!
//! This module gathers the types exposed to consumers of the runtime crate so
//! other layers can stay focused on orchestration, workers, or storage.

pub mod errors;
pub mod handle;
pub mod providers;
pub mod session;

pub use errors::{ErrorKind, Result, RuntimeError};
pub use handle::RuntimeHandle;
pub use providers::{BattleProvider, CorrectAnswerProvider};
pub use session::{
    BossAttackResult, FloorRequest, FloorSession, FloorSummary, SessionId, Settlement,
    SettlementReport, TurnResult,
};
