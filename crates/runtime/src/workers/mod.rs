//! Worker tasks that back the runtime orchestration.
//!
//! The battle worker owns every floor session and is the only place where
//! sessions change or settle.

mod battle;
mod settlement;

pub use battle::{BattleWorker, Command};
