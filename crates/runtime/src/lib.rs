//! Runtime orchestration for the battle tower.
//!
//! This crate wires together the battle provider abstraction, repositories,
//! and the battle worker into a cohesive runtime API. Consumers embed
//! [`Runtime`] to play floors, subscribe to events, and manage the boss
//! catalog through [`RuntimeHandle`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides topic-based event bus for flexible event routing
//! - [`repository`] provides player, catalog and quiz storage adapters
//! - `workers` keeps the battle worker internal to the crate
pub mod api;
pub mod events;
pub mod repository;
pub mod runtime;

mod workers;

pub use api::{
    BattleProvider, BossAttackResult, CorrectAnswerProvider, ErrorKind, FloorRequest,
    FloorSession, FloorSummary, Result, RuntimeError, RuntimeHandle, SessionId, Settlement,
    SettlementReport, TurnResult,
};
pub use events::{Event, EventBus, FloorEvent, SettlementEvent, Topic};
pub use repository::{
    BossCatalog, BossFilter, FileBossCatalog, FilePlayerRepository, InMemoryBossCatalog,
    InMemoryPlayerRepository, InMemoryQuizRepository, PlayerRepository, QuizRepository,
    Repositories, RepositoryError,
};
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig};
