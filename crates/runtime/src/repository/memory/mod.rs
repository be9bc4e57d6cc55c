//! In-memory repository implementations for tests and local runs.

mod catalog;
mod player;
mod quiz;

pub use catalog::InMemoryBossCatalog;
pub use player::InMemoryPlayerRepository;
pub use quiz::InMemoryQuizRepository;
