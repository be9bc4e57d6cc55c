//! Repository layer for persisted tower data.
//!
//! Repositories are the external data-access collaborators of the runtime:
//! - Player stats (fetch by id, write back after settlement)
//! - Boss catalog (list by difficulty filter, managed entries)
//! - Quizzes with their questions (fetch by ids)
//!
//! Battle sessions themselves never touch a repository until they settle.

mod error;
mod file;
mod memory;
mod traits;

pub use error::{RepositoryError, Result};
pub use file::{FileBossCatalog, FilePlayerRepository};
pub use memory::{InMemoryBossCatalog, InMemoryPlayerRepository, InMemoryQuizRepository};
pub use traits::{BossCatalog, BossFilter, PlayerRepository, QuizRepository};

use std::sync::Arc;

/// The three collaborators the runtime reads and writes.
#[derive(Clone)]
pub struct Repositories {
    pub players: Arc<dyn PlayerRepository>,
    pub catalog: Arc<dyn BossCatalog>,
    pub quizzes: Arc<dyn QuizRepository>,
}

impl Repositories {
    pub fn new(
        players: Arc<dyn PlayerRepository>,
        catalog: Arc<dyn BossCatalog>,
        quizzes: Arc<dyn QuizRepository>,
    ) -> Self {
        Self {
            players,
            catalog,
            quizzes,
        }
    }
}

impl Default for Repositories {
    fn default() -> Self {
        Self {
            players: Arc::new(InMemoryPlayerRepository::new()),
            catalog: Arc::new(InMemoryBossCatalog::default()),
            quizzes: Arc::new(InMemoryQuizRepository::default()),
        }
    }
}
