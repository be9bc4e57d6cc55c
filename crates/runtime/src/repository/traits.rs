//! Repository contracts for the data the tower reads and writes.

use tower_core::{BossId, BossTemplate, PlayerId, PlayerStats, Quiz, QuizId};

use super::Result;

/// Repository for persistent player statistics.
///
/// Settlement performs one read-modify-write per finished floor; concurrent
/// writers are last-writer-wins.
pub trait PlayerRepository: Send + Sync {
    /// Load a player's stats. `None` when the player does not exist.
    fn fetch(&self, player: PlayerId) -> Result<Option<PlayerStats>>;

    /// Replace a player's stats.
    fn persist(&self, player: PlayerId, stats: &PlayerStats) -> Result<()>;
}

/// Difficulty filter for catalog listings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BossFilter {
    All,
    Exact(u32),
    AtMost(u32),
}

impl BossFilter {
    pub fn matches(&self, boss: &BossTemplate) -> bool {
        match *self {
            Self::All => true,
            Self::Exact(difficulty) => boss.difficulty == difficulty,
            Self::AtMost(difficulty) => boss.difficulty <= difficulty,
        }
    }
}

/// Repository for boss catalog entries.
///
/// Implementations store entries as given; validation happens in the
/// runtime before anything reaches the catalog.
pub trait BossCatalog: Send + Sync {
    /// List entries matching `filter`, ordered by id.
    fn list(&self, filter: BossFilter) -> Result<Vec<BossTemplate>>;

    fn get(&self, id: BossId) -> Result<Option<BossTemplate>>;

    /// Insert or replace the entry with the same id.
    fn upsert(&self, boss: BossTemplate) -> Result<()>;

    /// Remove an entry, returning it when it existed.
    fn remove(&self, id: BossId) -> Result<Option<BossTemplate>>;
}

/// Repository for quizzes with their nested questions.
pub trait QuizRepository: Send + Sync {
    /// Fetch every quiz in `ids` that exists, in request order.
    fn fetch_with_questions(&self, ids: &[QuizId]) -> Result<Vec<Quiz>>;
}
