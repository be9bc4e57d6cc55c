//! In-memory PlayerRepository implementation.

use std::collections::HashMap;
use std::sync::RwLock;

use tower_core::{PlayerId, PlayerStats};

use crate::repository::{PlayerRepository, RepositoryError, Result};

/// In-memory implementation of PlayerRepository.
#[derive(Default)]
pub struct InMemoryPlayerRepository {
    players: RwLock<HashMap<PlayerId, PlayerStats>>,
}

impl InMemoryPlayerRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a player (builder pattern).
    pub fn with_player(self, player: PlayerId, stats: PlayerStats) -> Self {
        if let Ok(mut players) = self.players.write() {
            players.insert(player, stats);
        }
        self
    }
}

impl PlayerRepository for InMemoryPlayerRepository {
    fn fetch(&self, player: PlayerId) -> Result<Option<PlayerStats>> {
        let players = self
            .players
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(players.get(&player).copied())
    }

    fn persist(&self, player: PlayerId, stats: &PlayerStats) -> Result<()> {
        let mut players = self
            .players
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        players.insert(player, *stats);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn persist_then_fetch() {
        let repo = InMemoryPlayerRepository::new();
        assert_eq!(repo.fetch(PlayerId(1)).unwrap(), None);

        let stats = PlayerStats::default();
        repo.persist(PlayerId(1), &stats).unwrap();
        assert_eq!(repo.fetch(PlayerId(1)).unwrap(), Some(stats));
    }
}
