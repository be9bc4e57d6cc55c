//! File-based PlayerRepository implementation.

use std::fs;
use std::path::{Path, PathBuf};

use tower_core::{PlayerId, PlayerStats};

use super::write_json_atomic;
use crate::repository::{PlayerRepository, RepositoryError, Result};

/// Stores each player as `player_{id}.json` under a base directory.
pub struct FilePlayerRepository {
    base_dir: PathBuf,
}

impl FilePlayerRepository {
    /// Create a new file-based player repository.
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    fn player_path(&self, player: PlayerId) -> PathBuf {
        self.base_dir.join(format!("player_{}.json", player.0))
    }
}

impl PlayerRepository for FilePlayerRepository {
    fn fetch(&self, player: PlayerId) -> Result<Option<PlayerStats>> {
        let path = self.player_path(player);
        if !path.exists() {
            return Ok(None);
        }

        let bytes = fs::read(&path)?;
        let stats: PlayerStats = serde_json::from_slice(&bytes).map_err(|e| {
            RepositoryError::CorruptedData(format!("{}: {}", path.display(), e))
        })?;

        tracing::debug!("Loaded {} from {}", player, path.display());
        Ok(Some(stats))
    }

    fn persist(&self, player: PlayerId, stats: &PlayerStats) -> Result<()> {
        let path = self.player_path(player);
        write_json_atomic(&path, stats)?;
        tracing::debug!("Saved {} to {}", player, path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FilePlayerRepository::new(dir.path()).unwrap();
        let stats = PlayerStats::new(80, 120, 4, 12, 16, 14);

        repo.persist(PlayerId(7), &stats).unwrap();
        let reopened = FilePlayerRepository::new(dir.path()).unwrap();
        assert_eq!(reopened.fetch(PlayerId(7)).unwrap(), Some(stats));
        assert_eq!(reopened.fetch(PlayerId(8)).unwrap(), None);
    }

    #[test]
    fn corrupted_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FilePlayerRepository::new(dir.path()).unwrap();
        fs::write(dir.path().join("player_1.json"), b"{ not json").unwrap();

        assert!(matches!(
            repo.fetch(PlayerId(1)),
            Err(RepositoryError::CorruptedData(_))
        ));
    }
}
