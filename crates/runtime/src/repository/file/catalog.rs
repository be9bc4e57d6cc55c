//! File-based BossCatalog implementation.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use tower_core::{BossId, BossTemplate};

use super::write_json_atomic;
use crate::repository::{BossCatalog, BossFilter, RepositoryError, Result};

/// Boss catalog kept in memory and written through to a single JSON file.
pub struct FileBossCatalog {
    path: PathBuf,
    bosses: RwLock<BTreeMap<BossId, BossTemplate>>,
}

impl FileBossCatalog {
    /// Open the catalog at `path`, seeding it with `seed` when the file does
    /// not exist yet.
    pub fn open(
        path: impl AsRef<Path>,
        seed: impl IntoIterator<Item = BossTemplate>,
    ) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let bosses: BTreeMap<BossId, BossTemplate> = if path.exists() {
            let bytes = fs::read(&path)?;
            let entries: Vec<BossTemplate> = serde_json::from_slice(&bytes).map_err(|e| {
                RepositoryError::CorruptedData(format!("{}: {}", path.display(), e))
            })?;
            tracing::debug!("Loaded {} bosses from {}", entries.len(), path.display());
            entries.into_iter().map(|boss| (boss.id, boss)).collect()
        } else {
            let entries: BTreeMap<_, _> = seed.into_iter().map(|boss| (boss.id, boss)).collect();
            let list: Vec<&BossTemplate> = entries.values().collect();
            write_json_atomic(&path, &list)?;
            tracing::debug!("Seeded {} with {} bosses", path.display(), entries.len());
            entries
        };

        Ok(Self {
            path,
            bosses: RwLock::new(bosses),
        })
    }

    fn flush(&self, bosses: &BTreeMap<BossId, BossTemplate>) -> Result<()> {
        let list: Vec<&BossTemplate> = bosses.values().collect();
        write_json_atomic(&self.path, &list)
    }
}

impl BossCatalog for FileBossCatalog {
    fn list(&self, filter: BossFilter) -> Result<Vec<BossTemplate>> {
        let bosses = self
            .bosses
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(bosses
            .values()
            .filter(|boss| filter.matches(boss))
            .cloned()
            .collect())
    }

    fn get(&self, id: BossId) -> Result<Option<BossTemplate>> {
        let bosses = self
            .bosses
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(bosses.get(&id).cloned())
    }

    fn upsert(&self, boss: BossTemplate) -> Result<()> {
        let mut bosses = self
            .bosses
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        let id = boss.id;
        let previous = bosses.insert(id, boss);
        if let Err(error) = self.flush(&bosses) {
            match previous {
                Some(previous) => bosses.insert(id, previous),
                None => bosses.remove(&id),
            };
            return Err(error);
        }
        tracing::debug!("Stored {} in {}", id, self.path.display());
        Ok(())
    }

    fn remove(&self, id: BossId) -> Result<Option<BossTemplate>> {
        let mut bosses = self
            .bosses
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        let Some(removed) = bosses.remove(&id) else {
            return Ok(None);
        };
        if let Err(error) = self.flush(&bosses) {
            bosses.insert(id, removed);
            return Err(error);
        }
        tracing::debug!("Removed {} from {}", id, self.path.display());
        Ok(Some(removed))
    }
}
