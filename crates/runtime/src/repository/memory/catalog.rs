//! In-memory BossCatalog implementation.

use std::collections::BTreeMap;
use std::sync::RwLock;

use tower_core::{BossId, BossTemplate};

use crate::repository::{BossCatalog, BossFilter, RepositoryError, Result};

/// In-memory implementation of BossCatalog, ordered by boss id.
#[derive(Default)]
pub struct InMemoryBossCatalog {
    bosses: RwLock<BTreeMap<BossId, BossTemplate>>,
}

impl InMemoryBossCatalog {
    pub fn new(bosses: impl IntoIterator<Item = BossTemplate>) -> Self {
        let bosses = bosses.into_iter().map(|boss| (boss.id, boss)).collect();
        Self {
            bosses: RwLock::new(bosses),
        }
    }
}

impl BossCatalog for InMemoryBossCatalog {
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
        bosses.insert(boss.id, boss);
        Ok(())
    }

    fn remove(&self, id: BossId) -> Result<Option<BossTemplate>> {
        let mut bosses = self
            .bosses
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(bosses.remove(&id))
    }
}
