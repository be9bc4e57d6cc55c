//! Boss catalog loader.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tower_core::{BossTemplate, CatalogError};

use crate::loaders::{LoadResult, read_file};

/// Boss catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BossCatalog {
    pub bosses: Vec<BossTemplate>,
}

/// Loader for the boss catalog from RON files.
pub struct BossLoader;

impl BossLoader {
    /// Load the boss catalog from a RON file.
    pub fn load(path: &Path) -> LoadResult<Vec<BossTemplate>> {
        let content = read_file(path)?;
        Self::parse(&content).map_err(|e| anyhow::anyhow!("{} ({})", e, path.display()))
    }

    /// Parse and validate catalog RON text.
    ///
    /// Every entry must pass [`BossTemplate::validate_stats`] and ids must be
    /// unique.
    pub fn parse(content: &str) -> LoadResult<Vec<BossTemplate>> {
        let catalog: BossCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse boss catalog RON: {}", e))?;

        let mut seen = HashSet::new();
        for boss in &catalog.bosses {
            boss.validate_stats()?;
            if !seen.insert(boss.id) {
                return Err(CatalogError::DuplicateId { boss: boss.id }.into());
            }
        }

        Ok(catalog.bosses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_entry() {
        let bosses = BossLoader::parse(
            r#"(bosses: [(
                id: BossId(9),
                name: "Quiz Mimic",
                hp: 10,
                max_hp: 10,
                attack_power: 2,
                attack_turn: 2,
                difficulty: 1,
            )])"#,
        )
        .unwrap();
        assert_eq!(bosses.len(), 1);
        assert_eq!(bosses[0].description, "");
        assert_eq!(bosses[0].image_url, None);
    }

    #[test]
    fn rejects_invalid_and_duplicate_entries() {
        let zero_turn = r#"(bosses: [(id: BossId(1), name: "A", hp: 5, max_hp: 5,
            attack_power: 1, attack_turn: 0, difficulty: 1)])"#;
        assert!(BossLoader::parse(zero_turn).is_err());

        let duplicate = r#"(bosses: [
            (id: BossId(1), name: "A", hp: 5, max_hp: 5, attack_power: 1, attack_turn: 1, difficulty: 1),
            (id: BossId(1), name: "B", hp: 5, max_hp: 5, attack_power: 1, attack_turn: 1, difficulty: 1),
        ])"#;
        let error = BossLoader::parse(duplicate).unwrap_err();
        assert!(error.to_string().contains("already exists"));
    }
}
