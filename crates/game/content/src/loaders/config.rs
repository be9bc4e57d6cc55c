//! Tower rules loader.

use std::path::Path;

use tower_core::TowerConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for [`TowerConfig`] from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    pub fn load(path: &Path) -> LoadResult<TowerConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("{} ({})", e, path.display()))
    }

    /// Parse TOML text. Missing sections and keys fall back to defaults.
    pub fn parse(content: &str) -> LoadResult<TowerConfig> {
        let config: TowerConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        if config.progression.level_up_multiplier == 0 {
            anyhow::bail!("progression.level_up_multiplier must be at least 1");
        }
        if config.combat.damage_divisor == 0 {
            anyhow::bail!("combat.damage_divisor must be at least 1");
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let config = ConfigLoader::parse(
            r#"
            [combat]
            player_crit_chance_permille = 0
            "#,
        )
        .unwrap();
        assert_eq!(config.combat.player_crit_chance_permille, 0);
        assert_eq!(config.combat.boss_crit_multiplier, 3);
        assert_eq!(config.progression.level_up_multiplier, 15);
    }

    #[test]
    fn zero_multiplier_is_rejected() {
        let result = ConfigLoader::parse("[progression]\nlevel_up_multiplier = 0\n");
        assert!(result.is_err());
    }
}
