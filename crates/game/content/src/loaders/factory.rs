//! Content factory for assembling tower content from data files.

use std::path::{Path, PathBuf};

use tower_core::{BossTemplate, Quiz, TowerConfig};

use crate::loaders::{BossLoader, ConfigLoader, LoadResult, QuizLoader};

const EMBEDDED_CONFIG: &str = include_str!("../../data/tower.toml");
const EMBEDDED_BOSSES: &str = include_str!("../../data/bosses.ron");
const EMBEDDED_QUIZZES: &str = include_str!("../../data/quizzes.ron");

/// Everything a runtime needs to open floors.
#[derive(Clone, Debug, Default)]
pub struct ContentBundle {
    pub config: TowerConfig,
    pub bosses: Vec<BossTemplate>,
    pub quizzes: Vec<Quiz>,
}

impl ContentBundle {
    /// The default data set compiled into the crate.
    pub fn embedded() -> LoadResult<Self> {
        Ok(Self {
            config: ConfigLoader::parse(EMBEDDED_CONFIG)?,
            bosses: BossLoader::parse(EMBEDDED_BOSSES)?,
            quizzes: QuizLoader::parse(EMBEDDED_QUIZZES)?,
        })
    }
}

/// Content factory that loads all tower content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── tower.toml
/// ├── bosses.ron
/// └── quizzes.ron
/// ```
///
/// A missing `tower.toml` falls back to [`TowerConfig::default`]; the two
/// RON files are required.
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load tower rules from `tower.toml`.
    pub fn load_config(&self) -> LoadResult<TowerConfig> {
        let path = self.data_dir.join("tower.toml");
        if !path.exists() {
            return Ok(TowerConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Load the boss catalog from `bosses.ron`.
    pub fn load_bosses(&self) -> LoadResult<Vec<BossTemplate>> {
        BossLoader::load(&self.data_dir.join("bosses.ron"))
    }

    /// Load quiz packs from `quizzes.ron`.
    pub fn load_quizzes(&self) -> LoadResult<Vec<Quiz>> {
        QuizLoader::load(&self.data_dir.join("quizzes.ron"))
    }

    pub fn load_bundle(&self) -> LoadResult<ContentBundle> {
        Ok(ContentBundle {
            config: self.load_config()?,
            bosses: self.load_bosses()?,
            quizzes: self.load_quizzes()?,
        })
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
