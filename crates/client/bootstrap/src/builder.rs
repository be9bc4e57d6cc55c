//! Builds the runtime and content bundle used by front-ends.
use std::sync::Arc;

use anyhow::{Context, Result};
use runtime::{
    BossCatalog, FileBossCatalog, FilePlayerRepository, InMemoryBossCatalog,
    InMemoryPlayerRepository, InMemoryQuizRepository, PlayerRepository, Repositories, Runtime,
    RuntimeConfig,
};
use tower_content::{ContentBundle, ContentFactory};
use tower_core::PlayerStats;
use tracing::info;

use crate::config::BootstrapConfig;

/// Builder that assembles content, repositories and the runtime for clients.
pub struct RuntimeBuilder {
    config: BootstrapConfig,
    content: Option<ContentBundle>,
}

impl RuntimeBuilder {
    pub fn new(config: BootstrapConfig) -> Self {
        Self {
            config,
            content: None,
        }
    }

    /// Provide content directly instead of loading it.
    pub fn content(mut self, content: ContentBundle) -> Self {
        self.content = Some(content);
        self
    }

    /// Build the runtime. Must be awaited inside a tokio runtime.
    pub async fn build(mut self) -> Result<TowerSetup> {
        let content = match self.content.take() {
            Some(content) => content,
            None => load_content(&self.config)?,
        };
        info!(
            "Content ready: {} bosses, {} quizzes",
            content.bosses.len(),
            content.quizzes.len()
        );

        let repos = self.repositories(&content)?;
        if repos.players.fetch(self.config.player)?.is_none() {
            repos
                .players
                .persist(self.config.player, &PlayerStats::default())?;
            info!("Created {} with starting stats", self.config.player);
        }

        let runtime = Runtime::builder()
            .config(RuntimeConfig {
                tower: content.config.clone(),
                event_buffer_size: self.config.event_buffer,
                command_buffer_size: self.config.command_buffer,
                rng_seed: self.config.rng_seed,
                ..Default::default()
            })
            .repositories(repos)
            .build()?;

        Ok(TowerSetup {
            config: self.config,
            content,
            runtime,
        })
    }

    fn repositories(&self, content: &ContentBundle) -> Result<Repositories> {
        let quizzes = Arc::new(InMemoryQuizRepository::new(content.quizzes.clone()));

        if !self.config.enable_persistence {
            return Ok(Repositories::new(
                Arc::new(InMemoryPlayerRepository::new()),
                Arc::new(InMemoryBossCatalog::new(content.bosses.clone())),
                quizzes,
            ));
        }

        let players_dir = self.config.players_dir();
        let players: Arc<dyn PlayerRepository> = Arc::new(
            FilePlayerRepository::new(&players_dir)
                .with_context(|| format!("opening players in {}", players_dir.display()))?,
        );
        let catalog_file = self.config.catalog_file();
        let catalog: Arc<dyn BossCatalog> = Arc::new(
            FileBossCatalog::open(&catalog_file, content.bosses.clone())
                .with_context(|| format!("opening catalog {}", catalog_file.display()))?,
        );
        info!("Persistence enabled under {}", self.config.data_dir.display());

        Ok(Repositories::new(players, catalog, quizzes))
    }
}

fn load_content(config: &BootstrapConfig) -> Result<ContentBundle> {
    match &config.content_dir {
        Some(dir) => ContentFactory::new(dir)
            .load_bundle()
            .with_context(|| format!("loading content from {}", dir.display())),
        None => ContentBundle::embedded().context("loading embedded content"),
    }
}

pub struct TowerSetup {
    pub config: BootstrapConfig,
    pub content: ContentBundle,
    pub runtime: Runtime,
}
