//! Client configuration structures and loaders.
use std::env;
use std::path::PathBuf;

use tower_core::PlayerId;

const DEFAULT_DATA_DIR: &str = ".tower";

/// Configuration required to bootstrap a client runtime.
#[derive(Clone, Debug)]
pub struct BootstrapConfig {
    /// Root for persisted players, the catalog file and logs.
    pub data_dir: PathBuf,
    /// Directory holding `tower.toml`, `bosses.ron` and `quizzes.ron`.
    /// `None` uses the content compiled into the binary.
    pub content_dir: Option<PathBuf>,
    pub player: PlayerId,
    pub enable_persistence: bool,
    pub rng_seed: Option<u64>,
    pub log_file: Option<PathBuf>,
    pub command_buffer: usize,
    pub event_buffer: usize,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            content_dir: None,
            player: PlayerId(1),
            enable_persistence: false,
            rng_seed: None,
            log_file: None,
            command_buffer: 32,
            event_buffer: 100,
        }
    }
}

impl BootstrapConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `TOWER_DATA_DIR` - Directory for save data (default: platform-specific)
    /// - `TOWER_CONTENT_DIR` - Content data directory (default: embedded content)
    /// - `TOWER_PLAYER_ID` - Player to play as (default: 1)
    /// - `TOWER_ENABLE_PERSISTENCE` - Store players and catalog on disk (default: false)
    /// - `TOWER_RNG_SEED` - Fixed seed for reproducible floors (default: entropy)
    /// - `TOWER_LOG_FILE` - Log file path (default: `<data dir>/logs/tower.log`)
    /// - `TOWER_COMMAND_BUFFER` - Runtime command queue size (default: 32)
    /// - `TOWER_EVENT_BUFFER` - Event buffer per topic (default: 100)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`Self::from_env`] with a custom variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(dir) = lookup("TOWER_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        config.content_dir = lookup("TOWER_CONTENT_DIR").map(PathBuf::from);
        config.log_file = lookup("TOWER_LOG_FILE").map(PathBuf::from);

        if let Some(id) = parse(&lookup, "TOWER_PLAYER_ID") {
            config.player = PlayerId(id);
        }

        // A bare `TOWER_ENABLE_PERSISTENCE=` also counts as enabled.
        if let Some(enable) = parse::<bool>(&lookup, "TOWER_ENABLE_PERSISTENCE") {
            config.enable_persistence = enable;
        } else if lookup("TOWER_ENABLE_PERSISTENCE").is_some() {
            config.enable_persistence = true;
        }

        config.rng_seed = parse(&lookup, "TOWER_RNG_SEED");

        if let Some(capacity) = parse::<usize>(&lookup, "TOWER_COMMAND_BUFFER") {
            config.command_buffer = capacity.max(1);
        }
        if let Some(capacity) = parse::<usize>(&lookup, "TOWER_EVENT_BUFFER") {
            config.event_buffer = capacity.max(1);
        }

        config
    }

    pub fn log_file(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| self.data_dir.join("logs").join("tower.log"))
    }

    pub fn players_dir(&self) -> PathBuf {
        self.data_dir.join("players")
    }

    pub fn catalog_file(&self) -> PathBuf {
        self.data_dir.join("bosses.json")
    }
}

fn default_data_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", "tower")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
}

fn parse<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    lookup(key)?.trim().parse().ok()
}
