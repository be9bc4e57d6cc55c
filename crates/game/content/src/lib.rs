//! Data-driven content for the battle tower.
//!
//! This crate provides loaders for RON/TOML data files:
//! - Boss catalog (RON)
//! - Quiz packs with nested questions (RON)
//! - Tower rules (TOML)
//!
//! A default data set is compiled in so a runtime can start without any
//! files on disk. All loaders use tower-core types directly with serde.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{BossLoader, ConfigLoader, ContentBundle, ContentFactory, LoadResult, QuizLoader};
