//! Shared bootstrap utilities for client front-ends.
//!
//! Provides configuration loading, content assembly, and runtime setup that
//! can be reused by the terminal client or other front-end crates.
pub mod builder;
pub mod config;

pub use builder::{RuntimeBuilder, TowerSetup};
pub use config::BootstrapConfig;
