//! Environment collaborators injected into the pure battle rules.
//!
//! The only collaborator today is the random number oracle; catalog and
//! player data arrive as plain values so the rules stay free of I/O.
mod rng;

pub use rng::{PcgRng, RngOracle, compute_seed, streams};
