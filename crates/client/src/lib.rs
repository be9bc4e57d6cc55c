//! Terminal client for the battle tower.
//!
//! The binary is the composition root: it loads configuration, sets up
//! logging, lets `client-bootstrap` assemble the runtime and hands control to
//! [`App`], which plays floors with a [`Terminal`] as the battle provider.

mod app;
pub mod terminal;

pub use app::App;
pub use terminal::Terminal;
