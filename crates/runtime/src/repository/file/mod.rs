//! File-based repository implementations.
//!
//! Files are JSON and every write goes through a temp file plus atomic
//! rename, so a crash never leaves a half-written record behind.

mod catalog;
mod player;

pub use catalog::FileBossCatalog;
pub use player::FilePlayerRepository;

use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::repository::Result;

pub(crate) fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let temp_path = path.with_extension("json.tmp");
    let bytes = serde_json::to_vec_pretty(value)?;
    fs::write(&temp_path, bytes)?;
    fs::rename(&temp_path, path)?;
    Ok(())
}
