mod config;
pub mod database;
mod memory;
mod snapshot;

pub use config::{Config, LoggingConfig, RoutineConfig};
pub use database::SqliteStore;
pub use memory::MemoryStore;
pub use snapshot::{RoutineSnapshot, RoutineStore};

use std::path::PathBuf;

use crate::error::StorageError;

/// Returns the data directory, creating it if needed.
///
/// `MORNING_QUEST_HOME` overrides the location outright. Otherwise this is
/// `~/.config/morning-quest[-dev]/`, with `MORNING_QUEST_ENV=dev` selecting the
/// development directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, StorageError> {
    let dir = match std::env::var_os("MORNING_QUEST_HOME") {
        Some(home) if !home.is_empty() => PathBuf::from(home),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("MORNING_QUEST_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("morning-quest-dev")
            } else {
                base_dir.join("morning-quest")
            }
        }
    };

    std::fs::create_dir_all(&dir).map_err(|e| StorageError::DataDir {
        path: dir.clone(),
        message: e.to_string(),
    })?;
    Ok(dir)
}
