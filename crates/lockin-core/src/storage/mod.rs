mod blob;
mod config;
pub mod database;
pub mod history;

pub use blob::{BlobStore, MemoryStore};
pub use config::{Config, SoundConfig, TimerConfig, WakeLockConfig};
pub use database::Database;
pub use history::{DailyStats, History, SessionRecord, HISTORY_KEY, MAX_SESSIONS};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns the data directory, creating it if needed.
///
/// `LOCKIN_DATA_DIR` wins when set. Otherwise `~/.config/lockin[-dev]/`
/// based on `LOCKIN_ENV` (set `LOCKIN_ENV=dev` for the development
/// directory).
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("LOCKIN_DATA_DIR") {
        Some(explicit) => PathBuf::from(explicit),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("LOCKIN_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("lockin-dev")
            } else {
                base_dir.join("lockin")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
