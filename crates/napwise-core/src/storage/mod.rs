mod config;
pub mod row_store;
pub mod space;

pub use config::{AccessConfig, CalendarConfig, Config, StorageConfig};
pub use row_store::{RowStore, SqliteRowStore, Table};
pub use space::SpaceStore;

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns the data directory.
///
/// `NAPWISE_DATA_DIR` is used verbatim when set. Otherwise
/// `~/.config/napwise[-dev]/`, with `NAPWISE_ENV=dev` selecting the
/// development directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("NAPWISE_DATA_DIR") {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("NAPWISE_ENV").unwrap_or_else(|_| "production".to_string());

            if env == "dev" {
                base_dir.join("napwise-dev")
            } else {
                base_dir.join("napwise")
            }
        }
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
