//! Persistent storage location.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Directory name under the user's home holding config and storage.
pub const HOME_DIR_NAME: &str = ".roomstyle";

/// Where the key/value store file lives.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Path to the JSON store. Defaults to `~/.roomstyle/storage.json`.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl StorageConfig {
    /// Configured path, else the default under the roomstyle home.
    #[must_use]
    pub fn resolved_path(&self) -> PathBuf {
        self.path.clone().unwrap_or_else(default_storage_path)
    }
}

/// `~/.roomstyle/`, or `./.roomstyle/` when no home directory is known.
#[must_use]
pub fn home_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(HOME_DIR_NAME)
}

/// `~/.roomstyle/storage.json`.
#[must_use]
pub fn default_storage_path() -> PathBuf {
    home_dir().join("storage.json")
}
