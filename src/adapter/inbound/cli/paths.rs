//! Path utilities for roomstyle.
//!
//! All data lives under `~/.roomstyle/`:
//! - `~/.roomstyle/config.toml` - main configuration
//! - `~/.roomstyle/storage.json` - saved API key (obfuscated)

use std::path::PathBuf;

use crate::infrastructure::config::storage;

/// Returns the roomstyle home directory (`~/.roomstyle/`).
pub fn home_dir() -> PathBuf {
    storage::home_dir()
}

/// Returns the default config file path (`~/.roomstyle/config.toml`).
pub fn default_config() -> PathBuf {
    home_dir().join("config.toml")
}

/// Returns the default storage path (`~/.roomstyle/storage.json`).
pub fn default_storage() -> PathBuf {
    storage::default_storage_path()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_are_under_roomstyle_home() {
        assert!(home_dir().to_string_lossy().contains(".roomstyle"));
        assert!(default_config().starts_with(home_dir()));
        assert!(default_storage().starts_with(home_dir()));
    }
}
