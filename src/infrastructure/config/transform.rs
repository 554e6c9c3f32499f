//! Transformation behavior settings.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Controls timeouts, the demo fallback and where results are written.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TransformConfig {
    /// Give up on the remote call after this many seconds. `0` disables
    /// the timeout and waits indefinitely.
    ///
    /// Defaults to 120.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// On failure, show the style's bundled preview as a clearly labeled
    /// demo fallback. Defaults to false.
    #[serde(default)]
    pub fallback_to_preset: bool,

    /// Directory containing the bundled preview images.
    #[serde(default)]
    pub preset_dir: Option<PathBuf>,

    /// Directory where downloaded results are written. Defaults to the
    /// current directory.
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            fallback_to_preset: false,
            preset_dir: None,
            output_dir: None,
        }
    }
}

const fn default_timeout_secs() -> u64 {
    120
}
