//! Input limits.

use serde::{Deserialize, Serialize};

/// Canonical maximum image size: 10 MiB.
pub const DEFAULT_MAX_IMAGE_BYTES: u64 = 10 * 1024 * 1024;

/// Canonical cap on custom instructions, in characters.
pub const DEFAULT_MAX_INSTRUCTION_CHARS: usize = 200;

/// Limits enforced by the input validator.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct LimitsConfig {
    /// Largest accepted source image, in bytes.
    #[serde(default = "default_max_image_bytes")]
    pub max_image_bytes: u64,

    /// Longest accepted custom instruction text, in characters.
    #[serde(default = "default_max_instruction_chars")]
    pub max_instruction_chars: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_image_bytes: DEFAULT_MAX_IMAGE_BYTES,
            max_instruction_chars: DEFAULT_MAX_INSTRUCTION_CHARS,
        }
    }
}

const fn default_max_image_bytes() -> u64 {
    DEFAULT_MAX_IMAGE_BYTES
}

const fn default_max_instruction_chars() -> usize {
    DEFAULT_MAX_INSTRUCTION_CHARS
}
