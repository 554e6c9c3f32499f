//! Input validation applied before any remote call.
//!
//! Image rules run in a fixed order: presence, size, declared MIME type.
//! The declared type is trusted; file content is never inspected.

use std::path::Path;

use crate::domain::{ImageMime, SourceImage};
use crate::error::{Error, InputError};
use crate::infrastructure::config::limits::LimitsConfig;

/// Checks candidate images and instruction text against configured limits.
#[derive(Debug, Clone, Copy)]
pub struct InputValidator {
    max_image_bytes: u64,
    max_instruction_chars: usize,
}

impl InputValidator {
    #[must_use]
    pub const fn new(max_image_bytes: u64, max_instruction_chars: usize) -> Self {
        Self {
            max_image_bytes,
            max_instruction_chars,
        }
    }

    #[must_use]
    pub const fn from_limits(limits: &LimitsConfig) -> Self {
        Self::new(limits.max_image_bytes, limits.max_instruction_chars)
    }

    #[must_use]
    pub const fn max_image_bytes(&self) -> u64 {
        self.max_image_bytes
    }

    #[must_use]
    pub const fn max_instruction_chars(&self) -> usize {
        self.max_instruction_chars
    }

    /// Load an image from disk, refusing an oversized file from its metadata
    /// before any of it is read.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::TooLarge`] for files over the limit, or an IO
    /// error if the file cannot be read.
    pub fn read_image(&self, path: &Path) -> Result<SourceImage, Error> {
        let size = std::fs::metadata(path)?.len();
        if size > self.max_image_bytes {
            return Err(InputError::TooLarge {
                size,
                max: self.max_image_bytes,
            }
            .into());
        }
        // The file may have grown since the metadata call; one byte past the
        // limit is enough for `check_image` to reject it.
        Ok(SourceImage::read_at_most(
            path,
            self.max_image_bytes.saturating_add(1),
        )?)
    }

    /// Validate a candidate image, returning its parsed MIME type.
    ///
    /// # Errors
    ///
    /// Returns the first rule violated: missing, too large, or unsupported.
    pub fn check_image(&self, image: Option<&SourceImage>) -> Result<ImageMime, InputError> {
        let image = image.ok_or(InputError::MissingImage)?;

        if image.size() > self.max_image_bytes {
            return Err(InputError::TooLarge {
                size: image.size(),
                max: self.max_image_bytes,
            });
        }

        ImageMime::from_mime(image.declared_mime()).ok_or_else(|| InputError::UnsupportedType {
            declared: image.declared_mime().to_string(),
        })
    }

    /// Validate custom instruction length, counted in characters.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::InstructionsTooLong`] past the cap.
    pub fn check_instructions(&self, text: &str) -> Result<(), InputError> {
        let len = text.chars().count();
        if len > self.max_instruction_chars {
            return Err(InputError::InstructionsTooLong {
                len,
                max: self.max_instruction_chars,
            });
        }
        Ok(())
    }
}

impl Default for InputValidator {
    fn default() -> Self {
        Self::from_limits(&LimitsConfig::default())
    }
}
