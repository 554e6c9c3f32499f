//! System clipboard access.
//!
//! Backed by `arboard` when the `clipboard` feature is enabled. Without it,
//! copying reports an error and callers fall back to printing the text.

use crate::error::{Error, Result};

/// Copy `text` to the system clipboard.
///
/// # Errors
///
/// Returns [`Error::Clipboard`] when no clipboard is available (headless
/// sessions, missing display server) or the feature is disabled.
#[cfg(feature = "clipboard")]
pub fn copy_text(text: &str) -> Result<()> {
    let mut clipboard = arboard::Clipboard::new().map_err(|e| Error::Clipboard(e.to_string()))?;
    clipboard
        .set_text(text.to_owned())
        .map_err(|e| Error::Clipboard(e.to_string()))?;
    tracing::debug!(chars = text.chars().count(), "copied to clipboard");
    Ok(())
}

#[cfg(not(feature = "clipboard"))]
pub fn copy_text(_text: &str) -> Result<()> {
    Err(Error::Clipboard(
        "built without the `clipboard` feature".to_string(),
    ))
}
