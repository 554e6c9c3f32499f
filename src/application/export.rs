//! Saving results to disk.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::info;

use super::state::TransformResult;
use crate::domain::{extension_for_mime, ImageRef, DEFAULT_RESULT_MIME};
use crate::error::Result;

/// `room-redesign-<style>-<epoch millis>.<ext>`, extension from the MIME type.
#[must_use]
pub fn download_file_name(style_id: &str, mime_type: &str, at: DateTime<Utc>) -> String {
    format!(
        "room-redesign-{style_id}-{}.{}",
        at.timestamp_millis(),
        extension_for_mime(mime_type)
    )
}

/// Write a result image into `dir`, returning the written path.
///
/// Inline images are decoded; preset fallbacks are copied from `preset_dir`.
///
/// # Errors
///
/// Returns a decode error for malformed inline data, or an IO error if the
/// file cannot be read or written.
pub fn save_result(
    result: &TransformResult,
    dir: &Path,
    preset_dir: Option<&Path>,
    at: DateTime<Utc>,
) -> Result<PathBuf> {
    let (bytes, mime) = match &result.image {
        ImageRef::Inline { mime_type, .. } => (result.image.decode()?, mime_type.clone()),
        ImageRef::File { path } => (std::fs::read(path)?, mime_for_path(path)),
        ImageRef::Preset { path } => {
            let full = preset_dir.map_or_else(|| PathBuf::from(path), |d| d.join(path));
            let mime = mime_for_path(&full);
            (std::fs::read(&full)?, mime)
        }
    };

    std::fs::create_dir_all(dir)?;
    let target = dir.join(download_file_name(&result.style_id, &mime, at));
    std::fs::write(&target, bytes)?;
    info!(path = %target.display(), fallback = result.fallback, "result saved");
    Ok(target)
}

fn mime_for_path(path: &Path) -> String {
    let declared = crate::domain::declared_mime_for(path);
    if declared.starts_with("image/") {
        declared
    } else {
        DEFAULT_RESULT_MIME.to_string()
    }
}
