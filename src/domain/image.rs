//! Image payloads and references.
//!
//! [`SourceImage`] is what the user hands in: raw bytes plus the MIME type
//! the file *declares*. Nothing here sniffs content; a mislabeled file is
//! trusted as labeled.
//!
//! [`ImageRef`] is a displayable reference to an image: inline base64 data
//! (what the generator returns), a file on disk, or a bundled style preview
//! used as the demo fallback.

use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::Serialize;

use crate::error::TransformError;

/// MIME type assumed when the generator does not declare one.
pub const DEFAULT_RESULT_MIME: &str = "image/png";

/// Image formats accepted as transformation sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageMime {
    Jpeg,
    Png,
    Webp,
}

impl ImageMime {
    /// Every accepted format, in display order.
    pub const SUPPORTED: [ImageMime; 3] = [Self::Jpeg, Self::Png, Self::Webp];

    /// Parse a declared MIME type. Only the three canonical forms match.
    #[must_use]
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime.trim().to_ascii_lowercase().as_str() {
            "image/jpeg" => Some(Self::Jpeg),
            "image/png" => Some(Self::Png),
            "image/webp" => Some(Self::Webp),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Webp => "image/webp",
        }
    }

    /// File extension used when writing an image of this type.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::Webp => "webp",
        }
    }
}

impl fmt::Display for ImageMime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declared MIME type for a path, derived from its extension only.
///
/// Unsupported image formats still map to their real MIME type so the
/// validator can name them in its error message.
#[must_use]
pub fn declared_mime_for(path: &Path) -> String {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "tif" | "tiff" => "image/tiff",
        "heic" => "image/heic",
        "avif" => "image/avif",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    }
    .to_string()
}

/// Extension for an arbitrary MIME string, `png` when unknown.
#[must_use]
pub fn extension_for_mime(mime: &str) -> &'static str {
    ImageMime::from_mime(mime).map_or("png", ImageMime::extension)
}

/// A candidate source image as provided by the user.
#[derive(Clone, PartialEq, Eq)]
pub struct SourceImage {
    name: String,
    declared_mime: String,
    bytes: Vec<u8>,
    origin: ImageRef,
}

impl SourceImage {
    /// Build a source image whose origin is its own inline data.
    pub fn new(name: impl Into<String>, declared_mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        let declared_mime = declared_mime.into();
        let origin = ImageRef::inline(&declared_mime, &bytes);
        Self {
            name: name.into(),
            declared_mime,
            bytes,
            origin,
        }
    }

    /// Build a source image that remembers where it came from.
    #[must_use]
    pub fn with_origin(mut self, origin: ImageRef) -> Self {
        self.origin = origin;
        self
    }

    /// Read at most `limit` bytes of a file, declaring its MIME type from
    /// the extension. A file longer than `limit` yields exactly `limit`
    /// bytes, which the size check then rejects when `limit` exceeds the
    /// allowed maximum.
    ///
    /// # Errors
    ///
    /// Returns an IO error if the file cannot be read.
    pub fn read_at_most(path: &Path, limit: u64) -> std::io::Result<Self> {
        let mut bytes = Vec::new();
        std::fs::File::open(path)?
            .take(limit)
            .read_to_end(&mut bytes)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self {
            name,
            declared_mime: declared_mime_for(path),
            bytes,
            origin: ImageRef::File {
                path: path.to_path_buf(),
            },
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn declared_mime(&self) -> &str {
        &self.declared_mime
    }

    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Size in bytes.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Where this image came from, for history entries.
    #[must_use]
    pub fn origin(&self) -> &ImageRef {
        &self.origin
    }
}

impl fmt::Debug for SourceImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceImage")
            .field("name", &self.name)
            .field("declared_mime", &self.declared_mime)
            .field("size", &self.bytes.len())
            .finish()
    }
}

/// A displayable image reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ImageRef {
    /// Base64 payload held in memory.
    Inline { mime_type: String, data: String },
    /// A file on local disk.
    File { path: PathBuf },
    /// A bundled style preview, relative to the preset directory.
    Preset { path: String },
}

impl ImageRef {
    /// Encode raw bytes as an inline reference.
    #[must_use]
    pub fn inline(mime_type: &str, bytes: &[u8]) -> Self {
        Self::Inline {
            mime_type: mime_type.to_string(),
            data: STANDARD.encode(bytes),
        }
    }

    /// Parse a `data:<mime>;base64,<payload>` URL.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::Decode`] if the URL is not a base64 data URL.
    pub fn from_data_url(url: &str) -> Result<Self, TransformError> {
        let rest = url
            .strip_prefix("data:")
            .ok_or_else(|| TransformError::Decode("not a data URL".into()))?;
        let (header, data) = rest
            .split_once(',')
            .ok_or_else(|| TransformError::Decode("data URL has no payload".into()))?;
        let mime_type = header
            .strip_suffix(";base64")
            .ok_or_else(|| TransformError::Decode("data URL is not base64 encoded".into()))?;
        Ok(Self::Inline {
            mime_type: mime_type.to_string(),
            data: data.to_string(),
        })
    }

    /// Render inline images as a data URL.
    #[must_use]
    pub fn to_data_url(&self) -> Option<String> {
        match self {
            Self::Inline { mime_type, data } => Some(format!("data:{mime_type};base64,{data}")),
            Self::File { .. } | Self::Preset { .. } => None,
        }
    }

    /// MIME type, when known without touching the disk.
    #[must_use]
    pub fn mime_type(&self) -> Option<&str> {
        match self {
            Self::Inline { mime_type, .. } => Some(mime_type),
            Self::File { .. } | Self::Preset { .. } => None,
        }
    }

    /// Decode inline data back into raw bytes.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::Decode`] for non-inline references or
    /// malformed base64.
    pub fn decode(&self) -> Result<Vec<u8>, TransformError> {
        match self {
            Self::Inline { data, .. } => STANDARD
                .decode(data)
                .map_err(|e| TransformError::Decode(e.to_string())),
            Self::File { path } => Err(TransformError::Decode(format!(
                "{} is a file reference",
                path.display()
            ))),
            Self::Preset { path } => Err(TransformError::Decode(format!(
                "{path} is a bundled preview"
            ))),
        }
    }

    #[must_use]
    pub fn is_preset(&self) -> bool {
        matches!(self, Self::Preset { .. })
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inline { mime_type, data } => {
                write!(f, "{mime_type} ({} base64 chars)", data.len())
            }
            Self::File { path } => write!(f, "{}", path.display()),
            Self::Preset { path } => write!(f, "preset:{path}"),
        }
    }
}
