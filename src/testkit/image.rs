//! Source image fixtures.

use crate::domain::SourceImage;

/// Smallest valid PNG signature plus padding; content is never inspected.
pub const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0, 0, 0, 0];

/// A small PNG source image.
pub fn png() -> SourceImage {
    SourceImage::new("room.png", "image/png", PNG_BYTES.to_vec())
}

/// A source image of `size` bytes declaring `mime`.
pub fn sized(mime: &str, size: usize) -> SourceImage {
    SourceImage::new("room", mime, vec![0xAB; size])
}
