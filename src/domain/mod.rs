//! Pure domain types: images, styles, requests, history, credentials.

mod credential;
mod history;
mod image;
mod request;
mod style;

pub use credential::Credential;
pub use history::{History, HistoryEntry};
pub use image::{
    declared_mime_for, extension_for_mime, ImageMime, ImageRef, SourceImage, DEFAULT_RESULT_MIME,
};
pub use request::{build_prompt, TransformRequest};
pub use style::{find_style, StylePreset, DEFAULT_STYLE, STYLE_PRESETS};
