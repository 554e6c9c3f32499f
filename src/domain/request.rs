//! Outbound transformation request and prompt construction.

use super::image::SourceImage;
use super::style::StylePreset;

/// A validated request, built fresh per transformation attempt.
#[derive(Debug, Clone)]
pub struct TransformRequest {
    pub image: SourceImage,
    pub style: StylePreset,
    pub instructions: String,
}

impl TransformRequest {
    #[must_use]
    pub fn new(image: SourceImage, style: StylePreset, instructions: impl Into<String>) -> Self {
        Self {
            image,
            style,
            instructions: instructions.into(),
        }
    }

    /// The text prompt sent alongside the image.
    #[must_use]
    pub fn prompt(&self) -> String {
        build_prompt(&self.style, &self.instructions)
    }
}

/// Interpolate the style into the fixed template and append the user's
/// instructions verbatim when present. No sanitization is applied.
#[must_use]
pub fn build_prompt(style: &StylePreset, instructions: &str) -> String {
    let mut prompt = format!(
        "Transform this room photo into a {} style ({}). Generate a new image.",
        style.name, style.description
    );
    if !instructions.is_empty() {
        prompt.push(' ');
        prompt.push_str(instructions);
    }
    prompt
}
