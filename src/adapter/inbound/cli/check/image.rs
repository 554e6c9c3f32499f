//! `check image`: run the local validator against a file.

use std::path::Path;

use serde_json::json;

use crate::adapter::inbound::cli::output;
use crate::application::validate::InputValidator;
use crate::error::Result;

/// Validate an image (and optional instructions) without any remote call.
pub fn execute(path: &Path, instructions: Option<&str>, validator: &InputValidator) -> Result<()> {
    let image = validator.read_image(path)?;
    let mime = validator.check_image(Some(&image))?;
    if let Some(text) = instructions {
        validator.check_instructions(text)?;
    }

    if output::is_json() {
        output::json_output(json!({
            "command": "check.image",
            "path": path.display().to_string(),
            "mime_type": mime.as_str(),
            "size": image.size(),
            "valid": true,
        }));
        return Ok(());
    }

    output::section("Image Check");
    output::field("File", path.display());
    output::field("Type", mime);
    output::field("Size", format_size(image.size()));
    output::success("Image is accepted");
    Ok(())
}

fn format_size(bytes: u64) -> String {
    const KIB: f64 = 1024.0;
    let bytes_f = bytes as f64;
    if bytes_f >= KIB * KIB {
        format!("{:.1} MiB", bytes_f / (KIB * KIB))
    } else if bytes_f >= KIB {
        format!("{:.1} KiB", bytes_f / KIB)
    } else {
        format!("{bytes} B")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, InputError};

    #[test]
    fn sizes_are_humanized() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KiB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.0 MiB");
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("room.gif");
        std::fs::write(&path, b"GIF89a").unwrap();

        let err = execute(&path, None, &InputValidator::default()).unwrap_err();
        assert!(matches!(
            err,
            Error::Input(InputError::UnsupportedType { ref declared }) if declared == "image/gif"
        ));
    }

    #[test]
    fn long_instructions_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("room.png");
        std::fs::write(&path, b"png").unwrap();

        let validator = InputValidator::new(1024, 3);
        assert!(execute(&path, Some("abc"), &validator).is_ok());
        assert!(execute(&path, Some("abcd"), &validator).is_err());
    }
}
