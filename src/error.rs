use thiserror::Error;

/// Maximum length of a remote error excerpt shown to the user.
pub const EXCERPT_LEN: usize = 200;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),

    #[error("{0}")]
    Other(String),
}

/// Input rejected locally. These never reach the remote call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("no image selected")]
    MissingImage,

    #[error("an API key is required; set one with `roomstyle key set`")]
    MissingCredential,

    #[error("file size must be less than {}", size_limit(.max))]
    TooLarge { size: u64, max: u64 },

    #[error("only JPG, PNG, and WebP files are supported (got {declared})")]
    UnsupportedType { declared: String },

    #[error("unknown style preset: {0}")]
    UnknownStyle(String),

    #[error("custom instructions must be at most {max} characters (got {len})")]
    InstructionsTooLong { len: usize, max: usize },

    #[error("there is no previous result to reuse as the source image")]
    NoPreviousResult,

    #[error("a demo fallback image cannot be reused as the source image")]
    FallbackNotReusable,
}

/// Credential problems, either local (storage) or reported by the remote API.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CredentialError {
    #[error("invalid API key: {0}")]
    Rejected(String),

    #[error("saved API key could not be decoded: {0}")]
    Corrupt(String),

    #[error("API key contains characters that cannot be stored")]
    Unstorable,
}

/// Failures of a transformation attempt after validation passed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransformError {
    #[error("no image was generated in the response")]
    NoImage,

    #[error("request timed out after {0}s")]
    Timeout(u64),

    #[error("failed to transform the image: {0}")]
    Remote(String),

    #[error("failed to decode image data: {0}")]
    Decode(String),
}

impl TransformError {
    /// Remote failure carrying a truncated excerpt of the underlying message.
    #[must_use]
    pub fn remote(message: impl AsRef<str>) -> Self {
        Self::Remote(excerpt(message.as_ref(), EXCERPT_LEN))
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Credential(#[from] CredentialError),

    #[error(transparent)]
    Transform(#[from] TransformError),

    #[error("a transformation is already in progress")]
    Busy,

    #[error("`roomstyle {0}` needs interactive prompts and cannot run with --json or --quiet; use `roomstyle transform` for scripted use")]
    NotInteractive(&'static str),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    #[error("base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("clipboard error: {0}")]
    Clipboard(String),
}

impl Error {
    /// True for errors that mean the user should re-enter their API key.
    #[must_use]
    pub fn is_credential(&self) -> bool {
        matches!(
            self,
            Error::Credential(_) | Error::Input(InputError::MissingCredential)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<dialoguer::Error> for Error {
    fn from(err: dialoguer::Error) -> Self {
        // dialoguer::Error wraps an IO error
        Error::Io(std::io::Error::other(err.to_string()))
    }
}

/// Render a byte limit the way the size error states it: `10MB`, `1.5MB`,
/// `500KB`, or plain bytes below one KiB.
#[allow(clippy::trivially_copy_pass_by_ref)]
fn size_limit(bytes: &u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = 1024 * 1024;
    let bytes = *bytes;
    if bytes >= MIB {
        if bytes % MIB == 0 {
            format!("{}MB", bytes / MIB)
        } else {
            format!("{:.1}MB", bytes as f64 / MIB as f64)
        }
    } else if bytes >= KIB {
        if bytes % KIB == 0 {
            format!("{}KB", bytes / KIB)
        } else {
            format!("{:.1}KB", bytes as f64 / KIB as f64)
        }
    } else {
        format!("{bytes} bytes")
    }
}

/// Truncate `message` to at most `max` characters, marking the cut.
#[must_use]
pub fn excerpt(message: &str, max: usize) -> String {
    let message = message.trim();
    if message.chars().count() <= max {
        return message.to_string();
    }
    let mut cut: String = message.chars().take(max).collect();
    cut.push('…');
    cut
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn too_large_message_reports_megabytes() {
        let err = InputError::TooLarge {
            size: 11 * 1024 * 1024,
            max: 10 * 1024 * 1024,
        };
        assert_eq!(err.to_string(), "file size must be less than 10MB");
    }

    #[test]
    fn too_large_message_handles_sub_megabyte_limits() {
        let err = InputError::TooLarge {
            size: 600 * 1024,
            max: 500 * 1024,
        };
        assert_eq!(err.to_string(), "file size must be less than 500KB");
        assert_eq!(size_limit(&(1536 * 1024)), "1.5MB");
        assert_eq!(size_limit(&1500), "1.5KB");
        assert_eq!(size_limit(&512), "512 bytes");
    }

    #[test]
    fn excerpt_keeps_short_messages() {
        assert_eq!(excerpt("  quota exceeded ", 200), "quota exceeded");
    }

    #[test]
    fn excerpt_truncates_on_char_boundary() {
        let long = "é".repeat(250);
        let cut = excerpt(&long, 200);
        assert_eq!(cut.chars().count(), 201);
        assert!(cut.ends_with('…'));
    }

    #[test]
    fn remote_error_is_truncated() {
        let err = TransformError::remote("x".repeat(500));
        let TransformError::Remote(text) = err else {
            panic!("expected remote error");
        };
        assert_eq!(text.chars().count(), EXCERPT_LEN + 1);
    }

    #[test]
    fn credential_errors_are_flagged() {
        assert!(Error::from(CredentialError::Rejected("bad".into())).is_credential());
        assert!(Error::from(InputError::MissingCredential).is_credential());
        assert!(!Error::from(TransformError::NoImage).is_credential());
    }
}
