//! User-supplied API credential.

use std::fmt;

/// Secret string authorizing calls to the image generator.
///
/// The inner value is private and never printed by `Debug` or `Display`.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wrap a key, trimming surrounding whitespace. Empty keys yield `None`.
    #[must_use]
    pub fn new(value: impl AsRef<str>) -> Option<Self> {
        let value = value.as_ref().trim();
        if value.is_empty() {
            None
        } else {
            Some(Self(value.to_string()))
        }
    }

    /// The raw secret, for the outbound request only.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// A short hint such as `••••wxyz`.
    #[must_use]
    pub fn masked(&self) -> String {
        let tail: String = {
            let chars: Vec<char> = self.0.chars().collect();
            let start = chars.len().saturating_sub(4);
            if chars.len() <= 8 {
                String::new()
            } else {
                chars[start..].iter().collect()
            }
        };
        format!("••••{tail}")
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(****)")
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.masked())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_keys_are_rejected() {
        assert!(Credential::new("").is_none());
        assert!(Credential::new("   ").is_none());
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        let key = Credential::new("  AIzaSyExample \n").unwrap();
        assert_eq!(key.expose(), "AIzaSyExample");
    }

    #[test]
    fn debug_and_display_do_not_leak() {
        let key = Credential::new("AIzaSySecretValue1234").unwrap();
        assert_eq!(format!("{key:?}"), "Credential(****)");
        assert_eq!(key.to_string(), "••••1234");
        assert_eq!(Credential::new("short").unwrap().masked(), "••••");
    }
}
