//! Credential obfuscation for storage at rest.
//!
//! This is NOT encryption. Each character is shifted up by a fixed amount,
//! written as a single Latin-1 byte, and the result is base64 encoded. It
//! only keeps the key from being readable at a glance in the store file;
//! anyone who can read the file can recover the key.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::error::CredentialError;

/// Fixed code point shift.
pub const SHIFT: u32 = 7;

/// Obfuscate a key for storage.
///
/// # Errors
///
/// Returns [`CredentialError::Unstorable`] if a shifted character does not
/// fit in a single byte.
pub fn obfuscate(plain: &str) -> Result<String, CredentialError> {
    if plain.is_empty() {
        return Ok(String::new());
    }

    let shifted = plain
        .chars()
        .map(|c| u8::try_from(u32::from(c) + SHIFT).map_err(|_| CredentialError::Unstorable))
        .collect::<Result<Vec<u8>, _>>()?;

    Ok(STANDARD.encode(shifted))
}

/// Reverse [`obfuscate`].
///
/// # Errors
///
/// Returns [`CredentialError::Corrupt`] if the value is not valid base64 or
/// contains bytes that no obfuscated key could produce.
pub fn reveal(stored: &str) -> Result<String, CredentialError> {
    if stored.is_empty() {
        return Ok(String::new());
    }

    let bytes = STANDARD
        .decode(stored.trim())
        .map_err(|e| CredentialError::Corrupt(e.to_string()))?;

    bytes
        .into_iter()
        .map(|b| {
            u32::from(b)
                .checked_sub(SHIFT)
                .and_then(char::from_u32)
                .ok_or_else(|| CredentialError::Corrupt(format!("unexpected byte 0x{b:02x}")))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_every_printable_ascii_character() {
        let all: String = (0x20u8..=0x7e).map(char::from).collect();
        assert_eq!(reveal(&obfuscate(&all).unwrap()).unwrap(), all);
    }

    #[test]
    fn round_trips_typical_keys() {
        for key in ["AIzaSyA-1234_abcdEFGH", "k", " spaced key ", "~~~~"] {
            assert_eq!(reveal(&obfuscate(key).unwrap()).unwrap(), key);
        }
    }

    #[test]
    fn stored_form_is_not_plaintext() {
        let stored = obfuscate("AIzaSySecret").unwrap();
        assert!(!stored.contains("AIzaSySecret"));
    }

    #[test]
    fn known_vector() {
        // 'a' + 7 = 'h', 'b' + 7 = 'i', 'c' + 7 = 'j'
        assert_eq!(obfuscate("abc").unwrap(), STANDARD.encode("hij"));
        assert_eq!(reveal("aGlq").unwrap(), "abc");
    }

    #[test]
    fn empty_maps_to_empty() {
        assert_eq!(obfuscate("").unwrap(), "");
        assert_eq!(reveal("").unwrap(), "");
    }

    #[test]
    fn wide_characters_are_unstorable() {
        assert_eq!(obfuscate("ключ"), Err(CredentialError::Unstorable));
    }

    #[test]
    fn garbage_is_corrupt() {
        assert!(matches!(reveal("%%%"), Err(CredentialError::Corrupt(_))));
        // byte 0x03 cannot come from a shifted character
        let low = STANDARD.encode([0x03u8]);
        assert!(matches!(reveal(&low), Err(CredentialError::Corrupt(_))));
    }
}
