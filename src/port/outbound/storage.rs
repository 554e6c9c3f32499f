//! Persistent key/value storage port.

use crate::error::Result;

/// A small string-to-string store that survives process restarts.
///
/// Absence of a key means "nothing saved". Removing a missing key is not an
/// error.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete `key` if present.
    fn remove(&self, key: &str) -> Result<()>;
}
