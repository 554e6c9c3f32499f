//! Credential store: the in-memory session key plus the persisted slot.
//!
//! Saving with `persist = true` writes an obfuscated copy to storage.
//! Saving with `persist = false` deletes any persisted copy so the key only
//! lives in process memory. Status changes are published on a watch channel
//! so front ends can react without polling storage.

use std::sync::Arc;

use parking_lot::RwLock;
use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::cipher;
use crate::domain::Credential;
use crate::error::Result;
use crate::port::outbound::storage::KeyValueStore;

/// Storage slot holding the obfuscated key.
pub const STORAGE_KEY: &str = "gemini_api_key";

/// Disclaimer shown to the user whenever a key is persisted.
pub const OBFUSCATION_NOTICE: &str = "Saved API keys are obfuscated, not encrypted. \
     Anyone who can read the storage file can recover the key.";

/// Where the current credential lives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CredentialStatus {
    /// A key is available in process memory.
    pub in_session: bool,
    /// A key is saved in persistent storage.
    pub persisted: bool,
}

impl CredentialStatus {
    #[must_use]
    pub const fn is_available(&self) -> bool {
        self.in_session || self.persisted
    }
}

/// Loads, saves and clears the user's API key.
pub struct CredentialStore {
    storage: Arc<dyn KeyValueStore>,
    session: RwLock<Option<Credential>>,
    status: watch::Sender<CredentialStatus>,
}

impl CredentialStore {
    /// Create a store and load any persisted key into the session.
    pub fn open(storage: Arc<dyn KeyValueStore>) -> Self {
        let store = Self {
            storage,
            session: RwLock::new(None),
            status: watch::channel(CredentialStatus::default()).0,
        };
        if let Some(saved) = store.load() {
            debug!("loaded saved API key");
            *store.session.write() = Some(saved);
        }
        store.publish();
        store
    }

    /// Read and reveal the persisted key.
    ///
    /// Storage or decoding failures are logged and treated as "no key".
    #[must_use]
    pub fn load(&self) -> Option<Credential> {
        let stored = match self.storage.get(STORAGE_KEY) {
            Ok(stored) => stored?,
            Err(e) => {
                warn!(error = %e, "failed to read credential storage");
                return None;
            }
        };
        match cipher::reveal(&stored) {
            Ok(plain) => Credential::new(plain),
            Err(e) => {
                warn!(error = %e, "ignoring unreadable saved API key");
                None
            }
        }
    }

    /// Make `credential` the session key, persisting it only if asked.
    ///
    /// # Errors
    ///
    /// Returns a credential error if the key cannot be obfuscated, or a
    /// storage error if the store cannot be written.
    pub fn save(&self, credential: Credential, persist: bool) -> Result<()> {
        if persist {
            let stored = cipher::obfuscate(credential.expose())?;
            self.storage.set(STORAGE_KEY, &stored)?;
            info!("API key saved to persistent storage");
        } else {
            self.storage.remove(STORAGE_KEY)?;
            info!("API key kept for this session only");
        }
        *self.session.write() = Some(credential);
        self.publish();
        Ok(())
    }

    /// Use `credential` for this session without touching storage.
    pub fn set_session(&self, credential: Credential) {
        *self.session.write() = Some(credential);
        self.publish();
    }

    /// Forget the key everywhere.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the persisted copy cannot be removed. The
    /// session key is dropped regardless.
    pub fn clear(&self) -> Result<()> {
        *self.session.write() = None;
        let removed = self.storage.remove(STORAGE_KEY);
        self.publish();
        removed?;
        info!("API key cleared");
        Ok(())
    }

    /// The key to use: the session key, else the persisted one.
    #[must_use]
    pub fn current(&self) -> Option<Credential> {
        let session = self.session.read().clone();
        session.or_else(|| self.load())
    }

    /// Whether a persisted key exists.
    #[must_use]
    pub fn is_persisted(&self) -> bool {
        matches!(self.storage.get(STORAGE_KEY), Ok(Some(ref v)) if !v.is_empty())
    }

    #[must_use]
    pub fn status(&self) -> CredentialStatus {
        CredentialStatus {
            in_session: self.session.read().is_some(),
            persisted: self.is_persisted(),
        }
    }

    /// Subscribe to status changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CredentialStatus> {
        self.status.subscribe()
    }

    fn publish(&self) {
        let status = self.status();
        self.status.send_if_modified(|current| {
            let changed = *current != status;
            *current = status;
            changed
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::outbound::storage::memory::MemoryStore;

    fn key(value: &str) -> Credential {
        Credential::new(value).unwrap()
    }

    fn store() -> (Arc<MemoryStore>, CredentialStore) {
        let storage = Arc::new(MemoryStore::new());
        let credentials = CredentialStore::open(storage.clone());
        (storage, credentials)
    }

    #[test]
    fn persisted_save_stores_obfuscated_value() {
        let (storage, credentials) = store();
        credentials.save(key("AIzaSyPersist"), true).unwrap();

        let raw = storage.get(STORAGE_KEY).unwrap().unwrap();
        assert_ne!(raw, "AIzaSyPersist");
        assert_eq!(cipher::reveal(&raw).unwrap(), "AIzaSyPersist");
        assert_eq!(credentials.load(), Some(key("AIzaSyPersist")));
    }

    #[test]
    fn session_save_deletes_persisted_value() {
        let (storage, credentials) = store();
        credentials.save(key("first"), true).unwrap();
        credentials.save(key("second"), false).unwrap();

        assert_eq!(storage.get(STORAGE_KEY).unwrap(), None);
        assert_eq!(credentials.current(), Some(key("second")));
        assert!(!credentials.status().persisted);
    }

    #[test]
    fn open_loads_persisted_key_into_session() {
        let storage = Arc::new(MemoryStore::new());
        storage
            .set(STORAGE_KEY, &cipher::obfuscate("AIzaSyBoot").unwrap())
            .unwrap();

        let credentials = CredentialStore::open(storage);
        assert_eq!(
            credentials.status(),
            CredentialStatus {
                in_session: true,
                persisted: true
            }
        );
        assert_eq!(credentials.current(), Some(key("AIzaSyBoot")));
    }

    #[test]
    fn corrupt_persisted_value_reads_as_absent() {
        let storage = Arc::new(MemoryStore::new());
        storage.set(STORAGE_KEY, "!!not base64!!").unwrap();

        let credentials = CredentialStore::open(storage);
        assert_eq!(credentials.load(), None);
        assert_eq!(credentials.current(), None);
    }

    #[test]
    fn clear_removes_both_copies() {
        let (storage, credentials) = store();
        credentials.save(key("gone"), true).unwrap();
        credentials.clear().unwrap();

        assert_eq!(credentials.current(), None);
        assert_eq!(storage.get(STORAGE_KEY).unwrap(), None);
        assert!(!credentials.status().is_available());
    }

    #[test]
    fn unstorable_key_leaves_state_untouched() {
        let (storage, credentials) = store();
        assert!(credentials.save(key("ключ"), true).is_err());
        assert_eq!(storage.get(STORAGE_KEY).unwrap(), None);
        assert_eq!(credentials.current(), None);
    }

    #[test]
    fn subscribers_see_status_changes() {
        let (_storage, credentials) = store();
        let mut rx = credentials.subscribe();
        assert!(!rx.borrow_and_update().is_available());

        credentials.save(key("watched"), true).unwrap();
        assert!(rx.has_changed().unwrap());
        assert_eq!(
            *rx.borrow_and_update(),
            CredentialStatus {
                in_session: true,
                persisted: true
            }
        );

        credentials.set_session(key("other"));
        assert!(!rx.has_changed().unwrap());
    }
}
