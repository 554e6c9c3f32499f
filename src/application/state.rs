//! Shared application state.
//!
//! One explicit struct holds everything the front end and the orchestrator
//! share: the credential store, the busy flag, the current phase, the last
//! result and the session history.

use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::RwLock;
use serde::Serialize;
use tokio::sync::broadcast;

use super::credential::CredentialStore;
use crate::domain::{History, HistoryEntry, ImageRef};

/// Capacity of the phase broadcast channel.
const PHASE_CHANNEL_CAPACITY: usize = 32;

/// Orchestrator lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformPhase {
    #[default]
    Idle,
    Validating,
    AwaitingResponse,
    Succeeded,
    Failed,
}

impl TransformPhase {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Validating => "validating",
            Self::AwaitingResponse => "awaiting_response",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        }
    }
}

/// The image shown to the user after an attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransformResult {
    pub image: ImageRef,
    pub style_id: String,
    pub prompt: String,
    /// True when `image` is the demo placeholder, not a generated image.
    pub fallback: bool,
}

/// Shared application state accessible by the orchestrator and front ends.
pub struct AppState {
    credentials: CredentialStore,
    busy: AtomicBool,
    phase: RwLock<TransformPhase>,
    phase_events: broadcast::Sender<TransformPhase>,
    last_result: RwLock<Option<TransformResult>>,
    history: RwLock<History>,
}

impl AppState {
    #[must_use]
    pub fn new(credentials: CredentialStore) -> Self {
        Self {
            credentials,
            busy: AtomicBool::new(false),
            phase: RwLock::new(TransformPhase::Idle),
            phase_events: broadcast::channel(PHASE_CHANNEL_CAPACITY).0,
            last_result: RwLock::new(None),
            history: RwLock::new(History::new()),
        }
    }

    #[must_use]
    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    /// True while a transformation is in flight.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Set the busy flag if it was clear. Returns false if already busy.
    pub(crate) fn try_begin(&self) -> bool {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    pub(crate) fn finish(&self) {
        self.busy.store(false, Ordering::Release);
    }

    #[must_use]
    pub fn phase(&self) -> TransformPhase {
        *self.phase.read()
    }

    pub(crate) fn set_phase(&self, phase: TransformPhase) {
        *self.phase.write() = phase;
        // No subscribers is fine.
        let _ = self.phase_events.send(phase);
    }

    /// Subscribe to every phase transition.
    #[must_use]
    pub fn subscribe_phases(&self) -> broadcast::Receiver<TransformPhase> {
        self.phase_events.subscribe()
    }

    #[must_use]
    pub fn last_result(&self) -> Option<TransformResult> {
        self.last_result.read().clone()
    }

    pub(crate) fn record(&self, result: TransformResult, entry: Option<HistoryEntry>) {
        *self.last_result.write() = Some(result);
        if let Some(entry) = entry {
            self.history.write().push(entry);
        }
    }

    /// Snapshot of the session history.
    #[must_use]
    pub fn history(&self) -> History {
        self.history.read().clone()
    }

    #[must_use]
    pub fn history_len(&self) -> usize {
        self.history.read().len()
    }

    /// Drop the current result (the "clear" action). History is kept.
    pub fn clear_result(&self) {
        *self.last_result.write() = None;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::adapter::outbound::storage::memory::MemoryStore;

    fn state() -> AppState {
        AppState::new(CredentialStore::open(Arc::new(MemoryStore::new())))
    }

    #[test]
    fn busy_flag_is_exclusive() {
        let state = state();
        assert!(state.try_begin());
        assert!(!state.try_begin());
        assert!(state.is_busy());
        state.finish();
        assert!(!state.is_busy());
        assert!(state.try_begin());
    }

    #[test]
    fn phase_changes_are_broadcast_in_order() {
        let state = state();
        let mut rx = state.subscribe_phases();
        state.set_phase(TransformPhase::Validating);
        state.set_phase(TransformPhase::Failed);

        assert_eq!(rx.try_recv().unwrap(), TransformPhase::Validating);
        assert_eq!(rx.try_recv().unwrap(), TransformPhase::Failed);
        assert_eq!(state.phase(), TransformPhase::Failed);
    }

    #[test]
    fn clearing_result_keeps_history() {
        let state = state();
        let result = TransformResult {
            image: ImageRef::inline("image/png", b"x"),
            style_id: "modern".into(),
            prompt: "p".into(),
            fallback: false,
        };
        let entry = HistoryEntry {
            original: ImageRef::inline("image/png", b"o"),
            transformed: result.image.clone(),
            style_id: "modern".into(),
            fallback: false,
            created_at: chrono::Utc::now(),
        };
        state.record(result, Some(entry));
        state.clear_result();

        assert!(state.last_result().is_none());
        assert_eq!(state.history_len(), 1);
    }
}
