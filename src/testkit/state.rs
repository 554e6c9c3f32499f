//! App state and orchestrator wiring for tests.

use std::sync::Arc;

use crate::adapter::outbound::storage::memory::MemoryStore;
use crate::application::credential::CredentialStore;
use crate::application::orchestrator::{OrchestratorOptions, TransformOrchestrator};
use crate::application::state::AppState;
use crate::application::validate::InputValidator;
use crate::domain::Credential;
use crate::port::outbound::generator::ImageGenerator;

/// Test key used by [`orchestrator`].
pub const TEST_KEY: &str = "AIzaSyTestKey0000";

/// App state backed by an in-memory store, with no credential.
pub fn app_state() -> Arc<AppState> {
    Arc::new(AppState::new(CredentialStore::open(Arc::new(
        MemoryStore::new(),
    ))))
}

/// Orchestrator with a session credential, default limits and options.
pub fn orchestrator(generator: Arc<dyn ImageGenerator>) -> TransformOrchestrator {
    orchestrator_with(generator, OrchestratorOptions::default())
}

/// Orchestrator with a session credential and custom options.
pub fn orchestrator_with(
    generator: Arc<dyn ImageGenerator>,
    options: OrchestratorOptions,
) -> TransformOrchestrator {
    let state = app_state();
    if let Some(key) = Credential::new(TEST_KEY) {
        state.credentials().set_session(key);
    }
    TransformOrchestrator::new(generator, state, InputValidator::default(), options)
}
