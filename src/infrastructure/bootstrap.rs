//! Composition root: wires configuration, storage, the generator and the
//! orchestrator into one [`App`].

use std::sync::Arc;

use tracing::{debug, info};

use crate::adapter::outbound::gemini::Gemini;
use crate::adapter::outbound::storage::FileStore;
use crate::application::credential::CredentialStore;
use crate::application::orchestrator::{OrchestratorOptions, TransformOrchestrator};
use crate::application::state::AppState;
use crate::application::validate::InputValidator;
use crate::domain::Credential;
use crate::infrastructure::config::settings::Config;
use crate::port::outbound::generator::ImageGenerator;
use crate::port::outbound::storage::KeyValueStore;

/// Environment variable that seeds the session key.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// A fully wired application.
pub struct App {
    config: Config,
    generator: Arc<dyn ImageGenerator>,
    orchestrator: TransformOrchestrator,
}

impl App {
    /// Wire the production adapters: a JSON file store and the Gemini client.
    #[must_use]
    pub fn build(config: Config) -> Self {
        let path = config.storage.resolved_path();
        debug!(path = %path.display(), "opening credential storage");
        let storage: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(path));
        let generator: Arc<dyn ImageGenerator> = Arc::new(Gemini::new(config.gemini.clone()));
        let app = Self::with_parts(config, storage, generator);
        app.seed_from_env();
        app
    }

    /// Wire custom adapters. The environment is not consulted.
    #[must_use]
    pub fn with_parts(
        config: Config,
        storage: Arc<dyn KeyValueStore>,
        generator: Arc<dyn ImageGenerator>,
    ) -> Self {
        let state = Arc::new(AppState::new(CredentialStore::open(storage)));
        let options = OrchestratorOptions {
            timeout: config.timeout(),
            fallback_to_preset: config.transform.fallback_to_preset,
        };
        let orchestrator = TransformOrchestrator::new(
            Arc::clone(&generator),
            state,
            InputValidator::from_limits(&config.limits),
            options,
        );
        Self {
            config,
            generator,
            orchestrator,
        }
    }

    /// Use `GEMINI_API_KEY` for this session when set. Storage is untouched.
    fn seed_from_env(&self) {
        let Some(key) = std::env::var(API_KEY_ENV).ok().and_then(Credential::new) else {
            return;
        };
        info!(key = %key.masked(), "using API key from {API_KEY_ENV}");
        self.credentials().set_session(key);
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[must_use]
    pub fn generator(&self) -> &Arc<dyn ImageGenerator> {
        &self.generator
    }

    #[must_use]
    pub fn orchestrator(&self) -> &TransformOrchestrator {
        &self.orchestrator
    }

    #[must_use]
    pub fn state(&self) -> &Arc<AppState> {
        self.orchestrator.state()
    }

    #[must_use]
    pub fn credentials(&self) -> &CredentialStore {
        self.state().credentials()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::outbound::storage::MemoryStore;
    use crate::testkit::generator::ScriptedGenerator;

    #[test]
    fn limits_flow_into_validator() {
        let mut config = Config::default();
        config.limits.max_instruction_chars = 12;
        let app = App::with_parts(
            config,
            Arc::new(MemoryStore::new()),
            Arc::new(ScriptedGenerator::new()),
        );
        assert_eq!(app.orchestrator().validator().max_instruction_chars(), 12);
        assert!(!app.credentials().status().is_available());
    }
}
