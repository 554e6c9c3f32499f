//! Transform orchestration.
//!
//! Drives one attempt through `Idle → Validating → AwaitingResponse →
//! Succeeded | Failed → Idle`. A busy guard refuses a second attempt while
//! one is in flight; it is released on drop, so every exit path (including
//! early validation failures and errors while building the request) clears
//! it. Exactly one remote call is made per accepted attempt and errors are
//! never retried.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, info, warn};

use super::state::{AppState, TransformPhase, TransformResult};
use super::validate::InputValidator;
use crate::domain::{
    find_style, Credential, HistoryEntry, ImageRef, SourceImage, TransformRequest,
    DEFAULT_RESULT_MIME,
};
use crate::error::{Error, InputError, TransformError};
use crate::port::outbound::generator::{GenerateRequest, ImageGenerator};

/// What to use as the source image.
#[derive(Debug, Clone)]
pub enum SourceSelection {
    /// A freshly selected file.
    Upload(SourceImage),
    /// The most recent result, reinterpreted as a new source image.
    LastResult,
}

/// One user action.
#[derive(Debug, Clone)]
pub struct TransformInput {
    pub source: Option<SourceSelection>,
    pub style_id: String,
    pub instructions: String,
}

impl TransformInput {
    pub fn new(source: SourceSelection, style_id: impl Into<String>) -> Self {
        Self {
            source: Some(source),
            style_id: style_id.into(),
            instructions: String::new(),
        }
    }

    #[must_use]
    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = instructions.into();
        self
    }
}

/// A failed attempt, optionally with a labeled demo fallback to show.
#[derive(Debug)]
pub struct TransformFailure {
    pub error: Error,
    pub fallback: Option<TransformResult>,
}

impl TransformFailure {
    fn new(error: impl Into<Error>) -> Self {
        Self {
            error: error.into(),
            fallback: None,
        }
    }
}

impl std::fmt::Display for TransformFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.error)
    }
}

/// Orchestrator behavior knobs.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrchestratorOptions {
    /// Abort the remote call after this long.
    pub timeout: Option<Duration>,
    /// Substitute the style's preview image on failure, flagged as fallback.
    pub fallback_to_preset: bool,
}

/// Turns user input into exactly one generator call and records the outcome.
pub struct TransformOrchestrator {
    generator: Arc<dyn ImageGenerator>,
    state: Arc<AppState>,
    validator: InputValidator,
    options: OrchestratorOptions,
}

/// Clears the busy flag and returns to `Idle` when dropped.
struct BusyGuard<'a> {
    state: &'a AppState,
}

impl<'a> BusyGuard<'a> {
    fn acquire(state: &'a AppState) -> Option<Self> {
        state.try_begin().then_some(Self { state })
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.state.set_phase(TransformPhase::Idle);
        self.state.finish();
    }
}

/// A request that passed validation.
struct Prepared {
    request: TransformRequest,
    credential: Credential,
}

impl TransformOrchestrator {
    pub fn new(
        generator: Arc<dyn ImageGenerator>,
        state: Arc<AppState>,
        validator: InputValidator,
        options: OrchestratorOptions,
    ) -> Self {
        Self {
            generator,
            state,
            validator,
            options,
        }
    }

    #[must_use]
    pub fn state(&self) -> &Arc<AppState> {
        &self.state
    }

    #[must_use]
    pub fn validator(&self) -> &InputValidator {
        &self.validator
    }

    /// Run one transformation attempt.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Busy`] without side effects if another attempt is in
    /// flight. Otherwise returns the input, credential or transform error
    /// that ended the attempt, with a fallback result when enabled.
    pub async fn transform(
        &self,
        input: TransformInput,
    ) -> Result<TransformResult, TransformFailure> {
        let Some(_guard) = BusyGuard::acquire(&self.state) else {
            debug!("transform refused: already busy");
            return Err(TransformFailure::new(Error::Busy));
        };

        self.state.set_phase(TransformPhase::Validating);
        let prepared = match self.prepare(input) {
            Ok(prepared) => prepared,
            Err(error) => {
                debug!(error = %error, "transform rejected before remote call");
                self.state.set_phase(TransformPhase::Failed);
                return Err(TransformFailure::new(error));
            }
        };

        self.state.set_phase(TransformPhase::AwaitingResponse);
        let style_id = prepared.request.style.id;
        let prompt = prepared.request.prompt();
        info!(
            provider = self.generator.name(),
            style = style_id,
            mime = prepared.request.image.declared_mime(),
            size = prepared.request.image.size(),
            "requesting transformation"
        );

        match self.call(&prepared, &prompt).await {
            Ok(image) => {
                let result = TransformResult {
                    image: image.clone(),
                    style_id: style_id.to_string(),
                    prompt,
                    fallback: false,
                };
                let entry = HistoryEntry {
                    original: prepared.request.image.origin().clone(),
                    transformed: image,
                    style_id: style_id.to_string(),
                    fallback: false,
                    created_at: Utc::now(),
                };
                self.state.record(result.clone(), Some(entry));
                self.state.set_phase(TransformPhase::Succeeded);
                info!(style = style_id, "transformation complete");
                Ok(result)
            }
            Err(error) => {
                warn!(error = %error, style = style_id, "transformation failed");
                let fallback = self.fallback(&prepared, prompt);
                self.state.set_phase(TransformPhase::Failed);
                Err(TransformFailure { error, fallback })
            }
        }
    }

    /// Validate input and build the outbound request.
    fn prepare(&self, input: TransformInput) -> Result<Prepared, Error> {
        let selection = input.source.ok_or(InputError::MissingImage)?;
        let credential = self
            .state
            .credentials()
            .current()
            .ok_or(InputError::MissingCredential)?;

        let image = match selection {
            SourceSelection::Upload(image) => image,
            SourceSelection::LastResult => self.last_result_as_source()?,
        };

        self.validator.check_image(Some(&image))?;
        let style = *find_style(&input.style_id)
            .ok_or_else(|| InputError::UnknownStyle(input.style_id.clone()))?;
        self.validator.check_instructions(&input.instructions)?;

        Ok(Prepared {
            request: TransformRequest::new(image, style, input.instructions),
            credential,
        })
    }

    fn last_result_as_source(&self) -> Result<SourceImage, Error> {
        let last = self
            .state
            .last_result()
            .ok_or(InputError::NoPreviousResult)?;
        if last.fallback || last.image.is_preset() {
            return Err(InputError::FallbackNotReusable.into());
        }
        let bytes = last.image.decode()?;
        let mime = last.image.mime_type().unwrap_or(DEFAULT_RESULT_MIME);
        let name = format!("last-{}", last.style_id);
        Ok(SourceImage::new(name, mime, bytes).with_origin(last.image))
    }

    /// Issue the single remote call.
    async fn call(&self, prepared: &Prepared, prompt: &str) -> Result<ImageRef, Error> {
        let request = GenerateRequest {
            credential: &prepared.credential,
            image: prepared.request.image.bytes(),
            mime_type: prepared.request.image.declared_mime(),
            prompt,
        };

        let call = self.generator.generate(request);
        let response = match self.options.timeout {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .map_err(|_| TransformError::Timeout(limit.as_secs()))?,
            None => call.await,
        }
        .map_err(normalize_remote_error)?;

        let image = response.ok_or(TransformError::NoImage)?;
        let mime = image
            .mime_type
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_RESULT_MIME.to_string());
        Ok(ImageRef::inline(&mime, &image.data))
    }

    /// Build the labeled placeholder result and record it, if enabled.
    fn fallback(&self, prepared: &Prepared, prompt: String) -> Option<TransformResult> {
        if !self.options.fallback_to_preset {
            return None;
        }
        let style = prepared.request.style;
        let image = ImageRef::Preset {
            path: style.image.to_string(),
        };
        let result = TransformResult {
            image: image.clone(),
            style_id: style.id.to_string(),
            prompt,
            fallback: true,
        };
        let entry = HistoryEntry {
            original: prepared.request.image.origin().clone(),
            transformed: image,
            style_id: style.id.to_string(),
            fallback: true,
            created_at: Utc::now(),
        };
        self.state.record(result.clone(), Some(entry));
        Some(result)
    }
}

/// Keep credential and transform errors; fold transport noise into a
/// generic transform error with a short excerpt.
fn normalize_remote_error(error: Error) -> Error {
    match error {
        Error::Credential(_) | Error::Transform(_) => error,
        other => TransformError::remote(other.to_string()).into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::outbound::storage::memory::MemoryStore;
    use crate::application::credential::CredentialStore;
    use crate::error::CredentialError;
    use crate::port::outbound::generator::GeneratedImage;
    use crate::testkit::generator::ScriptedGenerator;

    fn orchestrator(
        generator: Arc<ScriptedGenerator>,
        options: OrchestratorOptions,
    ) -> TransformOrchestrator {
        let credentials = CredentialStore::open(Arc::new(MemoryStore::new()));
        credentials.set_session(Credential::new("AIzaSyTest").unwrap());
        TransformOrchestrator::new(
            generator,
            Arc::new(AppState::new(credentials)),
            InputValidator::default(),
            options,
        )
    }

    fn upload() -> SourceSelection {
        SourceSelection::Upload(SourceImage::new("room.jpg", "image/jpeg", vec![7; 32]))
    }

    #[tokio::test]
    async fn missing_source_fails_without_calling_generator() {
        let generator = Arc::new(ScriptedGenerator::new());
        let orchestrator = orchestrator(generator.clone(), OrchestratorOptions::default());

        let input = TransformInput {
            source: None,
            style_id: "modern".into(),
            instructions: String::new(),
        };
        let failure = orchestrator.transform(input).await.unwrap_err();

        assert!(matches!(failure.error, Error::Input(InputError::MissingImage)));
        assert_eq!(generator.calls(), 0);
        assert!(!orchestrator.state().is_busy());
    }

    #[tokio::test]
    async fn unknown_style_is_an_input_error() {
        let generator = Arc::new(ScriptedGenerator::new());
        let orchestrator = orchestrator(generator.clone(), OrchestratorOptions::default());

        let failure = orchestrator
            .transform(TransformInput::new(upload(), "baroque"))
            .await
            .unwrap_err();

        assert!(matches!(
            failure.error,
            Error::Input(InputError::UnknownStyle(ref s)) if s == "baroque"
        ));
        assert_eq!(generator.calls(), 0);
    }

    #[tokio::test]
    async fn prompt_reaches_generator() {
        let generator = Arc::new(ScriptedGenerator::new());
        generator.push_image("image/png", b"out".to_vec());
        let orchestrator = orchestrator(generator.clone(), OrchestratorOptions::default());

        let result = orchestrator
            .transform(TransformInput::new(upload(), "scandinavian").with_instructions("Add plants"))
            .await
            .unwrap();

        let prompts = generator.prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Scandinavian style (Light woods, whites, functional design)"));
        assert!(prompts[0].ends_with(" Add plants"));
        assert_eq!(result.prompt, prompts[0]);
    }

    #[tokio::test]
    async fn missing_result_mime_defaults_to_png() {
        let generator = Arc::new(ScriptedGenerator::new());
        generator.push(Ok(Some(GeneratedImage {
            mime_type: None,
            data: b"raw".to_vec(),
        })));
        let orchestrator = orchestrator(generator, OrchestratorOptions::default());

        let result = orchestrator
            .transform(TransformInput::new(upload(), "modern"))
            .await
            .unwrap();
        assert_eq!(result.image.mime_type(), Some("image/png"));
    }

    #[tokio::test]
    async fn credential_rejection_is_preserved() {
        let generator = Arc::new(ScriptedGenerator::new());
        generator.push(Err(CredentialError::Rejected("API key not valid".into()).into()));
        let orchestrator = orchestrator(generator, OrchestratorOptions::default());

        let failure = orchestrator
            .transform(TransformInput::new(upload(), "modern"))
            .await
            .unwrap_err();
        assert!(failure.error.is_credential());
    }

    #[tokio::test]
    async fn transport_errors_become_transform_errors() {
        let generator = Arc::new(ScriptedGenerator::new());
        generator.push(Err(Error::Io(std::io::Error::other("connection reset"))));
        let orchestrator = orchestrator(generator, OrchestratorOptions::default());

        let failure = orchestrator
            .transform(TransformInput::new(upload(), "modern"))
            .await
            .unwrap_err();
        assert!(matches!(
            failure.error,
            Error::Transform(TransformError::Remote(ref msg)) if msg.contains("connection reset")
        ));
    }

    #[tokio::test]
    async fn fallback_is_flagged_and_recorded() {
        let generator = Arc::new(ScriptedGenerator::new());
        generator.push(Ok(None));
        let options = OrchestratorOptions {
            fallback_to_preset: true,
            ..Default::default()
        };
        let orchestrator = orchestrator(generator, options);

        let failure = orchestrator
            .transform(TransformInput::new(upload(), "bohemian"))
            .await
            .unwrap_err();

        let fallback = failure.fallback.expect("fallback result");
        assert!(fallback.fallback);
        assert_eq!(
            fallback.image,
            ImageRef::Preset {
                path: "images/bohemian.jpeg".into()
            }
        );
        let history = orchestrator.state().history();
        assert_eq!(history.len(), 1);
        assert!(history.last().unwrap().fallback);
    }

    #[tokio::test]
    async fn input_errors_never_fall_back() {
        let generator = Arc::new(ScriptedGenerator::new());
        let options = OrchestratorOptions {
            fallback_to_preset: true,
            ..Default::default()
        };
        let orchestrator = orchestrator(generator, options);

        let gif = SourceSelection::Upload(SourceImage::new("a.gif", "image/gif", vec![0; 4]));
        let failure = orchestrator
            .transform(TransformInput::new(gif, "modern"))
            .await
            .unwrap_err();
        assert!(failure.fallback.is_none());
        assert_eq!(orchestrator.state().history_len(), 0);
    }

    #[tokio::test]
    async fn fallback_result_cannot_be_reused() {
        let generator = Arc::new(ScriptedGenerator::new());
        generator.push(Ok(None));
        let options = OrchestratorOptions {
            fallback_to_preset: true,
            ..Default::default()
        };
        let orchestrator = orchestrator(generator.clone(), options);

        let _ = orchestrator
            .transform(TransformInput::new(upload(), "modern"))
            .await;
        let failure = orchestrator
            .transform(TransformInput::new(SourceSelection::LastResult, "modern"))
            .await
            .unwrap_err();

        assert!(matches!(
            failure.error,
            Error::Input(InputError::FallbackNotReusable)
        ));
        assert_eq!(generator.calls(), 1);
        assert!(!orchestrator.state().is_busy());
    }

    #[tokio::test(start_paused = true)]
    async fn hung_call_times_out_and_clears_busy() {
        let generator = Arc::new(ScriptedGenerator::gated());
        generator.push_image("image/png", b"late".to_vec());
        let options = OrchestratorOptions {
            timeout: Some(Duration::from_secs(5)),
            ..Default::default()
        };
        let orchestrator = orchestrator(generator, options);

        let failure = orchestrator
            .transform(TransformInput::new(upload(), "modern"))
            .await
            .unwrap_err();

        assert!(matches!(
            failure.error,
            Error::Transform(TransformError::Timeout(5))
        ));
        assert!(!orchestrator.state().is_busy());
        assert_eq!(orchestrator.state().phase(), TransformPhase::Idle);
    }
}
