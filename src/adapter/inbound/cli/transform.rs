//! Handler for `transform` and the shared result reporting used by
//! `session`.

use std::path::{Path, PathBuf};

use chrono::Utc;
use indicatif::ProgressBar;
use serde_json::json;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

use crate::adapter::inbound::cli::output;
use crate::application::export::save_result;
use crate::application::orchestrator::{SourceSelection, TransformFailure, TransformInput};
use crate::application::state::{AppState, TransformPhase, TransformResult};
use crate::error::Result;
use crate::infrastructure::bootstrap::App;

/// Label shown next to placeholder results.
pub(crate) const FALLBACK_LABEL: &str = "demo fallback";

/// Execute `transform`.
pub async fn execute(
    app: &App,
    image: &Path,
    style: &str,
    instructions: &str,
    output_dir: Option<PathBuf>,
) -> Result<()> {
    let source = app.orchestrator().validator().read_image(image)?;
    let input = TransformInput::new(SourceSelection::Upload(source), style)
        .with_instructions(instructions);
    let dir = output_dir.unwrap_or_else(|| app.config().output_dir());

    match run(app, input).await {
        Ok(result) => {
            let path = save(app, &result, &dir)?;
            report(&result, &path);
            Ok(())
        }
        Err(failure) => {
            if let Some(fallback) = &failure.fallback {
                match save(app, fallback, &dir) {
                    Ok(path) => report(fallback, &path),
                    Err(e) => output::warning(&format!("Could not save the demo fallback: {e}")),
                }
            }
            Err(failure.error)
        }
    }
}

/// Run one attempt behind a phase-following spinner.
pub(crate) async fn run(
    app: &App,
    input: TransformInput,
) -> std::result::Result<TransformResult, TransformFailure> {
    let pb = output::spinner("Starting...");
    let follower = follow_phases(app.state(), pb.clone());

    let outcome = app.orchestrator().transform(input).await;
    follower.abort();

    match &outcome {
        Ok(_) => output::spinner_success(&pb, "Transformation complete"),
        Err(failure) => {
            output::spinner_fail(&pb, &format!("Transformation failed: {}", failure.error));
            if failure.error.is_credential() {
                output::hint("run `roomstyle key set` to enter a new key");
            }
        }
    }
    outcome
}

/// Mirror phase transitions into the spinner message.
fn follow_phases(state: &AppState, pb: ProgressBar) -> JoinHandle<()> {
    let mut phases = state.subscribe_phases();
    tokio::spawn(async move {
        loop {
            match phases.recv().await {
                Ok(phase) => {
                    if let Some(message) = phase_message(phase) {
                        pb.set_message(message);
                    }
                }
                Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => break,
            }
        }
    })
}

const fn phase_message(phase: TransformPhase) -> Option<&'static str> {
    match phase {
        TransformPhase::Validating => Some("Validating input..."),
        TransformPhase::AwaitingResponse => Some("Transforming your room..."),
        TransformPhase::Idle | TransformPhase::Succeeded | TransformPhase::Failed => None,
    }
}

pub(crate) fn save(app: &App, result: &TransformResult, dir: &Path) -> Result<PathBuf> {
    save_result(
        result,
        dir,
        app.config().transform.preset_dir.as_deref(),
        Utc::now(),
    )
}

/// Print where a result was written, labeling fallbacks.
pub(crate) fn report(result: &TransformResult, path: &Path) {
    if output::is_json() {
        output::json_output(json!({
            "command": "transform",
            "path": path.display().to_string(),
            "style": result.style_id,
            "mime_type": result.image.mime_type(),
            "prompt": result.prompt,
            "fallback": result.fallback,
        }));
        return;
    }

    if result.fallback {
        output::warning(&format!(
            "{} This is the style's sample image, not your room.",
            output::badge(FALLBACK_LABEL)
        ));
    }
    output::field("Style", &result.style_id);
    output::field("Saved", output::highlight(path.display()));
}
