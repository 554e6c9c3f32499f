//! `check connection`: verify the current key against the API.

use serde_json::json;

use crate::adapter::inbound::cli::output;
use crate::error::{InputError, Result};
use crate::infrastructure::bootstrap::App;

/// Issue the connection-test request with the current key. Nothing is saved.
pub async fn execute(app: &App) -> Result<()> {
    let credential = app
        .credentials()
        .current()
        .ok_or(InputError::MissingCredential)?;

    output::section("Connection Check");
    output::field("Provider", app.generator().name());
    output::field("Endpoint", &app.config().gemini.base_url);
    output::field("Model", &app.config().gemini.test_model);
    output::field("Key", credential.masked());

    let pb = output::spinner("Contacting API...");
    match app.generator().test_connection(&credential).await {
        Ok(()) => {
            output::spinner_success(&pb, "API accepted the key");
        }
        Err(e) => {
            output::spinner_fail(&pb, "Connection check failed");
            if e.is_credential() {
                output::hint("run `roomstyle key set` to enter a new key");
            }
            return Err(e);
        }
    }

    if output::is_json() {
        output::json_output(json!({ "command": "check.connection", "ok": true }));
    }
    Ok(())
}
