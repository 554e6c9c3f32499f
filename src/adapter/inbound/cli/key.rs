//! Handlers for the `key` command group.

use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Password};
use serde_json::json;

use crate::adapter::inbound::cli::output;
use crate::application::credential::{CredentialStatus, OBFUSCATION_NOTICE};
use crate::domain::Credential;
use crate::error::{InputError, Result};
use crate::infrastructure::bootstrap::{App, API_KEY_ENV};

/// Resolve a key from the argument, else prompt for it with hidden input.
pub(crate) fn read_key(arg: Option<&str>) -> Result<Credential> {
    if let Some(value) = arg {
        return Credential::new(value).ok_or_else(|| InputError::MissingCredential.into());
    }
    if !output::is_interactive() {
        return Err(InputError::MissingCredential.into());
    }
    let value = Password::with_theme(&ColorfulTheme::default())
        .with_prompt("Gemini API key")
        .allow_empty_password(true)
        .interact()?;
    Credential::new(value).ok_or_else(|| InputError::MissingCredential.into())
}

/// Ask whether to remember the key across runs.
pub(crate) fn confirm_persist() -> Result<bool> {
    Ok(Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt("Remember this key on this machine?")
        .default(true)
        .interact()?)
}

/// Execute `key set`.
pub fn execute_set(app: &App, key: Option<&str>, session_only: bool) -> Result<()> {
    let credential = read_key(key)?;
    let masked = credential.masked();
    let persist = !session_only;
    app.credentials().save(credential, persist)?;

    if output::is_json() {
        output::json_output(json!({
            "command": "key.set",
            "key": masked,
            "persisted": persist,
        }));
        return Ok(());
    }

    if persist {
        output::success(&format!("API key {masked} saved"));
        output::warning(OBFUSCATION_NOTICE);
    } else {
        output::success(&format!("API key {masked} accepted for this session only"));
        output::note("Any previously saved key was removed.");
        output::hint(&format!(
            "set {API_KEY_ENV} to provide a key to every run without saving it"
        ));
    }
    Ok(())
}

/// Execute `key status`.
pub fn execute_status(app: &App) -> Result<()> {
    let status = app.credentials().status();
    let current = app.credentials().current();
    let from_env = std::env::var(API_KEY_ENV)
        .ok()
        .and_then(Credential::new)
        .is_some_and(|env| Some(&env) == current.as_ref());

    if output::is_json() {
        output::json_output(json!({
            "command": "key.status",
            "available": status.is_available(),
            "in_session": status.in_session,
            "persisted": status.persisted,
            "from_env": from_env,
            "key": current.as_ref().map(Credential::masked),
        }));
        return Ok(());
    }

    output::section("API Key");
    match &current {
        Some(key) => output::field("Key", key.masked()),
        None => output::field("Key", output::muted("not set")),
    }
    output::field("Source", describe_source(status, from_env));
    output::field("Saved", if status.persisted { "yes" } else { "no" });

    if status.persisted {
        output::warning(OBFUSCATION_NOTICE);
    }
    if !status.is_available() {
        output::hint("run `roomstyle key set` to add a key");
    }
    Ok(())
}

fn describe_source(status: CredentialStatus, from_env: bool) -> &'static str {
    if from_env {
        "environment"
    } else if status.persisted {
        "storage"
    } else if status.in_session {
        "session"
    } else {
        "none"
    }
}

/// Execute `key clear`.
pub fn execute_clear(app: &App) -> Result<()> {
    app.credentials().clear()?;
    if output::is_json() {
        output::json_output(json!({ "command": "key.clear", "cleared": true }));
        return Ok(());
    }
    output::success("API key removed");
    if std::env::var_os(API_KEY_ENV).is_some() {
        output::note(&format!("{API_KEY_ENV} is still set and will be used on the next run."));
    }
    Ok(())
}

/// Execute `key test`: check the key and save it on success.
pub async fn execute_test(app: &App, key: Option<&str>) -> Result<()> {
    let credential = match key {
        Some(value) => Credential::new(value).ok_or(InputError::MissingCredential)?,
        None => app
            .credentials()
            .current()
            .ok_or(InputError::MissingCredential)?,
    };

    let pb = output::spinner("Testing API key...");
    if let Err(e) = app.generator().test_connection(&credential).await {
        output::spinner_fail(&pb, "API key rejected");
        return Err(e);
    }
    output::spinner_success(&pb, "API key works");

    let masked = credential.masked();
    app.credentials().save(credential, true)?;

    if output::is_json() {
        output::json_output(json!({
            "command": "key.test",
            "ok": true,
            "key": masked,
            "persisted": true,
        }));
        return Ok(());
    }
    output::success(&format!("API key {masked} saved"));
    output::warning(OBFUSCATION_NOTICE);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_prefers_environment() {
        let both = CredentialStatus {
            in_session: true,
            persisted: true,
        };
        assert_eq!(describe_source(both, true), "environment");
        assert_eq!(describe_source(both, false), "storage");
        assert_eq!(
            describe_source(
                CredentialStatus {
                    in_session: true,
                    persisted: false
                },
                false
            ),
            "session"
        );
        assert_eq!(describe_source(CredentialStatus::default(), false), "none");
    }

    #[test]
    fn blank_key_argument_is_missing() {
        assert!(read_key(Some("   ")).is_err());
        assert_eq!(read_key(Some(" AIza ")).unwrap().expose(), "AIza");
    }
}
