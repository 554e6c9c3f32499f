//! Interactive redesign session.
//!
//! A menu loop over one [`App`]: pick a photo, a style and optional
//! instructions, transform, then iterate on the last result. History lives
//! for the lifetime of the process.

use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, Select};
use tabled::settings::Style;
use tabled::{Table, Tabled};
use tokio::sync::watch;

use crate::adapter::inbound::cli::{key, output, share, transform};
use crate::application::credential::{CredentialStatus, OBFUSCATION_NOTICE};
use crate::application::orchestrator::{SourceSelection, TransformInput};
use crate::domain::{find_style, HistoryEntry, DEFAULT_STYLE, STYLE_PRESETS};
use crate::error::{Error, InputError, Result};
use crate::infrastructure::bootstrap::App;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Upload,
    Style,
    Instructions,
    Transform,
    UseLast,
    Save,
    History,
    Share,
    Key,
    Clear,
    Quit,
}

impl Action {
    const ALL: [Action; 11] = [
        Self::Upload,
        Self::Style,
        Self::Instructions,
        Self::Transform,
        Self::UseLast,
        Self::Save,
        Self::History,
        Self::Share,
        Self::Key,
        Self::Clear,
        Self::Quit,
    ];

    const fn label(self) -> &'static str {
        match self {
            Self::Upload => "Choose room photo",
            Self::Style => "Choose style",
            Self::Instructions => "Edit custom instructions",
            Self::Transform => "Transform",
            Self::UseLast => "Use last result as the next photo",
            Self::Save => "Save result",
            Self::History => "Show history",
            Self::Share => "Share",
            Self::Key => "API key settings",
            Self::Clear => "Clear result",
            Self::Quit => "Quit",
        }
    }
}

/// Selections made so far in this session.
struct Draft {
    source: Option<SourceSelection>,
    style_id: String,
    instructions: String,
}

impl Draft {
    fn source_label(&self) -> String {
        match &self.source {
            Some(SourceSelection::Upload(image)) => image.name().to_string(),
            Some(SourceSelection::LastResult) => "last result".to_string(),
            None => output::muted("none"),
        }
    }
}

/// Run the interactive loop until the user quits.
pub async fn execute(app: &App) -> Result<()> {
    if !output::is_interactive() {
        return Err(Error::NotInteractive("session"));
    }

    let theme = ColorfulTheme::default();
    let mut key_status = app.credentials().subscribe();
    key_status.mark_unchanged();

    output::header(env!("CARGO_PKG_VERSION"));
    if !app.credentials().status().is_available() {
        output::warning("No API key configured.");
        prompt_for_key(app)?;
    }

    let mut draft = Draft {
        source: None,
        style_id: DEFAULT_STYLE.to_string(),
        instructions: String::new(),
    };

    loop {
        report_key_changes(&mut key_status);
        print_summary(app, &draft);

        let labels: Vec<&str> = Action::ALL.iter().map(|a| a.label()).collect();
        let choice = Select::with_theme(&theme)
            .with_prompt("What next?")
            .items(&labels)
            .default(if draft.source.is_some() { 3 } else { 0 })
            .interact()?;

        let result = match Action::ALL[choice] {
            Action::Upload => choose_photo(app, &theme, &mut draft),
            Action::Style => choose_style(&theme, &mut draft),
            Action::Instructions => edit_instructions(app, &theme, &mut draft),
            Action::Transform => run_transform(app, &draft).await,
            Action::UseLast => use_last(app, &mut draft),
            Action::Save => save_last(app),
            Action::History => {
                show_history(app.state().history().entries());
                Ok(())
            }
            Action::Share => share::execute(&app.config().share, None, true),
            Action::Key => key_settings(app, &theme).await,
            Action::Clear => {
                app.state().clear_result();
                if matches!(draft.source, Some(SourceSelection::LastResult)) {
                    draft.source = None;
                }
                output::success("Result cleared");
                Ok(())
            }
            Action::Quit => break,
        };

        let Err(e) = result else {
            continue;
        };
        output::error(&e.to_string());
        if e.is_credential() {
            let retry = Confirm::with_theme(&theme)
                .with_prompt("Enter a different API key?")
                .default(true)
                .interact()?;
            if retry {
                prompt_for_key(app)?;
            }
        }
    }

    let count = app.state().history_len();
    output::note(&format!("Session ended with {count} transformation(s) in history."));
    Ok(())
}

fn print_summary(app: &App, draft: &Draft) {
    let style = find_style(&draft.style_id).map_or(draft.style_id.as_str(), |s| s.name);
    output::section("Current selection");
    output::field("Photo", draft.source_label());
    output::field("Style", style);
    if !draft.instructions.is_empty() {
        output::field("Instructions", &draft.instructions);
    }
    if let Some(last) = app.state().last_result() {
        let label = if last.fallback {
            output::badge(transform::FALLBACK_LABEL)
        } else {
            last.style_id.clone()
        };
        output::field("Last result", label);
    }
}

fn report_key_changes(rx: &mut watch::Receiver<CredentialStatus>) {
    if !rx.has_changed().unwrap_or(false) {
        return;
    }
    let status = *rx.borrow_and_update();
    match (status.in_session, status.persisted) {
        (_, true) => output::note("API key is saved on this machine."),
        (true, false) => output::note("API key is kept for this session only."),
        (false, false) => output::warning("No API key configured."),
    }
}

fn prompt_for_key(app: &App) -> Result<()> {
    let credential = key::read_key(None)?;
    let persist = key::confirm_persist()?;
    app.credentials().save(credential, persist)?;
    if persist {
        output::warning(OBFUSCATION_NOTICE);
    }
    Ok(())
}

fn choose_photo(app: &App, theme: &ColorfulTheme, draft: &mut Draft) -> Result<()> {
    let path: String = Input::with_theme(theme)
        .with_prompt("Path to room photo")
        .interact_text()?;
    let validator = app.orchestrator().validator();
    let image = validator.read_image(std::path::Path::new(path.trim()))?;
    // Reject up front so a bad file never sits in the draft.
    validator.check_image(Some(&image))?;
    output::success(&format!("Selected {}", image.name()));
    draft.source = Some(SourceSelection::Upload(image));
    Ok(())
}

fn choose_style(theme: &ColorfulTheme, draft: &mut Draft) -> Result<()> {
    let items: Vec<String> = STYLE_PRESETS
        .iter()
        .map(|s| format!("{:<22} {}", s.name, output::muted(s.description)))
        .collect();
    let current = STYLE_PRESETS
        .iter()
        .position(|s| s.id == draft.style_id)
        .unwrap_or(0);
    let index = Select::with_theme(theme)
        .with_prompt("Style")
        .items(&items)
        .default(current)
        .interact()?;
    draft.style_id = STYLE_PRESETS[index].id.to_string();
    Ok(())
}

fn edit_instructions(app: &App, theme: &ColorfulTheme, draft: &mut Draft) -> Result<()> {
    let validator = *app.orchestrator().validator();
    let max = validator.max_instruction_chars();
    let text: String = Input::with_theme(theme)
        .with_prompt(format!("Custom instructions (max {max} characters, empty to clear)"))
        .with_initial_text(draft.instructions.clone())
        .allow_empty(true)
        .validate_with(move |input: &String| {
            validator
                .check_instructions(input)
                .map_err(|e| e.to_string())
        })
        .interact_text()?;
    draft.instructions = text.trim().to_string();
    Ok(())
}

async fn run_transform(app: &App, draft: &Draft) -> Result<()> {
    let input = TransformInput {
        source: draft.source.clone(),
        style_id: draft.style_id.clone(),
        instructions: draft.instructions.clone(),
    };
    match transform::run(app, input).await {
        Ok(result) => {
            output::field("Style", &result.style_id);
            output::hint("choose \"Save result\" to write it to disk");
            Ok(())
        }
        Err(failure) => {
            if failure.fallback.is_some() {
                output::warning(&format!(
                    "Showing the style's sample image as a {}.",
                    output::badge(transform::FALLBACK_LABEL)
                ));
            }
            Err(failure.error)
        }
    }
}

fn use_last(app: &App, draft: &mut Draft) -> Result<()> {
    let Some(last) = app.state().last_result() else {
        return Err(InputError::NoPreviousResult.into());
    };
    if last.fallback {
        return Err(InputError::FallbackNotReusable.into());
    }
    draft.source = Some(SourceSelection::LastResult);
    output::success("The next transformation will start from the last result");
    Ok(())
}

fn save_last(app: &App) -> Result<()> {
    let Some(last) = app.state().last_result() else {
        return Err(InputError::NoPreviousResult.into());
    };
    let path = transform::save(app, &last, &app.config().output_dir())?;
    transform::report(&last, &path);
    Ok(())
}

#[derive(Tabled)]
struct HistoryRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Style")]
    style: String,
    #[tabled(rename = "Original")]
    original: String,
    #[tabled(rename = "Result")]
    result: String,
}

fn history_rows(entries: &[HistoryEntry]) -> Vec<HistoryRow> {
    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| HistoryRow {
            index: i + 1,
            time: entry.created_at.format("%H:%M:%S").to_string(),
            style: entry.style_id.clone(),
            original: entry.original.to_string(),
            result: if entry.fallback {
                format!("{} ({})", entry.transformed, transform::FALLBACK_LABEL)
            } else {
                entry.transformed.to_string()
            },
        })
        .collect()
}

fn show_history(entries: &[HistoryEntry]) {
    output::section("History");
    if entries.is_empty() {
        output::note("(no transformations yet)");
        return;
    }
    let mut table = Table::new(history_rows(entries));
    table.with(Style::rounded());
    output::lines(&table.to_string());
}

async fn key_settings(app: &App, theme: &ColorfulTheme) -> Result<()> {
    let items = ["Enter a new key", "Test current key", "Forget key", "Back"];
    let choice = Select::with_theme(theme)
        .with_prompt("API key")
        .items(&items)
        .default(0)
        .interact()?;
    match choice {
        0 => prompt_for_key(app),
        1 => key::execute_test(app, None).await,
        2 => key::execute_clear(app),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::ImageRef;

    #[test]
    fn history_rows_label_fallbacks() {
        let entries = vec![
            HistoryEntry {
                original: ImageRef::File {
                    path: "room.jpg".into(),
                },
                transformed: ImageRef::inline("image/png", b"x"),
                style_id: "modern".into(),
                fallback: false,
                created_at: Utc::now(),
            },
            HistoryEntry {
                original: ImageRef::File {
                    path: "room.jpg".into(),
                },
                transformed: ImageRef::Preset {
                    path: "images/bohemian.jpeg".into(),
                },
                style_id: "bohemian".into(),
                fallback: true,
                created_at: Utc::now(),
            },
        ];
        let rows = history_rows(&entries);
        assert_eq!(rows[0].index, 1);
        assert_eq!(rows[0].original, "room.jpg");
        assert!(!rows[0].result.contains("fallback"));
        assert!(rows[1].result.ends_with("(demo fallback)"));
    }

    #[test]
    fn every_action_has_a_label() {
        assert!(Action::ALL.iter().all(|a| !a.label().is_empty()));
        assert_eq!(Action::ALL[3], Action::Transform);
    }
}
