//! Handler for the `config` command group.

use std::fs;
use std::path::Path;

use crate::adapter::inbound::cli::diagnostic::ConfigDiagnostic;
use crate::adapter::inbound::cli::output;
use crate::error::{ConfigError, Error, Result};
use crate::infrastructure::config::settings::Config;

/// Default config template with documentation.
pub(crate) const CONFIG_TEMPLATE: &str = include_str!("../../../../config.toml.example");

/// Execute `config init`.
pub fn execute_init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(ConfigError::InvalidValue {
            field: "config",
            reason: "file already exists (use --force to overwrite)".to_string(),
        }
        .into());
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    fs::write(path, CONFIG_TEMPLATE)?;
    output::section("Config Initialized");
    output::success("Created configuration file");
    output::field("Path", path.display());
    output::section("Next Steps");
    output::note(&format!("1. Edit {} if you need non-default settings", path.display()));
    output::note("2. Run: roomstyle key set");
    output::note("3. Run: roomstyle transform room.jpg --style modern");
    Ok(())
}

/// Execute `config show`.
pub fn execute_show(path: &Path, config: &Config) -> Result<()> {
    if output::is_json() {
        output::json_output(serde_json::json!({
            "command": "config.show",
            "path": path.display().to_string(),
            "exists": path.exists(),
            "config": config,
        }));
        return Ok(());
    }

    output::section("Effective Configuration");
    output::field("Path", path.display());
    if !path.exists() {
        output::note("(file not found, showing defaults)");
    }
    let rendered = toml::to_string_pretty(config)
        .map_err(|e| ConfigError::Other(format!("failed to render config: {e}")))?;
    println!();
    output::lines(&rendered);
    Ok(())
}

/// Execute `config validate`.
pub fn execute_validate(path: &Path) -> Result<()> {
    output::section("Config Validation");
    output::field("Path", path.display());
    let content = fs::read_to_string(path).map_err(ConfigError::ReadFile)?;

    match Config::parse_toml(&content) {
        Ok(config) => {
            output::success("Config file is valid");
            if config.transform.fallback_to_preset && config.transform.preset_dir.is_none() {
                output::warning(
                    "fallback_to_preset is on but preset_dir is unset; previews resolve against the current directory",
                );
            }
            output::field("Next", format!("roomstyle config show -c {}", path.display()));
            Ok(())
        }
        Err(err) => {
            if !output::is_json() {
                if let Some(diagnostic) = diagnose(&content, &err) {
                    eprintln!("{}", diagnostic.render());
                }
            }
            Err(err)
        }
    }
}

fn diagnose(content: &str, err: &Error) -> Option<ConfigDiagnostic> {
    match err {
        Error::Config(ConfigError::Parse(e)) => Some(ConfigDiagnostic::from_toml(content, e)),
        Error::Config(ConfigError::InvalidValue { field, reason }) => {
            Some(ConfigDiagnostic::for_field(content, field, reason))
        }
        Error::Config(ConfigError::MissingField { field }) => {
            Some(ConfigDiagnostic::for_field(content, field, "must not be empty"))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_parses_to_defaults() {
        let config = Config::parse_toml(CONFIG_TEMPLATE).unwrap();
        let defaults = Config::default();
        assert_eq!(config.gemini.model, defaults.gemini.model);
        assert_eq!(config.limits.max_image_bytes, defaults.limits.max_image_bytes);
        assert_eq!(config.transform.timeout_secs, defaults.transform.timeout_secs);
        assert_eq!(config.share.page_url, defaults.share.page_url);
    }

    #[test]
    fn init_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/config.toml");
        execute_init(&path, false).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), CONFIG_TEMPLATE);

        assert!(execute_init(&path, false).is_err());
        assert!(execute_init(&path, true).is_ok());
    }

    #[test]
    fn validate_reports_bad_field() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[gemini]\ntop_p = 4.0\n").unwrap();
        let err = execute_validate(&path).unwrap_err();
        assert!(err.to_string().contains("top_p"));
    }
}
