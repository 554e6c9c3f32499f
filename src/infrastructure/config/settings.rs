//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all application settings.
//! Configuration is loaded from a TOML file. Every section has defaults, so an
//! empty file (or none at all) is a valid configuration.
//!
//! # Example
//!
//! ```no_run
//! use roomstyle::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::gemini::GeminiConfig;
use super::limits::LimitsConfig;
use super::logging::LoggingConfig;
use super::share::ShareConfig;
use super::storage::StorageConfig;
use super::transform::TransformConfig;
use crate::error::{ConfigError, Result};

/// Main application configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    /// Logging and tracing configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Gemini API settings.
    #[serde(default)]
    pub gemini: GeminiConfig,

    /// Input validation limits.
    #[serde(default)]
    pub limits: LimitsConfig,

    /// Timeout, fallback and output settings.
    #[serde(default)]
    pub transform: TransformConfig,

    /// Credential storage location.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Share-link page and message.
    #[serde(default)]
    pub share: ShareConfig,
}

impl Config {
    /// Parse configuration from TOML content.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML content is malformed or validation fails.
    #[allow(clippy::result_large_err)]
    pub fn parse_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is malformed, or fails
    /// validation.
    #[allow(clippy::result_large_err)]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Load configuration, falling back to defaults when the file is absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed or validated.
    #[allow(clippy::result_large_err)]
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!(path = %path.display(), "config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Validate configuration values.
    #[allow(clippy::result_large_err)]
    fn validate(&self) -> Result<()> {
        if self.gemini.base_url.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "base_url" }.into());
        }
        url::Url::parse(&self.gemini.base_url).map_err(|e| ConfigError::InvalidValue {
            field: "base_url",
            reason: e.to_string(),
        })?;
        if self.gemini.model.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "model" }.into());
        }
        if !(0.0..=2.0).contains(&self.gemini.temperature) {
            return Err(ConfigError::InvalidValue {
                field: "temperature",
                reason: "must be between 0 and 2".to_string(),
            }
            .into());
        }
        if !(0.0..=1.0).contains(&self.gemini.top_p) {
            return Err(ConfigError::InvalidValue {
                field: "top_p",
                reason: "must be between 0 and 1".to_string(),
            }
            .into());
        }
        if self.gemini.max_output_tokens == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_output_tokens",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.limits.max_image_bytes == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_image_bytes",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.limits.max_instruction_chars == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_instruction_chars",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.transform.fallback_to_preset && self.transform.preset_dir.is_none() {
            tracing::warn!("fallback_to_preset is enabled without preset_dir; previews cannot be saved");
        }
        url::Url::parse(&self.share.page_url).map_err(|e| ConfigError::InvalidValue {
            field: "page_url",
            reason: e.to_string(),
        })?;
        Ok(())
    }

    /// Remote call timeout, `None` when disabled.
    #[must_use]
    pub fn timeout(&self) -> Option<std::time::Duration> {
        (self.transform.timeout_secs > 0)
            .then(|| std::time::Duration::from_secs(self.transform.timeout_secs))
    }

    /// Directory for downloaded results.
    #[must_use]
    pub fn output_dir(&self) -> PathBuf {
        self.transform
            .output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Initialize logging with the configured settings.
    pub fn init_logging(&self) {
        self.logging.init();
    }
}
