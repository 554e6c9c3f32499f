//! Gemini provider configuration.
//!
//! The API key is never read from this file. It comes from the credential
//! store or the `GEMINI_API_KEY` environment variable.

use serde::{Deserialize, Serialize};

/// Gemini API settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeminiConfig {
    /// API root, without the `/v1beta` suffix.
    ///
    /// Defaults to "https://generativelanguage.googleapis.com".
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Image generation model.
    ///
    /// Defaults to "gemini-2.0-flash-exp-image-generation".
    #[serde(default = "default_model")]
    pub model: String,

    /// Lightweight model used by `key test`.
    ///
    /// Defaults to "gemini-1.5-flash".
    #[serde(default = "default_test_model")]
    pub test_model: String,

    /// Sampling temperature. Defaults to 0.8.
    #[serde(default = "default_temperature")]
    pub temperature: f64,

    /// Nucleus sampling threshold. Defaults to 0.95.
    #[serde(default = "default_top_p")]
    pub top_p: f64,

    /// Top-k sampling. Defaults to 40.
    #[serde(default = "default_top_k")]
    pub top_k: u32,

    /// Maximum tokens in the response. Defaults to 8192.
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            test_model: default_test_model(),
            temperature: default_temperature(),
            top_p: default_top_p(),
            top_k: default_top_k(),
            max_output_tokens: default_max_output_tokens(),
        }
    }
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com".into()
}

fn default_model() -> String {
    "gemini-2.0-flash-exp-image-generation".into()
}

fn default_test_model() -> String {
    "gemini-1.5-flash".into()
}

fn default_temperature() -> f64 {
    0.8
}

fn default_top_p() -> f64 {
    0.95
}

const fn default_top_k() -> u32 {
    40
}

const fn default_max_output_tokens() -> u32 {
    8192
}
