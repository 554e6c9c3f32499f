//! Share-link settings.

use serde::{Deserialize, Serialize};

/// Page and message used when building share-intent links.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ShareConfig {
    #[serde(default = "default_page_url")]
    pub page_url: String,

    #[serde(default = "default_message")]
    pub message: String,
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            page_url: default_page_url(),
            message: default_message(),
        }
    }
}

fn default_page_url() -> String {
    "https://github.com/jonigl/ai-home-redesign".into()
}

fn default_message() -> String {
    "I just redesigned my room with AI. Try it yourself!".into()
}
