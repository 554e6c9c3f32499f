//! Social share-intent links.
//!
//! Links point at the project page, never at the generated image: the
//! image only exists locally.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use url::Url;

use crate::error::Result;
use crate::infrastructure::config::share::ShareConfig;

/// Supported share destinations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ShareTarget {
    X,
    Facebook,
    LinkedIn,
    WhatsApp,
    Reddit,
}

impl ShareTarget {
    pub const ALL: [ShareTarget; 5] = [
        Self::X,
        Self::Facebook,
        Self::LinkedIn,
        Self::WhatsApp,
        Self::Reddit,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::X => "x",
            Self::Facebook => "facebook",
            Self::LinkedIn => "linkedin",
            Self::WhatsApp => "whatsapp",
            Self::Reddit => "reddit",
        }
    }

    /// Build the share-intent URL for this destination.
    ///
    /// # Errors
    ///
    /// Returns a URL error if the intent endpoint cannot be parsed.
    pub fn link(self, page_url: &str, message: &str) -> Result<Url> {
        let url = match self {
            Self::X => Url::parse_with_params(
                "https://twitter.com/intent/tweet",
                &[("text", message), ("url", page_url)],
            )?,
            Self::Facebook => {
                Url::parse_with_params("https://www.facebook.com/sharer/sharer.php", &[("u", page_url)])?
            }
            Self::LinkedIn => Url::parse_with_params(
                "https://www.linkedin.com/sharing/share-offsite/",
                &[("url", page_url)],
            )?,
            Self::WhatsApp => Url::parse_with_params(
                "https://wa.me/",
                &[("text", format!("{message} {page_url}").as_str())],
            )?,
            Self::Reddit => Url::parse_with_params(
                "https://www.reddit.com/submit",
                &[("url", page_url), ("title", message)],
            )?,
        };
        Ok(url)
    }
}

impl fmt::Display for ShareTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShareTarget {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "x" | "twitter" => Ok(Self::X),
            "facebook" => Ok(Self::Facebook),
            "linkedin" => Ok(Self::LinkedIn),
            "whatsapp" => Ok(Self::WhatsApp),
            "reddit" => Ok(Self::Reddit),
            other => Err(format!("unknown share target: {other}")),
        }
    }
}

/// One rendered share link.
#[derive(Debug, Clone, Serialize)]
pub struct ShareLink {
    pub target: ShareTarget,
    pub url: String,
}

/// Links for every destination, using the configured page and message.
///
/// # Errors
///
/// Returns a URL error if any link cannot be built.
pub fn share_links(config: &ShareConfig) -> Result<Vec<ShareLink>> {
    ShareTarget::ALL
        .iter()
        .map(|target| {
            Ok(ShareLink {
                target: *target,
                url: target.link(&config.page_url, &config.message)?.into(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = "https://example.com/redesign";

    fn query(url: &Url, key: &str) -> Option<String> {
        url.query_pairs()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
    }

    #[test]
    fn x_link_carries_text_and_url() {
        let url = ShareTarget::X.link(PAGE, "Look at my room").unwrap();
        assert_eq!(url.host_str(), Some("twitter.com"));
        assert_eq!(query(&url, "text").as_deref(), Some("Look at my room"));
        assert_eq!(query(&url, "url").as_deref(), Some(PAGE));
    }

    #[test]
    fn whatsapp_joins_message_and_page() {
        let url = ShareTarget::WhatsApp.link(PAGE, "Hi & bye").unwrap();
        assert_eq!(
            query(&url, "text").as_deref(),
            Some("Hi & bye https://example.com/redesign")
        );
    }

    #[test]
    fn every_target_has_a_link() {
        let links = share_links(&ShareConfig::default()).unwrap();
        assert_eq!(links.len(), ShareTarget::ALL.len());
        assert!(links.iter().all(|l| l.url.starts_with("https://")));
    }

    #[test]
    fn target_names_parse() {
        assert_eq!("Twitter".parse::<ShareTarget>(), Ok(ShareTarget::X));
        assert_eq!("linkedin".parse::<ShareTarget>(), Ok(ShareTarget::LinkedIn));
        assert!("myspace".parse::<ShareTarget>().is_err());
    }
}
