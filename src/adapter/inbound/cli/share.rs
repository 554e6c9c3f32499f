//! Handler for `share`.

use serde_json::json;

use crate::adapter::inbound::cli::output;
use crate::adapter::outbound::clipboard;
use crate::application::share::{share_links, ShareLink, ShareTarget};
use crate::error::{ConfigError, Result};
use crate::infrastructure::config::share::ShareConfig;

/// Print share links and copy the share message.
pub fn execute(config: &ShareConfig, target: Option<&str>, copy: bool) -> Result<()> {
    let links = match target {
        Some(name) => {
            let target: ShareTarget = name.parse().map_err(|reason| ConfigError::InvalidValue {
                field: "target",
                reason,
            })?;
            vec![ShareLink {
                target,
                url: target.link(&config.page_url, &config.message)?.into(),
            }]
        }
        None => share_links(config)?,
    };

    let copied = copy && copy_message(config);

    if output::is_json() {
        output::json_output(json!({
            "command": "share",
            "message": config.message,
            "page_url": config.page_url,
            "copied": copied,
            "links": links,
        }));
        return Ok(());
    }

    output::section("Share");
    for link in &links {
        output::field(link.target.as_str(), &link.url);
    }
    if copied {
        output::success("Share message copied to clipboard");
    }
    Ok(())
}

/// Copy "message page_url" to the clipboard. Failure only warns.
pub(crate) fn copy_message(config: &ShareConfig) -> bool {
    let text = format!("{} {}", config.message, config.page_url);
    match clipboard::copy_text(&text) {
        Ok(()) => true,
        Err(e) => {
            tracing::debug!(error = %e, "clipboard unavailable");
            output::warning(&format!("Could not copy to clipboard: {e}"));
            false
        }
    }
}
