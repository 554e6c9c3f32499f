//! Style preset listing.

use serde_json::json;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::adapter::inbound::cli::output;
use crate::domain::{StylePreset, DEFAULT_STYLE, STYLE_PRESETS};
use crate::error::Result;

#[derive(Tabled)]
struct StyleRow {
    #[tabled(rename = "Id")]
    id: String,
    #[tabled(rename = "Name")]
    name: &'static str,
    #[tabled(rename = "Description")]
    description: &'static str,
}

impl From<&StylePreset> for StyleRow {
    fn from(preset: &StylePreset) -> Self {
        let id = if preset.id == DEFAULT_STYLE {
            format!("{} (default)", preset.id)
        } else {
            preset.id.to_string()
        };
        Self {
            id,
            name: preset.name,
            description: preset.description,
        }
    }
}

/// List the preset catalog.
pub fn list() -> Result<()> {
    if output::is_json() {
        output::json_output(json!({
            "command": "styles.list",
            "default": DEFAULT_STYLE,
            "styles": STYLE_PRESETS,
        }));
        return Ok(());
    }
    if output::is_quiet() {
        for preset in STYLE_PRESETS {
            println!("{}", preset.id);
        }
        return Ok(());
    }

    output::header(env!("CARGO_PKG_VERSION"));
    output::section("Style presets");
    let rows: Vec<StyleRow> = STYLE_PRESETS.iter().map(StyleRow::from).collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    output::lines(&table.to_string());
    println!();
    output::hint("roomstyle transform room.jpg --style <id>");
    Ok(())
}
