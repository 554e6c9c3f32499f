//! Static catalog of decor style presets.

use serde::Serialize;

/// Style selected when the user has not picked one.
pub const DEFAULT_STYLE: &str = "minimalist";

/// A named, described visual theme with a preview image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StylePreset {
    /// Unique key, used on the command line and in file names.
    pub id: &'static str,
    /// Display name interpolated into the prompt.
    pub name: &'static str,
    /// Short description interpolated into the prompt.
    pub description: &'static str,
    /// Preview image path, relative to the preset directory.
    pub image: &'static str,
}

/// The preset catalog. Ids are unique.
pub const STYLE_PRESETS: &[StylePreset] = &[
    StylePreset {
        id: "minimalist",
        name: "Minimalist",
        description: "Clean lines, neutral colors, decluttered spaces",
        image: "images/minimalist.jpeg",
    },
    StylePreset {
        id: "modern",
        name: "Modern Contemporary",
        description: "Sleek, updated fixtures, current trends",
        image: "images/modern-contemporary.jpeg",
    },
    StylePreset {
        id: "scandinavian",
        name: "Scandinavian",
        description: "Light woods, whites, functional design",
        image: "images/scandinavian.jpeg",
    },
    StylePreset {
        id: "industrial",
        name: "Industrial Chic",
        description: "Exposed elements, raw materials",
        image: "images/industrial-chic.jpeg",
    },
    StylePreset {
        id: "traditional",
        name: "Cozy Traditional",
        description: "Warm colors, classic elements",
        image: "images/cozy-traditional.jpeg",
    },
    StylePreset {
        id: "bohemian",
        name: "Bohemian",
        description: "Eclectic, colorful, artistic",
        image: "images/bohemian.jpeg",
    },
];

/// Look up a preset by id (case-insensitive).
#[must_use]
pub fn find_style(id: &str) -> Option<&'static StylePreset> {
    let id = id.trim();
    STYLE_PRESETS
        .iter()
        .find(|preset| preset.id.eq_ignore_ascii_case(id))
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn preset_ids_are_unique() {
        let ids: HashSet<_> = STYLE_PRESETS.iter().map(|p| p.id).collect();
        assert_eq!(ids.len(), STYLE_PRESETS.len());
    }

    #[test]
    fn default_style_exists() {
        assert!(find_style(DEFAULT_STYLE).is_some());
    }

    #[test]
    fn lookup_ignores_case_and_padding() {
        let preset = find_style("  Scandinavian ").unwrap();
        assert_eq!(preset.name, "Scandinavian");
        assert!(find_style("baroque").is_none());
    }
}
