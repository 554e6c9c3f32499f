//! Session history of transformations.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::image::ImageRef;

/// A source image paired with what it was transformed into.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
    pub original: ImageRef,
    pub transformed: ImageRef,
    pub style_id: String,
    /// True when `transformed` is the demo placeholder, not a real result.
    pub fallback: bool,
    pub created_at: DateTime<Utc>,
}

/// Append-only, chronological list of entries for one session.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct History {
    entries: Vec<HistoryEntry>,
}

impl History {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.push(entry);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn last(&self) -> Option<&HistoryEntry> {
        self.entries.last()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    #[must_use]
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(style: &str) -> HistoryEntry {
        HistoryEntry {
            original: ImageRef::inline("image/png", b"a"),
            transformed: ImageRef::inline("image/png", b"b"),
            style_id: style.into(),
            fallback: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn entries_keep_insertion_order() {
        let mut history = History::new();
        history.push(entry("modern"));
        history.push(entry("bohemian"));

        let styles: Vec<_> = history.iter().map(|e| e.style_id.as_str()).collect();
        assert_eq!(styles, ["modern", "bohemian"]);
        assert_eq!(history.last().unwrap().style_id, "bohemian");
    }

    #[test]
    fn history_serializes_as_array() {
        let mut history = History::new();
        history.push(entry("modern"));
        let json = serde_json::to_value(&history).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["transformed"]["kind"], "inline");
    }
}
