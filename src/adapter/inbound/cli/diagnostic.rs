//! Miette-based error diagnostics for CLI error presentation.
//!
//! Renders configuration problems with the offending file excerpt and a
//! labeled span, plus a help line.

use miette::{Diagnostic, GraphicalReportHandler, SourceSpan};
use thiserror::Error;

/// Configuration error with source location context.
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
#[diagnostic(code(roomstyle::config))]
pub struct ConfigDiagnostic {
    /// Human-readable error message.
    pub message: String,

    /// Source content (the configuration file).
    #[source_code]
    pub src: String,

    /// Byte offset and length of the problematic region.
    #[label("here")]
    pub span: SourceSpan,

    /// Optional help text with suggestions for fixing the error.
    #[help]
    pub help: Option<String>,
}

impl ConfigDiagnostic {
    #[must_use]
    pub fn new(
        message: impl Into<String>,
        src: impl Into<String>,
        offset: usize,
        len: usize,
    ) -> Self {
        Self {
            message: message.into(),
            src: src.into(),
            span: (offset, len).into(),
            help: None,
        }
    }

    #[must_use]
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Build from a TOML parse error, pointing at its span when known.
    #[must_use]
    pub fn from_toml(src: &str, err: &toml::de::Error) -> Self {
        let (offset, len) = err
            .span()
            .map_or((0, 0), |span| (span.start, span.end.saturating_sub(span.start)));
        Self::new(err.message(), src, offset, len)
            .with_help("see `roomstyle config init` for a documented template")
    }

    /// Build from a field-level validation failure, pointing at the first
    /// occurrence of the field name.
    #[must_use]
    pub fn for_field(src: &str, field: &str, reason: &str) -> Self {
        let (offset, len) = find_key(src, field).map_or((0, 0), |offset| (offset, field.len()));
        Self::new(format!("invalid value for {field}: {reason}"), src, offset, len)
    }

    /// Render as a graphical report without ANSI colors.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        let handler = GraphicalReportHandler::new_themed(miette::GraphicalTheme::unicode_nocolor());
        if handler.render_report(&mut out, self).is_err() {
            return self.message.clone();
        }
        out
    }
}

/// Byte offset of `key` at the start of a line (ignoring indentation).
fn find_key(src: &str, key: &str) -> Option<usize> {
    let mut offset = 0;
    for line in src.split_inclusive('\n') {
        let trimmed = line.trim_start();
        if let Some(rest) = trimmed.strip_prefix(key) {
            if rest.trim_start().starts_with('=') {
                return Some(offset + (line.len() - trimmed.len()));
            }
        }
        offset += line.len();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_span_points_at_key() {
        let src = "[gemini]\n  temperature = 3.5\n";
        let diag = ConfigDiagnostic::for_field(src, "temperature", "must be between 0 and 2");
        assert_eq!(diag.span.offset(), 11);
        assert_eq!(diag.span.len(), "temperature".len());
        assert!(diag.render().contains("temperature"));
    }

    #[test]
    fn toml_errors_keep_their_message() {
        let src = "[gemini\n";
        let err = toml::from_str::<toml::Value>(src).unwrap_err();
        let diag = ConfigDiagnostic::from_toml(src, &err);
        assert!(!diag.message.is_empty());
        assert!(diag.help.is_some());
    }
}
