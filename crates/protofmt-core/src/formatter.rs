//! Per-document orchestration of the formatting passes.

use std::sync::Arc;

use tracing::debug;

use crate::ast::Document;
use crate::body::BodyPass;
use crate::config::FormatConfig;
use crate::header::HeaderPass;
use crate::types::Formatted;
use crate::visitor::Visitor;
use crate::wkt::WellKnownTypes;

/// Formats documents with a fixed configuration and registry.
///
/// A `Formatter` holds no per-document state, so one instance can format
/// many documents, including from several threads at once.
///
/// # Example
///
/// ```
/// use protofmt_core::{Document, FormatConfig, Formatter, Import, Syntax};
///
/// let document = Document::new(vec![
///     Syntax::new("proto3").into(),
///     Import::new("b.proto").into(),
///     Import::new("a.proto").into(),
/// ]);
/// let formatted = Formatter::new(FormatConfig::default()).format(&document);
/// assert_eq!(
///     formatted.text,
///     "syntax = \"proto3\";\n\nimport \"a.proto\";\nimport \"b.proto\";\n"
/// );
/// ```
#[derive(Debug, Clone)]
pub struct Formatter {
    config: FormatConfig,
    registry: Arc<WellKnownTypes>,
}

impl Formatter {
    /// Creates a formatter using the standard well-known types.
    #[must_use]
    pub fn new(config: FormatConfig) -> Self {
        Self {
            config,
            registry: Arc::new(WellKnownTypes::standard()),
        }
    }

    /// Replaces the well-known types registry.
    #[must_use]
    pub fn with_registry(mut self, registry: Arc<WellKnownTypes>) -> Self {
        self.registry = registry;
        self
    }

    /// Formats one document.
    ///
    /// Never fails: structural anomalies are returned as diagnostics next to
    /// the text.
    #[must_use]
    pub fn format(&self, document: &Document) -> Formatted {
        debug!(
            "Formatting document with {} top-level declarations",
            document.declarations.len()
        );

        let mut header = HeaderPass::new(&self.config, &self.registry);
        header.visit_document(document);
        let header = header.finish();

        let mut body = BodyPass::new(&self.config);
        body.visit_document(document);
        let body = body.finish();

        let mut text = header.text;
        text.push_str(&body.text);
        let mut diagnostics = header.diagnostics;
        diagnostics.extend(body.diagnostics);

        debug!("Formatted document with {} diagnostics", diagnostics.len());

        Formatted {
            text: self.apply_newline_policy(&text),
            diagnostics,
        }
    }

    fn apply_newline_policy(&self, text: &str) -> String {
        let trimmed = text.trim_end_matches('\n');
        if trimmed.is_empty() {
            return String::new();
        }
        if self.config.trim_newline {
            trimmed.to_string()
        } else {
            format!("{trimmed}\n")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Annotated, Comment, Message, Package, Syntax};
    use crate::types::Position;

    #[test]
    fn header_and_body_are_concatenated() {
        let document = Document::new(vec![
            Syntax::new("proto3").into(),
            Package::new("x").into(),
            Message {
                name: "Foo".to_string(),
                ..Message::default()
            }
            .into(),
        ]);
        let out = Formatter::new(FormatConfig::default()).format(&document);
        assert_eq!(out.text, "syntax = \"proto3\";\n\npackage x;\n\nmessage Foo {}\n");
        assert!(out.is_clean());
    }

    #[test]
    fn trim_newline_drops_final_newline() {
        let config = FormatConfig {
            trim_newline: true,
            ..FormatConfig::default()
        };
        let document = Document::new(vec![Syntax::new("proto3").into()]);
        let out = Formatter::new(config).format(&document);
        assert_eq!(out.text, "syntax = \"proto3\";");
    }

    #[test]
    fn trailing_comment_keeps_its_spaces() {
        let document = Document::new(vec![
            Syntax::new("proto3").into(),
            Message {
                name: "Foo".to_string(),
                ..Message::default()
            }
            .into(),
            Comment::new([" tail with spaces   "]).into(),
        ]);
        let out = Formatter::new(FormatConfig::default()).format(&document);
        assert_eq!(
            out.text,
            "syntax = \"proto3\";\n\nmessage Foo {}\n\n// tail with spaces   \n"
        );
    }

    #[test]
    fn empty_document_formats_to_empty_text() {
        let out = Formatter::new(FormatConfig::default()).format(&Document::default());
        assert_eq!(out.text, "");
        assert!(out.is_clean());
    }

    #[test]
    fn diagnostics_do_not_stop_formatting() {
        let document = Document::new(vec![
            Comment::new([" c"]).into(),
            Syntax::new("proto3").at(2, 1).into(),
            Syntax::new("proto3").at(3, 1).into(),
            Message {
                name: "Kept".to_string(),
                ..Message::default()
            }
            .at(4, 1)
            .into(),
        ]);
        let out = Formatter::new(FormatConfig::default()).format(&document);
        assert_eq!(out.text, "// c\n\nsyntax = \"proto3\";\n\nmessage Kept {}\n");
        assert_eq!(out.diagnostics.len(), 1);
        assert_eq!(out.diagnostics[0].position, Position::new(3, 1));
    }

    #[test]
    fn formatter_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Formatter>();
    }
}
