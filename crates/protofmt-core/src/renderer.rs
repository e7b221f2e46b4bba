//! Base renderer shared by every formatting pass.
//!
//! The renderer owns an output buffer, an indentation depth and the list of
//! diagnostics recorded by its pass. Spacing is never implicit: a blank line
//! is written by calling [`Renderer::emit_line`] with no parts.

use crate::ast::{AggregateEntry, Comment, OptionDecl, OptionValue};
use crate::types::{Diagnostic, Formatted, Position};

/// Line-oriented text emitter with a diagnostics accumulator.
#[derive(Debug, Clone)]
pub struct Renderer {
    indent_unit: String,
    depth: usize,
    buffer: String,
    diagnostics: Vec<Diagnostic>,
}

impl Renderer {
    /// Creates a top-level renderer.
    #[must_use]
    pub fn new(indent_unit: impl Into<String>) -> Self {
        Self {
            indent_unit: indent_unit.into(),
            depth: 0,
            buffer: String::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Creates an empty renderer one indentation level deeper.
    #[must_use]
    pub fn child(&self) -> Self {
        Self {
            indent_unit: self.indent_unit.clone(),
            depth: self.depth + 1,
            buffer: String::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Literal whitespace of one indentation level.
    #[must_use]
    pub fn indent_unit(&self) -> &str {
        &self.indent_unit
    }

    /// Writes one indented line made of `parts`; no parts writes a blank line.
    pub fn emit_line(&mut self, parts: &[&str]) {
        if !parts.is_empty() {
            for _ in 0..self.depth {
                self.buffer.push_str(&self.indent_unit);
            }
            for part in parts {
                self.buffer.push_str(part);
            }
        }
        self.buffer.push('\n');
    }

    /// Writes a comment verbatim, one `//` line per comment line.
    pub fn emit_comment(&mut self, comment: Option<&Comment>) {
        let Some(comment) = comment else {
            return;
        };
        for line in &comment.lines {
            self.emit_line(&["//", line.as_str()]);
        }
    }

    /// Writes `parts` as one line, followed by the inline comment if present.
    pub fn emit_with_inline_comment(&mut self, inline: Option<&Comment>, parts: &[&str]) {
        match inline {
            None => self.emit_line(parts),
            Some(comment) => {
                let text = comment.lines.join(" ");
                let mut line = parts.to_vec();
                line.push(" //");
                line.push(&text);
                self.emit_line(&line);
            }
        }
    }

    /// Writes a run of options.
    ///
    /// With `multiline` unset each option becomes an `option name = value;`
    /// statement. With `multiline` set the options are written as the
    /// comma-separated entries of a bracketed field-option list; the caller
    /// writes the surrounding `[` and `]`.
    pub fn emit_options_block<'a, I>(&mut self, multiline: bool, options: I)
    where
        I: IntoIterator<Item = &'a OptionDecl>,
    {
        let options: Vec<&OptionDecl> = options.into_iter().collect();
        let last = options.len().saturating_sub(1);
        for (i, option) in options.iter().enumerate() {
            self.emit_comment(option.meta.comment.as_ref());
            let inline = option.meta.inline_comment.as_ref();
            if multiline {
                let terminator = if i == last { "" } else { "," };
                self.emit_assignment(inline, &[option.name.as_str(), " = "], &option.value, terminator);
            } else {
                self.emit_assignment(
                    inline,
                    &["option ", option.name.as_str(), " = "],
                    &option.value,
                    ";",
                );
            }
        }
    }

    /// Records a non-fatal diagnostic.
    pub fn record_diagnostic(&mut self, position: Position, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic::new(position, message));
    }

    /// Appends the output of a child renderer.
    pub fn append(&mut self, rendered: Formatted) {
        self.buffer.push_str(&rendered.text);
        self.diagnostics.extend(rendered.diagnostics);
    }

    /// Drains the buffer and diagnostics.
    #[must_use]
    pub fn finish(self) -> Formatted {
        Formatted {
            text: self.buffer,
            diagnostics: self.diagnostics,
        }
    }

    fn emit_assignment(
        &mut self,
        inline: Option<&Comment>,
        head: &[&str],
        value: &OptionValue,
        terminator: &str,
    ) {
        match value {
            OptionValue::Literal(literal) => {
                let mut line = head.to_vec();
                line.extend([literal.as_str(), terminator]);
                self.emit_with_inline_comment(inline, &line);
            }
            OptionValue::Aggregate(entries) if entries.is_empty() => {
                let mut line = head.to_vec();
                line.extend(["{}", terminator]);
                self.emit_with_inline_comment(inline, &line);
            }
            OptionValue::Aggregate(entries) => {
                let mut line = head.to_vec();
                line.push("{");
                self.emit_with_inline_comment(inline, &line);
                self.emit_aggregate_entries(entries);
                self.emit_line(&["}", terminator]);
            }
        }
    }

    fn emit_aggregate_entries(&mut self, entries: &[AggregateEntry]) {
        self.depth += 1;
        for entry in entries {
            match &entry.value {
                OptionValue::Literal(literal) => self.emit_line(&[entry.name.as_str(), ": ", literal]),
                OptionValue::Aggregate(nested) if nested.is_empty() => {
                    self.emit_line(&[entry.name.as_str(), ": {}"]);
                }
                OptionValue::Aggregate(nested) => {
                    self.emit_line(&[entry.name.as_str(), ": {"]);
                    self.emit_aggregate_entries(nested);
                    self.emit_line(&["}"]);
                }
            }
        }
        self.depth -= 1;
    }
}

/// Renders an option value on a single line.
#[must_use]
pub fn compact_value(value: &OptionValue) -> String {
    match value {
        OptionValue::Literal(literal) => literal.clone(),
        OptionValue::Aggregate(entries) if entries.is_empty() => "{}".to_string(),
        OptionValue::Aggregate(entries) => {
            let inner: Vec<String> = entries
                .iter()
                .map(|e| format!("{}: {}", e.name, compact_value(&e.value)))
                .collect();
            format!("{{ {} }}", inner.join(" "))
        }
    }
}
