//! Header pass: renders everything before the first structural declaration.
//!
//! The pass collects the file-scoped statements of a document (syntax,
//! package, options, imports) while visiting it in order, then renders them in
//! a fixed layout:
//!
//! 1. leading comment block
//! 2. `syntax`
//! 3. imports of well-known types, sorted by filename
//! 4. other imports, sorted by filename
//! 5. `package`
//! 6. plain options, in encounter order
//! 7. custom (parenthesized) options, in encounter order
//!
//! Every non-empty section is followed by one blank line. A second `syntax`
//! or `package` is reported as a diagnostic and otherwise ignored.

use tracing::debug;

use crate::ast::{Comment, Declaration, Import, OptionDecl, Package, Syntax};
use crate::config::FormatConfig;
use crate::renderer::Renderer;
use crate::state::HeaderState;
use crate::types::Formatted;
use crate::visitor::Visitor;
use crate::wkt::WellKnownTypes;

/// Message recorded for every syntax statement after the first.
pub const DUPLICATE_SYNTAX: &str = "duplicate syntax specified";

/// Message recorded for every package statement after the first.
pub const DUPLICATE_PACKAGE: &str = "duplicate package specified";

/// First formatting pass over the top level of a document.
#[derive(Debug)]
pub struct HeaderPass<'ast, 'r> {
    renderer: Renderer,
    registry: &'r WellKnownTypes,
    state: HeaderState,
    syntax: Option<&'ast Syntax>,
    package: Option<&'ast Package>,
    options: Vec<&'ast OptionDecl>,
    custom_options: Vec<&'ast OptionDecl>,
    imports: Vec<&'ast Import>,
    wkt_imports: Vec<&'ast Import>,
}

impl<'ast, 'r> HeaderPass<'ast, 'r> {
    /// Creates a pass for one document.
    #[must_use]
    pub fn new(config: &FormatConfig, registry: &'r WellKnownTypes) -> Self {
        Self {
            renderer: Renderer::new(config.indent.clone()),
            registry,
            state: HeaderState::default(),
            syntax: None,
            package: None,
            options: Vec::new(),
            custom_options: Vec::new(),
            imports: Vec::new(),
            wkt_imports: Vec::new(),
        }
    }

    /// Renders the collected sections and returns text and diagnostics.
    #[must_use]
    pub fn finish(mut self) -> Formatted {
        if let Some(syntax) = self.syntax {
            self.renderer.emit_comment(syntax.meta.comment.as_ref());
            if syntax.meta.comment.is_some() {
                self.renderer.emit_line(&[]);
            }
            self.renderer.emit_with_inline_comment(
                syntax.meta.inline_comment.as_ref(),
                &["syntax = \"", syntax.value.as_str(), "\";"],
            );
            self.renderer.emit_line(&[]);
        }
        let wkt_imports = std::mem::take(&mut self.wkt_imports);
        self.emit_imports(wkt_imports);
        let imports = std::mem::take(&mut self.imports);
        self.emit_imports(imports);
        if let Some(package) = self.package {
            self.renderer.emit_comment(package.meta.comment.as_ref());
            self.renderer.emit_with_inline_comment(
                package.meta.inline_comment.as_ref(),
                &["package ", package.name.as_str(), ";"],
            );
            self.renderer.emit_line(&[]);
        }
        if !self.options.is_empty() {
            self.renderer.emit_options_block(false, self.options.iter().copied());
            self.renderer.emit_line(&[]);
        }
        if !self.custom_options.is_empty() {
            self.renderer
                .emit_options_block(false, self.custom_options.iter().copied());
            self.renderer.emit_line(&[]);
        }
        self.renderer.finish()
    }

    fn emit_imports(&mut self, mut imports: Vec<&'ast Import>) {
        if imports.is_empty() {
            return;
        }
        imports.sort_by(|a, b| a.filename.cmp(&b.filename));
        for import in imports {
            self.renderer.emit_comment(import.meta.comment.as_ref());
            let line: Vec<&str> = match import.kind {
                Some(kind) => vec!["import ", kind.keyword(), " \"", import.filename.as_str(), "\";"],
                None => vec!["import \"", import.filename.as_str(), "\";"],
            };
            self.renderer
                .emit_with_inline_comment(import.meta.inline_comment.as_ref(), &line);
        }
        self.renderer.emit_line(&[]);
    }
}

impl<'ast> Visitor<'ast> for HeaderPass<'ast, '_> {
    fn enter(&mut self, declaration: &'ast Declaration) {
        self.state = self.state.advance(declaration);
    }

    fn visit_comment(&mut self, node: &'ast Comment) {
        if self.state.is_collecting() {
            self.renderer.emit_comment(Some(node));
            self.renderer.emit_line(&[]);
        }
    }

    fn visit_syntax(&mut self, node: &'ast Syntax) {
        if self.syntax.is_some() {
            debug!("duplicate syntax at {}", node.meta.position);
            self.renderer
                .record_diagnostic(node.meta.position, DUPLICATE_SYNTAX);
            return;
        }
        self.syntax = Some(node);
    }

    fn visit_package(&mut self, node: &'ast Package) {
        if self.package.is_some() {
            debug!("duplicate package at {}", node.meta.position);
            self.renderer
                .record_diagnostic(node.meta.position, DUPLICATE_PACKAGE);
            return;
        }
        self.package = Some(node);
    }

    fn visit_option(&mut self, node: &'ast OptionDecl) {
        if node.is_custom() {
            self.custom_options.push(node);
        } else {
            self.options.push(node);
        }
    }

    fn visit_import(&mut self, node: &'ast Import) {
        if self.registry.contains(&node.filename) {
            self.wkt_imports.push(node);
        } else {
            self.imports.push(node);
        }
    }
}
