//! Body pass: renders messages, enums, services and everything nested in them.
//!
//! Declarations are rendered in source order. Each composite body is walked
//! by a fresh [`BodyPass`] one indentation level deeper, and its output is
//! appended to the parent's. File-scoped statements (syntax, package, imports
//! and top-level options) belong to the header pass and are skipped here, as
//! are top-level comments that precede the first non-comment declaration.

use crate::ast::{
    Comment, Declaration, Enum, EnumField, Extensions, FieldLabel, Group, MapField, Message,
    NodeMeta, NormalField, OneOf, OneOfField, OptionDecl, Range, Reserved, Rpc, RpcType, Service,
};
use crate::config::FormatConfig;
use crate::renderer::{compact_value, Renderer};
use crate::state::HeaderState;
use crate::types::Formatted;
use crate::visitor::{walk_declarations, Visitor};

/// Formatting pass for one scope of declarations.
#[derive(Debug)]
pub struct BodyPass<'c> {
    renderer: Renderer,
    config: &'c FormatConfig,
    state: HeaderState,
    nested: bool,
    emitted: bool,
    last_was_block: bool,
}

impl<'c> BodyPass<'c> {
    /// Creates a pass for the top level of a document.
    #[must_use]
    pub fn new(config: &'c FormatConfig) -> Self {
        Self {
            renderer: Renderer::new(config.indent.clone()),
            config,
            state: HeaderState::CollectingHeader,
            nested: false,
            emitted: false,
            last_was_block: false,
        }
    }

    /// Returns the rendered text and diagnostics.
    #[must_use]
    pub fn finish(self) -> Formatted {
        self.renderer.finish()
    }

    fn scoped(&self) -> Self {
        Self {
            renderer: self.renderer.child(),
            config: self.config,
            state: HeaderState::PastHeader,
            nested: true,
            emitted: false,
            last_was_block: false,
        }
    }

    /// Writes a blank line when a block meets a neighbour.
    fn separate(&mut self, block: bool) {
        if self.emitted && (block || self.last_was_block) {
            self.renderer.emit_line(&[]);
        }
        self.emitted = true;
        self.last_was_block = block;
    }

    fn emit_block(&mut self, meta: &NodeMeta, head: &str, elements: &[Declaration]) {
        self.separate(true);
        self.renderer.emit_comment(meta.comment.as_ref());
        let inline = meta.inline_comment.as_ref();
        if elements.is_empty() {
            self.renderer.emit_with_inline_comment(inline, &[head, " {}"]);
            return;
        }
        self.renderer.emit_with_inline_comment(inline, &[head, " {"]);
        let mut scope = self.scoped();
        walk_declarations(&mut scope, elements);
        self.renderer.append(scope.finish());
        self.renderer.emit_line(&["}"]);
    }

    fn emit_field(&mut self, meta: &NodeMeta, head: &str, options: &[OptionDecl]) {
        self.separate(false);
        self.renderer.emit_comment(meta.comment.as_ref());
        let inline = meta.inline_comment.as_ref();
        match options {
            [] => self.renderer.emit_with_inline_comment(inline, &[head, ";"]),
            [option] if option.meta.comment.is_none() && option.meta.inline_comment.is_none() => {
                let value = compact_value(&option.value);
                self.renderer.emit_with_inline_comment(
                    inline,
                    &[head, " [", option.name.as_str(), " = ", value.as_str(), "];"],
                );
            }
            _ => {
                self.renderer.emit_line(&[head, " ["]);
                let mut entries = self.renderer.child();
                entries.emit_options_block(true, options);
                self.renderer.append(entries.finish());
                self.renderer.emit_with_inline_comment(inline, &["];"]);
            }
        }
    }

    fn emit_statement(&mut self, meta: &NodeMeta, line: &str) {
        self.separate(false);
        self.renderer.emit_comment(meta.comment.as_ref());
        self.renderer
            .emit_with_inline_comment(meta.inline_comment.as_ref(), &[line, ";"]);
    }
}

fn labelled(label: Option<FieldLabel>, rest: &str) -> String {
    match label {
        Some(label) => format!("{} {rest}", label.keyword()),
        None => rest.to_string(),
    }
}

fn rpc_type(rpc_type: &RpcType) -> String {
    if rpc_type.streams {
        format!("stream {}", rpc_type.type_name)
    } else {
        rpc_type.type_name.clone()
    }
}

fn ranges(ranges: &[Range]) -> String {
    ranges
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl<'ast> Visitor<'ast> for BodyPass<'_> {
    fn enter(&mut self, declaration: &'ast Declaration) {
        self.state = self.state.advance(declaration);
    }

    fn visit_comment(&mut self, node: &'ast Comment) {
        if self.state.is_collecting() {
            return;
        }
        self.separate(false);
        self.renderer.emit_comment(Some(node));
    }

    fn visit_option(&mut self, node: &'ast OptionDecl) {
        if !self.nested {
            return;
        }
        self.separate(false);
        self.renderer.emit_options_block(false, [node]);
    }

    fn visit_message(&mut self, node: &'ast Message) {
        let head = format!("message {}", node.name);
        self.emit_block(&node.meta, &head, &node.elements);
    }

    fn visit_enum(&mut self, node: &'ast Enum) {
        let head = format!("enum {}", node.name);
        self.emit_block(&node.meta, &head, &node.elements);
    }

    fn visit_service(&mut self, node: &'ast Service) {
        let head = format!("service {}", node.name);
        self.emit_block(&node.meta, &head, &node.elements);
    }

    fn visit_oneof(&mut self, node: &'ast OneOf) {
        let head = format!("oneof {}", node.name);
        self.emit_block(&node.meta, &head, &node.elements);
    }

    fn visit_group(&mut self, node: &'ast Group) {
        let head = labelled(
            node.label,
            &format!("group {} = {}", node.name, node.sequence),
        );
        self.emit_block(&node.meta, &head, &node.elements);
    }

    fn visit_normal_field(&mut self, node: &'ast NormalField) {
        let head = labelled(
            node.label,
            &format!("{} {} = {}", node.type_name, node.name, node.sequence),
        );
        self.emit_field(&node.meta, &head, &node.options);
    }

    fn visit_map_field(&mut self, node: &'ast MapField) {
        let head = format!(
            "map<{}, {}> {} = {}",
            node.key_type, node.value_type, node.name, node.sequence
        );
        self.emit_field(&node.meta, &head, &node.options);
    }

    fn visit_oneof_field(&mut self, node: &'ast OneOfField) {
        let head = format!("{} {} = {}", node.type_name, node.name, node.sequence);
        self.emit_field(&node.meta, &head, &node.options);
    }

    fn visit_enum_field(&mut self, node: &'ast EnumField) {
        let head = format!("{} = {}", node.name, node.value);
        self.emit_field(&node.meta, &head, &node.options);
    }

    fn visit_rpc(&mut self, node: &'ast Rpc) {
        let head = format!(
            "rpc {}({}) returns ({})",
            node.name,
            rpc_type(&node.request),
            rpc_type(&node.response)
        );
        if node.options.is_empty() {
            if self.config.rpc_use_semicolons {
                self.emit_statement(&node.meta, &head);
            } else {
                self.separate(false);
                self.renderer.emit_comment(node.meta.comment.as_ref());
                self.renderer.emit_with_inline_comment(
                    node.meta.inline_comment.as_ref(),
                    &[head.as_str(), " {}"],
                );
            }
            return;
        }
        self.separate(true);
        self.renderer.emit_comment(node.meta.comment.as_ref());
        self.renderer.emit_with_inline_comment(
            node.meta.inline_comment.as_ref(),
            &[head.as_str(), " {"],
        );
        let mut body = self.renderer.child();
        body.emit_options_block(false, &node.options);
        self.renderer.append(body.finish());
        self.renderer.emit_line(&["}"]);
    }

    fn visit_reserved(&mut self, node: &'ast Reserved) {
        let mut items: Vec<String> = node.ranges.iter().map(ToString::to_string).collect();
        items.extend(node.field_names.iter().map(|name| format!("\"{name}\"")));
        let line = format!("reserved {}", items.join(", "));
        self.emit_statement(&node.meta, &line);
    }

    fn visit_extensions(&mut self, node: &'ast Extensions) {
        let line = format!("extensions {}", ranges(&node.ranges));
        self.emit_statement(&node.meta, &line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Annotated, Document, Syntax};

    fn message(name: &str, elements: Vec<Declaration>) -> Declaration {
        Message {
            name: name.to_string(),
            elements,
            ..Message::default()
        }
        .into()
    }

    fn field(type_name: &str, name: &str, sequence: i64) -> NormalField {
        NormalField {
            type_name: type_name.to_string(),
            name: name.to_string(),
            sequence,
            ..NormalField::default()
        }
    }

    fn run_with(config: &FormatConfig, declarations: Vec<Declaration>) -> Formatted {
        let document = Document::new(declarations);
        let mut pass = BodyPass::new(config);
        pass.visit_document(&document);
        pass.finish()
    }

    fn run(declarations: Vec<Declaration>) -> String {
        run_with(&FormatConfig::default(), declarations).text
    }

    #[test]
    fn empty_message_is_collapsed() {
        assert_eq!(run(vec![message("Empty", Vec::new())]), "message Empty {}\n");
    }

    #[test]
    fn fields_render_with_labels() {
        let mut repeated = field("string", "names", 2);
        repeated.label = Some(FieldLabel::Repeated);
        let out = run(vec![message(
            "Foo",
            vec![field("int64", "id", 1).into(), repeated.into()],
        )]);
        assert_eq!(
            out,
            "message Foo {\n  int64 id = 1;\n  repeated string names = 2;\n}\n"
        );
    }

    #[test]
    fn header_declarations_are_skipped() {
        let out = run(vec![
            Comment::new([" header"]).into(),
            Syntax::new("proto3").into(),
            OptionDecl::new("go_package", "\"x\"").into(),
            Comment::new([" about Foo"]).into(),
            message("Foo", Vec::new()),
        ]);
        assert_eq!(out, "// about Foo\n\nmessage Foo {}\n");
    }

    #[test]
    fn blocks_are_separated_by_blank_lines() {
        let out = run(vec![
            message("A", Vec::new()),
            message(
                "B",
                vec![
                    field("string", "x", 1).into(),
                    message("Inner", Vec::new()),
                    field("string", "y", 2).into(),
                ],
            ),
        ]);
        assert_eq!(
            out,
            "message A {}\n\nmessage B {\n  string x = 1;\n\n  message Inner {}\n\n  string y = 2;\n}\n"
        );
    }

    #[test]
    fn single_field_option_stays_inline() {
        let mut f = field("string", "old", 3);
        f.options = vec![OptionDecl::new("deprecated", "true")];
        let out = run(vec![message("M", vec![f.into()])]);
        assert_eq!(out, "message M {\n  string old = 3 [deprecated = true];\n}\n");
    }

    #[test]
    fn several_field_options_use_bracketed_block() {
        let mut f = field("string", "email", 1).with_inline_comment(Comment::new([" pii"]));
        f.options = vec![
            OptionDecl::new("deprecated", "true"),
            OptionDecl::new("(validate.rules).string.email", "true"),
        ];
        let out = run(vec![message("M", vec![f.into()])]);
        assert_eq!(
            out,
            concat!(
                "message M {\n",
                "  string email = 1 [\n",
                "    deprecated = true,\n",
                "    (validate.rules).string.email = true\n",
                "  ]; // pii\n",
                "}\n",
            )
        );
    }

    #[test]
    fn enum_with_reserved_and_options() {
        let out = run(vec![Enum {
            name: "Color".to_string(),
            elements: vec![
                OptionDecl::new("allow_alias", "true").into(),
                EnumField {
                    name: "COLOR_UNSPECIFIED".to_string(),
                    value: 0,
                    ..EnumField::default()
                }
                .into(),
                Reserved {
                    ranges: vec![Range::single(2), Range::to(5, 9), Range::to_max(100)],
                    ..Reserved::default()
                }
                .into(),
                Reserved {
                    field_names: vec!["RED".to_string(), "BLUE".to_string()],
                    ..Reserved::default()
                }
                .into(),
            ],
            ..Enum::default()
        }
        .into()]);
        assert_eq!(
            out,
            concat!(
                "enum Color {\n",
                "  option allow_alias = true;\n",
                "  COLOR_UNSPECIFIED = 0;\n",
                "  reserved 2, 5 to 9, 100 to max;\n",
                "  reserved \"RED\", \"BLUE\";\n",
                "}\n",
            )
        );
    }

    fn service() -> Declaration {
        Service {
            name: "Greeter".to_string(),
            elements: vec![
                Rpc {
                    name: "Hello".to_string(),
                    request: RpcType {
                        type_name: "HelloRequest".to_string(),
                        streams: false,
                    },
                    response: RpcType {
                        type_name: "HelloResponse".to_string(),
                        streams: true,
                    },
                    ..Rpc::default()
                }
                .into(),
                Rpc {
                    name: "Get".to_string(),
                    request: RpcType {
                        type_name: "GetRequest".to_string(),
                        streams: false,
                    },
                    response: RpcType {
                        type_name: "GetResponse".to_string(),
                        streams: false,
                    },
                    options: vec![OptionDecl::new("idempotency_level", "NO_SIDE_EFFECTS")],
                    ..Rpc::default()
                }
                .into(),
            ],
            ..Service::default()
        }
        .into()
    }

    #[test]
    fn rpc_without_options_uses_braces_by_default() {
        assert_eq!(
            run(vec![service()]),
            concat!(
                "service Greeter {\n",
                "  rpc Hello(HelloRequest) returns (stream HelloResponse) {}\n",
                "\n",
                "  rpc Get(GetRequest) returns (GetResponse) {\n",
                "    option idempotency_level = NO_SIDE_EFFECTS;\n",
                "  }\n",
                "}\n",
            )
        );
    }

    #[test]
    fn rpc_without_options_uses_semicolon_when_configured() {
        let config = FormatConfig {
            rpc_use_semicolons: true,
            ..FormatConfig::default()
        };
        let out = run_with(&config, vec![service()]).text;
        assert!(out.contains("  rpc Hello(HelloRequest) returns (stream HelloResponse);\n"));
    }

    #[test]
    fn oneof_map_group_and_extensions() {
        let out = run(vec![message(
            "M",
            vec![
                MapField {
                    key_type: "string".to_string(),
                    value_type: "int32".to_string(),
                    name: "counts".to_string(),
                    sequence: 1,
                    ..MapField::default()
                }
                .into(),
                OneOf {
                    name: "choice".to_string(),
                    elements: vec![OneOfField {
                        type_name: "string".to_string(),
                        name: "text".to_string(),
                        sequence: 2,
                        ..OneOfField::default()
                    }
                    .into()],
                    ..OneOf::default()
                }
                .into(),
                Group {
                    label: Some(FieldLabel::Optional),
                    name: "Result".to_string(),
                    sequence: 3,
                    elements: Vec::new(),
                    ..Group::default()
                }
                .into(),
                Extensions {
                    ranges: vec![Range::to_max(100)],
                    ..Extensions::default()
                }
                .into(),
            ],
        )]);
        assert_eq!(
            out,
            concat!(
                "message M {\n",
                "  map<string, int32> counts = 1;\n",
                "\n",
                "  oneof choice {\n",
                "    string text = 2;\n",
                "  }\n",
                "\n",
                "  optional group Result = 3 {}\n",
                "\n",
                "  extensions 100 to max;\n",
                "}\n",
            )
        );
    }

    #[test]
    fn nested_comments_render_in_place() {
        let out = run(vec![message(
            "M",
            vec![
                Comment::new([" standalone"]).into(),
                field("bool", "ok", 1)
                    .with_comment(Comment::new([" leading"]))
                    .into(),
            ],
        )]);
        assert_eq!(
            out,
            "message M {\n  // standalone\n  // leading\n  bool ok = 1;\n}\n"
        );
    }

    #[test]
    fn tab_indent_is_used_for_nesting() {
        let config = FormatConfig {
            indent: "\t".to_string(),
            ..FormatConfig::default()
        };
        let out = run_with(
            &config,
            vec![message("A", vec![message("B", vec![field("int32", "x", 1).into()])])],
        )
        .text;
        assert_eq!(out, "message A {\n\tmessage B {\n\t\tint32 x = 1;\n\t}\n}\n");
    }
}
