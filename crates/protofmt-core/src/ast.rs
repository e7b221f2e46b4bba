//! Schema document model consumed by the formatter passes.
//!
//! The parser that produces these nodes lives outside this crate. Nodes are
//! serde-capable so a document can be handed over as JSON, with declarations
//! internally tagged by `kind`:
//!
//! ```json
//! { "declarations": [
//!     { "kind": "syntax", "value": "proto3", "position": { "line": 1, "column": 1 } },
//!     { "kind": "import", "filename": "google/protobuf/any.proto" }
//! ] }
//! ```

use serde::{Deserialize, Serialize};

use crate::types::Position;

/// A parsed schema file: top-level declarations in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Top-level declarations as written.
    #[serde(default)]
    pub declarations: Vec<Declaration>,
}

impl Document {
    /// Creates a document from declarations in source order.
    #[must_use]
    pub fn new(declarations: Vec<Declaration>) -> Self {
        Self { declarations }
    }
}

/// A comment block. Each line holds the text following the `//` marker.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// Position of the first line.
    #[serde(default)]
    pub position: Position,
    /// Comment lines without the `//` marker, verbatim.
    #[serde(default)]
    pub lines: Vec<String>,
}

impl Comment {
    /// Creates a comment from its lines.
    #[must_use]
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            position: Position::default(),
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    /// Sets the position of this comment.
    #[must_use]
    pub fn at(mut self, line: usize, column: usize) -> Self {
        self.position = Position::new(line, column);
        self
    }
}

/// Position and attached comments shared by every non-comment declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeMeta {
    /// Source position.
    #[serde(default)]
    pub position: Position,
    /// Leading comment attached to the declaration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<Comment>,
    /// Trailing comment on the declaration's line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_comment: Option<Comment>,
}

/// Access to [`NodeMeta`] with builder helpers.
pub trait Annotated: Sized {
    /// Returns the node's metadata.
    fn meta(&self) -> &NodeMeta;

    /// Returns the node's metadata mutably.
    fn meta_mut(&mut self) -> &mut NodeMeta;

    /// Sets the source position.
    #[must_use]
    fn at(mut self, line: usize, column: usize) -> Self {
        self.meta_mut().position = Position::new(line, column);
        self
    }

    /// Attaches a leading comment.
    #[must_use]
    fn with_comment(mut self, comment: Comment) -> Self {
        self.meta_mut().comment = Some(comment);
        self
    }

    /// Attaches a trailing inline comment.
    #[must_use]
    fn with_inline_comment(mut self, comment: Comment) -> Self {
        self.meta_mut().inline_comment = Some(comment);
        self
    }
}

/// `syntax = "proto3";`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Syntax {
    /// Common metadata.
    #[serde(flatten)]
    pub meta: NodeMeta,
    /// Syntax identifier without quotes.
    pub value: String,
}

impl Syntax {
    /// Creates a syntax statement.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            meta: NodeMeta::default(),
            value: value.into(),
        }
    }
}

/// `package foo.bar;`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    /// Common metadata.
    #[serde(flatten)]
    pub meta: NodeMeta,
    /// Fully qualified package name.
    pub name: String,
}

impl Package {
    /// Creates a package statement.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            meta: NodeMeta::default(),
            name: name.into(),
        }
    }
}

/// Import modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportKind {
    /// `import weak "..."`
    Weak,
    /// `import public "..."`
    Public,
}

impl ImportKind {
    /// Keyword as written in source.
    #[must_use]
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Weak => "weak",
            Self::Public => "public",
        }
    }
}

/// `import "foo/bar.proto";`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Import {
    /// Common metadata.
    #[serde(flatten)]
    pub meta: NodeMeta,
    /// Imported filename without quotes.
    pub filename: String,
    /// Optional `weak` / `public` modifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ImportKind>,
}

impl Import {
    /// Creates a plain import.
    #[must_use]
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            meta: NodeMeta::default(),
            filename: filename.into(),
            kind: None,
        }
    }

    /// Sets the import modifier.
    #[must_use]
    pub fn kind(mut self, kind: ImportKind) -> Self {
        self.kind = Some(kind);
        self
    }
}

/// Value assigned to an option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    /// A scalar constant in source form: `"text"`, `true`, `42`, `ENUM_VALUE`.
    Literal(String),
    /// A text-format message literal: `{ name: value ... }`.
    Aggregate(Vec<AggregateEntry>),
}

impl Default for OptionValue {
    fn default() -> Self {
        Self::Literal(String::new())
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        Self::Literal(value.to_string())
    }
}

/// One `name: value` entry of an aggregate option value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateEntry {
    /// Field name.
    pub name: String,
    /// Field value.
    pub value: OptionValue,
}

impl AggregateEntry {
    /// Creates an aggregate entry.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// `option name = value;` or a field option entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionDecl {
    /// Common metadata.
    #[serde(flatten)]
    pub meta: NodeMeta,
    /// Option name as written, e.g. `go_package` or `(foo.bar).baz`.
    pub name: String,
    /// Assigned value.
    pub value: OptionValue,
}

impl OptionDecl {
    /// Creates an option.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        Self {
            meta: NodeMeta::default(),
            name: name.into(),
            value: value.into(),
        }
    }

    /// Returns true if the name is a parenthesized extension reference.
    ///
    /// A dotted name without parentheses, e.g. `google.protobuf.java_package`,
    /// is not treated as custom.
    #[must_use]
    pub fn is_custom(&self) -> bool {
        self.name.starts_with('(')
    }
}

/// Field cardinality label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldLabel {
    /// `optional`
    Optional,
    /// `required`
    Required,
    /// `repeated`
    Repeated,
}

impl FieldLabel {
    /// Keyword as written in source.
    #[must_use]
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Optional => "optional",
            Self::Required => "required",
            Self::Repeated => "repeated",
        }
    }
}

/// `message Name { ... }`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Common metadata.
    #[serde(flatten)]
    pub meta: NodeMeta,
    /// Message name.
    pub name: String,
    /// Body declarations in source order.
    #[serde(default)]
    pub elements: Vec<Declaration>,
}

/// `enum Name { ... }`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enum {
    /// Common metadata.
    #[serde(flatten)]
    pub meta: NodeMeta,
    /// Enum name.
    pub name: String,
    /// Body declarations in source order.
    #[serde(default)]
    pub elements: Vec<Declaration>,
}

/// `service Name { ... }`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    /// Common metadata.
    #[serde(flatten)]
    pub meta: NodeMeta,
    /// Service name.
    pub name: String,
    /// Body declarations in source order.
    #[serde(default)]
    pub elements: Vec<Declaration>,
}

/// `[label] type name = sequence [options];`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalField {
    /// Common metadata.
    #[serde(flatten)]
    pub meta: NodeMeta,
    /// Optional cardinality label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<FieldLabel>,
    /// Field type.
    pub type_name: String,
    /// Field name.
    pub name: String,
    /// Field number.
    pub sequence: i64,
    /// Field options.
    #[serde(default)]
    pub options: Vec<OptionDecl>,
}

/// `map<K, V> name = sequence [options];`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapField {
    /// Common metadata.
    #[serde(flatten)]
    pub meta: NodeMeta,
    /// Key type.
    pub key_type: String,
    /// Value type.
    pub value_type: String,
    /// Field name.
    pub name: String,
    /// Field number.
    pub sequence: i64,
    /// Field options.
    #[serde(default)]
    pub options: Vec<OptionDecl>,
}

/// `oneof name { ... }`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OneOf {
    /// Common metadata.
    #[serde(flatten)]
    pub meta: NodeMeta,
    /// Oneof name.
    pub name: String,
    /// Body declarations in source order.
    #[serde(default)]
    pub elements: Vec<Declaration>,
}

/// A field inside a oneof: `type name = sequence [options];`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OneOfField {
    /// Common metadata.
    #[serde(flatten)]
    pub meta: NodeMeta,
    /// Field type.
    pub type_name: String,
    /// Field name.
    pub name: String,
    /// Field number.
    pub sequence: i64,
    /// Field options.
    #[serde(default)]
    pub options: Vec<OptionDecl>,
}

/// `[label] group Name = sequence { ... }`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    /// Common metadata.
    #[serde(flatten)]
    pub meta: NodeMeta,
    /// Optional cardinality label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<FieldLabel>,
    /// Group name.
    pub name: String,
    /// Field number.
    pub sequence: i64,
    /// Body declarations in source order.
    #[serde(default)]
    pub elements: Vec<Declaration>,
}

/// `NAME = value [options];` inside an enum.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumField {
    /// Common metadata.
    #[serde(flatten)]
    pub meta: NodeMeta,
    /// Value name.
    pub name: String,
    /// Numeric value.
    pub value: i64,
    /// Value options.
    #[serde(default)]
    pub options: Vec<OptionDecl>,
}

/// Request or response type of an RPC.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcType {
    /// Message type name.
    pub type_name: String,
    /// Whether the type is streamed.
    #[serde(default)]
    pub streams: bool,
}

/// `rpc Name(Request) returns (Response);`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rpc {
    /// Common metadata.
    #[serde(flatten)]
    pub meta: NodeMeta,
    /// Method name.
    pub name: String,
    /// Request type.
    pub request: RpcType,
    /// Response type.
    pub response: RpcType,
    /// Method options.
    #[serde(default)]
    pub options: Vec<OptionDecl>,
}

/// Upper bound of a range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RangeEnd {
    /// An explicit upper bound.
    Number(i64),
    /// `max`
    Max,
}

/// `from` or `from to end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range {
    /// Lower bound.
    pub from: i64,
    /// Upper bound, if the range spans more than one number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<RangeEnd>,
}

impl Range {
    /// A single number.
    #[must_use]
    pub fn single(from: i64) -> Self {
        Self { from, to: None }
    }

    /// `from to end`.
    #[must_use]
    pub fn to(from: i64, end: i64) -> Self {
        Self {
            from,
            to: Some(RangeEnd::Number(end)),
        }
    }

    /// `from to max`.
    #[must_use]
    pub fn to_max(from: i64) -> Self {
        Self {
            from,
            to: Some(RangeEnd::Max),
        }
    }
}

impl std::fmt::Display for Range {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.to {
            None => write!(f, "{}", self.from),
            Some(RangeEnd::Number(end)) => write!(f, "{} to {end}", self.from),
            Some(RangeEnd::Max) => write!(f, "{} to max", self.from),
        }
    }
}

/// `reserved 1, 2 to 5;` or `reserved "foo", "bar";`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reserved {
    /// Common metadata.
    #[serde(flatten)]
    pub meta: NodeMeta,
    /// Reserved number ranges.
    #[serde(default)]
    pub ranges: Vec<Range>,
    /// Reserved field names without quotes.
    #[serde(default)]
    pub field_names: Vec<String>,
}

/// `extensions 100 to max;`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extensions {
    /// Common metadata.
    #[serde(flatten)]
    pub meta: NodeMeta,
    /// Extension ranges.
    #[serde(default)]
    pub ranges: Vec<Range>,
}

/// Any top-level or nested declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Declaration {
    /// Syntax statement.
    Syntax(Syntax),
    /// Package statement.
    Package(Package),
    /// Option statement.
    Option(OptionDecl),
    /// Import statement.
    Import(Import),
    /// Message definition.
    Message(Message),
    /// Service definition.
    Service(Service),
    /// Enum definition.
    Enum(Enum),
    /// Regular field.
    NormalField(NormalField),
    /// Map field.
    MapField(MapField),
    /// Oneof block.
    #[serde(rename = "oneof")]
    OneOf(OneOf),
    /// Field within a oneof.
    #[serde(rename = "oneof_field")]
    OneOfField(OneOfField),
    /// Group field.
    Group(Group),
    /// Enum value.
    EnumField(EnumField),
    /// Standalone comment.
    Comment(Comment),
    /// Service method.
    Rpc(Rpc),
    /// Reserved ranges or names.
    Reserved(Reserved),
    /// Extension ranges.
    Extensions(Extensions),
}

macro_rules! node {
    ($($ty:ident => $variant:ident),* $(,)?) => {
        $(
            impl Annotated for $ty {
                fn meta(&self) -> &NodeMeta {
                    &self.meta
                }

                fn meta_mut(&mut self) -> &mut NodeMeta {
                    &mut self.meta
                }
            }

            impl From<$ty> for Declaration {
                fn from(node: $ty) -> Self {
                    Self::$variant(node)
                }
            }
        )*
    };
}

node! {
    Syntax => Syntax,
    Package => Package,
    OptionDecl => Option,
    Import => Import,
    Message => Message,
    Service => Service,
    Enum => Enum,
    NormalField => NormalField,
    MapField => MapField,
    OneOf => OneOf,
    OneOfField => OneOfField,
    Group => Group,
    EnumField => EnumField,
    Rpc => Rpc,
    Reserved => Reserved,
    Extensions => Extensions,
}

impl From<Comment> for Declaration {
    fn from(comment: Comment) -> Self {
        Self::Comment(comment)
    }
}
