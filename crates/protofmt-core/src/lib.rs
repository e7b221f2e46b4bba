//! # protofmt-core
//!
//! Deterministic formatter for protocol buffer schema files.
//!
//! This crate takes an already-parsed schema [`Document`] and re-emits it as
//! canonical text. It includes:
//!
//! - [`Visitor`] for per-declaration-kind dispatch with no-op defaults
//! - [`Renderer`] with the line, comment and option primitives every pass uses
//! - [`HeaderPass`] for syntax, imports, package and file options
//! - [`BodyPass`] for messages, enums, services and their nested scopes
//! - [`Formatter`] for running the passes over one document
//! - [`Diagnostic`] for non-fatal findings such as a duplicate `syntax`
//!
//! ## Example
//!
//! ```ignore
//! use protofmt_core::{Config, Formatter};
//!
//! let config = Config::from_file(path)?.format_config()?;
//! let formatted = Formatter::new(config).format(&document);
//! for diagnostic in &formatted.diagnostics {
//!     eprintln!("{}", diagnostic.format_for(path));
//! }
//! print!("{}", formatted.text);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod ast;
mod body;
mod config;
mod formatter;
mod header;
mod renderer;
mod state;
mod types;
mod visitor;
mod wkt;

pub use ast::{
    AggregateEntry, Annotated, Comment, Declaration, Document, Enum, EnumField, Extensions,
    FieldLabel, Group, Import, ImportKind, MapField, Message, NodeMeta, NormalField, OneOf,
    OneOfField, OptionDecl, OptionValue, Package, Range, RangeEnd, Reserved, Rpc, RpcType,
    Service, Syntax,
};
pub use body::BodyPass;
pub use config::{
    expand_indent, Config, ConfigError, FormatConfig, FormatSection, CONFIG_FILE_NAME,
    DEFAULT_INDENT, MAX_INDENT_WIDTH,
};
pub use formatter::Formatter;
pub use header::{HeaderPass, DUPLICATE_PACKAGE, DUPLICATE_SYNTAX};
pub use renderer::{compact_value, Renderer};
pub use state::HeaderState;
pub use types::{Diagnostic, FileReport, FormatReport, Formatted, Position};
pub use visitor::{walk_declarations, Visitor};
pub use wkt::{WellKnownType, WellKnownTypes};
