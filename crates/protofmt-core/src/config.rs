//! Configuration types for protofmt.
//!
//! [`Config`] mirrors the on-disk `protofmt.toml`; [`FormatConfig`] is the
//! validated form handed to the formatter, with the indent spec already
//! expanded into literal whitespace.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the configuration file searched for by resolvers.
pub const CONFIG_FILE_NAME: &str = "protofmt.toml";

/// Largest count accepted in an indent spec.
pub const MAX_INDENT_WIDTH: usize = 16;

/// Indent used when the config does not specify one.
pub const DEFAULT_INDENT: &str = "  ";

/// Top-level configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Formatting section.
    #[serde(default)]
    pub format: FormatSection,
}

/// `[format]` section as written on disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FormatSection {
    /// Indent spec, `Ns` or `Nt` with `1 <= N <= 16` (e.g. `"2s"`, `"1t"`).
    #[serde(default)]
    pub indent: Option<String>,

    /// Terminate option-less RPCs with `;` instead of `{}`.
    #[serde(default)]
    pub rpc_use_semicolons: bool,

    /// Do not end formatted files with a newline.
    #[serde(default)]
    pub trim_newline: bool,
}

impl Config {
    /// Creates a new default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid or has unknown fields.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })
    }

    /// Validates the configuration and expands it into a [`FormatConfig`].
    ///
    /// # Errors
    ///
    /// Returns an error if the indent spec is invalid.
    pub fn format_config(&self) -> Result<FormatConfig, ConfigError> {
        let indent = match self.format.indent.as_deref() {
            Some(spec) => expand_indent(spec)?,
            None => DEFAULT_INDENT.to_string(),
        };
        Ok(FormatConfig {
            indent,
            rpc_use_semicolons: self.format.rpc_use_semicolons,
            trim_newline: self.format.trim_newline,
        })
    }
}

/// Validated formatting configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatConfig {
    /// Literal whitespace for one indentation level.
    pub indent: String,
    /// Terminate option-less RPCs with `;` instead of `{}`.
    pub rpc_use_semicolons: bool,
    /// Do not end formatted files with a newline.
    pub trim_newline: bool,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            indent: DEFAULT_INDENT.to_string(),
            rpc_use_semicolons: false,
            trim_newline: false,
        }
    }
}

/// Expands an indent spec such as `"2s"` or `"1t"` into literal whitespace.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidIndent`] unless the spec is a count of at
/// least one and at most [`MAX_INDENT_WIDTH`], written in plain digits and
/// followed by `s` (spaces) or `t` (tabs).
pub fn expand_indent(spec: &str) -> Result<String, ConfigError> {
    let invalid = || ConfigError::InvalidIndent {
        spec: spec.to_string(),
    };
    let unit = match spec.chars().last() {
        Some('s') => " ",
        Some('t') => "\t",
        _ => return Err(invalid()),
    };
    let digits = &spec[..spec.len() - 1];
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    let count: usize = digits.parse().map_err(|_| invalid())?;
    if !(1..=MAX_INDENT_WIDTH).contains(&count) {
        return Err(invalid());
    }
    Ok(unit.repeat(count))
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Parse error in config file.
    #[error("Failed to parse config: {message}")]
    Parse {
        /// Parse error message.
        message: String,
    },

    /// Indent spec is not `Ns` or `Nt`.
    #[error("invalid indent spec, must be Ns or Nt where 1 <= N <= 16: {spec}")]
    InvalidIndent {
        /// Offending spec.
        spec: String,
    },

    /// A resolver was given a relative path.
    #[error("{path} is not an absolute path")]
    NotAbsolute {
        /// Offending path.
        path: PathBuf,
    },
}
