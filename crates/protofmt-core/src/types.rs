//! Core types for formatter diagnostics and results.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Source position of a declaration.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Position {
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed).
    pub column: usize,
}

impl Position {
    /// Creates a new position.
    #[must_use]
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A non-fatal structural anomaly found while formatting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Position of the offending declaration.
    pub position: Position,
    /// Human-readable message.
    pub message: String,
}

impl Diagnostic {
    /// Creates a new diagnostic.
    #[must_use]
    pub fn new(position: Position, message: impl Into<String>) -> Self {
        Self {
            position,
            message: message.into(),
        }
    }

    /// Formats the diagnostic as `path:line:column: message`.
    #[must_use]
    pub fn format_for(&self, path: &Path) -> String {
        format!("{}:{}: {}", path.display(), self.position, self.message)
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.position, self.message)
    }
}

/// Output of formatting one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Formatted {
    /// Canonical text.
    pub text: String,
    /// Diagnostics in the order they were recorded.
    pub diagnostics: Vec<Diagnostic>,
}

impl Formatted {
    /// Returns true if no diagnostics were recorded.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Diagnostics produced for a single input file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileReport {
    /// Path of the input file.
    pub path: PathBuf,
    /// Diagnostics for this file.
    pub diagnostics: Vec<Diagnostic>,
}

/// Result of formatting a set of files.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct FormatReport {
    /// Per-file diagnostics, only for files that produced any.
    pub files: Vec<FileReport>,
    /// Number of files formatted.
    pub files_formatted: usize,
}

impl FormatReport {
    /// Creates a new empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the diagnostics of one formatted file.
    pub fn record(&mut self, path: impl Into<PathBuf>, diagnostics: Vec<Diagnostic>) {
        self.files_formatted += 1;
        if !diagnostics.is_empty() {
            self.files.push(FileReport {
                path: path.into(),
                diagnostics,
            });
        }
    }

    /// Returns true if any file produced a diagnostic.
    #[must_use]
    pub fn has_diagnostics(&self) -> bool {
        self.files.iter().any(|f| !f.diagnostics.is_empty())
    }

    /// Total number of diagnostics across all files.
    #[must_use]
    pub fn diagnostic_count(&self) -> usize {
        self.files.iter().map(|f| f.diagnostics.len()).sum()
    }

    /// Renders every diagnostic as `path:line:column: message`, one per line.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.files
            .iter()
            .flat_map(|f| f.diagnostics.iter().map(|d| d.format_for(&f.path)))
            .collect()
    }
}
