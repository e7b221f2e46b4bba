//! Format command implementation.

use anyhow::{bail, Context, Result};
use protofmt_core::{Diagnostic, Document, FormatReport, Formatter, WellKnownTypes};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use walkdir::WalkDir;

use crate::config_resolver::ConfigProvider;
use crate::OutputFormat;

/// Extension of serialized schema documents.
const INPUT_EXTENSION: &str = "json";

/// Formatted output of one input file.
#[derive(Debug, Serialize)]
pub struct FormattedFile {
    /// Input path.
    pub path: PathBuf,
    /// Canonical schema text.
    pub text: String,
    /// Diagnostics for this file.
    pub diagnostics: Vec<Diagnostic>,
}

/// Runs the format command.
pub fn run(paths: &[PathBuf], format: OutputFormat, explicit_config: Option<&Path>) -> Result<()> {
    let explicit_config = super::explicit_config(explicit_config)?;
    let inputs = collect_inputs(paths)?;
    if inputs.is_empty() {
        tracing::warn!("No *.{INPUT_EXTENSION} documents found");
    }

    let provider = ConfigProvider::new();
    let registry = Arc::new(WellKnownTypes::standard());
    let mut report = FormatReport::new();
    let mut files = Vec::with_capacity(inputs.len());

    for input in inputs {
        let document = load_document(&input)?;
        let config = provider
            .format_config_for(&input, explicit_config.as_deref())
            .with_context(|| format!("Failed to load config for {}", input.display()))?;
        let formatted = Formatter::new(config)
            .with_registry(Arc::clone(&registry))
            .format(&document);

        report.record(&input, formatted.diagnostics.clone());
        files.push(FormattedFile {
            path: input,
            text: formatted.text,
            diagnostics: formatted.diagnostics,
        });
    }

    tracing::info!(
        "Formatted {} file(s) with {} diagnostic(s)",
        report.files_formatted,
        report.diagnostic_count()
    );

    super::output::print(&files, &report, format)?;

    if report.has_diagnostics() {
        std::process::exit(1);
    }

    Ok(())
}

/// Expands the given paths into a sorted, duplicate-free list of absolute
/// document paths.
///
/// Directories are walked recursively for `*.json` files; files are taken
/// as given regardless of extension.
pub fn collect_inputs(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut inputs = Vec::new();

    for path in paths {
        let path = std::fs::canonicalize(path)
            .with_context(|| format!("No such file or directory: {}", path.display()))?;

        if path.is_file() {
            inputs.push(path);
            continue;
        }
        if !path.is_dir() {
            bail!("Not a file or directory: {}", path.display());
        }

        for entry in WalkDir::new(&path).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry: {e}");
                    continue;
                }
            };
            let is_document = entry.file_type().is_file()
                && entry.path().extension().is_some_and(|ext| ext == INPUT_EXTENSION);
            if is_document {
                inputs.push(entry.into_path());
            }
        }
    }

    inputs.sort();
    inputs.dedup();
    tracing::debug!("Collected {} input document(s)", inputs.len());
    Ok(inputs)
}

/// Reads a serialized schema document.
pub fn load_document(path: &Path) -> Result<Document> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse document {}", path.display()))
}
