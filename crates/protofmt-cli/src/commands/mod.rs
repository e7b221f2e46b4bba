//! Subcommand implementations.

pub mod config;
pub mod format;
pub mod init;
pub mod output;
pub mod wkt;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Makes a `--config` path absolute, failing if it does not exist.
pub fn explicit_config(path: Option<&Path>) -> Result<Option<PathBuf>> {
    path.map(|p| {
        std::fs::canonicalize(p)
            .with_context(|| format!("Config file not found: {}", p.display()))
    })
    .transpose()
}
