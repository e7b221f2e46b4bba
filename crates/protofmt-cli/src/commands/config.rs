//! Config command implementation.

use anyhow::{Context, Result};
use protofmt_core::{Config, FormatConfig, FormatSection};
use std::path::Path;

use crate::config_resolver::ConfigProvider;

/// Runs the config command.
pub fn run(dir: &Path, explicit_config: Option<&Path>) -> Result<()> {
    let dir = std::fs::canonicalize(dir)
        .with_context(|| format!("No such directory: {}", dir.display()))?;

    let explicit_config = super::explicit_config(explicit_config)?;

    let provider = ConfigProvider::new();
    let source = provider.resolve(&dir, explicit_config.as_deref())?;
    let config = provider
        .config_for_source(&source)
        .with_context(|| format!("Failed to load config: {source}"))?;

    println!("# Source: {source}");
    print!("{}", render(&config)?);
    Ok(())
}

/// Renders a validated configuration back into `protofmt.toml` form.
fn render(config: &FormatConfig) -> Result<String> {
    let on_disk = Config {
        format: FormatSection {
            indent: Some(indent_spec(&config.indent)),
            rpc_use_semicolons: config.rpc_use_semicolons,
            trim_newline: config.trim_newline,
        },
    };
    Ok(toml::to_string(&on_disk)?)
}

/// Inverse of `expand_indent`.
fn indent_spec(indent: &str) -> String {
    let unit = if indent.starts_with('\t') { 't' } else { 's' };
    format!("{}{unit}", indent.chars().count())
}

#[cfg(test)]
mod tests {
    use super::*;
    use protofmt_core::expand_indent;

    #[test]
    fn indent_spec_inverts_expansion() {
        for spec in ["1s", "2s", "4s", "1t", "3t"] {
            assert_eq!(indent_spec(&expand_indent(spec).unwrap()), spec);
        }
    }

    #[test]
    fn rendered_config_parses_back() {
        let config = FormatConfig {
            indent: "\t".to_string(),
            rpc_use_semicolons: true,
            trim_newline: false,
        };
        let rendered = render(&config).unwrap();
        assert!(rendered.starts_with("[format]\n"));
        let parsed = Config::parse(&rendered).unwrap().format_config().unwrap();
        assert_eq!(parsed, config);
    }
}
