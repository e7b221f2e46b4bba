//! Init command implementation.

use anyhow::{bail, Result};
use protofmt_core::CONFIG_FILE_NAME;
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"# protofmt configuration
# The nearest protofmt.toml above an input file applies to it.

[format]
# Indentation: "Ns" for N spaces or "Nt" for N tabs (1 <= N <= 16)
indent = "2s"

# End option-less rpcs with ";" instead of "{}"
rpc_use_semicolons = false

# Omit the trailing newline at the end of each file
trim_newline = false
"#;

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    let config_path = Path::new(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(config_path, DEFAULT_CONFIG)?;

    println!("Created {CONFIG_FILE_NAME}");
    println!("\nNext steps:");
    println!("  1. Edit {CONFIG_FILE_NAME} to adjust formatting");
    println!("  2. Run: protofmt format");

    Ok(())
}
