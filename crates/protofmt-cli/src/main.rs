//! protofmt CLI tool.
//!
//! Usage:
//! ```bash
//! protofmt format [OPTIONS] [PATHS]...
//! protofmt config [DIR]
//! protofmt wkt
//! protofmt init
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config_resolver;

/// Deterministic formatter for protocol buffer schema files
#[derive(Parser)]
#[command(name = "protofmt")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Format parsed schema documents (JSON AST files or directories of them)
    Format {
        /// Files or directories to format (default: current directory)
        #[arg(default_value = ".")]
        paths: Vec<PathBuf>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        output: OutputFormat,
    },

    /// Show the configuration that applies to a directory
    Config {
        /// Directory to resolve from (default: current directory)
        #[arg(default_value = ".")]
        dir: PathBuf,
    },

    /// List the well-known types imports are grouped by
    Wkt,

    /// Initialize configuration file
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,
    },
}

/// Output format for formatting results.
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Formatted text, diagnostics on stderr.
    #[default]
    Text,
    /// JSON output.
    Json,
    /// One-line-per-diagnostic compact format.
    Compact,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Format { paths, output } => {
            commands::format::run(&paths, output, cli.config.as_deref())
        }
        Commands::Config { dir } => commands::config::run(&dir, cli.config.as_deref()),
        Commands::Wkt => {
            commands::wkt::run();
            Ok(())
        }
        Commands::Init { force } => commands::init::run(force),
    }
}
