//! Shared output formatting for format results.

use anyhow::Result;
use protofmt_core::FormatReport;
use serde::Serialize;

use super::format::FormattedFile;
use crate::OutputFormat;

#[derive(Serialize)]
struct JsonOutput<'a> {
    files: &'a [FormattedFile],
    files_formatted: usize,
    diagnostic_count: usize,
}

/// Print format results in the specified format.
pub fn print(files: &[FormattedFile], report: &FormatReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => print_text(files, report),
        OutputFormat::Json => return print_json(files, report),
        OutputFormat::Compact => print_compact(report),
    }
    Ok(())
}

fn print_text(files: &[FormattedFile], report: &FormatReport) {
    let headers = files.len() > 1;
    for (i, file) in files.iter().enumerate() {
        if headers {
            if i > 0 {
                println!();
            }
            println!("==> {} <==", file.path.display());
        }
        print!("{}", file.text);
    }

    for line in report.lines() {
        eprintln!("\x1b[31merror\x1b[0m: {line}");
    }

    let summary_color = if report.has_diagnostics() {
        "\x1b[31m"
    } else {
        "\x1b[32m"
    };
    eprintln!(
        "{}Found {} diagnostic(s) in {} file(s)\x1b[0m",
        summary_color,
        report.diagnostic_count(),
        report.files_formatted
    );
}

fn print_json(files: &[FormattedFile], report: &FormatReport) -> Result<()> {
    let output = JsonOutput {
        files,
        files_formatted: report.files_formatted,
        diagnostic_count: report.diagnostic_count(),
    };
    let json = serde_json::to_string_pretty(&output)?;
    println!("{json}");
    Ok(())
}

fn print_compact(report: &FormatReport) {
    for line in report.lines() {
        println!("{line}");
    }
}
