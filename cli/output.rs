use anyhow::{Context, Result};
use colored::*;
use comfy_table::{Cell, CellAlignment, Color, ContentArrangement, Table, presets::UTF8_FULL};
use dirlister_core::AppError;
use serde::Serialize;
use std::io::{self, Write};
use std::path::Path;

use crate::cli_args::FormatOutputOpts;
use crate::commands::metrics::ProjectMetrics;

pub fn print_saved(path: &Path, quiet: bool) {
    if !quiet {
        println!(
            "{} Report saved to: {}",
            "✅".green(),
            path.display().to_string().blue()
        );
    }
}

/// Prints `data` in the requested structured format (JSON by default).
pub fn print_structured<T: Serialize>(data: &T, format_opts: &FormatOutputOpts) -> Result<()> {
    let format = format_opts.format.as_deref().unwrap_or("json");
    let content = serialize_output(data, format, !format_opts.minify)?;
    write_to_stdout(&content)
}

fn serialize_output<T: Serialize>(data: &T, format: &str, pretty_json: bool) -> Result<String> {
    let content = match format.to_lowercase().as_str() {
        "yaml" | "yml" => serde_yml::to_string(data).map_err(AppError::from)?,
        "toml" => toml::to_string_pretty(data).map_err(AppError::from)?,
        _ if pretty_json => serde_json::to_string_pretty(data).map_err(AppError::from)?,
        _ => serde_json::to_string(data).map_err(AppError::from)?,
    };
    Ok(content)
}

pub fn write_to_stdout(content: &str) -> Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    handle
        .write_all(content.as_bytes())
        .context("Failed to write to stdout")?;
    if !content.ends_with('\n') {
        handle
            .write_all(b"\n")
            .context("Failed to write newline to stdout")?;
    }
    handle.flush().context("Failed to flush stdout")?;
    Ok(())
}

pub fn print_metrics_pretty_table(metrics: &ProjectMetrics) -> Result<()> {
    println!();
    println!("{}", " Listing Metrics Summary ".green().bold().underline());
    println!(
        "{:<20} {}",
        "Total Files:".green(),
        metrics.total_files.to_string().cyan()
    );
    println!(
        "{:<20} {}",
        "Total Lines:".green(),
        metrics.total_lines.to_string().cyan()
    );
    println!(
        "{:<20} {}",
        "Total Size:".green(),
        metrics.total_bytes_readable.cyan()
    );
    println!(
        "{:<20} {}",
        "Report Size:".green(),
        metrics.report_bytes_readable.cyan()
    );
    println!(
        "{:<20} {}",
        "Est. Tokens:".green(),
        metrics.report_tokens.to_string().cyan()
    );

    if metrics.files_details.is_empty() {
        println!("\n{}", "(No files included in the listing)".yellow());
    } else {
        println!("\n{}", " File Details ".green().bold().underline());
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec![
            Cell::new("Path").fg(Color::Green),
            Cell::new("Lines").fg(Color::Green),
            Cell::new("Size").fg(Color::Green),
            Cell::new("Tokens").fg(Color::Green),
        ]);
        for file in &metrics.files_details {
            table.add_row(vec![
                Cell::new(&file.path).fg(Color::Cyan),
                Cell::new(file.lines).set_alignment(CellAlignment::Right),
                Cell::new(&file.bytes_readable)
                    .set_alignment(CellAlignment::Right)
                    .fg(Color::DarkGrey),
                Cell::new(file.estimated_tokens).set_alignment(CellAlignment::Right),
            ]);
        }
        println!("{table}");
    }
    println!();
    Ok(())
}
