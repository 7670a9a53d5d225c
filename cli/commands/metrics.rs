use crate::cli_args::MetricsArgs;
use crate::output::{print_metrics_pretty_table, print_structured};
use crate::prepare_run;
use anyhow::Result;
use byte_unit::{Byte, UnitType};
use dirlister_core::{AppError, FileBlock, FileBody, Report, render_blocks};
use log;
use serde::Serialize;
use tiktoken_rs::{CoreBPE, cl100k_base};

#[derive(Debug, Serialize)]
pub struct ProjectMetrics {
    pub total_files: usize,
    pub total_lines: usize,
    pub total_bytes: u64,
    pub total_bytes_readable: String,
    pub report_bytes: u64,
    pub report_bytes_readable: String,
    pub report_tokens: usize,
    pub files_details: Vec<FileMetrics>,
}

#[derive(Debug, Serialize)]
pub struct FileMetrics {
    pub path: String,
    pub lines: usize,
    /// Size of the decoded text as listed, not of the file on disk.
    pub bytes: usize,
    pub bytes_readable: String,
    pub estimated_tokens: usize,
}

pub fn handle_metrics_command(args: MetricsArgs, quiet: bool) -> Result<()> {
    let run = prepare_run(
        &args.project_config,
        &args.ignore_overrides,
        args.output.as_ref(),
    )?;
    let lister = &run.lister;

    log::debug!("Generating report for metrics...");
    let blocks = lister.content_serializer().blocks();
    let report = Report::new(lister.tree_renderer().render(), render_blocks(&blocks)).render();

    if blocks.is_empty() && !quiet && args.format_output.format.is_none() {
        println!("No files found to calculate metrics.");
        return Ok(());
    }

    let bpe = cl100k_base().map_err(|e| AppError::TikToken(e.to_string()))?;
    log::debug!("Calculating metrics...");
    let metrics = calculate_metrics(&bpe, &blocks, &report);
    log::debug!("Metrics calculation complete.");

    if args.format_output.format.is_none() {
        print_metrics_pretty_table(&metrics)
    } else {
        print_structured(&metrics, &args.format_output)
    }
}

fn readable(bytes: u64) -> String {
    Byte::from_u128(bytes as u128)
        .unwrap_or_default()
        .get_appropriate_unit(UnitType::Binary)
        .to_string()
}

fn calculate_metrics(bpe: &CoreBPE, blocks: &[FileBlock], report: &str) -> ProjectMetrics {
    let mut total_lines = 0;
    let mut total_bytes: u64 = 0;
    let mut files_details = Vec::new();

    for block in blocks {
        let FileBody::Text(lines) = &block.body else {
            log::debug!("Skipping unreadable entry in metrics: {}", block.relative_path);
            continue;
        };
        let text = lines.join("\n");
        let bytes = text.len();
        let tokens = bpe.encode_ordinary(&text).len();

        total_lines += block.line_count();
        total_bytes = total_bytes.saturating_add(bytes as u64);

        files_details.push(FileMetrics {
            path: block.relative_path.clone(),
            lines: block.line_count(),
            bytes,
            bytes_readable: readable(bytes as u64),
            estimated_tokens: tokens,
        });
    }

    let report_bytes = report.len() as u64;
    ProjectMetrics {
        total_files: files_details.len(),
        total_lines,
        total_bytes,
        total_bytes_readable: readable(total_bytes),
        report_bytes,
        report_bytes_readable: readable(report_bytes),
        report_tokens: bpe.encode_ordinary(report).len(),
        files_details,
    }
}
