use crate::error::{AppError, Result};
use log;
use std::fs;
use std::path::Path;

pub const STRUCTURE_HEADER: &str = "--- Directory Structure ---";
pub const CONTENTS_HEADER: &str = "--- File Contents ---";

/// The two rendered halves of a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub tree_text: String,
    pub content_text: String,
}

impl Report {
    pub fn new(tree_text: String, content_text: String) -> Self {
        Self {
            tree_text,
            content_text,
        }
    }

    /// The exact bytes [`ReportWriter`] puts on disk.
    pub fn render(&self) -> String {
        compose(&self.tree_text, &self.content_text)
    }
}

fn compose(tree_text: &str, content_text: &str) -> String {
    let mut out = String::with_capacity(
        STRUCTURE_HEADER.len() + CONTENTS_HEADER.len() + tree_text.len() + content_text.len() + 3,
    );
    out.push_str(STRUCTURE_HEADER);
    out.push('\n');
    out.push_str(tree_text);
    out.push('\n');
    out.push_str(CONTENTS_HEADER);
    out.push('\n');
    out.push_str(content_text);
    out
}

pub struct ReportWriter;

impl ReportWriter {
    /// Writes the report to `destination`, creating missing parent
    /// directories and replacing any existing file.
    pub fn write(destination: &Path, tree_text: &str, content_text: &str) -> Result<()> {
        if let Some(parent) = destination.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| AppError::DirCreation {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        fs::write(destination, compose(tree_text, content_text)).map_err(|e| {
            AppError::FileWrite {
                path: destination.to_path_buf(),
                source: e,
            }
        })?;
        log::info!("Report written to {}", destination.display());
        Ok(())
    }

    pub fn write_report(destination: &Path, report: &Report) -> Result<()> {
        Self::write(destination, &report.tree_text, &report.content_text)
    }
}
