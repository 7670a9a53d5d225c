use crate::content::ContentSerializer;
use crate::error::{AppError, Result};
use crate::report::{Report, ReportWriter};
use crate::rules::RuleSet;
use crate::tree::TreeRenderer;
use log;
use std::path::{Path, PathBuf};

/// One listing run: a validated root, a destination, and the sealed rules.
#[derive(Debug, Clone)]
pub struct DirectoryLister {
    root: PathBuf,
    destination: PathBuf,
    rules: RuleSet,
}

impl DirectoryLister {
    /// Fails with [`AppError::Config`] when `root` is not an existing
    /// directory. The root is stored canonicalized, so `.` renders as the
    /// directory's real name. The destination's file name is added to the
    /// ignored files.
    pub fn new(root: &Path, destination: &Path, rules: RuleSet) -> Result<Self> {
        let canonical = root.canonicalize().map_err(|e| {
            AppError::Config(format!(
                "Target directory '{}' could not be resolved: {}",
                root.display(),
                e
            ))
        })?;
        if !canonical.is_dir() {
            return Err(AppError::Config(format!(
                "Target path '{}' is not a directory",
                canonical.display()
            )));
        }
        log::debug!("Listing root resolved to {}", canonical.display());
        Ok(Self {
            root: canonical,
            destination: destination.to_path_buf(),
            rules: rules.excluding_output(destination),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn tree_renderer(&self) -> TreeRenderer<'_> {
        TreeRenderer::new(&self.root, &self.rules)
    }

    pub fn content_serializer(&self) -> ContentSerializer<'_> {
        ContentSerializer::new(&self.root, &self.rules)
    }

    /// Renders both halves without touching the destination.
    pub fn generate(&self) -> Report {
        log::info!("Generating listing for {}", self.root.display());
        let tree_text = self.tree_renderer().render();
        let content_text = self.content_serializer().serialize();
        Report::new(tree_text, content_text)
    }

    /// Renders and writes the report.
    pub fn run(&self) -> Result<Report> {
        let report = self.generate();
        ReportWriter::write_report(&self.destination, &report)?;
        Ok(report)
    }
}
