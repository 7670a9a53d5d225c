use crate::error::{NodeAccessError, NodeOperation};
use crate::gather::{Entry, GatheredFiles, gather_files, relative_to, to_slash};
use crate::rules::RuleSet;
use crate::rules::matcher::IgnoreMatcher;
use crate::sorter::Sorter;
use log;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

pub const SEPARATOR_WIDTH: usize = 80;
pub const EMPTY_FILE_MARKER: &str = "[empty file]";
pub const NO_FILES_MESSAGE: &str = "[no files to process were found in the target directory]";

#[derive(Debug)]
pub enum FileBody {
    Text(Vec<String>),
    Failed(NodeAccessError),
}

/// One section of the content dump.
#[derive(Debug)]
pub struct FileBlock {
    /// Forward-slash path relative to the root; directories carry a
    /// trailing `/`.
    pub relative_path: String,
    pub body: FileBody,
}

impl FileBlock {
    /// Reads `entry` and captures either its lines or the read failure.
    pub fn read(entry: &Entry) -> Self {
        let body = match fs::read(&entry.absolute_path) {
            Ok(bytes) => FileBody::Text(
                String::from_utf8_lossy(&bytes)
                    .lines()
                    .map(str::to_owned)
                    .collect(),
            ),
            Err(e) => {
                let err = NodeAccessError::new(&entry.absolute_path, NodeOperation::Read, e);
                log::warn!("{}", err);
                FileBody::Failed(err)
            }
        };
        Self {
            relative_path: entry.slash_path(),
            body,
        }
    }

    pub fn unlisted_dir(err: NodeAccessError, root: &Path) -> Self {
        let relative = to_slash(&relative_to(&err.path, root));
        let relative_path = if relative.is_empty() {
            "./".to_string()
        } else {
            format!("{relative}/")
        };
        Self {
            relative_path,
            body: FileBody::Failed(err),
        }
    }

    pub fn line_count(&self) -> usize {
        match &self.body {
            FileBody::Text(lines) => lines.len(),
            FileBody::Failed(_) => 0,
        }
    }

    pub fn render_into(&self, out: &mut String) {
        let separator = "-".repeat(SEPARATOR_WIDTH);
        out.push('\n');
        let _ = writeln!(out, "/{}:", self.relative_path);
        out.push_str(&separator);
        out.push('\n');
        match &self.body {
            FileBody::Text(lines) if lines.is_empty() => {
                out.push_str(EMPTY_FILE_MARKER);
                out.push('\n');
            }
            FileBody::Text(lines) => {
                let width = lines.len().to_string().len();
                for (index, line) in lines.iter().enumerate() {
                    let _ = writeln!(out, "{:>width$} | {}", index + 1, line, width = width);
                }
            }
            FileBody::Failed(err) => {
                let _ = writeln!(
                    out,
                    "[error] could not {} '{}': {}",
                    err.operation,
                    err.node_name(),
                    err.reason()
                );
            }
        }
        out.push_str(&separator);
        out.push('\n');
    }
}

/// Produces the line-numbered dump of every retained file below a root.
pub struct ContentSerializer<'a> {
    root: &'a Path,
    matcher: IgnoreMatcher<'a>,
}

impl<'a> ContentSerializer<'a> {
    pub fn new(root: &'a Path, rules: &'a RuleSet) -> Self {
        Self {
            root,
            matcher: IgnoreMatcher::new(rules),
        }
    }

    /// Kept files in flat order plus the directories that could not be
    /// listed. Nothing is read.
    pub fn collect(&self) -> GatheredFiles {
        let mut gathered = gather_files(self.root, &self.matcher);
        gathered
            .files
            .sort_by(|a, b| Sorter::compare_paths(&a.slash_path(), &b.slash_path()));
        gathered
    }

    /// All blocks in flat order. Files are read one at a time.
    pub fn blocks(&self) -> Vec<FileBlock> {
        let gathered = self.collect();
        let mut blocks: Vec<FileBlock> = gathered
            .failures
            .into_iter()
            .map(|err| FileBlock::unlisted_dir(err, self.root))
            .collect();
        blocks.extend(gathered.files.iter().map(FileBlock::read));
        Sorter::sort_flat(&mut blocks, |b| b.relative_path.as_str());
        log::debug!("Serialized {} blocks", blocks.len());
        blocks
    }

    pub fn serialize(&self) -> String {
        let blocks = self.blocks();
        if blocks.is_empty() {
            log::info!("No files to serialize below {}", self.root.display());
        }
        render_blocks(&blocks)
    }
}

/// Content text for already-built blocks; the no-files line when empty.
pub fn render_blocks(blocks: &[FileBlock]) -> String {
    if blocks.is_empty() {
        return format!("\n{NO_FILES_MESSAGE}\n");
    }
    let mut out = String::new();
    for block in blocks {
        block.render_into(&mut out);
    }
    out
}

/// Convenience wrapper over [`ContentSerializer::serialize`].
pub fn serialize_contents(root: &Path, rules: &RuleSet) -> String {
    ContentSerializer::new(root, rules).serialize()
}
