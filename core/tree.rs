use crate::error::NodeAccessError;
use crate::gather::list_children;
use crate::rules::RuleSet;
use crate::rules::matcher::IgnoreMatcher;
use crate::sorter::Sorter;
use log;
use std::fmt;
use std::path::Path;

const BRANCH: &str = "├── ";
const LAST_BRANCH: &str = "└── ";
const PIPE: &str = "│   ";
const SPACE: &str = "    ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeLabel {
    Root(String),
    Entry(String),
    Error { reason: String, name: String },
}

/// A single rendered row of the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeLine {
    pub depth: usize,
    pub prefix: String,
    pub is_last: bool,
    pub label: TreeLabel,
}

impl TreeLine {
    fn connector(&self) -> &'static str {
        if self.is_last { LAST_BRANCH } else { BRANCH }
    }
}

impl fmt::Display for TreeLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.label {
            TreeLabel::Root(name) => f.write_str(name),
            TreeLabel::Entry(name) => write!(f, "{}{}{}", self.prefix, self.connector(), name),
            TreeLabel::Error { reason, name } => write!(
                f,
                "{}{}[error: {} ({})]",
                self.prefix,
                self.connector(),
                reason,
                name
            ),
        }
    }
}

/// Renders the retained hierarchy below a root as an ASCII tree.
pub struct TreeRenderer<'a> {
    root: &'a Path,
    matcher: IgnoreMatcher<'a>,
}

impl<'a> TreeRenderer<'a> {
    pub fn new(root: &'a Path, rules: &'a RuleSet) -> Self {
        Self {
            root,
            matcher: IgnoreMatcher::new(rules),
        }
    }

    pub fn lines(&self) -> Vec<TreeLine> {
        log::debug!("Rendering tree for {}", self.root.display());
        let root_name = self
            .root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.root.display().to_string());
        let mut lines = vec![TreeLine {
            depth: 0,
            prefix: String::new(),
            is_last: true,
            label: TreeLabel::Root(root_name),
        }];
        self.walk(self.root, "", "", true, 1, &mut lines);
        lines
    }

    /// The tree as text, one `\n`-terminated line per row.
    pub fn render(&self) -> String {
        self.lines().iter().map(|l| format!("{l}\n")).collect()
    }

    /// `prefix` is the children's prefix. `own_prefix` and `own_is_last`
    /// place the error line where the directory's own row sits.
    fn walk(
        &self,
        dir: &Path,
        prefix: &str,
        own_prefix: &str,
        own_is_last: bool,
        depth: usize,
        lines: &mut Vec<TreeLine>,
    ) {
        let mut children = match list_children(dir, self.root) {
            Ok(children) => children,
            Err(err) => {
                lines.push(error_line(&err, own_prefix, own_is_last, depth));
                return;
            }
        };
        children.retain(|c| !self.matcher.should_ignore(&c.relative_path, c.is_dir));
        Sorter::sort_siblings(&mut children);

        let count = children.len();
        for (index, child) in children.into_iter().enumerate() {
            let is_last = index + 1 == count;
            lines.push(TreeLine {
                depth,
                prefix: prefix.to_string(),
                is_last,
                label: TreeLabel::Entry(child.name.clone()),
            });
            if child.is_dir {
                let extension = if is_last { SPACE } else { PIPE };
                let child_prefix = format!("{prefix}{extension}");
                self.walk(
                    &child.absolute_path,
                    &child_prefix,
                    prefix,
                    is_last,
                    depth + 1,
                    lines,
                );
            }
        }
    }
}

fn error_line(err: &NodeAccessError, prefix: &str, is_last: bool, depth: usize) -> TreeLine {
    log::warn!("{}", err);
    TreeLine {
        depth,
        prefix: prefix.to_string(),
        is_last,
        label: TreeLabel::Error {
            reason: err.reason(),
            name: err.node_name(),
        },
    }
}

/// Deepest level among `lines`; 0 when only the root row is present.
pub fn max_depth(lines: &[TreeLine]) -> usize {
    lines.iter().map(|l| l.depth).max().unwrap_or(0)
}

/// Convenience wrapper over [`TreeRenderer::render`].
pub fn render_tree(root: &Path, rules: &RuleSet) -> String {
    TreeRenderer::new(root, rules).render()
}
