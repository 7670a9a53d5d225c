use crate::error::{NodeAccessError, NodeOperation};
use crate::rules::matcher::IgnoreMatcher;
use log;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// One filesystem node seen during a walk.
///
/// `is_dir` is the node's own type. Symbolic links are never followed, so a
/// link to a directory is a leaf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub absolute_path: PathBuf,
    pub relative_path: PathBuf,
    pub name: String,
    pub is_dir: bool,
}

impl Entry {
    fn new(absolute_path: PathBuf, root: &Path, is_dir: bool) -> Self {
        let relative_path = relative_to(&absolute_path, root);
        let name = absolute_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| absolute_path.display().to_string());
        Self {
            absolute_path,
            relative_path,
            name,
            is_dir,
        }
    }

    /// Relative path with `/` separators on every platform.
    pub fn slash_path(&self) -> String {
        to_slash(&self.relative_path)
    }
}

/// Files kept by [`gather_files`], plus the directories that could not be
/// listed along the way.
#[derive(Debug, Default)]
pub struct GatheredFiles {
    pub files: Vec<Entry>,
    pub failures: Vec<NodeAccessError>,
}

/// Lists the direct children of `dir`, unfiltered and unsorted.
///
/// Any failure, opening the directory or reading one of its entries, fails
/// the whole listing.
pub fn list_children(dir: &Path, root: &Path) -> Result<Vec<Entry>, NodeAccessError> {
    let list_err = |e: io::Error| NodeAccessError::new(dir, NodeOperation::List, e);
    let mut children = Vec::new();
    for dir_entry in fs::read_dir(dir).map_err(list_err)? {
        let dir_entry = dir_entry.map_err(list_err)?;
        let file_type = dir_entry.file_type().map_err(list_err)?;
        children.push(Entry::new(dir_entry.path(), root, file_type.is_dir()));
    }
    log::trace!("Listed {} entries in {}", children.len(), dir.display());
    Ok(children)
}

/// Recursively collects every non-ignored file below `root`.
///
/// Ignored directories are pruned before they are read. Order is whatever
/// the filesystem yields; callers sort.
pub fn gather_files(root: &Path, matcher: &IgnoreMatcher<'_>) -> GatheredFiles {
    log::info!("Walking directory: {}", root.display());
    let mut gathered = GatheredFiles::default();

    let walker = WalkDir::new(root)
        .min_depth(1)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| {
            let relative = relative_to(e.path(), root);
            !matcher.should_ignore(&relative, e.file_type().is_dir())
        });

    for item in walker {
        match item {
            Ok(entry) => {
                if entry.file_type().is_dir() {
                    continue;
                }
                log::trace!("Keeping file: {}", entry.path().display());
                gathered
                    .files
                    .push(Entry::new(entry.into_path(), root, false));
            }
            Err(e) => {
                let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| root.to_path_buf());
                let message = e.to_string();
                let source = e.into_io_error().unwrap_or_else(|| io::Error::other(message));
                let failure = NodeAccessError::new(path, NodeOperation::List, source);
                log::warn!("{}", failure);
                gathered.failures.push(failure);
            }
        }
    }

    log::info!(
        "Walk complete: {} files kept, {} directories unreadable",
        gathered.files.len(),
        gathered.failures.len()
    );
    gathered
}

/// Path of `path` relative to `root`; `path` itself when it is not below `root`.
pub fn relative_to(path: &Path, root: &Path) -> PathBuf {
    match path.strip_prefix(root) {
        Ok(rel) => rel.to_path_buf(),
        Err(_) => pathdiff::diff_paths(path, root).unwrap_or_else(|| path.to_path_buf()),
    }
}

pub fn to_slash(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::RuleSet;
    use tempfile::tempdir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "x\n").unwrap();
    }

    #[test]
    fn lists_direct_children_only() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "a.txt");
        touch(dir.path(), "sub/b.txt");

        let mut children = list_children(dir.path(), dir.path()).unwrap();
        children.sort_by(|a, b| a.name.cmp(&b.name));
        assert_eq!(children.len(), 2);
        assert_eq!(children[0].name, "a.txt");
        assert!(!children[0].is_dir);
        assert_eq!(children[1].name, "sub");
        assert!(children[1].is_dir);
        assert_eq!(children[1].relative_path, PathBuf::from("sub"));
    }

    #[test]
    fn listing_a_missing_directory_is_a_node_error() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("gone");
        let err = list_children(&missing, dir.path()).unwrap_err();
        assert_eq!(err.operation, NodeOperation::List);
        assert_eq!(err.node_name(), "gone");
    }

    #[test]
    fn gathers_files_and_prunes_ignored_directories() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "README.md");
        touch(dir.path(), "src/main.rs");
        touch(dir.path(), ".git/config");
        touch(dir.path(), "src/build/out.rs");
        touch(dir.path(), "logo.png");

        let rules = RuleSet::new([".git", "build"], Vec::<&str>::new(), [".png"]).unwrap();
        let gathered = gather_files(dir.path(), &IgnoreMatcher::new(&rules));
        let mut paths: Vec<String> = gathered.files.iter().map(Entry::slash_path).collect();
        paths.sort();
        assert_eq!(paths, vec!["README.md", "src/main.rs"]);
        assert!(gathered.failures.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_directories_are_not_followed() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "real/file.txt");
        std::os::unix::fs::symlink(dir.path().join("real"), dir.path().join("link")).unwrap();

        let rules = RuleSet::default();
        let gathered = gather_files(dir.path(), &IgnoreMatcher::new(&rules));
        let mut paths: Vec<String> = gathered.files.iter().map(Entry::slash_path).collect();
        paths.sort();
        assert_eq!(paths, vec!["link", "real/file.txt"]);

        let link = list_children(dir.path(), dir.path())
            .unwrap()
            .into_iter()
            .find(|e| e.name == "link")
            .unwrap();
        assert!(!link.is_dir);
    }

    #[test]
    fn slash_paths_use_forward_slashes() {
        let rel: PathBuf = ["a", "b", "c.txt"].iter().collect();
        assert_eq!(to_slash(&rel), "a/b/c.txt");
        assert_eq!(relative_to(Path::new("/x/y/z"), Path::new("/x")), PathBuf::from("y/z"));
    }
}
