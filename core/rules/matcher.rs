// rules/matcher.rs
use crate::rules::RuleSet;
use log;
use std::borrow::Cow;
use std::path::{Component, Path};

/// Decides whether a path relative to the scan root is excluded.
///
/// Any single match excludes: an ancestor directory segment (or the entry's
/// own name when it is a directory) hitting a dir rule, the base name hitting
/// a file rule, or the lower-cased extension hitting an extension rule.
#[derive(Debug, Clone, Copy)]
pub struct IgnoreMatcher<'a> {
    rules: &'a RuleSet,
}

impl<'a> IgnoreMatcher<'a> {
    pub fn new(rules: &'a RuleSet) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &'a RuleSet {
        self.rules
    }

    pub fn should_ignore(&self, relative_path: &Path, is_dir: bool) -> bool {
        let segments: Vec<Cow<'_, str>> = relative_path
            .components()
            .filter_map(|c| match c {
                Component::Normal(s) => Some(s.to_string_lossy()),
                _ => None,
            })
            .collect();

        let Some((name, ancestors)) = segments.split_last() else {
            return false;
        };

        if let Some(dir) = ancestors.iter().find(|s| self.rules.matches_dir_name(s)) {
            log::trace!(
                "Ignoring {} (inside ignored directory '{}')",
                relative_path.display(),
                dir
            );
            return true;
        }
        if is_dir && self.rules.matches_dir_name(name) {
            log::trace!("Ignoring directory {}", relative_path.display());
            return true;
        }
        if self.rules.matches_file_name(name) {
            log::trace!("Ignoring {} (file name rule)", relative_path.display());
            return true;
        }
        if let Some(ext) = dotted_extension(relative_path) {
            if self.rules.matches_extension(&ext) {
                log::trace!("Ignoring {} (extension {})", relative_path.display(), ext);
                return true;
            }
        }
        false
    }
}

/// `a/B.PNG` -> `.png`; dotfiles such as `.env` have no extension.
pub fn dotted_extension(path: &Path) -> Option<String> {
    let ext = path.extension()?.to_string_lossy();
    if ext.is_empty() {
        None
    } else {
        Some(format!(".{}", ext.to_lowercase()))
    }
}
