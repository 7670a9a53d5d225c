use crate::error::{AppError, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use log;
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::Path;

pub mod defaults;
pub mod matcher;

const GLOB_META: &[char] = &['*', '?', '[', '{'];

/// Normalized ignore rules for one run.
///
/// Built once, then only read. Dir and file names are matched against single
/// path segments: literal names exactly (case-sensitive), names containing glob
/// metacharacters through a compiled [`GlobSet`]. Extensions are stored
/// lower-cased with their leading dot.
#[derive(Debug, Clone, Serialize)]
pub struct RuleSet {
    ignore_dir_names: BTreeSet<String>,
    ignore_file_names: BTreeSet<String>,
    ignore_extensions: BTreeSet<String>,
    #[serde(skip)]
    dir_globs: GlobSet,
    #[serde(skip)]
    file_globs: GlobSet,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            ignore_dir_names: BTreeSet::new(),
            ignore_file_names: BTreeSet::new(),
            ignore_extensions: BTreeSet::new(),
            dir_globs: GlobSet::empty(),
            file_globs: GlobSet::empty(),
        }
    }
}

impl RuleSet {
    pub fn new<D, F, E, S1, S2, S3>(dir_names: D, file_names: F, extensions: E) -> Result<Self>
    where
        D: IntoIterator<Item = S1>,
        F: IntoIterator<Item = S2>,
        E: IntoIterator<Item = S3>,
        S1: AsRef<str>,
        S2: AsRef<str>,
        S3: AsRef<str>,
    {
        let ignore_dir_names = normalize_names(dir_names, "directory")?;
        let ignore_file_names = normalize_names(file_names, "file")?;
        let ignore_extensions = normalize_extensions(extensions)?;
        let dir_globs = build_glob_set(&ignore_dir_names)?;
        let file_globs = build_glob_set(&ignore_file_names)?;
        log::debug!(
            "RuleSet built: {} dir names, {} file names, {} extensions",
            ignore_dir_names.len(),
            ignore_file_names.len(),
            ignore_extensions.len()
        );
        Ok(Self {
            ignore_dir_names,
            ignore_file_names,
            ignore_extensions,
            dir_globs,
            file_globs,
        })
    }

    /// Returns a new set with the given rules added on top of this one.
    pub fn extended<D, F, E, S1, S2, S3>(
        &self,
        dir_names: D,
        file_names: F,
        extensions: E,
    ) -> Result<Self>
    where
        D: IntoIterator<Item = S1>,
        F: IntoIterator<Item = S2>,
        E: IntoIterator<Item = S3>,
        S1: AsRef<str>,
        S2: AsRef<str>,
        S3: AsRef<str>,
    {
        let dirs: Vec<String> = self
            .ignore_dir_names
            .iter()
            .cloned()
            .chain(dir_names.into_iter().map(|s| s.as_ref().to_string()))
            .collect();
        let files: Vec<String> = self
            .ignore_file_names
            .iter()
            .cloned()
            .chain(file_names.into_iter().map(|s| s.as_ref().to_string()))
            .collect();
        let exts: Vec<String> = self
            .ignore_extensions
            .iter()
            .cloned()
            .chain(extensions.into_iter().map(|s| s.as_ref().to_string()))
            .collect();
        Self::new(dirs, files, exts)
    }

    /// Seals the set for a run writing its report to `output_path`: the
    /// report's own file name is ignored so a re-run never dumps its previous
    /// output.
    pub fn excluding_output(mut self, output_path: &Path) -> Self {
        if let Some(name) = output_path.file_name() {
            let name = name.to_string_lossy().into_owned();
            log::debug!("Ignoring report output file name: {}", name);
            self.ignore_file_names.insert(name);
        }
        self
    }

    pub fn ignore_dir_names(&self) -> &BTreeSet<String> {
        &self.ignore_dir_names
    }

    pub fn ignore_file_names(&self) -> &BTreeSet<String> {
        &self.ignore_file_names
    }

    pub fn ignore_extensions(&self) -> &BTreeSet<String> {
        &self.ignore_extensions
    }

    pub fn matches_dir_name(&self, segment: &str) -> bool {
        self.ignore_dir_names.contains(segment) || self.dir_globs.is_match(segment)
    }

    pub fn matches_file_name(&self, name: &str) -> bool {
        self.ignore_file_names.contains(name) || self.file_globs.is_match(name)
    }

    /// `extension` must already be lower-cased and dotted (e.g. `.png`).
    pub fn matches_extension(&self, extension: &str) -> bool {
        self.ignore_extensions.contains(extension)
    }
}

fn is_glob(name: &str) -> bool {
    name.contains(GLOB_META)
}

fn normalize_names<I, S>(names: I, kind: &str) -> Result<BTreeSet<String>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = BTreeSet::new();
    for raw in names {
        let name = raw.as_ref().trim();
        if name.is_empty() {
            log::warn!("Skipping blank {} name in ignore rules", kind);
            continue;
        }
        if name.contains(['/', '\\']) {
            return Err(AppError::Config(format!(
                "Ignored {} name '{}' must be a single path segment (no '/' or '\\')",
                kind, name
            )));
        }
        out.insert(name.to_string());
    }
    Ok(out)
}

fn normalize_extensions<I, S>(extensions: I) -> Result<BTreeSet<String>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = BTreeSet::new();
    for raw in extensions {
        let trimmed = raw.as_ref().trim();
        let bare = trimmed.strip_prefix('.').unwrap_or(trimmed);
        if bare.is_empty() {
            log::warn!("Skipping blank extension '{}' in ignore rules", trimmed);
            continue;
        }
        if bare.contains(['/', '\\']) {
            return Err(AppError::Config(format!(
                "Ignored extension '{}' must not contain path separators",
                trimmed
            )));
        }
        out.insert(format!(".{}", bare.to_lowercase()));
    }
    Ok(out)
}

fn build_glob_set(names: &BTreeSet<String>) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in names.iter().filter(|n| is_glob(n)) {
        match Glob::new(pattern) {
            Ok(glob) => {
                log::trace!("Adding glob ignore pattern: {}", pattern);
                builder.add(glob);
            }
            Err(e) => {
                log::error!("Invalid glob pattern \"{}\": {}", pattern, e);
                return Err(AppError::Glob(format!(
                    "Invalid glob pattern \"{}\": {}",
                    pattern, e
                )));
            }
        }
    }
    builder.build().map_err(AppError::from)
}
