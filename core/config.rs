use crate::error::{AppError, Result};
use crate::rules::RuleSet;
use crate::rules::defaults::default_rule_set;
use log;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_DIR: &str = ".dirlister";
pub const DEFAULT_CONFIG_FILENAME: &str = "ignore_settings.yml";
pub const DEFAULT_OUTPUT_FILENAME: &str = "directory_listing.txt";

/// On-disk shape of a rules file (YAML, or TOML when the file ends in `.toml`).
///
/// Every key may be missing or null.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct IgnoreConfig {
    #[serde(default)]
    pub ignore_dirs: Option<Vec<String>>,
    #[serde(default)]
    pub ignore_files: Option<Vec<String>>,
    #[serde(default)]
    pub ignore_extensions: Option<IgnoreExtensionsConfig>,
}

/// Extensions grouped by category. Categories beyond the built-in six are
/// accepted and treated the same way.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct IgnoreExtensionsConfig {
    #[serde(default)]
    pub images: Option<Vec<String>>,
    #[serde(default)]
    pub videos: Option<Vec<String>>,
    #[serde(default)]
    pub compressed: Option<Vec<String>>,
    #[serde(default)]
    pub binaries: Option<Vec<String>>,
    #[serde(default)]
    pub documents: Option<Vec<String>>,
    #[serde(default)]
    pub others: Option<Vec<String>>,
    #[serde(flatten)]
    pub custom: BTreeMap<String, Vec<String>>,
}

impl IgnoreExtensionsConfig {
    pub fn all_extensions(&self) -> Vec<String> {
        [
            &self.images,
            &self.videos,
            &self.compressed,
            &self.binaries,
            &self.documents,
            &self.others,
        ]
        .into_iter()
        .flatten()
        .flatten()
        .chain(self.custom.values().flatten())
        .cloned()
        .collect()
    }
}

impl IgnoreConfig {
    pub fn load_from_path(config_path: &Path) -> Result<Self> {
        log::info!("Loading ignore rules from: {}", config_path.display());
        let content = fs::read_to_string(config_path).map_err(|e| AppError::FileRead {
            path: config_path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content, config_path)
    }

    /// Parses `content` as TOML when `origin` ends in `.toml`, YAML otherwise.
    pub fn parse(content: &str, origin: &Path) -> Result<Self> {
        let is_toml = origin
            .extension()
            .is_some_and(|e| e.eq_ignore_ascii_case("toml"));
        if is_toml {
            toml::from_str::<IgnoreConfig>(content).map_err(|e| {
                AppError::TomlParse(format!(
                    "Error parsing rules file '{}': {}. Check TOML syntax and structure.",
                    origin.display(),
                    e
                ))
            })
        } else if content.trim().is_empty() {
            log::debug!("Rules file '{}' is empty", origin.display());
            Ok(Self::default())
        } else {
            serde_yml::from_str::<IgnoreConfig>(content).map_err(|e| {
                AppError::Config(format!(
                    "Error parsing rules file '{}': {}. Check YAML syntax and structure.",
                    origin.display(),
                    e
                ))
            })
        }
    }

    pub fn into_rule_set(self) -> Result<RuleSet> {
        let extensions = self
            .ignore_extensions
            .as_ref()
            .map(IgnoreExtensionsConfig::all_extensions)
            .unwrap_or_default();
        RuleSet::new(
            self.ignore_dirs.unwrap_or_default(),
            self.ignore_files.unwrap_or_default(),
            extensions,
        )
    }
}

/// Resolves the directory to scan: `~` expanded, canonicalized, and required
/// to be an existing directory. Defaults to the working directory.
pub fn determine_project_root(cli_project_root: Option<&PathBuf>) -> Result<PathBuf> {
    let path_to_resolve = match cli_project_root {
        Some(p) => PathBuf::from(shellexpand::tilde(&p.to_string_lossy()).as_ref()),
        None => env::current_dir().map_err(AppError::Io)?,
    };

    let resolved = path_to_resolve.canonicalize().map_err(|e| {
        AppError::Config(format!(
            "Failed to resolve project root '{}': {}",
            path_to_resolve.display(),
            e
        ))
    })?;

    if !resolved.is_dir() {
        return Err(AppError::Config(format!(
            "Project root '{}' is not a directory",
            resolved.display()
        )));
    }
    Ok(resolved)
}

/// Finds the rules file to load, if any.
///
/// An explicit value that looks like a path must exist as given; a bare name
/// is looked up in `<root>/.dirlister/` (with `.yml` appended when it has no
/// extension). Without an explicit value the default
/// `<root>/.dirlister/ignore_settings.yml` is used when present.
pub fn resolve_config_path(
    project_root: &Path,
    cli_rules_file: Option<&PathBuf>,
    cli_disable_rules_file: bool,
) -> Result<Option<PathBuf>> {
    if cli_disable_rules_file {
        log::debug!("Rules file loading disabled via CLI flag.");
        return Ok(None);
    }

    let Some(raw) = cli_rules_file else {
        let default_path = project_root
            .join(DEFAULT_CONFIG_DIR)
            .join(DEFAULT_CONFIG_FILENAME);
        if default_path.is_file() {
            log::debug!("Using default rules file: {}", default_path.display());
            return Ok(Some(default_path));
        }
        log::debug!(
            "No rules file specified and default not found at: {}",
            default_path.display()
        );
        return Ok(None);
    };

    let raw_str = raw.to_string_lossy();
    let path = PathBuf::from(shellexpand::tilde(&raw_str).as_ref());
    let looks_like_path =
        path.is_absolute() || path.components().count() > 1 || raw_str.contains(['/', '\\']);

    if looks_like_path {
        if !path.is_file() {
            return Err(AppError::Config(format!(
                "Specified rules file not found at path: {}",
                path.display()
            )));
        }
        log::debug!("Using specified rules file path: {}", path.display());
        return Ok(Some(path));
    }

    let mut filename = path.clone();
    if filename.extension().is_none() {
        filename.set_extension("yml");
    }
    let config_dir = project_root.join(DEFAULT_CONFIG_DIR);
    let full_path = config_dir.join(&filename);
    if !full_path.is_file() {
        return Err(AppError::Config(format!(
            "Specified rules file '{}' not found in default directory: {}",
            filename.display(),
            config_dir.display()
        )));
    }
    log::debug!(
        "Using specified rules filename in default directory: {}",
        full_path.display()
    );
    Ok(Some(full_path))
}

/// Loads the rules for a run from a resolved rules file, or the built-in
/// table when there is none.
pub fn load_rule_set(config_path: Option<&Path>) -> Result<RuleSet> {
    match config_path {
        Some(path) => IgnoreConfig::load_from_path(path)?.into_rule_set(),
        None => {
            log::debug!("Using built-in ignore rules.");
            Ok(default_rule_set())
        }
    }
}

/// Resolves the report destination. Relative paths are taken from the working
/// directory; the default is `directory_listing.txt` there.
pub fn resolve_output_path(cli_output: Option<&PathBuf>) -> Result<PathBuf> {
    let path = match cli_output {
        Some(p) => PathBuf::from(shellexpand::tilde(&p.to_string_lossy()).as_ref()),
        None => PathBuf::from(DEFAULT_OUTPUT_FILENAME),
    };
    if path.file_name().is_none() {
        return Err(AppError::InvalidArgument(format!(
            "Output path '{}' does not name a file",
            path.display()
        )));
    }
    if path.is_absolute() {
        Ok(path)
    } else {
        Ok(env::current_dir().map_err(AppError::Io)?.join(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const SAMPLE_YAML: &str = r#"
ignore_dirs:
  - .git
  - node_modules
ignore_files:
  - .env
ignore_extensions:
  images: [".PNG", jpg]
  videos:
  others: [".log"]
  fonts: [".woff2"]
"#;

    #[test]
    fn yaml_rules_file_becomes_rule_set() {
        let config = IgnoreConfig::parse(SAMPLE_YAML, Path::new("rules.yml")).unwrap();
        assert_eq!(config.ignore_files.as_deref(), Some(&[".env".to_string()][..]));
        let rules = config.into_rule_set().unwrap();
        assert!(rules.matches_dir_name("node_modules"));
        assert!(rules.matches_file_name(".env"));
        assert!(rules.matches_extension(".png"));
        assert!(rules.matches_extension(".jpg"));
        assert!(rules.matches_extension(".log"));
        assert!(rules.matches_extension(".woff2"));
    }

    #[test]
    fn toml_rules_file_uses_same_shape() {
        let toml_src = r#"
ignore_dirs = ["target"]

[ignore_extensions]
binaries = [".so"]
"#;
        let rules = IgnoreConfig::parse(toml_src, Path::new("rules.toml"))
            .unwrap()
            .into_rule_set()
            .unwrap();
        assert!(rules.matches_dir_name("target"));
        assert!(rules.matches_extension(".so"));
        assert!(rules.ignore_file_names().is_empty());
    }

    #[test]
    fn unknown_top_level_key_is_rejected() {
        let err = IgnoreConfig::parse("ignore_folders: [a]\n", Path::new("r.yml")).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn empty_rules_file_yields_empty_rules() {
        let rules = IgnoreConfig::parse("\n", Path::new("r.yml"))
            .unwrap()
            .into_rule_set()
            .unwrap();
        assert!(rules.ignore_dir_names().is_empty());
    }

    #[test]
    fn project_root_must_be_an_existing_directory() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("file.txt");
        fs::write(&file, "x").unwrap();

        let root = determine_project_root(Some(&dir.path().to_path_buf())).unwrap();
        assert!(root.is_absolute());

        let err = determine_project_root(Some(&file)).unwrap_err();
        assert!(err.is_configuration());
        let err = determine_project_root(Some(&dir.path().join("missing"))).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn default_rules_file_is_picked_up_when_present() {
        let dir = tempdir().unwrap();
        assert_eq!(resolve_config_path(dir.path(), None, false).unwrap(), None);

        let config_dir = dir.path().join(DEFAULT_CONFIG_DIR);
        fs::create_dir_all(&config_dir).unwrap();
        fs::write(config_dir.join(DEFAULT_CONFIG_FILENAME), "ignore_dirs: [vendor]\n").unwrap();

        let found = resolve_config_path(dir.path(), None, false).unwrap();
        assert_eq!(found, Some(config_dir.join(DEFAULT_CONFIG_FILENAME)));
        assert_eq!(resolve_config_path(dir.path(), None, true).unwrap(), None);

        let rules = load_rule_set(found.as_deref()).unwrap();
        assert!(rules.matches_dir_name("vendor"));
        assert!(!rules.matches_dir_name(".git"));
    }

    #[test]
    fn bare_rules_name_is_looked_up_in_config_dir() {
        let dir = tempdir().unwrap();
        let config_dir = dir.path().join(DEFAULT_CONFIG_DIR);
        fs::create_dir_all(&config_dir).unwrap();
        fs::write(config_dir.join("strict.yml"), "ignore_files: [README.md]\n").unwrap();

        let found = resolve_config_path(dir.path(), Some(&PathBuf::from("strict")), false).unwrap();
        assert_eq!(found, Some(config_dir.join("strict.yml")));

        let err = resolve_config_path(dir.path(), Some(&PathBuf::from("missing")), false)
            .unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn missing_explicit_rules_file_is_an_error() {
        let dir = tempdir().unwrap();
        let err = resolve_config_path(dir.path(), Some(&dir.path().join("nope.yml")), false)
            .unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn falls_back_to_builtin_rules() {
        let dir = tempdir().unwrap();
        let path = resolve_config_path(dir.path(), None, false).unwrap();
        let rules = load_rule_set(path.as_deref()).unwrap();
        assert!(rules.matches_dir_name(".git"));
    }

    #[test]
    fn output_path_is_made_absolute() {
        let out = resolve_output_path(None).unwrap();
        assert!(out.is_absolute());
        assert!(out.ends_with(DEFAULT_OUTPUT_FILENAME));
        let explicit = resolve_output_path(Some(&PathBuf::from("/tmp/x/report.txt"))).unwrap();
        assert_eq!(explicit, PathBuf::from("/tmp/x/report.txt"));
    }
}
