// rules/defaults.rs
use crate::config::IgnoreConfig;
use crate::rules::RuleSet;
use once_cell::sync::Lazy;

/// The built-in ignore table, as shipped in `data/default_ignores.yaml`.
pub const DEFAULT_RULES_YAML: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../data/default_ignores.yaml"
));

static DEFAULT_RULE_SET: Lazy<RuleSet> = Lazy::new(|| {
    let config: IgnoreConfig = serde_yml::from_str(DEFAULT_RULES_YAML)
        .expect("Failed to parse embedded data/default_ignores.yaml");
    config
        .into_rule_set()
        .expect("Embedded data/default_ignores.yaml holds invalid rules")
});

/// Fallback rules used when no rules file is configured. Parsed once per
/// process; every caller gets its own copy to seal and pass down.
pub fn default_rule_set() -> RuleSet {
    DEFAULT_RULE_SET.clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_covers_vcs_build_and_media() {
        let rules = default_rule_set();
        for dir in [".git", "__pycache__", "node_modules", ".venv", "build", "dist"] {
            assert!(rules.matches_dir_name(dir), "{dir} should be ignored");
        }
        assert!(rules.matches_dir_name("dirlister.egg-info"));
        assert!(rules.matches_file_name(".DS_Store"));
        assert!(rules.matches_file_name(".env"));
        for ext in [".png", ".mp4", ".zip", ".pyc", ".pdf", ".lock", ".log"] {
            assert!(rules.matches_extension(ext), "{ext} should be ignored");
        }
        assert!(!rules.matches_extension(".rs"));
        assert!(!rules.matches_dir_name("src"));
    }

    #[test]
    fn callers_get_independent_copies() {
        let sealed = default_rule_set().excluding_output(std::path::Path::new("listing.txt"));
        assert!(sealed.matches_file_name("listing.txt"));
        assert!(!default_rule_set().matches_file_name("listing.txt"));
    }
}
