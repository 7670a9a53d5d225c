use crate::cli_args::ConfigArgs;
use crate::output;
use anyhow::{Context, Result};
use colored::Colorize;
use dirlister_core::AppError;
use dirlister_core::config::{DEFAULT_CONFIG_DIR, DEFAULT_CONFIG_FILENAME};
use dirlister_core::rules::defaults::DEFAULT_RULES_YAML;
use log;
use std::fs;
use std::path::Path;

pub fn handle_config_command(args: &ConfigArgs, project_root: &Path, quiet: bool) -> Result<()> {
    if !args.save {
        return output::write_to_stdout(DEFAULT_RULES_YAML);
    }

    let config_dir = project_root.join(DEFAULT_CONFIG_DIR);
    let target = config_dir.join(DEFAULT_CONFIG_FILENAME);
    if target.exists() && !args.force {
        return Err(AppError::InvalidArgument(format!(
            "Rules file already exists at {} (use --force to overwrite)",
            target.display()
        ))
        .into());
    }

    fs::create_dir_all(&config_dir)
        .map_err(|e| AppError::DirCreation {
            path: config_dir.clone(),
            source: e,
        })
        .with_context(|| format!("Failed to create {}", config_dir.display()))?;
    fs::write(&target, DEFAULT_RULES_YAML)
        .map_err(|e| AppError::FileWrite {
            path: target.clone(),
            source: e,
        })
        .context("Failed to save default rules file")?;
    log::info!("Default rules saved to {}", target.display());

    if !quiet {
        println!(
            "{} Default rules saved to: {}",
            "✅".green(),
            target.display().to_string().blue()
        );
    }
    Ok(())
}
