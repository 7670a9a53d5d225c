mod cli_args;
mod commands;
mod output;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use colored::*;
use dirlister_core::config::{self, determine_project_root, resolve_output_path};
use dirlister_core::{AppError, DirectoryLister, RuleSet};
use log;
use std::path::{Path, PathBuf};
use std::process;

use cli_args::{Cli, Commands, IgnoreOverrideGroup, ProjectConfigOpts};

fn main() {
    let cli_args = Cli::parse();

    setup_logging(cli_args.quiet, cli_args.verbose);

    let quiet = cli_args.quiet;

    log::debug!("CLI args parsed: {:?}", cli_args);

    let exit_code = match run_app(cli_args, quiet) {
        Ok(_) => {
            log::info!("Application finished successfully.");
            0
        }
        Err(e) => {
            let exit_code = exit_code_for(&e);
            if !quiet || exit_code == 1 || exit_code == 5 {
                eprintln!("{} {:#}", "Error:".red().bold(), e);
            } else {
                log::error!("Application failed: {:#}", e);
            }
            exit_code
        }
    };
    log::debug!("Exiting with code {}", exit_code);
    process::exit(exit_code);
}

fn exit_code_for(e: &anyhow::Error) -> i32 {
    match e.downcast_ref::<AppError>() {
        Some(AppError::JsonSerialize(_))
        | Some(AppError::YamlError(_))
        | Some(AppError::TomlSerialize(_)) => 6,
        Some(err) if err.is_configuration() => 1,
        Some(err) if err.is_output_write() => 2,
        Some(AppError::Io(_)) | Some(AppError::FileRead { .. }) => 2,
        Some(AppError::InvalidArgument(_)) => 5,
        Some(AppError::TikToken(_)) => 8,
        Some(_) => 1,
        None => 1,
    }
}

fn setup_logging(quiet: bool, verbose: u8) {
    let log_level = if quiet {
        log::LevelFilter::Off
    } else {
        match verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    };
    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp(None)
        .init();
    log::trace!("Logger initialized with level: {:?}", log_level);
}

fn run_app(cli: Cli, quiet: bool) -> Result<()> {
    match cli.command {
        None => {
            Cli::command().print_help()?;
        }
        Some(command) => match command {
            Commands::Generate(args) => {
                log::debug!("Executing 'generate' command...");
                commands::generate::handle_generate_command(args, quiet)?;
            }
            Commands::Debug(args) => {
                log::debug!("Executing 'debug' command...");
                commands::debug::handle_debug_command(args)?;
            }
            Commands::Metrics(args) => {
                log::debug!("Executing 'metrics' command...");
                commands::metrics::handle_metrics_command(args, quiet)?;
            }
            Commands::Config(args) => {
                log::debug!("Executing 'config' command...");
                let project_root = determine_project_root(args.project_root.as_ref())
                    .context("Failed to determine project root for config command")?;
                commands::config::handle_config_command(&args, &project_root, quiet)?;
            }
        },
    }
    Ok(())
}

/// Everything a command needs to run the listing engine.
pub struct PreparedRun {
    pub lister: DirectoryLister,
    pub rules_file: Option<PathBuf>,
}

/// Resolves root, rules file and destination, applies CLI rule overrides,
/// and builds the lister shared by `generate`, `debug` and `metrics`.
pub fn prepare_run(
    project_opts: &ProjectConfigOpts,
    overrides: &IgnoreOverrideGroup,
    output: Option<&PathBuf>,
) -> Result<PreparedRun> {
    let project_root = determine_project_root(project_opts.project_root.as_ref())
        .context("Failed to determine project root")?;
    log::info!("Project root determined: {}", project_root.display());

    let rules_file = config::resolve_config_path(
        &project_root,
        project_opts.rules_file.as_ref(),
        project_opts.no_rules_file,
    )
    .context("Failed to resolve rules file path")?;

    let rules = load_rules_for_command(rules_file.as_deref(), overrides)?;
    let destination = resolve_output_path(output).context("Failed to resolve output path")?;
    log::debug!("Report destination: {}", destination.display());

    let lister = DirectoryLister::new(&project_root, &destination, rules)
        .context("Failed to prepare directory listing")?;
    Ok(PreparedRun { lister, rules_file })
}

fn load_rules_for_command(
    rules_file: Option<&Path>,
    overrides: &IgnoreOverrideGroup,
) -> Result<RuleSet> {
    let rules = config::load_rule_set(rules_file).with_context(|| match rules_file {
        Some(path) => format!("Failed to load ignore rules from {}", path.display()),
        None => "Failed to load built-in ignore rules".to_string(),
    })?;
    if overrides.is_empty() {
        return Ok(rules);
    }
    log::trace!("Applying CLI ignore overrides: {:?}", overrides);
    rules
        .extended(
            &overrides.ignore_dir,
            &overrides.ignore_file,
            &overrides.ignore_ext,
        )
        .context("Invalid ignore rule given on the command line")
}
