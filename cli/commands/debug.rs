use crate::cli_args::DebugArgs;
use crate::output::print_structured;
use crate::prepare_run;
use anyhow::{Context, Result};
use colored::*;
use dirlister_core::{RuleSet, max_depth};
use log;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct DebugInfo<'a> {
    project_root: String,
    destination: String,
    rules_file: Option<String>,
    files_to_include: Vec<String>,
    unreadable_directories: Vec<String>,
    tree_rows: usize,
    tree_depth: usize,
    effective_rules: &'a RuleSet,
}

pub fn handle_debug_command(args: DebugArgs) -> Result<()> {
    let run = prepare_run(
        &args.project_config,
        &args.ignore_overrides,
        args.output.as_ref(),
    )?;
    let lister = &run.lister;

    log::debug!("Debug: Collecting files...");
    let gathered = lister.content_serializer().collect();
    let files_to_include: Vec<String> = gathered.files.iter().map(|e| e.slash_path()).collect();
    let unreadable_directories: Vec<String> = gathered
        .failures
        .iter()
        .map(|f| f.path.display().to_string())
        .collect();
    log::debug!("Debug: {} files collected.", files_to_include.len());

    let tree_lines = lister.tree_renderer().lines();
    let tree_depth = max_depth(&tree_lines);

    let debug_data = DebugInfo {
        project_root: lister.root().display().to_string(),
        destination: lister.destination().display().to_string(),
        rules_file: run.rules_file.as_ref().map(|p| p.display().to_string()),
        files_to_include,
        unreadable_directories,
        tree_rows: tree_lines.len(),
        tree_depth,
        effective_rules: lister.rules(),
    };

    if args.format_output.format.is_none() {
        print_debug_info_pretty(&debug_data)
    } else {
        print_structured(&debug_data, &args.format_output)
    }
}

fn print_debug_info_pretty(debug_info: &DebugInfo) -> Result<()> {
    println!("{}", "\n--- Run Setup ---".green().bold().underline());
    println!("{:<14} {}", "Root:".bold(), debug_info.project_root.cyan());
    println!("{:<14} {}", "Report:".bold(), debug_info.destination.cyan());
    match &debug_info.rules_file {
        Some(path) => println!("{:<14} {}", "Rules file:".bold(), path.cyan()),
        None => println!("{:<14} {}", "Rules file:".bold(), "(built-in)".dimmed()),
    }
    println!(
        "{:<14} {} rows, depth {}",
        "Tree:".bold(),
        debug_info.tree_rows,
        debug_info.tree_depth
    );

    println!(
        "{}",
        "\n--- Effective Ignore Rules ---"
            .green()
            .bold()
            .underline()
    );
    let rules_yaml = serde_yml::to_string(debug_info.effective_rules)
        .context("Failed to serialize effective rules to YAML")?;
    println!("{}", rules_yaml);

    print_path_list("Files Included", &debug_info.files_to_include);
    if !debug_info.unreadable_directories.is_empty() {
        print_path_list("Unreadable Directories", &debug_info.unreadable_directories);
    }

    println!("{}", "\n--- End Debug Info ---".green().bold());
    Ok(())
}

fn print_path_list(title: &str, paths: &[String]) {
    println!(
        "{}",
        format!("\n--- {} ---", title).green().bold().underline()
    );
    if paths.is_empty() {
        println!("{}", "(None)".dimmed());
    } else {
        paths.iter().for_each(|p| println!("- {}", p.cyan()));
    }
}
