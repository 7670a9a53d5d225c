use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Args, Debug, Clone, Default)]
pub struct ProjectConfigOpts {
    #[arg(
        long,
        help = "Directory to list (default: current dir).",
        help_heading = "Project Setup",
        value_name = "PATH"
    )]
    pub project_root: Option<PathBuf>,

    #[arg(
        long,
        help = "Path or name of the ignore rules file (default: .dirlister/ignore_settings.yml).",
        value_name = "RULES_FILE",
        conflicts_with = "no_rules_file",
        help_heading = "Project Setup"
    )]
    pub rules_file: Option<PathBuf>,

    #[arg(
        long,
        help = "Ignore any rules file and use the built-in rules.",
        conflicts_with = "rules_file",
        help_heading = "Project Setup"
    )]
    pub no_rules_file: bool,
}

#[derive(Args, Debug, Clone, Default)]
pub struct IgnoreOverrideGroup {
    #[arg(long = "ignore-dir", value_name = "NAME", action = clap::ArgAction::Append, help = "Also ignore directories with this name (glob allowed).", help_heading = "Ignore Rules")]
    pub ignore_dir: Vec<String>,
    #[arg(long = "ignore-file", value_name = "NAME", action = clap::ArgAction::Append, help = "Also ignore files with this name (glob allowed).", help_heading = "Ignore Rules")]
    pub ignore_file: Vec<String>,
    #[arg(long = "ignore-ext", value_name = "EXT", action = clap::ArgAction::Append, help = "Also ignore files with this extension (e.g. '.log').", help_heading = "Ignore Rules")]
    pub ignore_ext: Vec<String>,
}

impl IgnoreOverrideGroup {
    pub fn is_empty(&self) -> bool {
        self.ignore_dir.is_empty() && self.ignore_file.is_empty() && self.ignore_ext.is_empty()
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct FormatOutputOpts {
    #[arg(short = 'f', long, help = "Print structured output in this format.", value_name = "FORMAT", value_parser = ["json", "yaml", "toml"], help_heading = "Output Formatting")]
    pub format: Option<String>,

    #[arg(
        long,
        help = "Print JSON compact instead of pretty-printed.",
        help_heading = "Output Formatting"
    )]
    pub minify: bool,
}

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "List a directory as an ASCII tree plus a line-numbered dump of its files.",
    long_about = "dirlister walks a directory, skips configured noise (VCS metadata, build output, \nbinary and media files) and writes the tree and every remaining file's contents \nto a single text report, ready to paste into a language model.",
    help_template = "{about-section}\nUsage: {usage}\n\n{all-args}{after-help}",
    after_help = "EXAMPLES:\n  dirlister generate --project-root ./src -o listing.txt\n  dirlister debug -f yaml\n  dirlister metrics\n  dirlister config --save",
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[arg(short, long, action = clap::ArgAction::Count, global = true, help = "Increase message verbosity (-v, -vv, -vvv).")]
    pub verbose: u8,

    #[arg(
        short,
        long,
        global = true,
        help = "Silence informational messages and warnings."
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    #[command(
        visible_alias = "g",
        visible_alias = "gen",
        about = "Write the directory listing report."
    )]
    Generate(GenerateArgs),

    #[command(
        visible_alias = "d",
        about = "Show the effective ignore rules and the files that would be listed."
    )]
    Debug(DebugArgs),

    #[command(
        visible_alias = "m",
        about = "Count files, lines, bytes and estimated tokens of the report."
    )]
    Metrics(MetricsArgs),

    #[command(about = "Show or save the default ignore rules file.")]
    Config(ConfigArgs),
}

#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    #[clap(flatten)]
    pub project_config: ProjectConfigOpts,
    #[clap(flatten)]
    pub ignore_overrides: IgnoreOverrideGroup,

    #[arg(
        short = 'o',
        long,
        value_name = "FILE",
        help = "Report file to write (default: ./directory_listing.txt).",
        help_heading = "Output Control"
    )]
    pub output: Option<PathBuf>,

    #[arg(
        long,
        help = "Print the report to standard output instead of writing a file.",
        help_heading = "Output Control",
        conflicts_with = "output"
    )]
    pub stdout: bool,
}

#[derive(Args, Debug, Clone)]
pub struct DebugArgs {
    #[clap(flatten)]
    pub project_config: ProjectConfigOpts,
    #[clap(flatten)]
    pub ignore_overrides: IgnoreOverrideGroup,
    #[clap(flatten)]
    pub format_output: FormatOutputOpts,

    #[arg(
        short = 'o',
        long,
        value_name = "FILE",
        help = "Report file the run would write (its name is ignored).",
        help_heading = "Output Control"
    )]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct MetricsArgs {
    #[clap(flatten)]
    pub project_config: ProjectConfigOpts,
    #[clap(flatten)]
    pub ignore_overrides: IgnoreOverrideGroup,
    #[clap(flatten)]
    pub format_output: FormatOutputOpts,

    #[arg(
        short = 'o',
        long,
        value_name = "FILE",
        help = "Report file the run would write (its name is ignored).",
        help_heading = "Output Control"
    )]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    #[arg(
        long,
        help = "Directory whose .dirlister/ receives the saved file (default: current dir).",
        value_name = "PATH"
    )]
    pub project_root: Option<PathBuf>,

    #[arg(
        long,
        help = "Save the default rules to .dirlister/ignore_settings.yml."
    )]
    pub save: bool,

    #[arg(long, requires = "save", help = "Overwrite an existing rules file.")]
    pub force: bool,
}
