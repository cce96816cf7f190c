// codectx/src/cli.rs
//! Command-line interface definition for the codectx application.
//! License: MIT OR Apache-2.0

use clap::{Args, Parser, Subcommand, ValueEnum};
use codectx_core::OutputFormat;
use std::path::PathBuf;

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(
    name = "codectx",
    version = env!("CARGO_PKG_VERSION"),
    about = "Create a deterministic context file from a local codebase (folder tree + file contents).",
    after_help = "Examples:\n  codectx extract . --verbose\n  codectx extract . --format md --depth 3\n  codectx extract ../my-project --max-bytes 200000",
    arg_required_else_help = true,
)]
pub struct Cli {
    /// Suppress all log output.
    #[arg(long, short = 'q', global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Enable debug logging and print a summary when done.
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a single context file from the target folder.
    Extract(ExtractCommand),
}

/// Output format as accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Text,
    #[value(alias = "markdown")]
    Md,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => OutputFormat::Text,
            FormatArg::Md => OutputFormat::Md,
        }
    }
}

/// Arguments for the `extract` command. Options left unset fall back to the
/// config file, then to built-in defaults.
#[derive(Args, Debug, Clone, Default)]
pub struct ExtractCommand {
    /// Root directory to snapshot.
    #[arg(value_name = "PATH", default_value = ".")]
    pub path: PathBuf,

    /// Output file path (defaults to code-context/<root>_context_<date>_<time>.<ext>).
    #[arg(long, value_name = "FILE")]
    pub out: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum, value_name = "FORMAT")]
    pub format: Option<FormatArg>,

    /// Folder tree depth.
    #[arg(long, value_name = "N")]
    pub depth: Option<usize>,

    /// Include glob (repeatable). Defaults to every file.
    #[arg(long, value_name = "GLOB")]
    pub include: Vec<String>,

    /// Extra exclude glob (repeatable), on top of the built-in excludes.
    #[arg(long, value_name = "GLOB")]
    pub exclude: Vec<String>,

    /// Skip files larger than this many bytes.
    #[arg(long = "max-bytes", value_name = "N")]
    pub max_bytes: Option<u64>,

    /// Disable secret redaction.
    #[arg(long = "no-redact")]
    pub no_redact: bool,

    /// Do not apply the root .gitignore.
    #[arg(long = "no-gitignore")]
    pub no_gitignore: bool,

    /// Optional JSON or YAML config file.
    #[arg(long, value_name = "FILE", env = "CODECTX_CONFIG")]
    pub config: Option<PathBuf>,
}
