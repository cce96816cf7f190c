// codectx/src/commands/extract.rs
//! The `extract` command: resolve settings, scan the root and write the
//! context document.

use anyhow::{Context, Result};
use chrono::{DateTime, Local, SecondsFormat, Utc};
use codectx_core::paths::{glob_literal, relative_to};
use codectx_core::{
    scan, ConfigFile, OutputFormat, ScanOptions, ScanResult, SkipSummary, DEFAULT_DEPTH,
    DEFAULT_MAX_BYTES,
};
use log::{debug, info};
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};

use crate::cli::ExtractCommand;
use crate::export::{export, ExportMeta};

/// Directory that receives automatically named outputs.
pub const DEFAULT_OUT_DIR: &str = "code-context";

/// Effective settings after merging the command line, the config file and
/// the defaults, in that order of precedence.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractSettings {
    pub root: PathBuf,
    pub out_file: PathBuf,
    pub format: OutputFormat,
    pub depth: usize,
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    pub max_bytes: u64,
    pub redact: bool,
    pub respect_gitignore: bool,
}

/// Outcome of a successful extract.
#[derive(Debug)]
pub struct ExtractReport {
    pub output_path: PathBuf,
    pub result: ScanResult,
}

/// A non-empty command-line list replaces the config file's list.
fn pick_list(cli: &[String], file: Option<Vec<String>>) -> Vec<String> {
    if cli.is_empty() {
        file.unwrap_or_default()
    } else {
        cli.to_vec()
    }
}

/// `code-context/<root-name>_context_<YYYY-MM-DD>_<HHMMSS>.<ext>`, using
/// local time.
pub fn auto_out_file(root: &Path, format: OutputFormat, now: DateTime<Local>) -> PathBuf {
    let root_name = root
        .file_name()
        .and_then(|name| name.to_str())
        .filter(|name| !name.is_empty())
        .unwrap_or("project");
    PathBuf::from(DEFAULT_OUT_DIR).join(format!(
        "{}_context_{}.{}",
        root_name,
        now.format("%Y-%m-%d_%H%M%S"),
        format.extension()
    ))
}

pub fn resolve_settings(cmd: &ExtractCommand, file: ConfigFile, cwd: &Path, now: DateTime<Utc>) -> ExtractSettings {
    let root = cwd.join(&cmd.path);
    let format = cmd
        .format
        .map(OutputFormat::from)
        .or(file.format)
        .unwrap_or_default();
    let out_file = cmd
        .out
        .clone()
        .or_else(|| file.out_file.map(PathBuf::from))
        .unwrap_or_else(|| auto_out_file(&root, format, now.with_timezone(&Local)));
    let redact = if cmd.no_redact { false } else { file.redact.unwrap_or(true) };
    let respect_gitignore = if cmd.no_gitignore {
        false
    } else {
        file.respect_gitignore.unwrap_or(true)
    };

    ExtractSettings {
        out_file,
        format,
        depth: cmd.depth.or(file.depth).unwrap_or(DEFAULT_DEPTH),
        include: pick_list(&cmd.include, file.include),
        exclude: pick_list(&cmd.exclude, file.exclude),
        max_bytes: cmd.max_bytes.or(file.max_bytes).unwrap_or(DEFAULT_MAX_BYTES),
        redact,
        respect_gitignore,
        root,
    }
}

/// One line per reason plus the directories with the most skips.
pub fn render_skip_summary(summary: &SkipSummary) -> Vec<String> {
    if summary.total == 0 {
        return vec!["Skipped 0 files".to_string()];
    }
    let reasons: Vec<String> = summary
        .by_reason
        .iter()
        .map(|(reason, count)| format!("{}: {}", reason, count))
        .collect();
    let mut lines = vec![format!("Skipped {} files ({})", summary.total, reasons.join(", "))];
    for (name, count) in &summary.top_roots {
        lines.push(format!("  {} {}", name, count));
    }
    lines
}

/// Reports the paths the scan could not list, if any.
pub fn render_walk_errors(walk_errors: &[String]) -> Vec<String> {
    if walk_errors.is_empty() {
        return Vec::new();
    }
    let mut lines = vec![format!(
        "Could not read {} paths; files beneath them are missing",
        walk_errors.len()
    )];
    lines.extend(walk_errors.iter().map(|error| format!("  {}", error)));
    lines
}

/// Runs `extract` with `command_line` recorded in the document header.
pub async fn run_extract(cmd: &ExtractCommand, command_line: String) -> Result<ExtractReport> {
    let cwd = std::env::current_dir().context("Failed to determine the working directory")?;
    let file_config = match &cmd.config {
        Some(path) => ConfigFile::load_from_file(cwd.join(path))
            .with_context(|| format!("Failed to load config file {}", path.display()))?,
        None => ConfigFile::default(),
    };
    let now = Utc::now();
    let settings = resolve_settings(cmd, file_config, &cwd, now);
    debug!("Resolved extract settings: {:?}", settings);

    let output_path = cwd.join(&settings.out_file);
    let mut scan_exclude = settings.exclude.clone();
    if let Some(relative) = relative_to(&settings.root, &output_path).filter(|r| !r.is_empty()) {
        debug!("Output file lies under the root; excluding {}", relative);
        scan_exclude.push(glob_literal(&relative));
    }

    let options = ScanOptions {
        include: settings.include.clone(),
        exclude: scan_exclude,
        max_bytes: settings.max_bytes,
        respect_gitignore: settings.respect_gitignore,
    };
    let result = scan(&settings.root, &options)
        .await
        .with_context(|| format!("Failed to scan {}", settings.root.display()))?;

    if let Some(parent) = output_path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create output directory {}", parent.display()))?;
    }
    let file = File::create(&output_path)
        .await
        .with_context(|| format!("Failed to create output file {}", output_path.display()))?;
    let mut writer = BufWriter::new(file);

    let meta = ExportMeta {
        version: env!("CARGO_PKG_VERSION").to_string(),
        command: command_line,
        timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        format: settings.format,
        depth: settings.depth,
        max_bytes: settings.max_bytes,
        redact: settings.redact,
        respect_gitignore: settings.respect_gitignore,
        include: settings.include,
        exclude: settings.exclude,
    };
    export(&mut writer, &result, &meta).await?;
    writer.flush().await.context("Failed to flush output")?;

    info!("Wrote {} files to {}", result.files.len(), output_path.display());
    Ok(ExtractReport { output_path, result })
}
