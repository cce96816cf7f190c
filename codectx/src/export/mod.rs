// codectx/src/export/mod.rs
//! Renderers that turn a [`ScanResult`] into a single context document.
//!
//! Both layouts share the same sections: a preamble, run metadata, the folder
//! tree, an included-files summary, the skipped list and one section per
//! file. File content is streamed through the redaction pipeline straight
//! into the output, never buffered whole.

pub mod markdown;
pub mod text;

use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use codectx_core::{build_tree, stream_file, FileEntry, OutputFormat, ScanResult};
use log::warn;
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Opening lines addressed to the reader of the document.
pub(crate) const PREAMBLE: [&str; 3] = [
    "This file contains a deterministic snapshot of the repository: a folder tree and selected file contents.",
    "Use it for analysis, debugging, and planning changes.",
    "Treat redacted values as unavailable.",
];

/// Run metadata and effective settings written into the document header.
#[derive(Debug, Clone)]
pub struct ExportMeta {
    pub version: String,
    /// The command line as typed, without the program name.
    pub command: String,
    /// ISO-8601 time of the run.
    pub timestamp: String,
    pub format: OutputFormat,
    pub depth: usize,
    pub max_bytes: u64,
    pub redact: bool,
    pub respect_gitignore: bool,
    pub include: Vec<String>,
    pub exclude: Vec<String>,
}

impl ExportMeta {
    pub(crate) fn config_line(&self) -> String {
        format!(
            "format={} depth={} maxBytes={} redact={} respectGitignore={}",
            self.format, self.depth, self.max_bytes, self.redact, self.respect_gitignore
        )
    }

    pub(crate) fn includes_line(&self) -> String {
        if self.include.is_empty() {
            "(all)".to_string()
        } else {
            self.include.join(", ")
        }
    }

    pub(crate) fn excludes_line(&self) -> String {
        if self.exclude.is_empty() {
            "(defaults only)".to_string()
        } else {
            self.exclude.join(", ")
        }
    }
}

/// Writes `result` to `writer` in the layout selected by `meta.format`.
pub async fn export<W>(writer: &mut W, result: &ScanResult, meta: &ExportMeta) -> Result<()>
where
    W: AsyncWrite + Unpin + ?Sized,
{
    match meta.format {
        OutputFormat::Text => text::export_text(writer, result, meta).await,
        OutputFormat::Md => markdown::export_markdown(writer, result, meta).await,
    }
}

pub(crate) fn tree_lines(result: &ScanResult, depth: usize) -> Vec<String> {
    let paths: Vec<&str> = result
        .files
        .iter()
        .map(|file| file.relative_path.as_str())
        .collect();
    build_tree(&paths, depth)
}

pub(crate) fn total_bytes(result: &ScanResult) -> u64 {
    result.files.iter().map(|file| file.size).sum()
}

pub(crate) fn format_bytes(size: u64) -> String {
    format!("{} bytes", size)
}

/// Formats an epoch-milliseconds time as ISO-8601 UTC with milliseconds.
pub(crate) fn format_modified(mtime_ms: f64) -> String {
    DateTime::<Utc>::from_timestamp_millis(mtime_ms as i64)
        .unwrap_or_default()
        .to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub(crate) async fn put<W>(writer: &mut W, text: &str) -> Result<()>
where
    W: AsyncWrite + Unpin + ?Sized,
{
    writer
        .write_all(text.as_bytes())
        .await
        .context("Failed to write output")
}

/// Streams one file's content. A source that cannot be opened or read is
/// noted inline and the export goes on; a failing sink ends it.
pub(crate) async fn put_file_content<W>(writer: &mut W, file: &FileEntry, redact: bool) -> Result<()>
where
    W: AsyncWrite + Unpin + ?Sized,
{
    match stream_file(&file.absolute_path, writer, redact).await {
        Ok(_) => Ok(()),
        Err(err) if err.is_write() => {
            Err(err).with_context(|| format!("Failed to write content of {}", file.relative_path))
        }
        Err(err) => {
            warn!("Content of {} unavailable: {}", file.relative_path, err);
            put(writer, &format!("[content unavailable: {}]", err)).await
        }
    }
}
