// codectx/src/export/text.rs
//! Plain-text layout.

use anyhow::Result;
use codectx_core::{FileEntry, ScanResult};
use tokio::io::AsyncWrite;

use super::{
    format_bytes, format_modified, put, put_file_content, total_bytes, tree_lines, ExportMeta, PREAMBLE,
};

async fn write_file_section<W>(writer: &mut W, file: &FileEntry, redact: bool) -> Result<()>
where
    W: AsyncWrite + Unpin + ?Sized,
{
    put(writer, "---\n").await?;
    put(writer, &format!("File: {}\n", file.relative_path)).await?;
    put(writer, &format!("Size: {}\n", format_bytes(file.size))).await?;
    put(writer, &format!("Modified: {}\n", format_modified(file.mtime_ms))).await?;
    put(writer, "```\n").await?;
    put_file_content(writer, file, redact).await?;
    put(writer, "\n```\n").await
}

pub async fn export_text<W>(writer: &mut W, result: &ScanResult, meta: &ExportMeta) -> Result<()>
where
    W: AsyncWrite + Unpin + ?Sized,
{
    put(writer, "LLM Context\n").await?;
    for line in PREAMBLE {
        put(writer, &format!("{}\n", line)).await?;
    }
    put(writer, "\n").await?;

    put(writer, "Code Context\n").await?;
    put(writer, &format!("Root: {}\n", result.root_path.display())).await?;
    put(writer, &format!("Timestamp: {}\n", meta.timestamp)).await?;
    put(writer, &format!("Version: {}\n", meta.version)).await?;
    put(writer, &format!("Command: {}\n", meta.command)).await?;
    put(writer, &format!("Config: {}\n", meta.config_line())).await?;
    put(writer, &format!("Includes: {}\n", meta.includes_line())).await?;
    put(writer, &format!("Excludes: {}\n", meta.excludes_line())).await?;

    put(writer, "\nFolder Tree\n").await?;
    for line in tree_lines(result, meta.depth) {
        put(writer, &format!("{}\n", line)).await?;
    }

    put(writer, "\nIncluded Files Summary\n").await?;
    put(writer, &format!("Count: {}\n", result.files.len())).await?;
    put(writer, &format!("Total Size: {}\n", format_bytes(total_bytes(result)))).await?;

    put(writer, "\nSkipped Files\n").await?;
    if result.skipped.is_empty() {
        put(writer, "(none)\n").await?;
    } else {
        for skipped in &result.skipped {
            put(writer, &format!("{} - {}\n", skipped.relative_path, skipped.reason)).await?;
        }
    }

    put(writer, "\nFiles\n").await?;
    for file in &result.files {
        write_file_section(writer, file, meta.redact).await?;
    }
    Ok(())
}
