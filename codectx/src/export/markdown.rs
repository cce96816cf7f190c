// codectx/src/export/markdown.rs
//! Markdown layout. Each file becomes a `###` section with a fenced block
//! tagged by the file extension.

use anyhow::Result;
use codectx_core::{FileEntry, ScanResult};
use std::path::Path;
use tokio::io::AsyncWrite;

use super::{
    format_bytes, format_modified, put, put_file_content, total_bytes, tree_lines, ExportMeta, PREAMBLE,
};

/// Fence info string for `path`: its extension, or nothing.
fn language_from_path(path: &str) -> &str {
    Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
}

async fn write_file_section<W>(writer: &mut W, file: &FileEntry, redact: bool) -> Result<()>
where
    W: AsyncWrite + Unpin + ?Sized,
{
    put(writer, &format!("### {}\n\n", file.relative_path)).await?;
    put(writer, &format!("- Size: {}\n", format_bytes(file.size))).await?;
    put(writer, &format!("- Modified: {}\n\n", format_modified(file.mtime_ms))).await?;
    put(writer, &format!("```{}\n", language_from_path(&file.relative_path))).await?;
    put_file_content(writer, file, redact).await?;
    put(writer, "\n```\n\n").await
}

pub async fn export_markdown<W>(writer: &mut W, result: &ScanResult, meta: &ExportMeta) -> Result<()>
where
    W: AsyncWrite + Unpin + ?Sized,
{
    put(writer, "# LLM Context\n\n").await?;
    for line in PREAMBLE {
        put(writer, &format!("{}\n", line)).await?;
    }
    put(writer, "\n").await?;

    put(writer, "# Code Context\n\n").await?;
    put(writer, "## Metadata\n").await?;
    put(writer, &format!("- Root: {}\n", result.root_path.display())).await?;
    put(writer, &format!("- Timestamp: {}\n", meta.timestamp)).await?;
    put(writer, &format!("- Version: {}\n", meta.version)).await?;
    put(writer, &format!("- Command: {}\n", meta.command)).await?;
    put(writer, &format!("- Config: {}\n", meta.config_line())).await?;
    put(writer, &format!("- Includes: {}\n", meta.includes_line())).await?;
    put(writer, &format!("- Excludes: {}\n\n", meta.excludes_line())).await?;

    put(writer, "## Folder Tree\n\n```\n").await?;
    for line in tree_lines(result, meta.depth) {
        put(writer, &format!("{}\n", line)).await?;
    }
    put(writer, "```\n\n").await?;

    put(writer, "## Included Files Summary\n").await?;
    put(writer, &format!("- Count: {}\n", result.files.len())).await?;
    put(writer, &format!("- Total Size: {}\n\n", format_bytes(total_bytes(result)))).await?;

    put(writer, "## Skipped Files\n").await?;
    if result.skipped.is_empty() {
        put(writer, "- (none)\n\n").await?;
    } else {
        for skipped in &result.skipped {
            put(writer, &format!("- {} ({})\n", skipped.relative_path, skipped.reason)).await?;
        }
        put(writer, "\n").await?;
    }

    put(writer, "## Files\n\n").await?;
    for file in &result.files {
        write_file_section(writer, file, meta.redact).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::test_support::{meta, result};
    use codectx_core::OutputFormat;
    use tempfile::tempdir;

    #[test]
    fn test_language_from_extension() {
        assert_eq!(language_from_path("src/main.rs"), "rs");
        assert_eq!(language_from_path("web/app.test.tsx"), "tsx");
        assert_eq!(language_from_path("Makefile"), "");
        assert_eq!(language_from_path(".gitignore"), "");
    }

    #[tokio::test]
    async fn test_markdown_sections() {
        let dir = tempdir().unwrap();
        let scan = result(dir.path());
        let mut out: Vec<u8> = Vec::new();
        export_markdown(&mut out, &scan, &meta(OutputFormat::Md)).await.unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with("# LLM Context\n\nThis file contains"));
        assert!(text.contains(&format!("## Metadata\n- Root: {}\n", dir.path().display())));
        assert!(text.contains("- Config: format=md depth=4"));
        assert!(text.contains("## Folder Tree\n\n```\nsrc/\n  main.rs\n```\n\n"));
        assert!(text.contains("## Included Files Summary\n- Count: 1\n- Total Size: 33 bytes\n\n"));
        assert!(text.contains("## Skipped Files\n- package-lock.json (excluded)\n\n"));
        assert!(text.ends_with(
            "### src/main.rs\n\n\
             - Size: 33 bytes\n\
             - Modified: 1970-01-01T00:00:00.000Z\n\n\
             ```rs\n\
             fn main() {}\nlet token = [REDACTED];\n\
             \n```\n\n"
        ));
    }
}
