//! scanner.rs - Selects the files that belong in a snapshot.
//!
//! A scan lists the root once, then evaluates two independent glob sets
//! against that listing: the include set picks candidates and the exclude
//! set (built-in defaults plus caller patterns) rejects them. Surviving
//! candidates are checked against the root `.gitignore`, their size and their
//! content before being accepted.
//!
//! Every candidate ends up either in [`ScanResult::files`] or in
//! [`ScanResult::skipped`], never both. Files that the include set does not
//! select are not reported at all. Directories the walk could not read are
//! listed in [`ScanResult::walk_errors`]; files beneath them were never seen.
//!
//! License: MIT OR APACHE 2.0

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use ignore::gitignore::{Gitignore, GitignoreBuilder};
use log::{debug, info, warn};
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;
use walkdir::WalkDir;

use crate::binary::is_binary;
use crate::config::{ScanOptions, DEFAULT_EXCLUDES};
use crate::errors::ScanError;
use crate::paths::relative_to;

/// Include pattern used when the caller supplies none.
const MATCH_ALL: &str = "**/*";

/// A file accepted into the snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct FileEntry {
    /// Normalized root-relative path with `/` separators.
    pub relative_path: String,
    pub absolute_path: PathBuf,
    /// Size in bytes at scan time.
    pub size: u64,
    /// Modification time in milliseconds since the Unix epoch.
    pub mtime_ms: f64,
}

/// Why a candidate was left out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SkipReason {
    Excluded,
    TooLarge,
    Binary,
    Unreadable,
}

impl SkipReason {
    pub fn as_str(self) -> &'static str {
        match self {
            SkipReason::Excluded => "excluded",
            SkipReason::TooLarge => "too large",
            SkipReason::Binary => "binary",
            SkipReason::Unreadable => "unreadable",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A candidate that was rejected, with an optional diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    pub relative_path: String,
    pub reason: SkipReason,
    pub detail: Option<String>,
}

impl SkippedEntry {
    fn new(relative_path: String, reason: SkipReason, detail: Option<String>) -> Self {
        Self {
            relative_path,
            reason,
            detail,
        }
    }
}

/// Outcome of [`scan`]. Both lists are sorted by `relative_path` in byte
/// order.
#[derive(Debug, Clone)]
pub struct ScanResult {
    /// The resolved scan root.
    pub root_path: PathBuf,
    pub files: Vec<FileEntry>,
    pub skipped: Vec<SkippedEntry>,
    /// Paths the listing could not read, as `path: error`, sorted.
    pub walk_errors: Vec<String>,
}

/// One regular file found while listing the root.
#[derive(Debug)]
struct ListedFile {
    relative: String,
    absolute: PathBuf,
}

/// Compiles `patterns` into one set. `*` and `?` never match `/`.
fn build_globset<'a, I>(patterns: I) -> Result<GlobSet, ScanError>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut builder = GlobSetBuilder::new();
    let mut all = Vec::new();
    for pattern in patterns {
        let glob = GlobBuilder::new(pattern)
            .literal_separator(true)
            .build()
            .map_err(|source| ScanError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })?;
        builder.add(glob);
        all.push(pattern);
    }
    builder.build().map_err(|source| ScanError::InvalidPattern {
        pattern: all.join(", "),
        source,
    })
}

/// Lists every regular file under `root`, plus the walk errors met on the
/// way. Symbolic links are neither followed nor reported.
fn list_files(root: &Path) -> (Vec<ListedFile>, Vec<String>) {
    let mut listed = Vec::new();
    let mut errors = Vec::new();
    for entry in WalkDir::new(root).min_depth(1).follow_links(false) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!("Skipping unreadable path during scan: {}", err);
                let path = err
                    .path()
                    .and_then(|path| relative_to(root, path))
                    .unwrap_or_default();
                let cause = err
                    .io_error()
                    .map(|io| io.to_string())
                    .unwrap_or_else(|| err.to_string());
                errors.push(format!("{}: {}", path, cause));
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        if let Some(relative) = relative_to(root, entry.path()) {
            listed.push(ListedFile {
                relative,
                absolute: entry.into_path(),
            });
        }
    }
    (listed, errors)
}

/// Reads the root `.gitignore`. A missing file means no rules.
async fn load_gitignore(root: &Path) -> Option<Gitignore> {
    let path = root.join(".gitignore");
    let contents = match tokio::fs::read_to_string(&path).await {
        Ok(contents) => contents,
        Err(err) => {
            debug!("No usable .gitignore at {}: {}", path.display(), err);
            return None;
        }
    };

    let mut builder = GitignoreBuilder::new(root);
    for line in contents.lines() {
        if let Err(err) = builder.add_line(None, line) {
            warn!("Ignoring invalid .gitignore line '{}': {}", line, err);
        }
    }
    match builder.build() {
        Ok(gitignore) => {
            debug!("Loaded {} .gitignore rules from {}", gitignore.num_ignores(), path.display());
            Some(gitignore)
        }
        Err(err) => {
            warn!("Failed to build .gitignore rules from {}: {}", path.display(), err);
            None
        }
    }
}

fn mtime_ms(metadata: &std::fs::Metadata) -> f64 {
    metadata
        .modified()
        .ok()
        .and_then(|modified| modified.duration_since(UNIX_EPOCH).ok())
        .map(|elapsed| elapsed.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}

/// Scans `root` and classifies every file selected by `options.include`.
///
/// Fails only when a pattern does not compile or the root is not an
/// accessible directory. Problems with individual files are reported as
/// [`SkipReason::Unreadable`] entries.
pub async fn scan<P: AsRef<Path>>(root: P, options: &ScanOptions) -> Result<ScanResult, ScanError> {
    let root = root.as_ref();

    let include = if options.include.is_empty() {
        build_globset([MATCH_ALL])?
    } else {
        build_globset(options.include.iter().map(String::as_str))?
    };
    let exclude = build_globset(
        DEFAULT_EXCLUDES
            .iter()
            .copied()
            .chain(options.exclude.iter().map(String::as_str)),
    )?;

    let root_path = tokio::fs::canonicalize(root)
        .await
        .map_err(|source| ScanError::RootNotFound {
            path: root.to_path_buf(),
            source,
        })?;
    let root_meta = tokio::fs::metadata(&root_path)
        .await
        .map_err(|source| ScanError::RootNotFound {
            path: root.to_path_buf(),
            source,
        })?;
    if !root_meta.is_dir() {
        return Err(ScanError::NotADirectory(root.to_path_buf()));
    }
    info!("Scanning {}", root_path.display());

    let walk_root = root_path.clone();
    let (listing, mut walk_errors) = tokio::task::spawn_blocking(move || list_files(&walk_root))
        .await
        .map_err(|err| ScanError::Walk(err.to_string()))?;
    debug!("Listed {} files under {}", listing.len(), root_path.display());

    let candidates: Vec<&ListedFile> = listing
        .iter()
        .filter(|file| include.is_match(&file.relative))
        .collect();
    let excluded: HashSet<&str> = listing
        .iter()
        .filter(|file| exclude.is_match(&file.relative))
        .map(|file| file.relative.as_str())
        .collect();

    let gitignore = if options.respect_gitignore {
        load_gitignore(&root_path).await
    } else {
        None
    };

    let mut files = Vec::new();
    let mut skipped = Vec::new();

    for candidate in candidates {
        let relative = candidate.relative.clone();

        if excluded.contains(relative.as_str()) {
            debug!("{}: excluded by pattern", relative);
            skipped.push(SkippedEntry::new(relative, SkipReason::Excluded, None));
            continue;
        }

        if let Some(gitignore) = &gitignore {
            if gitignore
                .matched_path_or_any_parents(root_path.join(&relative), false)
                .is_ignore()
            {
                debug!("{}: excluded by .gitignore", relative);
                skipped.push(SkippedEntry::new(
                    relative,
                    SkipReason::Excluded,
                    Some(".gitignore".to_string()),
                ));
                continue;
            }
        }

        let metadata = match tokio::fs::metadata(&candidate.absolute).await {
            Ok(metadata) => metadata,
            Err(err) => {
                debug!("{}: unreadable ({})", relative, err);
                skipped.push(SkippedEntry::new(relative, SkipReason::Unreadable, Some(err.to_string())));
                continue;
            }
        };

        let size = metadata.len();
        if size > options.max_bytes {
            debug!("{}: too large ({} > {} bytes)", relative, size, options.max_bytes);
            skipped.push(SkippedEntry::new(
                relative,
                SkipReason::TooLarge,
                Some(format!("{} bytes", size)),
            ));
            continue;
        }

        match is_binary(&candidate.absolute).await {
            Ok(true) => {
                debug!("{}: binary", relative);
                skipped.push(SkippedEntry::new(relative, SkipReason::Binary, None));
                continue;
            }
            Ok(false) => {}
            Err(err) => {
                debug!("{}: unreadable ({})", relative, err);
                skipped.push(SkippedEntry::new(relative, SkipReason::Unreadable, Some(err.to_string())));
                continue;
            }
        }

        debug!("{}: included ({} bytes)", relative, size);
        files.push(FileEntry {
            relative_path: relative,
            absolute_path: candidate.absolute.clone(),
            size,
            mtime_ms: mtime_ms(&metadata),
        });
    }

    files.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
    skipped.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
    walk_errors.sort();

    info!(
        "Scan of {} complete: {} included, {} skipped, {} unlisted paths",
        root_path.display(),
        files.len(),
        skipped.len(),
        walk_errors.len()
    );

    Ok(ScanResult {
        root_path,
        files,
        skipped,
        walk_errors,
    })
}
