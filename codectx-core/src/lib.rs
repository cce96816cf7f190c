// codectx-core/src/lib.rs
//! # codectx Core Library
//!
//! `codectx-core` decides which files under a directory belong in a
//! deterministic text snapshot and streams their content through a
//! normalization and secret-redaction pipeline whose output does not depend
//! on how the bytes were read.
//!
//! ## Modules
//!
//! * `config`: Build-time defaults, [`ScanOptions`] and the on-disk [`ConfigFile`] model.
//! * `scanner`: Glob selection, default excludes, `.gitignore`, size and binary filters.
//! * `redaction`: The built-in secret patterns and the pure [`redact`] function.
//! * `stream`: [`ChunkNormalizer`] and the async [`stream_file`] driver.
//! * `tree`: Depth-bounded folder listing of the selected paths.
//! * `summary`: Counts of skipped entries for diagnostics.
//! * `binary`: Leading-byte binary detection.
//! * `paths`: Canonical forward-slash path form.
//! * `errors`: Error types for scanning, streaming and config loading.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use codectx_core::{build_tree, scan, stream_file, ScanOptions};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let result = scan(".", &ScanOptions::default()).await?;
//! let paths: Vec<&str> = result.files.iter().map(|f| f.relative_path.as_str()).collect();
//! for line in build_tree(&paths, 4) {
//!     println!("{}", line);
//! }
//!
//! let mut out = tokio::io::stdout();
//! for file in &result.files {
//!     stream_file(&file.absolute_path, &mut out, true).await?;
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Only fatal conditions are errors: a bad scan root or glob ([`ScanError`]),
//! a failing stream ([`StreamError`]) and an unreadable config file
//! ([`ConfigError`]). Per-file problems during a scan become
//! [`SkippedEntry`] values.
//!
//! ---
//! License: MIT OR Apache-2.0

pub mod binary;
pub mod config;
pub mod errors;
pub mod paths;
pub mod redaction;
pub mod scanner;
pub mod stream;
pub mod summary;
pub mod tree;

/// Re-exports the configuration defaults and models.
pub use config::{
    ConfigFile, OutputFormat, ScanOptions, DEFAULT_DEPTH, DEFAULT_EXCLUDES, DEFAULT_MAX_BYTES,
};

/// Re-exports the error types.
pub use errors::{ConfigError, ScanError, StreamError};

pub use scanner::{scan, FileEntry, ScanResult, SkipReason, SkippedEntry};

pub use redaction::{redact, REDACTION_MARKER};

pub use stream::{stream_file, stream_redacted, ChunkNormalizer, CARRY_LEN};

pub use tree::build_tree;

pub use summary::{summarize_skipped, SkipSummary, DEFAULT_ROOT_LIMIT};

pub use binary::{is_binary, is_binary_bytes};

pub use paths::{glob_literal, normalize_path};
