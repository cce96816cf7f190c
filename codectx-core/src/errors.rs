//! errors.rs - Custom error types for the codectx-core library.
//!
//! Only catastrophic conditions surface as errors. Problems with individual
//! files during a scan are recorded as skipped entries instead.
//!
//! License: MIT OR APACHE 2.0

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors raised by [`crate::scan`]. No partial result accompanies them.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ScanError {
    #[error("Scan root '{path}' is not accessible: {source}")]
    RootNotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Scan root '{0}' is not a directory")]
    NotADirectory(PathBuf),

    #[error("Invalid glob pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("Directory listing task failed: {0}")]
    Walk(String),
}

/// Failures while streaming one selected file into an export.
///
/// `Open` and `Read` concern the source file only; `Write` means the sink
/// rejected output and the whole export should stop.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum StreamError {
    #[error("Failed to open '{path}': {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to read source: {0}")]
    Read(#[source] io::Error),

    #[error("Failed to write output: {0}")]
    Write(#[source] io::Error),
}

impl StreamError {
    /// True when the failure came from the output side.
    pub fn is_write(&self) -> bool {
        matches!(self, StreamError::Write(_))
    }
}

/// Errors loading an on-disk configuration file.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse JSON config file {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to parse YAML config file {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yml::Error,
    },
}
