//! Configuration management for `codectx-core`.
//!
//! This module holds the build-time defaults shared by every scan (the
//! default-exclude policy and size/depth limits), the per-scan [`ScanOptions`],
//! and the optional on-disk [`ConfigFile`] model. Config files may be JSON
//! (by extension) or YAML.
//!
//! License: MIT OR Apache-2.0

use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::errors::ConfigError;

/// Default upper bound on the size of an included file, in bytes.
pub const DEFAULT_MAX_BYTES: u64 = 500_000;

/// Default number of levels rendered in the folder tree.
pub const DEFAULT_DEPTH: usize = 4;

/// Glob patterns that are always excluded, at any depth.
///
/// Dependency, build and tool directories, lockfiles, logs and
/// credential-shaped filenames. Include patterns cannot override these.
pub const DEFAULT_EXCLUDES: &[&str] = &[
    "**/node_modules/**",
    "**/dist/**",
    "**/build/**",
    "**/out/**",
    "**/code-context/**",
    "**/.next/**",
    "**/.turbo/**",
    "**/.git/**",
    "**/.idea/**",
    "**/.vscode/**",
    "**/coverage/**",
    "**/target/**",
    "**/*.lock",
    "**/package-lock.json",
    "**/yarn.lock",
    "**/pnpm-lock.yaml",
    "**/bun.lockb",
    "**/.npmrc",
    "**/.yarnrc",
    "**/.yarnrc.yml",
    "**/*.log",
    "**/*.pem",
    "**/*.key",
    "**/*.p12",
    "**/.env",
    "**/*.env",
    "**/.env.*",
    "**/secrets.*",
    "**/id_rsa",
    "**/id_ed25519",
];

/// Inputs to a single [`crate::scan`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOptions {
    /// Candidate globs. Empty means every file under the root.
    pub include: Vec<String>,
    /// Extra exclusion globs, added to [`DEFAULT_EXCLUDES`].
    pub exclude: Vec<String>,
    /// Files larger than this are skipped as too large.
    pub max_bytes: u64,
    /// Whether the root `.gitignore` is honoured.
    pub respect_gitignore: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            include: Vec::new(),
            exclude: Vec::new(),
            max_bytes: DEFAULT_MAX_BYTES,
            respect_gitignore: true,
        }
    }
}

/// Output flavour of an export.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    #[serde(alias = "markdown")]
    Md,
}

impl OutputFormat {
    /// File extension used for automatically named outputs.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Text => "txt",
            OutputFormat::Md => "md",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Md => write!(f, "md"),
        }
    }
}

/// Settings read from an optional config file. Every field is optional;
/// absent fields fall back to command-line values or defaults.
#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConfigFile {
    pub out_file: Option<String>,
    pub format: Option<OutputFormat>,
    pub depth: Option<usize>,
    pub include: Option<Vec<String>>,
    pub exclude: Option<Vec<String>>,
    pub max_bytes: Option<u64>,
    pub redact: Option<bool>,
    pub respect_gitignore: Option<bool>,
}

impl ConfigFile {
    /// Loads a config file. `.json` files are parsed as JSON, anything else
    /// as YAML.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        info!("Loading config from: {}", path.display());
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let config: ConfigFile = if is_json {
            serde_json::from_str(&text).map_err(|source| ConfigError::Json {
                path: path.to_path_buf(),
                source,
            })?
        } else {
            serde_yml::from_str(&text).map_err(|source| ConfigError::Yaml {
                path: path.to_path_buf(),
                source,
            })?
        };

        debug!("Parsed config file {}: {:?}", path.display(), config);
        Ok(config)
    }
}
