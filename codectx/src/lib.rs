// codectx/src/lib.rs
//! # codectx CLI Application
//!
//! Command-line front end for `codectx-core`: argument parsing, config
//! merging, output naming and the text and Markdown renderers.

pub mod cli;
pub mod commands;
pub mod export;
pub mod logger;

pub use commands::extract::{run_extract, ExtractReport, ExtractSettings};
