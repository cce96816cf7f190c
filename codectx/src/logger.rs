// codectx/src/logger.rs
//! Logging setup for the codectx binary.
//!
//! `RUST_LOG` is honoured with a default of `warn`. An explicit level passed
//! to [`init_logger`] overrides it: `Off` silences everything, any other
//! level applies to the codectx crates.

use env_logger::{Builder, Env};
use log::LevelFilter;

const DEFAULT_FILTER: &str = "warn";

/// Initializes the global logger once. Later calls are ignored.
pub fn init_logger(level: Option<LevelFilter>) {
    let mut builder = match level {
        Some(LevelFilter::Off) => {
            let mut quiet = Builder::new();
            quiet.filter_level(LevelFilter::Off);
            quiet
        }
        Some(level) => {
            let mut verbose = Builder::from_env(Env::default().default_filter_or(DEFAULT_FILTER));
            verbose.filter_module("codectx", level);
            verbose.filter_module("codectx_core", level);
            verbose
        }
        None => Builder::from_env(Env::default().default_filter_or(DEFAULT_FILTER)),
    };
    builder.format_timestamp(None).format_target(true);
    // Tests may have installed a logger already.
    let _ = builder.try_init();
}
