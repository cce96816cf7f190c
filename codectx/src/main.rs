// codectx/src/main.rs
//! codectx entry point.

use anyhow::Result;
use clap::Parser;
use codectx::cli::{Cli, Commands};
use codectx::commands::extract::{render_skip_summary, render_walk_errors, run_extract};
use codectx::logger;
use codectx_core::{summarize_skipped, DEFAULT_ROOT_LIMIT};
use log::LevelFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.quiet {
        Some(LevelFilter::Off)
    } else if cli.verbose {
        Some(LevelFilter::Debug)
    } else {
        None
    };
    logger::init_logger(level);

    let command_line = std::env::args().skip(1).collect::<Vec<_>>().join(" ");

    match cli.command {
        Commands::Extract(cmd) => {
            let report = run_extract(&cmd, command_line).await?;
            if cli.verbose {
                println!(
                    "Wrote {} files to {}",
                    report.result.files.len(),
                    report.output_path.display()
                );
                let summary = summarize_skipped(&report.result.skipped, DEFAULT_ROOT_LIMIT);
                for line in render_skip_summary(&summary) {
                    println!("{}", line);
                }
                for line in render_walk_errors(&report.result.walk_errors) {
                    println!("{}", line);
                }
            }
        }
    }

    Ok(())
}
