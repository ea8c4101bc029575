//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `bulk_write_buffer` library that handles:
//! - Command-line argument parsing
//! - Logger initialization
//! - User-facing output formatting and exit codes
//!
//! Exit codes: `0` when every document was inserted, `2` when the import
//! finished but some lines or documents failed, `1` when the import aborted.

use anyhow::{Context, Result};
use clap::Parser;
use std::process;

use bulk_write_buffer::initialization::init_logger_with;
use bulk_write_buffer::{exit_code, run_import, Config};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::parse();

    let log_level = config.log_level.clone();
    let log_format = config.log_format.clone();
    init_logger_with(log_level.into(), log_format).context("Failed to initialize logger")?;

    let outcome = run_import(config).await;
    match &outcome {
        Ok(report) => {
            println!(
                "Inserted {} document{} into {} ({} failed, {} invalid line{}) in {:.1}s",
                report.inserted,
                if report.inserted == 1 { "" } else { "s" },
                report.collection,
                report.failed,
                report.invalid_lines,
                if report.invalid_lines == 1 { "" } else { "s" },
                report.elapsed_seconds
            );
            println!("Database: {}", report.db_path.display());
        }
        Err(e) => eprintln!("bulk_write_buffer error: {:#}", e),
    }

    let code = exit_code(&outcome);
    if code != 0 {
        process::exit(code);
    }
    Ok(())
}
