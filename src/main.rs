//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `www2csv` library that handles:
//! - Command-line argument parsing
//! - Logger initialization
//! - User-facing output formatting
//!
//! All core functionality is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use std::process;

use www2csv::config::Opt;
use www2csv::initialization::init_logger_with;
use www2csv::{run_export, Config};

fn main() -> Result<()> {
    // Parse command-line arguments into Config
    let config = Config::from(Opt::parse());

    let log_level = config.log_level.clone();
    let log_format = config.log_format.clone();
    init_logger_with(log_level.into(), log_format).context("Failed to initialize logger")?;

    let to_stdout = config.output.is_none();
    match run_export(config) {
        Ok(report) => {
            let summary = format!(
                "Converted {} row{} ({} dropped) in {:.1}s",
                report.rows_written,
                if report.rows_written == 1 { "" } else { "s" },
                report.warnings,
                report.elapsed_seconds
            );
            // Rows already occupy stdout
            if to_stdout {
                eprintln!("{summary}");
            } else {
                println!("{summary}");
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("www2csv error: {:#}", e);
            process::exit(1);
        }
    }
}
