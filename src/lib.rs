//! www2csv library: W3C Extended Log Format parsing
//!
//! This library reads W3C extended log files (as written by IIS and other web
//! servers) into typed rows, and converts them to CSV or JSON Lines with
//! optional reverse-DNS and GeoIP enrichment of address fields.
//!
//! # Example
//!
//! ```no_run
//! use www2csv::w3c::W3CSource;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut source = W3CSource::open("u_ex020524.log")?;
//! println!("Software: {:?}", source.read_header()?.software);
//! for row in source {
//!     let row = row?;
//!     if let Some(ip) = row.get("c_ip").and_then(|v| v.as_address()) {
//!         println!("{ip} -> {:?}", ip.hostname());
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Command-line use
//!
//! [`run_export`] drives a whole conversion from a [`Config`]; the `www2csv`
//! binary is a thin wrapper around it.

mod app;
pub mod config;
pub mod datatypes;
pub mod dns;
pub mod error_handling;
pub mod export;
pub mod geoip;
pub mod initialization;
pub mod parse;
pub mod w3c;

// Re-export public API
pub use config::{Config, ExportFormat, LogFormat, LogLevel};
pub use datatypes::{Address, Filename, Hostname, Url, Value};
pub use error_handling::{DataWarning, ValueError, W3CError, WarningKind};
pub use run::{run_export, ExportReport};
pub use w3c::{Row, W3CSource};

// Internal run module (drives one conversion)
mod run {
    use anyhow::{Context, Result};
    use log::{debug, info};
    use std::io;
    use std::sync::Arc;
    use std::time::Instant;

    use crate::app::{print_export_summary, print_warning_statistics};
    use crate::config::{Config, ExportFormat};
    use crate::error_handling::WarningStats;
    use crate::export::{write_csv, write_jsonl, ExportOptions};
    use crate::geoip;
    use crate::w3c::W3CSource;

    /// Results of an export run.
    #[derive(Debug, Clone)]
    pub struct ExportReport {
        /// Rows written to the output
        pub rows_written: usize,
        /// Data lines dropped with a warning
        pub warnings: usize,
        /// Wall-clock duration of the run
        pub elapsed_seconds: f64,
    }

    /// Converts `config.file` to `config.format`.
    ///
    /// Loads the GeoIP databases first when configured; the IPv6 database
    /// defaults to the IPv4 one (and vice versa). `-` reads stdin.
    ///
    /// # Errors
    ///
    /// Returns an error if a GeoIP database or the log file cannot be opened,
    /// if the log header is invalid, or if the output cannot be written.
    pub fn run_export(config: Config) -> Result<ExportReport> {
        let start = Instant::now();

        if let Some(ipv4) = config.geoip_ipv4.as_ref().or(config.geoip_ipv6.as_ref()) {
            let ipv6 = config.geoip_ipv6.as_ref().unwrap_or(ipv4);
            geoip::init_database(ipv4, ipv6).context("Failed to initialize GeoIP database")?;
        }

        let opts = ExportOptions {
            output: config.output.clone(),
            format: config.format,
            resolve_hostnames: config.resolve_hostnames,
            geoip: config.geoip_enabled(),
        };
        let stats = Arc::new(WarningStats::new());

        let rows_written = if config.file.as_os_str() == "-" {
            info!("Reading log from stdin");
            let source = W3CSource::from_reader(io::stdin().lock());
            export(source, &opts, &stats)?
        } else {
            info!("Reading log from {}", config.file.display());
            let source = W3CSource::open(&config.file)
                .with_context(|| format!("Failed to open log file: {}", config.file.display()))?;
            export(source, &opts, &stats)?
        };

        let elapsed_seconds = start.elapsed().as_secs_f64();
        print_warning_statistics(&stats);
        print_export_summary(rows_written, stats.total(), elapsed_seconds);

        Ok(ExportReport {
            rows_written,
            warnings: stats.total(),
            elapsed_seconds,
        })
    }

    fn export<I>(
        source: W3CSource<I>,
        opts: &ExportOptions,
        stats: &Arc<WarningStats>,
    ) -> Result<usize>
    where
        I: Iterator<Item = io::Result<String>>,
    {
        let mut source = source.with_warnings(Arc::clone(stats));
        let rows = match opts.format {
            ExportFormat::Csv => write_csv(&mut source, opts),
            ExportFormat::Jsonl => write_jsonl(&mut source, opts),
        }
        .context("Export failed")?;
        debug!(
            "Log version {:?}, software {:?}, {} lines read",
            source.version(),
            source.software(),
            source.line_number()
        );
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    include!("tests.rs");
}
