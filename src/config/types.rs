//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and configuration.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Output format for converted rows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    /// CSV with one header row of sanitized field names
    Csv,
    /// One JSON object per row
    Jsonl,
}

/// Library configuration (no CLI dependencies).
///
/// # Examples
///
/// ```no_run
/// use www2csv::Config;
/// use std::path::PathBuf;
///
/// let config = Config {
///     file: PathBuf::from("u_ex020524.log"),
///     resolve_hostnames: true,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Log file to convert (`-` reads stdin)
    pub file: PathBuf,

    /// Output path (stdout if None)
    pub output: Option<PathBuf>,

    /// Output format
    pub format: ExportFormat,

    /// Log level
    pub log_level: LogLevel,

    /// Log format
    pub log_format: LogFormat,

    /// Add a reverse-DNS column for every address column
    pub resolve_hostnames: bool,

    /// GeoIP database keyed by IPv4 ranges
    pub geoip_ipv4: Option<PathBuf>,

    /// GeoIP database keyed by IPv6 ranges (defaults to the IPv4 database)
    pub geoip_ipv6: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            file: PathBuf::from("-"),
            output: None,
            format: ExportFormat::Csv,
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
            resolve_hostnames: false,
            geoip_ipv4: None,
            geoip_ipv6: None,
        }
    }
}

impl Config {
    /// Whether GeoIP columns should be produced.
    pub fn geoip_enabled(&self) -> bool {
        self.geoip_ipv4.is_some() || self.geoip_ipv6.is_some()
    }
}

/// Command-line options for the `www2csv` binary.
#[derive(Debug, Parser)]
#[command(
    name = "www2csv",
    version,
    about = "Convert W3C extended log files (IIS) to CSV or JSON Lines"
)]
pub struct Opt {
    /// Log file to convert, or `-` for stdin
    pub file: PathBuf,

    /// Write output to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = ExportFormat::Csv)]
    pub format: ExportFormat,

    /// Log level
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,

    /// Add a reverse-DNS hostname column for every address column
    #[arg(long)]
    pub resolve: bool,

    /// MaxMind database used for IPv4 lookups
    #[arg(long, value_name = "PATH")]
    pub geoip_ipv4: Option<PathBuf>,

    /// MaxMind database used for IPv6 lookups
    #[arg(long, value_name = "PATH")]
    pub geoip_ipv6: Option<PathBuf>,
}

impl From<Opt> for Config {
    fn from(opt: Opt) -> Self {
        Self {
            file: opt.file,
            output: opt.output,
            format: opt.format,
            log_level: opt.log_level,
            log_format: opt.log_format,
            resolve_hostnames: opt.resolve,
            geoip_ipv4: opt.geoip_ipv4,
            geoip_ipv6: opt.geoip_ipv6,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(
            log::LevelFilter::from(LogLevel::Error),
            log::LevelFilter::Error
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Warn),
            log::LevelFilter::Warn
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Info),
            log::LevelFilter::Info
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Debug),
            log::LevelFilter::Debug
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Trace),
            log::LevelFilter::Trace
        );
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.file, PathBuf::from("-"));
        assert_eq!(config.format, ExportFormat::Csv);
        assert!(config.output.is_none());
        assert!(!config.resolve_hostnames);
        assert!(!config.geoip_enabled());
    }

    #[test]
    fn test_opt_into_config() {
        let opt = Opt::parse_from([
            "www2csv",
            "access.log",
            "--format",
            "jsonl",
            "--resolve",
            "--geoip-ipv4",
            "GeoLite2-City.mmdb",
        ]);
        let config = Config::from(opt);
        assert_eq!(config.file, PathBuf::from("access.log"));
        assert_eq!(config.format, ExportFormat::Jsonl);
        assert!(config.resolve_hostnames);
        assert!(config.geoip_enabled());
        assert!(config.geoip_ipv6.is_none());
    }

    #[test]
    fn test_opt_requires_file() {
        assert!(Opt::try_parse_from(["www2csv"]).is_err());
    }
}
