//! Export types and options.

use std::path::PathBuf;

pub use crate::config::ExportFormat;

/// Options for exporting rows.
#[derive(Clone, Debug)]
pub struct ExportOptions {
    /// Output file path (or stdout if None)
    pub output: Option<PathBuf>,
    /// Export format
    pub format: ExportFormat,
    /// Add a reverse-DNS column after every address column
    pub resolve_hostnames: bool,
    /// Add country/region/city/longitude/latitude columns after every address
    /// column (needs [`geoip::init_database`](crate::geoip::init_database))
    pub geoip: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            output: None,
            format: ExportFormat::Csv,
            resolve_hostnames: false,
            geoip: false,
        }
    }
}
