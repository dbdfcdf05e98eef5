//! GeoIP data structures.

use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

/// A geographic position as reported by the city-level database.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoCoord {
    pub longitude: f64,
    pub latitude: f64,
}

/// Granularity of the loaded databases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Edition {
    /// Country codes only
    Country,
    /// Country, region, city and coordinates
    City,
}

impl Edition {
    /// Derives the edition from the MMDB `database_type` metadata field
    /// (e.g. `GeoLite2-City`, `GeoIP2-Country`).
    pub fn from_database_type(database_type: &str) -> Self {
        if database_type.contains("City") {
            Edition::City
        } else {
            Edition::Country
        }
    }
}

/// Metadata about the loaded pair of databases.
#[derive(Debug, Clone, Serialize)]
pub struct GeoIpMetadata {
    pub ipv4_source: PathBuf,
    pub ipv6_source: PathBuf,
    /// `database_type` of the IPv4 database
    pub database_type: String,
    pub edition: Edition,
    /// Build epoch of the IPv4 database
    pub build_epoch: u64,
}

/// Failure to load a GeoIP database.
#[derive(Error, Debug)]
pub enum GeoIpError {
    #[error("Failed to read GeoIP database from {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse GeoIP database from {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },
}
