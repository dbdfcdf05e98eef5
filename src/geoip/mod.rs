//! GeoIP lookup using MaxMind databases.
//!
//! Two databases are loaded side by side: one answers IPv4 queries, the other
//! IPv6 queries (they may be the same file). Until [`init_database`] succeeds
//! every lookup answers `None`.

mod lookup;
mod types;

// Re-export public API
pub use lookup::{lookup_city, lookup_coords, lookup_country, lookup_region};
pub use types::{Edition, GeoCoord, GeoIpError, GeoIpMetadata};

use std::net::IpAddr;
use std::path::Path;
use std::sync::{Arc, LazyLock, RwLock};

use maxminddb::Reader;

pub(crate) struct GeoDatabases {
    ipv4: Reader<Vec<u8>>,
    ipv6: Reader<Vec<u8>>,
    metadata: GeoIpMetadata,
}

impl GeoDatabases {
    pub(crate) fn reader_for(&self, ip: IpAddr) -> &Reader<Vec<u8>> {
        match ip {
            IpAddr::V4(_) => &self.ipv4,
            IpAddr::V6(_) => &self.ipv6,
        }
    }

    pub(crate) fn edition(&self) -> Edition {
        self.metadata.edition
    }
}

/// Process-wide database pair (replaced wholesale by `init_database`)
static GEOIP_DATABASES: LazyLock<RwLock<Option<Arc<GeoDatabases>>>> =
    LazyLock::new(|| RwLock::new(None));

pub(crate) fn databases() -> Option<Arc<GeoDatabases>> {
    GEOIP_DATABASES.read().ok()?.as_ref().map(Arc::clone)
}

fn load_reader(path: &Path) -> Result<Reader<Vec<u8>>, GeoIpError> {
    let bytes = std::fs::read(path).map_err(|source| GeoIpError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Reader::from_source(bytes).map_err(|e| GeoIpError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Loads (or replaces) the process-wide GeoIP databases.
///
/// # Errors
///
/// Returns an error if either file cannot be read or is not a MaxMind DB. The
/// previously loaded pair, if any, stays in place.
pub fn init_database(
    ipv4_path: impl AsRef<Path>,
    ipv6_path: impl AsRef<Path>,
) -> Result<GeoIpMetadata, GeoIpError> {
    let ipv4_path = ipv4_path.as_ref();
    let ipv6_path = ipv6_path.as_ref();

    log::info!("Loading GeoIP databases from {} and {}", ipv4_path.display(), ipv6_path.display());
    let ipv4 = load_reader(ipv4_path)?;
    let ipv6 = load_reader(ipv6_path)?;

    let database_type = ipv4.metadata.database_type.clone();
    let metadata = GeoIpMetadata {
        ipv4_source: ipv4_path.to_path_buf(),
        ipv6_source: ipv6_path.to_path_buf(),
        edition: Edition::from_database_type(&database_type),
        build_epoch: ipv4.metadata.build_epoch,
        database_type,
    };

    let loaded = Arc::new(GeoDatabases {
        ipv4,
        ipv6,
        metadata: metadata.clone(),
    });
    match GEOIP_DATABASES.write() {
        Ok(mut slot) => *slot = Some(loaded),
        Err(poisoned) => *poisoned.into_inner() = Some(loaded),
    }
    log::info!(
        "GeoIP databases loaded ({}, {:?} edition)",
        metadata.database_type,
        metadata.edition
    );
    Ok(metadata)
}

/// Unloads the databases; every lookup answers `None` afterwards.
pub fn reset() {
    match GEOIP_DATABASES.write() {
        Ok(mut slot) => *slot = None,
        Err(poisoned) => *poisoned.into_inner() = None,
    }
}

/// Checks if GeoIP is enabled (databases are loaded).
pub fn is_enabled() -> bool {
    databases().is_some()
}

/// Gets the metadata of the loaded databases, if any.
pub fn metadata() -> Option<GeoIpMetadata> {
    databases().map(|dbs| dbs.metadata.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_init_database_missing_file() {
        let missing = Path::new("nonexistent").join("GeoLite2-City.mmdb");
        let err = init_database(&missing, &missing).unwrap_err();
        assert!(matches!(err, GeoIpError::Read { .. }));
        assert!(err.to_string().contains("Failed to read GeoIP database"));
    }

    #[test]
    fn test_init_database_not_an_mmdb() {
        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(b"definitely not a maxmind database")
            .expect("write");
        let err = init_database(file.path(), file.path()).unwrap_err();
        assert!(matches!(err, GeoIpError::Parse { .. }));
    }
}
