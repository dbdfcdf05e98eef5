//! IP address lookup functions.
//!
//! Each lookup answers `None` when the databases are not loaded, when the
//! address is loopback/private/link-local/unspecified, or when the database
//! has no data for it. Region, city and coordinates need a city-level database.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use maxminddb::geoip2;

use super::types::{Edition, GeoCoord};
use super::{databases, GeoDatabases};

fn is_reserved_v4(ip: Ipv4Addr) -> bool {
    ip.is_loopback()
        || ip.is_private()
        || ip.is_link_local()
        || ip.is_unspecified()
        || ip.is_broadcast()
}

fn is_reserved_v6(ip: Ipv6Addr) -> bool {
    let first = ip.segments()[0];
    ip.is_loopback()
        || ip.is_unspecified()
        || (first & 0xfe00) == 0xfc00 // unique local
        || (first & 0xffc0) == 0xfe80 // link local
        || ip.to_ipv4_mapped().is_some_and(is_reserved_v4)
}

/// Addresses no public geo database can place.
pub(crate) fn is_reserved(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => is_reserved_v4(v4),
        IpAddr::V6(v6) => is_reserved_v6(v6),
    }
}

fn with_city<R>(
    dbs: &GeoDatabases,
    ip: IpAddr,
    extract: impl FnOnce(&geoip2::City<'_>) -> Option<R>,
) -> Option<R> {
    if dbs.edition() != Edition::City {
        return None;
    }
    let lookup = dbs.reader_for(ip).lookup(ip).ok()?;
    if !lookup.has_data() {
        return None;
    }
    let city: geoip2::City = match lookup.decode() {
        Ok(Some(city)) => city,
        Ok(None) => return None,
        Err(e) => {
            log::debug!("Failed to decode GeoIP city record for {ip}: {e}");
            return None;
        }
    };
    extract(&city)
}

fn city_lookup<R>(
    ip: IpAddr,
    extract: impl FnOnce(&geoip2::City<'_>) -> Option<R>,
) -> Option<R> {
    if is_reserved(ip) {
        return None;
    }
    let dbs = databases()?;
    with_city(&dbs, ip, extract)
}

/// ISO 3166-1 country code of `ip`.
pub fn lookup_country(ip: IpAddr) -> Option<String> {
    if is_reserved(ip) {
        return None;
    }
    let dbs = databases()?;
    let lookup = dbs.reader_for(ip).lookup(ip).ok()?;
    if !lookup.has_data() {
        return None;
    }
    let country: geoip2::Country = match lookup.decode() {
        Ok(Some(country)) => country,
        Ok(None) => return None,
        Err(e) => {
            log::debug!("Failed to decode GeoIP country record for {ip}: {e}");
            return None;
        }
    };
    country.country.iso_code.map(|s| s.to_string())
}

/// ISO code of the first subdivision (state, province, county) of `ip`.
pub fn lookup_region(ip: IpAddr) -> Option<String> {
    city_lookup(ip, |city| {
        city.subdivisions
            .first()
            .and_then(|subdivision| subdivision.iso_code)
            .map(|s| s.to_string())
    })
}

/// English city name of `ip`.
pub fn lookup_city(ip: IpAddr) -> Option<String> {
    city_lookup(ip, |city| city.city.names.english.map(|s| s.to_string()))
}

/// Longitude and latitude of `ip`.
pub fn lookup_coords(ip: IpAddr) -> Option<GeoCoord> {
    city_lookup(ip, |city| {
        match (city.location.longitude, city.location.latitude) {
            (Some(longitude), Some(latitude)) => Some(GeoCoord {
                longitude,
                latitude,
            }),
            _ => None,
        }
    })
}
