//! IPv4/IPv6 addresses with an optional port, plus lazy DNS and GeoIP facts.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::sync::OnceLock;

use crate::dns;
use crate::error_handling::ValueError;
use crate::geoip::{self, GeoCoord};

use super::Hostname;

/// The four literal shapes an address token can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressKind {
    /// `127.0.0.1`
    Ipv4Address(Ipv4Addr),
    /// `::1`
    Ipv6Address(Ipv6Addr),
    /// `127.0.0.1:80`
    Ipv4Port(Ipv4Addr, u16),
    /// `[::1]:80`, or `[::1]` which carries no port
    Ipv6Port(Ipv6Addr, Option<u16>),
}

/// A parsed network address.
///
/// Equality and hashing use the binary address and the port (or its absence),
/// so `::1` and `[::1]` are equal. Enrichment properties are computed on first
/// access and cached on the value; a collaborator with no answer gives `None`.
#[derive(Clone)]
pub struct Address {
    kind: AddressKind,
    hostname: OnceLock<Option<Hostname>>,
    country: OnceLock<Option<String>>,
    region: OnceLock<Option<String>>,
    city: OnceLock<Option<String>>,
    coords: OnceLock<Option<GeoCoord>>,
}

fn parse_port(raw: &str, digits: &str) -> Result<u16, ValueError> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValueError::Address(raw.to_string()));
    }
    if digits.len() > 5 {
        return Err(ValueError::Port(raw.to_string()));
    }
    let port: u32 = digits
        .parse()
        .map_err(|_| ValueError::Port(raw.to_string()))?;
    u16::try_from(port).map_err(|_| ValueError::Port(raw.to_string()))
}

fn parse_kind(raw: &str) -> Result<AddressKind, ValueError> {
    let invalid = || ValueError::Address(raw.to_string());

    if let Some(rest) = raw.strip_prefix('[') {
        let (inner, tail) = rest.split_once(']').ok_or_else(invalid)?;
        let ip: Ipv6Addr = inner.parse().map_err(|_| invalid())?;
        let port = match tail {
            "" => None,
            tail => {
                let digits = tail.strip_prefix(':').ok_or_else(invalid)?;
                Some(parse_port(raw, digits)?)
            }
        };
        return Ok(AddressKind::Ipv6Port(ip, port));
    }

    if let Ok(ip) = raw.parse::<Ipv4Addr>() {
        return Ok(AddressKind::Ipv4Address(ip));
    }
    if let Some((host, digits)) = raw.split_once(':') {
        if let Ok(ip) = host.parse::<Ipv4Addr>() {
            return Ok(AddressKind::Ipv4Port(ip, parse_port(raw, digits)?));
        }
    }
    // A bare IPv6 literal never takes a port.
    raw.parse::<Ipv6Addr>()
        .map(AddressKind::Ipv6Address)
        .map_err(|_| invalid())
}

impl Address {
    /// Parses an address literal without any enrichment.
    ///
    /// Accepted forms are `a.b.c.d`, `a.b.c.d:port`, a bare IPv6 literal,
    /// `[ipv6]` and `[ipv6]:port`.
    ///
    /// # Errors
    ///
    /// [`ValueError::Port`] for a port above 65535, [`ValueError::Address`]
    /// for anything else that is not one of the accepted forms.
    pub fn parse(raw: &str) -> Result<Self, ValueError> {
        parse_kind(raw).map(Self::new)
    }

    pub fn new(kind: AddressKind) -> Self {
        Self {
            kind,
            hostname: OnceLock::new(),
            country: OnceLock::new(),
            region: OnceLock::new(),
            city: OnceLock::new(),
            coords: OnceLock::new(),
        }
    }

    pub fn kind(&self) -> AddressKind {
        self.kind
    }

    pub fn ip(&self) -> IpAddr {
        match self.kind {
            AddressKind::Ipv4Address(ip) | AddressKind::Ipv4Port(ip, _) => IpAddr::V4(ip),
            AddressKind::Ipv6Address(ip) | AddressKind::Ipv6Port(ip, _) => IpAddr::V6(ip),
        }
    }

    pub fn port(&self) -> Option<u16> {
        match self.kind {
            AddressKind::Ipv4Port(_, port) => Some(port),
            AddressKind::Ipv6Port(_, port) => port,
            AddressKind::Ipv4Address(_) | AddressKind::Ipv6Address(_) => None,
        }
    }

    /// Reverse DNS name of the address.
    pub fn hostname(&self) -> Option<&Hostname> {
        self.hostname
            .get_or_init(|| {
                let name = dns::resolve_reverse(self.ip())?;
                match Hostname::parse(&name) {
                    Ok(hostname) => Some(hostname),
                    Err(e) => {
                        log::debug!("Ignoring reverse DNS answer for {}: {e}", self.ip());
                        None
                    }
                }
            })
            .as_ref()
    }

    /// ISO country code from the GeoIP database.
    pub fn country(&self) -> Option<&str> {
        self.country
            .get_or_init(|| geoip::lookup_country(self.ip()))
            .as_deref()
    }

    /// Region (first subdivision) code; needs a city-level database.
    pub fn region(&self) -> Option<&str> {
        self.region
            .get_or_init(|| geoip::lookup_region(self.ip()))
            .as_deref()
    }

    /// City name; needs a city-level database.
    pub fn city(&self) -> Option<&str> {
        self.city
            .get_or_init(|| geoip::lookup_city(self.ip()))
            .as_deref()
    }

    /// Longitude and latitude; needs a city-level database.
    pub fn coords(&self) -> Option<GeoCoord> {
        *self.coords.get_or_init(|| geoip::lookup_coords(self.ip()))
    }
}

impl From<IpAddr> for Address {
    fn from(ip: IpAddr) -> Self {
        match ip {
            IpAddr::V4(v4) => Self::new(AddressKind::Ipv4Address(v4)),
            IpAddr::V6(v6) => Self::new(AddressKind::Ipv6Address(v6)),
        }
    }
}

impl PartialEq for Address {
    fn eq(&self, other: &Self) -> bool {
        self.ip() == other.ip() && self.port() == other.port()
    }
}

impl Eq for Address {}

impl Hash for Address {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.ip().hash(state);
        self.port().hash(state);
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            AddressKind::Ipv4Address(ip) => write!(f, "{ip}"),
            AddressKind::Ipv6Address(ip) | AddressKind::Ipv6Port(ip, None) => write!(f, "{ip}"),
            AddressKind::Ipv4Port(ip, port) => write!(f, "{ip}:{port}"),
            AddressKind::Ipv6Port(ip, Some(port)) => write!(f, "[{ip}]:{port}"),
        }
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Address").field(&self.kind).finish()
    }
}

impl std::str::FromStr for Address {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
