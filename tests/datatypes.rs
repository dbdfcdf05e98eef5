//! Tests for value-type enrichment through an installed resolver.

use std::collections::HashSet;
use std::net::{IpAddr, Ipv4Addr};
use std::sync::{Arc, Once};

use www2csv::dns::{self, Resolve};
use www2csv::{Address, Hostname, ValueError};

struct TableResolver;

const WEB: Ipv4Addr = Ipv4Addr::new(192, 0, 2, 10);

impl Resolve for TableResolver {
    fn resolve_forward(&self, name: &str) -> Option<IpAddr> {
        (name == "www.example.com").then_some(IpAddr::V4(WEB))
    }

    fn resolve_reverse(&self, ip: IpAddr) -> Option<String> {
        (ip == IpAddr::V4(WEB)).then(|| "www.example.com".to_string())
    }
}

fn install_resolver() {
    static INSTALL: Once = Once::new();
    INSTALL.call_once(|| dns::set_resolver(Arc::new(TableResolver)));
}

#[test]
fn test_hostname_resolves_forward() {
    install_resolver();
    let host = Hostname::parse("WWW.Example.com").unwrap();
    let address = host.address().expect("mapped");
    assert_eq!(address.ip(), IpAddr::V4(WEB));
    assert_eq!(address.to_string(), "192.0.2.10");
    // Case is kept for display
    assert_eq!(host.to_string(), "WWW.Example.com");
}

#[test]
fn test_address_resolves_reverse() {
    install_resolver();
    let address = Address::parse("192.0.2.10:443").unwrap();
    assert_eq!(address.port(), Some(443));
    let host = address.hostname().expect("mapped");
    assert_eq!(host, &Hostname::parse("www.example.com").unwrap());
    assert_eq!(host.address().map(Address::ip), Some(address.ip()));
}

#[test]
fn test_unmapped_values() {
    install_resolver();
    assert!(Hostname::parse("nowhere.example.org").unwrap().address().is_none());
    assert!(Address::parse("198.51.100.7").unwrap().hostname().is_none());
    assert!(Hostname::parse("anything.invalid").unwrap().address().is_none());
}

#[test]
fn test_addresses_as_set_members() {
    let set: HashSet<Address> = ["10.0.0.1", "10.0.0.1", "10.0.0.1:80", "[::1]", "::1"]
        .into_iter()
        .map(|raw| Address::parse(raw).unwrap())
        .collect();
    assert_eq!(set.len(), 3);
}

#[test]
fn test_validation_errors() {
    assert!(matches!(
        Hostname::parse("bad_host"),
        Err(ValueError::Hostname { .. })
    ));
    assert!(matches!(
        Address::parse("10.0.0.1:70000"),
        Err(ValueError::Port(_))
    ));
}
