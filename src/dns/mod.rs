//! DNS collaborator used by [`Hostname`](crate::datatypes::Hostname) and
//! [`Address`](crate::datatypes::Address) enrichment.
//!
//! - [`resolve_forward`]: name → address
//! - [`resolve_reverse`]: address → name
//!
//! Loopback names and addresses, the unspecified addresses and the reserved
//! `.invalid` TLD are answered without a network round trip. Every other
//! answer (including "no mapping") is memoized for the life of the process.

mod resolution;

pub use resolution::{Resolve, SystemResolver};

use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::sync::{Arc, LazyLock, RwLock};

use crate::config::INVALID_TLD;

type ForwardCache = RwLock<HashMap<String, Option<IpAddr>>>;
type ReverseCache = RwLock<HashMap<IpAddr, Option<String>>>;

static RESOLVER: LazyLock<RwLock<Arc<dyn Resolve>>> =
    LazyLock::new(|| RwLock::new(Arc::new(SystemResolver::new())));

static FORWARD_CACHE: LazyLock<ForwardCache> = LazyLock::new(|| RwLock::new(HashMap::new()));
static REVERSE_CACHE: LazyLock<ReverseCache> = LazyLock::new(|| RwLock::new(HashMap::new()));

/// Installs the resolver used for every lookup not answered locally.
///
/// Clears both memo caches.
pub fn set_resolver(resolver: Arc<dyn Resolve>) {
    if let Ok(mut current) = RESOLVER.write() {
        *current = resolver;
    }
    clear_cache();
}

/// Forgets every memoized answer.
pub fn clear_cache() {
    if let Ok(mut cache) = FORWARD_CACHE.write() {
        cache.clear();
    }
    if let Ok(mut cache) = REVERSE_CACHE.write() {
        cache.clear();
    }
}

fn current_resolver() -> Option<Arc<dyn Resolve>> {
    RESOLVER.read().ok().map(|r| Arc::clone(&r))
}

/// Answers that never need a name server: `Some(answer)` when known locally.
fn well_known_forward(name: &str) -> Option<Option<IpAddr>> {
    match name {
        "localhost" => return Some(Some(IpAddr::V4(Ipv4Addr::LOCALHOST))),
        "ip6-localhost" | "ip6-loopback" => return Some(Some(IpAddr::V6(Ipv6Addr::LOCALHOST))),
        _ => {}
    }
    if let Ok(ip) = name.parse::<IpAddr>() {
        return Some(Some(ip));
    }
    let tld = name.rsplit('.').next().unwrap_or(name);
    if tld == INVALID_TLD {
        return Some(None);
    }
    None
}

fn well_known_reverse(ip: IpAddr) -> Option<Option<String>> {
    if ip.is_unspecified() {
        return Some(None);
    }
    match ip {
        IpAddr::V4(v4) if v4 == Ipv4Addr::LOCALHOST => Some(Some("localhost".to_string())),
        IpAddr::V6(v6) if v6 == Ipv6Addr::LOCALHOST => Some(Some("ip6-localhost".to_string())),
        _ => None,
    }
}

/// Resolves `name` to its first address, or `None` when there is no mapping.
pub fn resolve_forward(name: &str) -> Option<IpAddr> {
    let key = name.to_ascii_lowercase();
    if let Some(answer) = well_known_forward(&key) {
        return answer;
    }

    if let Some(hit) = FORWARD_CACHE
        .read()
        .ok()
        .and_then(|cache| cache.get(&key).copied())
    {
        return hit;
    }

    let answer = current_resolver().and_then(|r| r.resolve_forward(&key));
    if let Ok(mut cache) = FORWARD_CACHE.write() {
        cache.insert(key, answer);
    }
    answer
}

/// Resolves `ip` to a host name, or `None` when there is no mapping.
pub fn resolve_reverse(ip: IpAddr) -> Option<String> {
    if let Some(answer) = well_known_reverse(ip) {
        return answer;
    }

    if let Some(hit) = REVERSE_CACHE
        .read()
        .ok()
        .and_then(|cache| cache.get(&ip).cloned())
    {
        return hit;
    }

    let answer = current_resolver().and_then(|r| r.resolve_reverse(ip));
    if let Ok(mut cache) = REVERSE_CACHE.write() {
        cache.insert(ip, answer.clone());
    }
    answer
}
