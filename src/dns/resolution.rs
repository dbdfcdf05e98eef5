//! Forward and reverse resolution against real name servers.
//!
//! The parser is synchronous, so [`SystemResolver`] owns a private
//! current-thread Tokio runtime and blocks on `hickory-resolver` lookups.
//! The runtime is only built on the first network query.

use std::net::IpAddr;
use std::sync::OnceLock;
use std::time::Duration;

use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use hickory_resolver::TokioAsyncResolver;
use tokio::runtime::{Builder, Runtime};

use crate::config::{DNS_ATTEMPTS, DNS_TIMEOUT_SECS};

/// A source of forward (name → address) and reverse (address → name) answers.
///
/// Implementations must never fail loudly: any resolution failure is `None`.
/// Callers must not invoke these from inside an async runtime; lookups block.
pub trait Resolve: Send + Sync {
    fn resolve_forward(&self, name: &str) -> Option<IpAddr>;
    fn resolve_reverse(&self, ip: IpAddr) -> Option<String>;
}

struct ResolverRuntime {
    runtime: Runtime,
    resolver: TokioAsyncResolver,
}

/// Resolver backed by `hickory-resolver` with short timeouts.
#[derive(Default)]
pub struct SystemResolver {
    state: OnceLock<Option<ResolverRuntime>>,
}

impl SystemResolver {
    pub fn new() -> Self {
        Self::default()
    }

    fn runtime(&self) -> Option<&ResolverRuntime> {
        self.state
            .get_or_init(|| match init_resolver_runtime() {
                Ok(state) => Some(state),
                Err(e) => {
                    log::warn!("Failed to start DNS resolver runtime: {e}. Name resolution disabled.");
                    None
                }
            })
            .as_ref()
    }
}

fn init_resolver_runtime() -> std::io::Result<ResolverRuntime> {
    let runtime = Builder::new_current_thread().enable_all().build()?;

    let mut opts = ResolverOpts::default();
    opts.timeout = Duration::from_secs(DNS_TIMEOUT_SECS);
    opts.attempts = DNS_ATTEMPTS;
    opts.ndots = 0;

    let resolver = {
        let _guard = runtime.enter();
        TokioAsyncResolver::tokio(ResolverConfig::default(), opts)
    };

    Ok(ResolverRuntime { runtime, resolver })
}

impl Resolve for SystemResolver {
    fn resolve_forward(&self, name: &str) -> Option<IpAddr> {
        let state = self.runtime()?;
        match state.runtime.block_on(state.resolver.lookup_ip(name)) {
            Ok(response) => response.iter().next(),
            Err(e) => {
                log::debug!("Forward lookup failed for {name}: {e}");
                None
            }
        }
    }

    fn resolve_reverse(&self, ip: IpAddr) -> Option<String> {
        let state = self.runtime()?;
        match state.runtime.block_on(state.resolver.reverse_lookup(ip)) {
            Ok(response) => response
                .iter()
                .next()
                .map(|name| name.to_utf8().trim_end_matches('.').to_string()),
            Err(e) => {
                log::debug!("Reverse lookup failed for {ip}: {e}");
                None
            }
        }
    }
}
