//! TXT resolver abstraction and the system-backed implementation.

use async_trait::async_trait;
use cymru_core::{IpAsnError, Result};
use hickory_resolver::config::{NameServerConfigGroup, ResolverConfig};
use hickory_resolver::name_server::TokioConnectionProvider;
use hickory_resolver::TokioResolver;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{debug, warn};

/// Anything that can fetch the TXT records for a DNS name.
///
/// Implementations return the raw record values as received. An empty list
/// means the name exists but has no TXT data; the client reports that as
/// [`IpAsnError::NotFound`]. Failures are returned as
/// [`IpAsnError::Resolver`] and passed to the caller untouched.
///
/// Dropping the returned future cancels the lookup.
#[async_trait]
pub trait TxtResolver: Send + Sync {
    /// Look up the TXT records of `name`.
    async fn lookup_txt(&self, name: &str) -> Result<Vec<String>>;
}

#[async_trait]
impl<R: TxtResolver + ?Sized> TxtResolver for Arc<R> {
    async fn lookup_txt(&self, name: &str) -> Result<Vec<String>> {
        (**self).lookup_txt(name).await
    }
}

/// Resolver backed by hickory using the system configuration.
#[derive(Clone)]
pub struct SystemResolver {
    resolver: TokioResolver,
}

impl Default for SystemResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemResolver {
    /// Create a resolver from `/etc/resolv.conf` (or the platform equivalent),
    /// falling back to hickory's default upstreams if that cannot be read.
    #[must_use]
    pub fn new() -> Self {
        Self::from_system_conf().unwrap_or_else(|e| {
            warn!(error = %e, "system resolver configuration unavailable, using defaults");
            Self::with_config(ResolverConfig::default())
        })
    }

    /// Create a resolver strictly from the system configuration.
    pub fn from_system_conf() -> Result<Self> {
        let resolver = TokioResolver::builder_tokio()
            .map_err(IpAsnError::resolver)?
            .build();
        Ok(Self { resolver })
    }

    /// Create a resolver that only asks the given upstream server, over UDP
    /// with TCP fallback.
    #[must_use]
    pub fn with_nameserver(addr: SocketAddr) -> Self {
        let servers = NameServerConfigGroup::from_ips_clear(&[addr.ip()], addr.port(), true);
        Self::with_config(ResolverConfig::from_parts(None, vec![], servers))
    }

    /// Create a resolver from an explicit hickory configuration.
    #[must_use]
    pub fn with_config(config: ResolverConfig) -> Self {
        let resolver =
            TokioResolver::builder_with_config(config, TokioConnectionProvider::default()).build();
        Self { resolver }
    }

    /// Wrap an already configured hickory resolver.
    #[must_use]
    pub const fn from_resolver(resolver: TokioResolver) -> Self {
        Self { resolver }
    }
}

#[async_trait]
impl TxtResolver for SystemResolver {
    async fn lookup_txt(&self, name: &str) -> Result<Vec<String>> {
        match self.resolver.txt_lookup(name).await {
            Ok(lookup) => Ok(lookup
                .iter()
                .map(|txt| {
                    txt.iter()
                        .map(|data| String::from_utf8_lossy(data))
                        .collect::<String>()
                })
                .collect()),
            Err(e) if e.is_no_records_found() => {
                debug!(name, "no TXT records");
                Ok(Vec::new())
            }
            Err(e) => Err(IpAsnError::resolver(e)),
        }
    }
}
