//! Main IP-to-ASN client implementation.

use cymru_core::{
    asn_query_name, ip_query_name, AsnInfo, IpAsnError, NetworkFilter, OriginInfo, PeerInfo,
    QueryKind, Result,
};
use std::fmt;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::config::ClientConfig;
use crate::resolver::{SystemResolver, TxtResolver};

/// Client for Team Cymru's IP-to-ASN DNS interface.
///
/// Uses [`SystemResolver`] unless another [`TxtResolver`] is supplied, and
/// refuses to look up addresses covered by
/// [`NetworkFilter::default_private`] unless another filter is supplied.
///
/// The client is immutable once built and cheap to clone; clones share the
/// resolver.
#[derive(Clone)]
pub struct IpAsnClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    resolver: Arc<dyn TxtResolver>,
    private_networks: NetworkFilter,
    config: ClientConfig,
}

impl Default for IpAsnClient {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for IpAsnClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IpAsnClient")
            .field("private_networks", &self.inner.private_networks)
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

impl IpAsnClient {
    /// Create a client with the system resolver and default private networks
    #[must_use]
    pub fn new() -> Self {
        IpAsnClientBuilder::new().build()
    }

    /// Create a builder for custom configuration
    #[must_use]
    pub fn builder() -> IpAsnClientBuilder {
        IpAsnClientBuilder::new()
    }

    /// The filter applied before origin and peer lookups
    #[must_use]
    pub fn private_networks(&self) -> &NetworkFilter {
        &self.inner.private_networks
    }

    /// The client configuration
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// Map an IPv4 or IPv6 address to the BGP origin ASN of its prefix.
    ///
    /// A record with an unexpected shape yields an empty [`OriginInfo`]
    /// rather than an error, unless strict parsing is enabled.
    #[instrument(skip(self), fields(kind = "origin"))]
    pub async fn origin(&self, ip: IpAddr) -> Result<OriginInfo> {
        self.check_ip(ip)?;

        let record = self.lookup_record(&ip_query_name(ip, QueryKind::Origin)).await?;
        OriginInfo::from_record(&record, self.inner.config.parse_mode)
    }

    /// Map an address to the BGP peers one AS hop away from the origin of
    /// its prefix.
    #[instrument(skip(self), fields(kind = "peer"))]
    pub async fn peer(&self, ip: IpAddr) -> Result<PeerInfo> {
        self.check_ip(ip)?;

        let record = self.lookup_record(&ip_query_name(ip, QueryKind::Peer)).await?;
        PeerInfo::from_record(&record, self.inner.config.parse_mode)
    }

    /// Look up the description of an AS number.
    ///
    /// The private network checks do not apply here.
    #[instrument(skip(self), fields(kind = "asn"))]
    pub async fn asn(&self, asn: u32) -> Result<AsnInfo> {
        let record = self.lookup_record(&asn_query_name(asn)).await?;
        AsnInfo::from_record(&record, self.inner.config.parse_mode)
    }

    /// Check that an address is worth asking about.
    ///
    /// The checks run in order and the first one that matches decides the
    /// error: unspecified, loopback, multicast, then the private filter.
    pub fn check_ip(&self, ip: IpAddr) -> Result<()> {
        let ip = ip.to_canonical();

        if ip.is_unspecified() {
            Err(IpAsnError::IpIsUnspecified)
        } else if ip.is_loopback() {
            Err(IpAsnError::IpIsLoopback)
        } else if ip.is_multicast() {
            Err(IpAsnError::IpIsMulticast)
        } else if self.inner.private_networks.contains(ip) {
            Err(IpAsnError::IpIsPrivate)
        } else {
            Ok(())
        }
    }

    /// Fetch the TXT records for `name` and return the first one.
    async fn lookup_record(&self, name: &str) -> Result<String> {
        debug!(name, "TXT lookup");

        let lookup = self.inner.resolver.lookup_txt(name);
        let records = match self.inner.config.timeout {
            Some(limit) => tokio::time::timeout(limit, lookup)
                .await
                .map_err(|_| IpAsnError::Timeout(limit))??,
            None => lookup.await?,
        };

        debug!(name, records = records.len(), "TXT answer");

        records.into_iter().next().ok_or(IpAsnError::NotFound)
    }
}

/// Builder for configuring an [`IpAsnClient`]
#[derive(Default)]
pub struct IpAsnClientBuilder {
    resolver: Option<Arc<dyn TxtResolver>>,
    private_networks: Option<NetworkFilter>,
    config: ClientConfig,
}

impl IpAsnClientBuilder {
    /// Create a new builder with default settings
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use the given resolver
    #[must_use]
    pub fn resolver(mut self, resolver: impl TxtResolver + 'static) -> Self {
        self.resolver = Some(Arc::new(resolver));
        self
    }

    /// Use a resolver shared with other clients
    #[must_use]
    pub fn shared_resolver(mut self, resolver: Arc<dyn TxtResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Replace the private network filter
    #[must_use]
    pub fn private_networks(mut self, filter: NetworkFilter) -> Self {
        self.private_networks = Some(filter);
        self
    }

    /// Turn off private network filtering
    #[must_use]
    pub fn no_private_networks(self) -> Self {
        self.private_networks(NetworkFilter::disabled())
    }

    /// Set the whole configuration
    #[must_use]
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Report malformed records as errors
    #[must_use]
    pub fn strict(mut self, strict: bool) -> Self {
        self.config = self.config.strict(strict);
        self
    }

    /// Bound each lookup by `timeout`
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.timeout(timeout);
        self
    }

    /// Build the client
    #[must_use]
    pub fn build(self) -> IpAsnClient {
        let resolver: Arc<dyn TxtResolver> = match self.resolver {
            Some(resolver) => resolver,
            None => Arc::new(SystemResolver::new()),
        };

        IpAsnClient {
            inner: Arc::new(ClientInner {
                resolver,
                private_networks: self.private_networks.unwrap_or_default(),
                config: self.config,
            }),
        }
    }
}
