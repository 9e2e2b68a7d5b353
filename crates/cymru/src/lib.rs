//! Map IP addresses and AS numbers to their BGP origin, peers and owner
//! through Team Cymru's IP-to-ASN DNS interface.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! #[tokio::main]
//! async fn main() -> cymru::Result<()> {
//!     let origin = cymru::origin("1.1.1.1".parse().unwrap()).await?;
//!     println!("{origin}");
//!     // 13335 | 1.1.1.0/24 | AU | apnic | 2011-08-11
//!
//!     let asn = cymru::asn(origin.asn).await?;
//!     println!("{}", asn.description);
//!     // CLOUDFLARENET - Cloudflare, Inc., US
//!
//!     Ok(())
//! }
//! ```
//!
//! The free functions share one default [`IpAsnClient`]. Build your own when
//! you need another resolver, network filter or strict parsing:
//!
//! ```rust,ignore
//! use cymru::{IpAsnClient, SystemResolver};
//!
//! let client = IpAsnClient::builder()
//!     .resolver(SystemResolver::with_nameserver("8.8.8.8:53".parse().unwrap()))
//!     .no_private_networks()
//!     .build();
//! ```
//!
//! # Features
//!
//! - `default` - Uses rustls for the DNS-over-HTTPS resolver
//! - `rustls` - Use rustls for TLS (recommended)
//! - `native-tls` - Use system native TLS

#![doc(html_root_url = "https://docs.rs/cymru/0.3.0")]

use std::net::IpAddr;
use std::sync::OnceLock;

// Re-export core types
pub use cymru_core::*;

// Re-export client
pub use cymru_client::{
    async_trait, ClientConfig, DohError, DohResolver, DohResolverBuilder, IpAsnClient,
    IpAsnClientBuilder, SystemResolver, TxtResolver, CLOUDFLARE_DOH, GOOGLE_DOH,
};

// Re-export runtime and value types for convenience
pub use chrono;
pub use ipnet;
pub use tokio;

static DEFAULT_CLIENT: OnceLock<IpAsnClient> = OnceLock::new();

/// The client used by [`origin`], [`peer`] and [`asn`].
///
/// Built on first use with [`IpAsnClient::new`] unless
/// [`set_default_client`] ran first.
pub fn default_client() -> &'static IpAsnClient {
    DEFAULT_CLIENT.get_or_init(IpAsnClient::new)
}

/// Install the client used by the free functions.
///
/// This only succeeds before the default client has been used or set; the
/// rejected client is handed back otherwise.
pub fn set_default_client(client: IpAsnClient) -> std::result::Result<(), IpAsnClient> {
    DEFAULT_CLIENT.set(client)
}

/// Map an IPv4 or IPv6 address to the BGP origin ASN of its prefix.
pub async fn origin(ip: IpAddr) -> Result<OriginInfo> {
    default_client().origin(ip).await
}

/// Map an address to the BGP peers one AS hop away from its origin.
pub async fn peer(ip: IpAddr) -> Result<PeerInfo> {
    default_client().peer(ip).await
}

/// Look up the description of an AS number.
pub async fn asn(asn: u32) -> Result<AsnInfo> {
    default_client().asn(asn).await
}
