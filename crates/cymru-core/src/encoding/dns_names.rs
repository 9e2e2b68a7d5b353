//! DNS name encoding for IP-to-ASN lookups.
//!
//! IPv4 addresses are published under `origin.asn.cymru.com.` and
//! `peer.asn.cymru.com.` with their octets reversed. IPv6 addresses use the
//! reversed nibble form familiar from `ip6.arpa`, under `origin6.asn.cymru.com.`.
//!
//! Every octet is written out. Cymru documents that a prefix such as
//! `216.90.108` may be sent as `108.90.216`; the encoder always sends
//! `0.108.90.216` instead.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;

/// Zone suffix shared by every query.
pub const CYMRU_ZONE: &str = "asn.cymru.com.";

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// Which mapping is being asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryKind {
    /// BGP origin ASN of the prefix
    Origin,
    /// BGP peers one AS hop away from the origin
    Peer,
}

impl QueryKind {
    /// Zone label used for IPv4 addresses.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Origin => "origin",
            Self::Peer => "peer",
        }
    }

    /// Zone label used for IPv6 addresses.
    ///
    /// Only the origin zone has a separate IPv6 name.
    #[must_use]
    pub const fn label_v6(self) -> &'static str {
        match self {
            Self::Origin => "origin6",
            Self::Peer => "peer",
        }
    }
}

impl fmt::Display for QueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Build the DNS question name for an address.
///
/// No validation happens here; callers are expected to have rejected
/// unroutable addresses first.
///
/// Example: `216.90.108.31` -> `"31.108.90.216.origin.asn.cymru.com."`
#[must_use]
pub fn ip_query_name(ip: IpAddr, kind: QueryKind) -> String {
    match ip.to_canonical() {
        IpAddr::V4(v4) => {
            let [a, b, c, d] = v4.octets();
            format!("{d}.{c}.{b}.{a}.{}.{CYMRU_ZONE}", kind.label())
        }
        IpAddr::V6(v6) => {
            let zone = kind.label_v6();
            let octets = v6.octets();
            let mut name = String::with_capacity(octets.len() * 4 + zone.len() + 1 + CYMRU_ZONE.len());

            for byte in octets.iter().rev() {
                name.push(char::from(HEX_DIGITS[usize::from(byte & 0x0f)]));
                name.push('.');
                name.push(char::from(HEX_DIGITS[usize::from(byte >> 4)]));
                name.push('.');
            }

            name.push_str(zone);
            name.push('.');
            name.push_str(CYMRU_ZONE);
            name
        }
    }
}

/// Build the DNS question name for an AS description.
///
/// Example: `23028` -> `"AS23028.asn.cymru.com."`
#[must_use]
pub fn asn_query_name(asn: u32) -> String {
    format!("AS{asn}.{CYMRU_ZONE}")
}
