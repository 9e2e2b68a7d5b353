//! Network filters used to refuse lookups for addresses that will never
//! resolve, such as RFC 1918 space.
//!
//! A [`NetworkFilter`] is either a single CIDR block, a constant answer, or an
//! ordered list of further filters. Lists may nest, so a caller can extend the
//! defaults with their own blocks without copying them:
//!
//! ```
//! use cymru_core::NetworkFilter;
//!
//! let mut filter = NetworkFilter::default_private();
//! filter.push(NetworkFilter::any(["8.8.8.0/24".parse().unwrap()]));
//!
//! assert!(filter.contains("192.168.0.4".parse().unwrap()));
//! assert!(filter.contains("8.8.8.8".parse().unwrap()));
//! assert!(!filter.contains("1.1.1.1".parse().unwrap()));
//! ```

use ipnet::{IpNet, Ipv4Net};
use std::net::{IpAddr, Ipv4Addr};

/// Commonly private or reserved IPv4 ranges as `(address, prefix length)`.
const DEFAULT_PRIVATE_V4: [([u8; 4], u8); 12] = [
    ([0, 0, 0, 0], 8),
    ([10, 0, 0, 0], 8),
    ([100, 64, 0, 0], 10),
    ([127, 0, 0, 0], 8),
    ([172, 16, 0, 0], 12),
    ([192, 0, 0, 0], 24),
    ([192, 0, 2, 0], 24),
    ([192, 88, 99, 0], 24),
    ([192, 168, 0, 0], 16),
    ([198, 18, 0, 0], 15),
    ([198, 51, 100, 0], 24),
    ([203, 0, 113, 0], 24),
];

/// Predicate over IP addresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkFilter {
    /// Contains an address if any member does, checked in order
    Any(Vec<NetworkFilter>),
    /// Contains every address inside the prefix
    Cidr(IpNet),
    /// Always gives the same answer
    Constant(bool),
}

impl NetworkFilter {
    /// The built-in list of private and reserved IPv4 networks.
    #[must_use]
    pub fn default_private() -> Self {
        Self::Any(
            DEFAULT_PRIVATE_V4
                .iter()
                .map(|&(octets, len)| {
                    Self::Cidr(IpNet::V4(
                        Ipv4Net::new_assert(Ipv4Addr::from(octets), len),
                    ))
                })
                .collect(),
        )
    }

    /// A filter that never matches, turning private network checks off.
    #[must_use]
    pub const fn disabled() -> Self {
        Self::Constant(false)
    }

    /// Build a list filter from CIDR blocks.
    #[must_use]
    pub fn any(nets: impl IntoIterator<Item = IpNet>) -> Self {
        nets.into_iter().collect()
    }

    /// A filter for a single CIDR block.
    #[must_use]
    pub const fn cidr(net: IpNet) -> Self {
        Self::Cidr(net)
    }

    /// Parse CIDR strings (as found in configuration files) into a list filter.
    pub fn parse_cidrs<S: AsRef<str>>(cidrs: &[S]) -> Result<Self, ipnet::AddrParseError> {
        cidrs
            .iter()
            .map(|s| s.as_ref().trim().parse::<IpNet>().map(|net| net.trunc()))
            .collect::<Result<Self, _>>()
    }

    /// Add a filter. A non-list filter is first turned into a list holding itself.
    pub fn push(&mut self, filter: Self) {
        match self {
            Self::Any(members) => members.push(filter),
            other => {
                let previous = std::mem::replace(other, Self::Any(Vec::with_capacity(2)));
                if let Self::Any(members) = other {
                    members.push(previous);
                    members.push(filter);
                }
            }
        }
    }

    /// Reports whether the filter includes `ip`.
    ///
    /// IPv4-mapped IPv6 addresses are checked as the IPv4 address they carry.
    #[must_use]
    pub fn contains(&self, ip: IpAddr) -> bool {
        let ip = ip.to_canonical();
        self.contains_canonical(ip)
    }

    fn contains_canonical(&self, ip: IpAddr) -> bool {
        match self {
            Self::Any(members) => members.iter().any(|m| m.contains_canonical(ip)),
            Self::Cidr(net) => net.contains(&ip),
            Self::Constant(answer) => *answer,
        }
    }
}

impl Default for NetworkFilter {
    fn default() -> Self {
        Self::default_private()
    }
}

impl From<IpNet> for NetworkFilter {
    fn from(net: IpNet) -> Self {
        Self::Cidr(net)
    }
}

impl FromIterator<IpNet> for NetworkFilter {
    fn from_iter<I: IntoIterator<Item = IpNet>>(iter: I) -> Self {
        Self::Any(iter.into_iter().map(Self::Cidr).collect())
    }
}

impl FromIterator<Self> for NetworkFilter {
    fn from_iter<I: IntoIterator<Item = Self>>(iter: I) -> Self {
        Self::Any(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ip(s: &str) -> IpAddr {
        s.parse().unwrap()
    }

    #[test]
    fn default_list_covers_every_reserved_block() {
        let filter = NetworkFilter::default_private();
        for addr in [
            "0.1.2.3",
            "10.20.30.40",
            "100.64.0.1",
            "100.127.255.254",
            "127.0.0.1",
            "172.16.0.1",
            "172.31.255.255",
            "192.0.0.7",
            "192.0.2.1",
            "192.88.99.1",
            "192.168.0.1",
            "198.18.0.1",
            "198.19.255.255",
            "198.51.100.9",
            "203.0.113.200",
        ] {
            assert!(filter.contains(ip(addr)), "{addr} should be private");
        }
    }

    #[test]
    fn default_list_leaves_public_space_alone() {
        let filter = NetworkFilter::default_private();
        for addr in [
            "1.1.1.1",
            "8.8.8.8",
            "100.128.0.1",
            "172.32.0.1",
            "192.0.1.1",
            "198.20.0.1",
            "216.90.108.31",
            "2001:4860:b002::68",
        ] {
            assert!(!filter.contains(ip(addr)), "{addr} should be public");
        }
    }

    #[test]
    fn nested_lists_extend_the_defaults() {
        let extra = NetworkFilter::any([
            "8.8.8.0/24".parse().unwrap(),
            "1.1.1.0/24".parse().unwrap(),
        ]);

        let mut filter = NetworkFilter::default_private();
        filter.push(extra);

        assert!(filter.contains(ip("192.168.0.4")));
        assert!(filter.contains(ip("8.8.8.8")));
        assert!(filter.contains(ip("1.1.1.1")));
        assert!(!filter.contains(ip("9.9.9.9")));
    }

    #[test]
    fn push_onto_single_block_builds_a_list() {
        let mut filter = NetworkFilter::cidr("10.0.0.0/8".parse().unwrap());
        filter.push(NetworkFilter::cidr("8.8.8.0/24".parse().unwrap()));

        assert!(matches!(&filter, NetworkFilter::Any(members) if members.len() == 2));
        assert!(filter.contains(ip("10.1.1.1")));
        assert!(filter.contains(ip("8.8.8.8")));
    }

    #[test]
    fn disabled_filter_never_matches() {
        let filter = NetworkFilter::disabled();
        assert!(!filter.contains(ip("192.168.0.4")));
        assert!(!filter.contains(ip("8.8.8.8")));
    }

    #[test]
    fn mapped_ipv6_is_checked_as_ipv4() {
        let filter = NetworkFilter::default_private();
        assert!(filter.contains(ip("::ffff:192.168.1.1")));
        assert!(!filter.contains(ip("::ffff:8.8.8.8")));
    }

    #[test]
    fn parse_cidrs_truncates_host_bits() {
        let filter = NetworkFilter::parse_cidrs(&["8.8.8.8/24", " 2001:db8::1/32 "]).unwrap();
        assert_eq!(
            filter,
            NetworkFilter::Any(vec![
                NetworkFilter::Cidr("8.8.8.0/24".parse().unwrap()),
                NetworkFilter::Cidr("2001:db8::/32".parse().unwrap()),
            ])
        );
        assert!(filter.contains(ip("2001:db8:ffff::1")));
        assert!(NetworkFilter::parse_cidrs(&["not-a-net"]).is_err());
    }
}
