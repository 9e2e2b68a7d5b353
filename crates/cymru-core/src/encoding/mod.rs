//! DNS question names for the IP-to-ASN zones.

mod dns_names;

pub use dns_names::*;
