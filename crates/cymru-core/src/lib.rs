//! Core types for the Team Cymru IP-to-ASN DNS interface.
//!
//! This crate holds everything that does not need a network:
//!
//! - **Types**: [`OriginInfo`], [`PeerInfo`] and [`AsnInfo`], parsed from and
//!   rendered back to Cymru's pipe-delimited TXT records
//! - **Encoding**: DNS question names for origin, peer and AS lookups
//! - **Networks**: the [`NetworkFilter`] used to skip private addresses
//! - **Errors**: [`IpAsnError`] and its comparable [`ErrorKind`]
//!
//! # Example
//!
//! ```
//! use cymru_core::{ip_query_name, OriginInfo, ParseMode, QueryKind};
//!
//! let name = ip_query_name("216.90.108.31".parse().unwrap(), QueryKind::Origin);
//! assert_eq!(name, "31.108.90.216.origin.asn.cymru.com.");
//!
//! let record = "23028 | 216.90.108.0/24 | US | arin | 1998-09-25";
//! let origin = OriginInfo::from_record(record, ParseMode::Lenient).unwrap();
//! assert_eq!(origin.asn, 23028);
//! assert_eq!(origin.to_string(), record);
//! ```

#![doc(html_root_url = "https://docs.rs/cymru-core/0.3.0")]

pub mod encoding;
mod error;
pub mod networks;
pub mod record;
pub mod types;

pub use encoding::{asn_query_name, ip_query_name, QueryKind, CYMRU_ZONE};
pub use error::{BoxError, ErrorKind, IpAsnError, Result};
pub use networks::NetworkFilter;
pub use record::ParseMode;
pub use types::*;
