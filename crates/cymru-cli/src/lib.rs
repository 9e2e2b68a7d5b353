//! # cymru-cli
//!
//! Command-line interface for Team Cymru's IP-to-ASN DNS service.
//!
//! ## Features
//!
//! - **Lookups**: BGP origin, peers and AS descriptions for many inputs at once
//! - **Blocklists**: `ipset add` lines for the networks behind abusive addresses
//! - **Resolvers**: system DNS, a specific nameserver, or DNS-over-HTTPS
//! - **Multiple output formats**: Pretty tables, JSON, CSV, YAML, raw records

pub mod cli;
pub mod config;
pub mod output;

pub use cli::run;
