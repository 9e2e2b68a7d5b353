//! Async client for Team Cymru's IP-to-ASN DNS interface.
//!
//! This crate provides the main [`IpAsnClient`] and the [`TxtResolver`]
//! trait it sends queries through. Two resolvers are included:
//!
//! - [`SystemResolver`]: hickory using the system configuration, or a
//!   specific upstream server
//! - [`DohResolver`]: DNS-over-HTTPS using the JSON API

#![doc(html_root_url = "https://docs.rs/cymru-client/0.3.0")]

mod client;
mod config;
mod doh;
mod resolver;

pub use async_trait::async_trait;
pub use client::{IpAsnClient, IpAsnClientBuilder};
pub use config::*;
pub use cymru_core::{ErrorKind, IpAsnError, Result};
pub use doh::{DohError, DohResolver, DohResolverBuilder, CLOUDFLARE_DOH, GOOGLE_DOH};
pub use resolver::{SystemResolver, TxtResolver};
