//! Command implementations.

pub mod asn;
pub mod config;
pub mod ipset;
pub mod origin;
pub mod peer;

use anyhow::{Context as _, Result};
use colored::Colorize;
use cymru::{DohResolver, IpAsnClient, NetworkFilter, SystemResolver};
use futures_util::future::join_all;
use std::future::Future;
use std::net::{IpAddr, SocketAddr};
use std::process::ExitCode;
use std::time::Duration;
use tracing::debug;

use crate::output::{self, Lookup, OutputFormat, Record};

/// Port used when `--server` gives a bare address.
const DNS_PORT: u16 = 53;

/// Shared context for all commands.
#[derive(Debug, Clone)]
pub struct Context {
    /// Output format
    pub output_format: OutputFormat,

    /// DNS server to query (`ip` or `ip:port`)
    pub server: Option<String>,

    /// DoH JSON endpoint
    pub doh: Option<String>,

    /// Per-lookup timeout
    pub timeout: Option<Duration>,

    /// Report malformed records as errors
    pub strict: bool,

    /// Refuse private address space
    pub private_filter: bool,

    /// Extra networks to refuse
    pub exclude: Vec<String>,
}

impl Context {
    /// The filter applied to addresses before lookup.
    pub fn network_filter(&self) -> Result<NetworkFilter> {
        let mut filter = if self.private_filter {
            NetworkFilter::default_private()
        } else {
            NetworkFilter::disabled()
        };

        if !self.exclude.is_empty() {
            let extra = NetworkFilter::parse_cidrs(&self.exclude)
                .with_context(|| format!("invalid --exclude network in {:?}", self.exclude))?;
            filter.push(extra);
        }

        Ok(filter)
    }

    /// Create a client with the configured resolver and filters.
    pub fn client(&self) -> Result<IpAsnClient> {
        let mut builder = IpAsnClient::builder()
            .strict(self.strict)
            .private_networks(self.network_filter()?);

        if let Some(limit) = self.timeout {
            builder = builder.timeout(limit);
        }

        if let Some(server) = &self.server {
            let addr = parse_server(server)?;
            debug!(%addr, "using nameserver");
            builder = builder.resolver(SystemResolver::with_nameserver(addr));
        } else if let Some(endpoint) = &self.doh {
            debug!(endpoint = %endpoint, "using DNS-over-HTTPS");
            let resolver = DohResolver::builder()
                .endpoint(endpoint.as_str())
                .build()
                .context("setting up DNS-over-HTTPS")?;
            builder = builder.resolver(resolver);
        }

        Ok(builder.build())
    }

    /// Print the successes in the chosen format and the failures on stderr.
    pub fn report<T: Record>(&self, results: Vec<(String, Result<T>)>) -> Result<ExitCode> {
        let mut lookups = Vec::with_capacity(results.len());
        let mut failures = 0usize;

        for (query, result) in results {
            match result {
                Ok(result) => lookups.push(Lookup { query, result }),
                Err(err) => {
                    failures += 1;
                    eprintln!("{} {query}: {err:#}", "error:".red().bold());
                }
            }
        }

        output::render(self.output_format, &lookups)?;

        Ok(if failures == 0 {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        })
    }
}

/// Run `lookup` for every input at once, keeping input order.
pub async fn lookup_all<T, F, Fut>(inputs: Vec<String>, lookup: F) -> Vec<(String, Result<T>)>
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let pending = inputs.into_iter().map(|input| {
        let fut = lookup(input.clone());
        async move { (input, fut.await) }
    });

    join_all(pending).await
}

/// Flatten comma-separated arguments.
pub fn split_inputs(values: &[String]) -> Vec<String> {
    values
        .iter()
        .flat_map(|v| v.split(','))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Parse an IPv4 or IPv6 address.
pub fn parse_ip(input: &str) -> Result<IpAddr> {
    input
        .parse()
        .with_context(|| format!("not an IP address: {input:?}"))
}

/// Parse an AS number, with or without the `AS` prefix.
pub fn parse_asn(input: &str) -> Result<u32> {
    let digits = if input.get(..2).is_some_and(|p| p.eq_ignore_ascii_case("as")) {
        &input[2..]
    } else {
        input
    };

    digits
        .parse()
        .with_context(|| format!("not an AS number: {input:?}"))
}

/// Parse `ip`, `ip:port` or `[ipv6]:port`.
pub fn parse_server(input: &str) -> Result<SocketAddr> {
    if let Ok(addr) = input.parse::<SocketAddr>() {
        return Ok(addr);
    }

    let ip: IpAddr = input
        .trim_start_matches('[')
        .trim_end_matches(']')
        .parse()
        .with_context(|| format!("not a nameserver address: {input:?}"))?;

    Ok(SocketAddr::new(ip, DNS_PORT))
}
