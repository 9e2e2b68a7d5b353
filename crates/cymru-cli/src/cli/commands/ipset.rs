//! `ipasn ipset` - blocklist entries for the networks behind addresses.
//!
//! Each address is mapped to its origin prefix, and the origin AS number to
//! its description, giving one line per network:
//!
//! ```text
//! ipset add badnetworks 216.90.108.0/24 comment "TEAM-CYMRU - Team Cymru Inc., US" timeout 86400
//! ```

use anyhow::{Context as _, Result};
use cymru::ipnet::IpNet;
use cymru::IpAsnClient;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use std::net::IpAddr;
use std::process::ExitCode;
use tabled::Tabled;
use tracing::debug;

use super::{lookup_all, parse_ip, split_inputs, Context};
use crate::cli::args::IpsetArgs;
use crate::output::{OutputFormat, Record};

/// One `ipset add` line.
#[derive(Debug, Clone, Serialize)]
pub struct IpsetEntry {
    pub set: String,
    pub network: IpNet,
    pub asn: u32,
    pub description: String,
    pub ttl: u64,
}

impl fmt::Display for IpsetEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ipset add {} {} comment {:?} timeout {}",
            self.set, self.network, self.description, self.ttl
        )
    }
}

#[derive(Tabled, Serialize)]
pub struct IpsetRow {
    #[tabled(rename = "Query")]
    pub query: String,
    #[tabled(rename = "Network")]
    pub network: String,
    #[tabled(rename = "ASN")]
    pub asn: u32,
    #[tabled(rename = "Description")]
    pub description: String,
}

impl Record for IpsetEntry {
    type Row = IpsetRow;

    fn to_row(&self, query: &str) -> IpsetRow {
        IpsetRow {
            query: query.to_string(),
            network: self.network.to_string(),
            asn: self.asn,
            description: self.description.clone(),
        }
    }
}

pub async fn execute(ctx: Context, args: IpsetArgs) -> Result<ExitCode> {
    let client = ctx.client()?;
    let ttl = args.ttl;

    let results = lookup_all(split_inputs(&args.ips), |input| {
        let client = client.clone();
        let set = args.set.clone();
        async move {
            let ip = parse_ip(&input)?;
            entry(&client, ip, set, ttl).await
        }
    })
    .await;

    // Addresses in the same prefix would make ipset reject the second add.
    let mut seen = HashSet::new();
    let results: Vec<_> = results
        .into_iter()
        .filter(|(query, result)| match result {
            Ok(entry) if !seen.insert(entry.network) => {
                debug!(query = %query, network = %entry.network, "duplicate network skipped");
                false
            }
            _ => true,
        })
        .collect();

    // The commands themselves are the readable form.
    let ctx = match ctx.output_format {
        OutputFormat::Pretty => Context {
            output_format: OutputFormat::Raw,
            ..ctx
        },
        _ => ctx,
    };

    ctx.report(results)
}

async fn entry(client: &IpAsnClient, ip: IpAddr, set: String, ttl: u64) -> Result<IpsetEntry> {
    let origin = client
        .origin(ip)
        .await
        .context("Error looking up the origin")?;

    // A lenient parse of an odd record leaves no ASN or no network to use.
    let network = match origin.network {
        Some(network) if !origin.is_empty() => network,
        _ => anyhow::bail!("origin record for {ip} has no usable ASN and network"),
    };

    let asn = client
        .asn(origin.asn)
        .await
        .context("Error looking up the description")?;

    Ok(IpsetEntry {
        set,
        network,
        asn: origin.asn,
        description: asn.description,
        ttl,
    })
}
