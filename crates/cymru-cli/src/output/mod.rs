//! Output formatting for different formats.

use anyhow::Result;
use clap::ValueEnum;
use cymru::chrono::NaiveDate;
use cymru::{AsnInfo, OriginInfo, PeerInfo};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::io;
use std::str::FromStr;
use tabled::settings::Style;
use tabled::{Table, Tabled};

/// Available output formats.
#[derive(Debug, Clone, Copy, Default, ValueEnum, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Pretty-printed tables
    #[default]
    Pretty,
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// YAML output
    Yaml,
    /// Records as Team Cymru publishes them, one per line
    Raw,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" | "table" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            "yaml" | "yml" => Ok(Self::Yaml),
            "raw" | "pipe" => Ok(Self::Raw),
            _ => anyhow::bail!(
                "Unknown output format: {s}\n\
                 Valid formats: pretty, json, csv, yaml, raw"
            ),
        }
    }
}

impl Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pretty => write!(f, "pretty"),
            Self::Json => write!(f, "json"),
            Self::Csv => write!(f, "csv"),
            Self::Yaml => write!(f, "yaml"),
            Self::Raw => write!(f, "raw"),
        }
    }
}

/// One successful lookup together with the input that produced it.
#[derive(Debug, Clone, Serialize)]
pub struct Lookup<T> {
    /// The address or AS number as given on the command line
    pub query: String,
    #[serde(flatten)]
    pub result: T,
}

/// A result that can be shown in every output format.
///
/// JSON and YAML serialize the [`Lookup`] as is; tables and CSV need a flat
/// row; raw output uses `Display`.
pub trait Record: Serialize + Display {
    type Row: Tabled + Serialize;

    fn to_row(&self, query: &str) -> Self::Row;
}

fn date(updated: Option<NaiveDate>) -> String {
    updated.map(|d| d.to_string()).unwrap_or_default()
}

fn network(net: Option<cymru::ipnet::IpNet>) -> String {
    net.map(|n| n.to_string()).unwrap_or_default()
}

#[derive(Tabled, Serialize)]
pub struct OriginRow {
    #[tabled(rename = "Query")]
    pub query: String,
    #[tabled(rename = "ASN")]
    pub asn: u32,
    #[tabled(rename = "Network")]
    pub network: String,
    #[tabled(rename = "Country")]
    pub country: String,
    #[tabled(rename = "Registry")]
    pub registry: String,
    #[tabled(rename = "Allocated")]
    pub allocated: String,
}

impl Record for OriginInfo {
    type Row = OriginRow;

    fn to_row(&self, query: &str) -> OriginRow {
        OriginRow {
            query: query.to_string(),
            asn: self.asn,
            network: network(self.network),
            country: self.country.clone(),
            registry: self.authority.clone(),
            allocated: date(self.updated),
        }
    }
}

#[derive(Tabled, Serialize)]
pub struct PeerRow {
    #[tabled(rename = "Query")]
    pub query: String,
    #[tabled(rename = "Peer ASNs")]
    pub asns: String,
    #[tabled(rename = "Network")]
    pub network: String,
    #[tabled(rename = "Country")]
    pub country: String,
    #[tabled(rename = "Registry")]
    pub registry: String,
    #[tabled(rename = "Allocated")]
    pub allocated: String,
}

impl Record for PeerInfo {
    type Row = PeerRow;

    fn to_row(&self, query: &str) -> PeerRow {
        PeerRow {
            query: query.to_string(),
            asns: self
                .asns
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" "),
            network: network(self.network),
            country: self.country.clone(),
            registry: self.authority.clone(),
            allocated: date(self.updated),
        }
    }
}

#[derive(Tabled, Serialize)]
pub struct AsnRow {
    #[tabled(rename = "ASN")]
    pub asn: u32,
    #[tabled(rename = "Country")]
    pub country: String,
    #[tabled(rename = "Registry")]
    pub registry: String,
    #[tabled(rename = "Allocated")]
    pub allocated: String,
    #[tabled(rename = "Description")]
    pub description: String,
}

impl Record for AsnInfo {
    type Row = AsnRow;

    fn to_row(&self, _query: &str) -> AsnRow {
        AsnRow {
            asn: self.asn,
            country: self.country.clone(),
            registry: self.authority.clone(),
            allocated: date(self.updated),
            description: self.description.clone(),
        }
    }
}

/// Print successful lookups in the requested format.
pub fn render<T: Record>(format: OutputFormat, lookups: &[Lookup<T>]) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(lookups)?);
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yaml::to_string(lookups)?);
        }
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(io::stdout());
            for lookup in lookups {
                writer.serialize(lookup.result.to_row(&lookup.query))?;
            }
            writer.flush()?;
        }
        OutputFormat::Raw => {
            for lookup in lookups {
                println!("{}", lookup.result);
            }
        }
        OutputFormat::Pretty => {
            if lookups.is_empty() {
                return Ok(());
            }
            let rows: Vec<T::Row> = lookups
                .iter()
                .map(|l| l.result.to_row(&l.query))
                .collect();
            let table = Table::new(&rows).with(Style::rounded()).to_string();
            println!("{table}");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origin() -> OriginInfo {
        OriginInfo {
            asn: 23028,
            network: Some("216.90.108.0/24".parse().unwrap()),
            country: "US".into(),
            authority: "arin".into(),
            updated: NaiveDate::from_ymd_opt(1998, 9, 25),
        }
    }

    #[test]
    fn format_names_round_trip() {
        for format in [
            OutputFormat::Pretty,
            OutputFormat::Json,
            OutputFormat::Csv,
            OutputFormat::Yaml,
            OutputFormat::Raw,
        ] {
            assert_eq!(format.to_string().parse::<OutputFormat>().unwrap(), format);
        }
        assert_eq!("table".parse::<OutputFormat>().unwrap(), OutputFormat::Pretty);
        assert!("xml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn origin_row_flattens_optional_fields() {
        let row = origin().to_row("216.90.108.31");
        assert_eq!(row.network, "216.90.108.0/24");
        assert_eq!(row.allocated, "1998-09-25");

        let empty = OriginInfo::default().to_row("x");
        assert_eq!(empty.network, "");
        assert_eq!(empty.allocated, "");
    }

    #[test]
    fn peer_row_joins_asns() {
        let peer = PeerInfo {
            asns: vec![3257, 23352],
            ..PeerInfo::default()
        };
        assert_eq!(peer.to_row("1.2.3.4").asns, "3257 23352");
    }

    #[test]
    fn lookup_json_carries_query_and_fields() {
        let lookup = Lookup {
            query: "216.90.108.31".into(),
            result: origin(),
        };
        let value = serde_json::to_value(&lookup).unwrap();
        assert_eq!(value["query"], "216.90.108.31");
        assert_eq!(value["asn"], 23028);
        assert_eq!(value["network"], "216.90.108.0/24");
    }

    #[test]
    fn csv_rows_have_headers() {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.serialize(origin().to_row("216.90.108.31")).unwrap();
        let out = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        assert_eq!(
            out,
            "query,asn,network,country,registry,allocated\n\
             216.90.108.31,23028,216.90.108.0/24,US,arin,1998-09-25\n"
        );
    }
}
