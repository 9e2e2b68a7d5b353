use chrono::NaiveDate;
use ipnet::IpNet;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::Result;
use crate::record::{split_record, FieldParser, ParseMode, DATE_FORMAT};

/// BGP peers one AS hop away from the origin of a prefix.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerInfo {
    /// Peer AS numbers, in the order Cymru lists them
    #[serde(default)]
    pub asns: Vec<u32>,

    /// Announced BGP prefix
    #[serde(default)]
    pub network: Option<IpNet>,

    /// Two-letter country code
    #[serde(default)]
    pub country: String,

    /// Regional registry
    #[serde(default)]
    pub authority: String,

    /// Allocation date
    #[serde(default)]
    pub updated: Option<NaiveDate>,
}

impl PeerInfo {
    /// Parse a peer record. The first field is a space separated ASN list.
    pub fn from_record(record: &str, mode: ParseMode) -> Result<Self> {
        let fields = split_record(record);
        let parser = FieldParser::new(record, mode);

        if !parser.accept_count(fields.len(), "5", fields.len() == 5)? {
            return Ok(Self::default());
        }

        Ok(Self {
            asns: parser.asn_list(fields[0])?,
            network: parser.network(fields[1])?,
            country: fields[2].to_string(),
            authority: fields[3].to_string(),
            updated: parser.date(fields[4])?,
        })
    }

    /// Returns true if there is nothing to render
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.asns.is_empty() || self.network.is_none()
    }
}

impl fmt::Display for PeerInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(network) = self.network.filter(|_| !self.asns.is_empty()) else {
            return Ok(());
        };

        for (i, asn) in self.asns.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{asn}")?;
        }
        write!(f, " | {} | {} | {} | ", network, self.country, self.authority)?;
        if let Some(updated) = self.updated {
            write!(f, "{}", updated.format(DATE_FORMAT))?;
        }
        Ok(())
    }
}
