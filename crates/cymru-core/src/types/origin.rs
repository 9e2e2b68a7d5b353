use chrono::NaiveDate;
use ipnet::IpNet;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::Result;
use crate::record::{split_record, FieldParser, ParseMode, DATE_FORMAT};

/// BGP origin of an address, as returned by an origin lookup.
///
/// Renders back to the record it was parsed from:
/// `23028 | 216.90.108.0/24 | US | arin | 1998-09-25`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OriginInfo {
    /// Origin AS number (0 when absent)
    pub asn: u32,

    /// Announced BGP prefix
    #[serde(default)]
    pub network: Option<IpNet>,

    /// Two-letter country code
    #[serde(default)]
    pub country: String,

    /// Regional registry (arin, ripencc, apnic, ...)
    #[serde(default)]
    pub authority: String,

    /// Allocation date
    #[serde(default)]
    pub updated: Option<NaiveDate>,
}

impl OriginInfo {
    /// Parse an origin record.
    ///
    /// Anything other than exactly five fields gives an empty result in
    /// lenient mode.
    pub fn from_record(record: &str, mode: ParseMode) -> Result<Self> {
        let fields = split_record(record);
        let parser = FieldParser::new(record, mode);

        if !parser.accept_count(fields.len(), "5", fields.len() == 5)? {
            return Ok(Self::default());
        }

        Ok(Self {
            asn: parser.asn(fields[0])?,
            network: parser.network(fields[1])?,
            country: fields[2].to_string(),
            authority: fields[3].to_string(),
            updated: parser.date(fields[4])?,
        })
    }

    /// Returns true if there is nothing to render
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.asn == 0 || self.network.is_none()
    }
}

impl fmt::Display for OriginInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(network) = self.network.filter(|_| self.asn != 0) else {
            return Ok(());
        };

        write!(
            f,
            "{} | {} | {} | {} | ",
            self.asn, network, self.country, self.authority
        )?;
        if let Some(updated) = self.updated {
            write!(f, "{}", updated.format(DATE_FORMAT))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    const RECORD: &str = "23028 | 216.90.108.0/24 | US | arin | 1998-09-25";

    #[test]
    fn parses_five_fields() {
        let origin = OriginInfo::from_record(RECORD, ParseMode::Lenient).unwrap();
        assert_eq!(
            origin,
            OriginInfo {
                asn: 23028,
                network: Some("216.90.108.0/24".parse().unwrap()),
                country: "US".into(),
                authority: "arin".into(),
                updated: NaiveDate::from_ymd_opt(1998, 9, 25),
            }
        );
    }

    #[test]
    fn renders_the_original_record() {
        let origin = OriginInfo::from_record(RECORD, ParseMode::Lenient).unwrap();
        assert_eq!(origin.to_string(), RECORD);

        let v6 = "15169 | 2001:4860::/32 | US | arin | 2005-03-14";
        let origin = OriginInfo::from_record(v6, ParseMode::Lenient).unwrap();
        assert_eq!(origin.to_string(), v6);
    }

    #[test]
    fn zero_values_render_empty() {
        assert_eq!(OriginInfo::default().to_string(), "");

        let no_network = OriginInfo {
            asn: 23028,
            ..OriginInfo::default()
        };
        assert!(no_network.is_empty());
        assert_eq!(no_network.to_string(), "");

        let no_asn = OriginInfo {
            network: Some("216.90.108.0/24".parse().unwrap()),
            country: "US".into(),
            ..OriginInfo::default()
        };
        assert_eq!(no_asn.to_string(), "");
    }

    #[test]
    fn unexpected_field_count_is_empty_when_lenient() {
        let origin =
            OriginInfo::from_record("23028 | 216.90.108.0/24 | US | arin", ParseMode::Lenient)
                .unwrap();
        assert_eq!(origin, OriginInfo::default());
    }

    #[test]
    fn unexpected_field_count_is_an_error_when_strict() {
        let err = OriginInfo::from_record("23028 | 216.90.108.0/24", ParseMode::Strict).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedRecord);
    }

    #[test]
    fn bad_asn_becomes_zero() {
        let origin = OriginInfo::from_record(
            "NA | 216.90.108.0/24 | US | arin | 1998-09-25",
            ParseMode::Lenient,
        )
        .unwrap();
        assert_eq!(origin.asn, 0);
        assert_eq!(origin.country, "US");
        assert_eq!(origin.to_string(), "");
    }

    #[test]
    fn missing_date_renders_empty_field() {
        let origin = OriginInfo::from_record(
            "23028 | 216.90.108.0/24 | US | arin | ",
            ParseMode::Lenient,
        )
        .unwrap();
        assert_eq!(origin.updated, None);
        assert_eq!(origin.to_string(), "23028 | 216.90.108.0/24 | US | arin | ");
    }

    #[test]
    fn serializes_network_as_cidr_text() {
        let origin = OriginInfo::from_record(RECORD, ParseMode::Lenient).unwrap();
        let json = serde_json::to_value(&origin).unwrap();
        assert_eq!(json["network"], "216.90.108.0/24");
        assert_eq!(json["updated"], "1998-09-25");

        let back: OriginInfo = serde_json::from_value(json).unwrap();
        assert_eq!(back, origin);
    }
}
