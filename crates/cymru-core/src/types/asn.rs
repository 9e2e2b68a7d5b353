use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::Result;
use crate::record::{split_record, FieldParser, ParseMode, DATE_FORMAT, FIELD_SEPARATOR};

/// Description of an autonomous system.
///
/// Unlike the address lookups this carries no network.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AsnInfo {
    /// AS number (0 when absent)
    pub asn: u32,

    /// Two-letter country code
    #[serde(default)]
    pub country: String,

    /// Regional registry
    #[serde(default)]
    pub authority: String,

    /// Registration date
    #[serde(default)]
    pub updated: Option<NaiveDate>,

    /// AS name and holder, e.g. `TEAM-CYMRU - Team Cymru Inc., US`
    #[serde(default)]
    pub description: String,
}

impl AsnInfo {
    /// Parse an AS description record.
    ///
    /// Needs at least five fields. Everything from the fifth field on is the
    /// description, rejoined with `" | "` since descriptions may contain it.
    pub fn from_record(record: &str, mode: ParseMode) -> Result<Self> {
        let fields = split_record(record);
        let parser = FieldParser::new(record, mode);

        if !parser.accept_count(fields.len(), "at least 5", fields.len() >= 5)? {
            return Ok(Self::default());
        }

        Ok(Self {
            asn: parser.asn(fields[0])?,
            country: fields[1].to_string(),
            authority: fields[2].to_string(),
            updated: parser.date(fields[3])?,
            description: fields[4..].join(FIELD_SEPARATOR),
        })
    }

    /// Returns true if there is nothing to render
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.asn == 0
    }
}

impl fmt::Display for AsnInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return Ok(());
        }

        write!(f, "{} | {} | {} | ", self.asn, self.country, self.authority)?;
        if let Some(updated) = self.updated {
            write!(f, "{}", updated.format(DATE_FORMAT))?;
        }
        write!(f, " | {}", self.description)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_single_description() {
        let record = "23028 | US | arin | 2002-01-04 | TEAM-CYMRU - Team Cymru Inc., US";
        let asn = AsnInfo::from_record(record, ParseMode::Lenient).unwrap();
        assert_eq!(
            asn,
            AsnInfo {
                asn: 23028,
                country: "US".into(),
                authority: "arin".into(),
                updated: NaiveDate::from_ymd_opt(2002, 1, 4),
                description: "TEAM-CYMRU - Team Cymru Inc., US".into(),
            }
        );
        assert_eq!(asn.to_string(), record);
    }

    #[test]
    fn rejoins_multi_field_description() {
        let record = "1234 | EU | ripencc | 1993-09-01 | FORTUM-AS | Fortum, FI";
        let asn = AsnInfo::from_record(record, ParseMode::Lenient).unwrap();
        assert_eq!(asn.description, "FORTUM-AS | Fortum, FI");
        assert_eq!(asn.to_string(), record);
    }

    #[test]
    fn short_record_is_empty() {
        let asn = AsnInfo::from_record("1234 | EU | ripencc | 1993-09-01", ParseMode::Lenient)
            .unwrap();
        assert_eq!(asn, AsnInfo::default());
        assert_eq!(asn.to_string(), "");

        assert!(AsnInfo::from_record("1234 | EU", ParseMode::Strict).is_err());
    }

    #[test]
    fn zero_asn_renders_empty() {
        let asn = AsnInfo {
            description: "orphan".into(),
            ..AsnInfo::default()
        };
        assert_eq!(asn.to_string(), "");
    }
}
