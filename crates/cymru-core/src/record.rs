//! Field-level parsing of the pipe-delimited TXT payloads.
//!
//! Records look like `23028 | 216.90.108.0/24 | US | arin | 1998-09-25`.
//! By default parsing is lenient: a field that does not parse becomes its
//! zero value and no error is raised. [`ParseMode::Strict`] reports those
//! cases as [`IpAsnError::MalformedRecord`] instead.

use chrono::NaiveDate;
use ipnet::IpNet;
use serde::{Deserialize, Serialize};

use crate::error::{IpAsnError, Result};

/// Separator between fields of a record.
pub const FIELD_SEPARATOR: &str = " | ";

/// `chrono` format of the allocation date field.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// How unexpected record content is handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseMode {
    /// Wrong field counts give an empty result, bad fields become zero
    #[default]
    Lenient,
    /// Wrong field counts and bad fields are errors
    Strict,
}

impl ParseMode {
    /// Returns true for [`ParseMode::Strict`]
    #[must_use]
    pub const fn is_strict(self) -> bool {
        matches!(self, Self::Strict)
    }
}

/// Split a record into its fields.
#[must_use]
pub fn split_record(record: &str) -> Vec<&str> {
    record.split(FIELD_SEPARATOR).collect()
}

/// Parses the fields of one record, applying the configured mode.
pub(crate) struct FieldParser<'a> {
    record: &'a str,
    mode: ParseMode,
}

impl<'a> FieldParser<'a> {
    pub(crate) const fn new(record: &'a str, mode: ParseMode) -> Self {
        Self { record, mode }
    }

    /// Whether a record with `count` fields should be parsed at all.
    ///
    /// Lenient mode answers `false` for a wrong count; strict mode errors.
    pub(crate) fn accept_count(&self, count: usize, expected: &str, ok: bool) -> Result<bool> {
        if ok {
            Ok(true)
        } else if self.mode.is_strict() {
            Err(IpAsnError::malformed(
                self.record,
                format!("expected {expected} fields, got {count}"),
            ))
        } else {
            Ok(false)
        }
    }

    pub(crate) fn asn(&self, field: &str) -> Result<u32> {
        match field.parse() {
            Ok(asn) => Ok(asn),
            Err(_) if self.mode.is_strict() => Err(IpAsnError::malformed(
                self.record,
                format!("invalid ASN {field:?}"),
            )),
            Err(_) => Ok(0),
        }
    }

    pub(crate) fn asn_list(&self, field: &str) -> Result<Vec<u32>> {
        field.split_whitespace().map(|token| self.asn(token)).collect()
    }

    pub(crate) fn network(&self, field: &str) -> Result<Option<IpNet>> {
        match field.parse::<IpNet>() {
            Ok(net) => Ok(Some(net.trunc())),
            Err(_) if self.mode.is_strict() => Err(IpAsnError::malformed(
                self.record,
                format!("invalid network {field:?}"),
            )),
            Err(_) => Ok(None),
        }
    }

    pub(crate) fn date(&self, field: &str) -> Result<Option<NaiveDate>> {
        match NaiveDate::parse_from_str(field, DATE_FORMAT) {
            Ok(date) => Ok(Some(date)),
            Err(_) if self.mode.is_strict() => Err(IpAsnError::malformed(
                self.record,
                format!("invalid date {field:?}"),
            )),
            Err(_) => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn split_uses_spaced_pipes() {
        assert_eq!(
            split_record("23028 | 216.90.108.0/24 | US | arin | 1998-09-25"),
            vec!["23028", "216.90.108.0/24", "US", "arin", "1998-09-25"]
        );
        assert_eq!(split_record("a|b"), vec!["a|b"]);
        assert_eq!(split_record(""), vec![""]);
    }

    #[test]
    fn lenient_fields_fall_back_to_zero() {
        let p = FieldParser::new("junk", ParseMode::Lenient);
        assert_eq!(p.asn("AS23028").unwrap(), 0);
        assert_eq!(p.asn_list("701 x 7132").unwrap(), vec![701, 0, 7132]);
        assert_eq!(p.network("216.90.108").unwrap(), None);
        assert_eq!(p.date("25/09/1998").unwrap(), None);
        assert!(!p.accept_count(3, "5", false).unwrap());
    }

    #[test]
    fn strict_fields_are_errors() {
        let p = FieldParser::new("junk", ParseMode::Strict);
        assert_eq!(p.asn("AS23028").unwrap_err().kind(), ErrorKind::MalformedRecord);
        assert_eq!(p.asn_list("701 x").unwrap_err().kind(), ErrorKind::MalformedRecord);
        assert_eq!(p.network("nope").unwrap_err().kind(), ErrorKind::MalformedRecord);
        assert_eq!(p.date("1998-13-01").unwrap_err().kind(), ErrorKind::MalformedRecord);

        let err = p.accept_count(3, "5", false).unwrap_err();
        assert_eq!(
            err.to_string(),
            "malformed record \"junk\": expected 5 fields, got 3"
        );
    }

    #[test]
    fn network_is_truncated_to_prefix() {
        let p = FieldParser::new("", ParseMode::Lenient);
        assert_eq!(
            p.network("216.90.108.31/24").unwrap(),
            Some("216.90.108.0/24".parse().unwrap())
        );
    }
}
