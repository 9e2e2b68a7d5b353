use std::time::Duration;
use thiserror::Error;

/// Result type alias for IP-to-ASN operations
pub type Result<T> = std::result::Result<T, IpAsnError>;

/// Boxed error produced by a resolver implementation
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur when mapping an address or ASN through Team Cymru
#[derive(Error, Debug)]
pub enum IpAsnError {
    /// The address is unspecified (`0.0.0.0` or `::`)
    #[error("IP is unspecified")]
    IpIsUnspecified,

    /// The address is a loopback address
    #[error("IP is a loopback address")]
    IpIsLoopback,

    /// The address is a multicast address
    #[error("IP is a multicast address")]
    IpIsMulticast,

    /// The address matched the configured private network filter
    #[error("IP is a private address")]
    IpIsPrivate,

    /// The resolver answered but returned no TXT records
    #[error("DNS result included no useful records")]
    NotFound,

    /// The resolver itself failed; the original error is kept as the source
    #[error("{0}")]
    Resolver(#[source] BoxError),

    /// The lookup did not complete within the configured timeout
    #[error("lookup timed out after {0:?}")]
    Timeout(Duration),

    /// A record could not be parsed (strict parse mode only)
    #[error("malformed record {record:?}: {reason}")]
    MalformedRecord {
        /// The TXT payload as received
        record: String,
        /// What was wrong with it
        reason: String,
    },
}

/// The kind of an [`IpAsnError`], comparable with `==`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// See [`IpAsnError::IpIsUnspecified`]
    IpIsUnspecified,
    /// See [`IpAsnError::IpIsLoopback`]
    IpIsLoopback,
    /// See [`IpAsnError::IpIsMulticast`]
    IpIsMulticast,
    /// See [`IpAsnError::IpIsPrivate`]
    IpIsPrivate,
    /// See [`IpAsnError::NotFound`]
    NotFound,
    /// See [`IpAsnError::Resolver`]
    Resolver,
    /// See [`IpAsnError::Timeout`]
    Timeout,
    /// See [`IpAsnError::MalformedRecord`]
    MalformedRecord,
}

impl IpAsnError {
    /// Wrap a resolver failure without altering it
    pub fn resolver<E>(err: E) -> Self
    where
        E: Into<BoxError>,
    {
        Self::Resolver(err.into())
    }

    /// Returns the kind of this error
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::IpIsUnspecified => ErrorKind::IpIsUnspecified,
            Self::IpIsLoopback => ErrorKind::IpIsLoopback,
            Self::IpIsMulticast => ErrorKind::IpIsMulticast,
            Self::IpIsPrivate => ErrorKind::IpIsPrivate,
            Self::NotFound => ErrorKind::NotFound,
            Self::Resolver(_) => ErrorKind::Resolver,
            Self::Timeout(_) => ErrorKind::Timeout,
            Self::MalformedRecord { .. } => ErrorKind::MalformedRecord,
        }
    }

    /// Returns true if the address was rejected before any lookup was made
    #[must_use]
    pub const fn is_rejected_input(&self) -> bool {
        matches!(
            self,
            Self::IpIsUnspecified | Self::IpIsLoopback | Self::IpIsMulticast | Self::IpIsPrivate
        )
    }

    pub(crate) fn malformed(record: &str, reason: impl Into<String>) -> Self {
        Self::MalformedRecord {
            record: record.to_string(),
            reason: reason.into(),
        }
    }

    /// Returns the resolver's own error, if this came from the resolver
    #[must_use]
    pub fn resolver_error(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            Self::Resolver(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;
    use std::io;

    #[test]
    fn messages_match_service_wording() {
        assert_eq!(IpAsnError::IpIsUnspecified.to_string(), "IP is unspecified");
        assert_eq!(IpAsnError::IpIsLoopback.to_string(), "IP is a loopback address");
        assert_eq!(IpAsnError::IpIsMulticast.to_string(), "IP is a multicast address");
        assert_eq!(IpAsnError::IpIsPrivate.to_string(), "IP is a private address");
        assert_eq!(
            IpAsnError::NotFound.to_string(),
            "DNS result included no useful records"
        );
    }

    #[test]
    fn resolver_error_is_forwarded_unchanged() {
        let err = IpAsnError::resolver(io::Error::new(io::ErrorKind::TimedOut, "upstream went away"));

        assert_eq!(err.kind(), ErrorKind::Resolver);
        assert_eq!(err.to_string(), "upstream went away");

        let source = err.source().expect("source kept");
        let io_err = source.downcast_ref::<io::Error>().expect("io error kept");
        assert_eq!(io_err.kind(), io::ErrorKind::TimedOut);
        assert!(err.resolver_error().is_some());
    }

    #[test]
    fn kinds_compare_by_variant() {
        assert_eq!(IpAsnError::IpIsPrivate.kind(), ErrorKind::IpIsPrivate);
        assert_ne!(IpAsnError::IpIsPrivate.kind(), ErrorKind::IpIsLoopback);
        assert!(IpAsnError::IpIsMulticast.is_rejected_input());
        assert!(!IpAsnError::NotFound.is_rejected_input());
        assert!(IpAsnError::NotFound.resolver_error().is_none());
    }
}
