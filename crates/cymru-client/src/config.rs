//! Client configuration types.

use cymru_core::ParseMode;
use std::time::Duration;

/// Behaviour of an [`IpAsnClient`](crate::IpAsnClient) beyond its resolver
/// and network filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClientConfig {
    /// How unexpected record content is handled
    pub parse_mode: ParseMode,

    /// Upper bound for a single resolver call; `None` leaves it to the resolver
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    /// Create the default configuration: lenient parsing, no timeout
    #[must_use]
    pub const fn new() -> Self {
        Self {
            parse_mode: ParseMode::Lenient,
            timeout: None,
        }
    }

    /// Set the parse mode
    #[must_use]
    pub const fn parse_mode(mut self, mode: ParseMode) -> Self {
        self.parse_mode = mode;
        self
    }

    /// Report malformed records as errors instead of empty results
    #[must_use]
    pub const fn strict(self, strict: bool) -> Self {
        self.parse_mode(if strict {
            ParseMode::Strict
        } else {
            ParseMode::Lenient
        })
    }

    /// Set the per-lookup timeout
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_lenient_without_timeout() {
        let config = ClientConfig::default();
        assert_eq!(config, ClientConfig::new());
        assert_eq!(config.parse_mode, ParseMode::Lenient);
        assert_eq!(config.timeout, None);
    }

    #[test]
    fn setters_chain() {
        let config = ClientConfig::new()
            .strict(true)
            .timeout(Duration::from_secs(2));
        assert_eq!(config.parse_mode, ParseMode::Strict);
        assert_eq!(config.timeout, Some(Duration::from_secs(2)));
        assert_eq!(config.strict(false).parse_mode, ParseMode::Lenient);
    }
}
