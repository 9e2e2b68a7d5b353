//! DNS-over-HTTPS resolver using the JSON API (`application/dns-json`)
//! offered by Cloudflare, Google and others.

use async_trait::async_trait;
use cymru_core::{IpAsnError, Result};
use governor::{Quota, RateLimiter};
use reqwest::header::ACCEPT;
use reqwest::Client as HttpClient;
use serde::Deserialize;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

use crate::resolver::TxtResolver;

/// Cloudflare's JSON DoH endpoint
pub const CLOUDFLARE_DOH: &str = "https://cloudflare-dns.com/dns-query";

/// Google's JSON DoH endpoint
pub const GOOGLE_DOH: &str = "https://dns.google/resolve";

/// Default request timeout
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// DNS record type number for TXT
const TXT_TYPE: u16 = 16;

/// DNS response codes treated as "no records"
const RCODE_NOERROR: u32 = 0;
const RCODE_NXDOMAIN: u32 = 3;

/// Errors from the DoH resolver
#[derive(Error, Debug)]
pub enum DohError {
    /// The endpoint is not a usable URL
    #[error("invalid DoH endpoint: {0}")]
    InvalidEndpoint(String),

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success HTTP status
    #[error("DoH server returned HTTP {code}: {message}")]
    HttpStatus {
        /// HTTP status code
        code: u16,
        /// Response body
        message: String,
    },

    /// Response body was not valid JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// DNS level failure such as SERVFAIL or REFUSED
    #[error("DoH server answered with DNS status {0}")]
    DnsStatus(u32),
}

impl From<DohError> for IpAsnError {
    fn from(err: DohError) -> Self {
        Self::resolver(err)
    }
}

#[derive(Debug, Deserialize)]
struct DohResponse {
    #[serde(rename = "Status")]
    status: u32,
    #[serde(rename = "Answer", default)]
    answer: Vec<DohAnswer>,
}

#[derive(Debug, Deserialize)]
struct DohAnswer {
    #[serde(rename = "type")]
    record_type: u16,
    data: String,
}

/// Resolver that sends TXT queries over HTTPS
#[derive(Clone)]
pub struct DohResolver {
    inner: Arc<DohInner>,
}

struct DohInner {
    http: HttpClient,
    endpoint: Url,
    rate_limiter: Option<
        RateLimiter<
            governor::state::NotKeyed,
            governor::state::InMemoryState,
            governor::clock::DefaultClock,
        >,
    >,
}

impl DohResolver {
    /// Create a resolver for Cloudflare's endpoint with default settings
    pub fn new() -> Result<Self> {
        Ok(DohResolverBuilder::new().build()?)
    }

    /// Create a builder for custom configuration
    #[must_use]
    pub fn builder() -> DohResolverBuilder {
        DohResolverBuilder::new()
    }

    /// The endpoint queries are sent to
    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.inner.endpoint
    }

    async fn query(&self, name: &str) -> std::result::Result<Vec<String>, DohError> {
        if let Some(limiter) = &self.inner.rate_limiter {
            limiter.until_ready().await;
        }

        let mut url = self.inner.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("name", name)
            .append_pair("type", "TXT");
        debug!(url = %url, "DoH request");

        let response = self
            .inner
            .http
            .get(url)
            .header(ACCEPT, "application/dns-json")
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "DoH request failed");
            return Err(DohError::HttpStatus {
                code: status.as_u16(),
                message: body,
            });
        }

        let parsed: DohResponse = serde_json::from_str(&body)?;

        match parsed.status {
            RCODE_NOERROR | RCODE_NXDOMAIN => Ok(parsed
                .answer
                .iter()
                .filter(|a| a.record_type == TXT_TYPE)
                .map(|a| unquote_txt(&a.data))
                .collect()),
            rcode => Err(DohError::DnsStatus(rcode)),
        }
    }
}

#[async_trait]
impl TxtResolver for DohResolver {
    async fn lookup_txt(&self, name: &str) -> Result<Vec<String>> {
        Ok(self.query(name).await?)
    }
}

/// Builder for configuring a [`DohResolver`]
pub struct DohResolverBuilder {
    endpoint: String,
    timeout: Duration,
    user_agent: String,
    requests_per_second: Option<u32>,
}

impl Default for DohResolverBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DohResolverBuilder {
    /// Create a builder targeting Cloudflare
    #[must_use]
    pub fn new() -> Self {
        Self {
            endpoint: CLOUDFLARE_DOH.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: format!("cymru-rs/{}", env!("CARGO_PKG_VERSION")),
            requests_per_second: None,
        }
    }

    /// Set the endpoint URL
    #[must_use]
    pub fn endpoint(mut self, url: impl Into<String>) -> Self {
        self.endpoint = url.into();
        self
    }

    /// Set the HTTP request timeout
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the User-Agent header
    #[must_use]
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    /// Limit outgoing queries; 0 disables the limit
    #[must_use]
    pub const fn requests_per_second(mut self, rps: u32) -> Self {
        self.requests_per_second = Some(rps);
        self
    }

    /// Build the resolver
    pub fn build(self) -> std::result::Result<DohResolver, DohError> {
        let endpoint = Url::parse(&self.endpoint)
            .map_err(|e| DohError::InvalidEndpoint(format!("{}: {e}", self.endpoint)))?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(DohError::InvalidEndpoint(self.endpoint));
        }

        let http = HttpClient::builder()
            .timeout(self.timeout)
            .user_agent(&self.user_agent)
            .build()?;

        let rate_limiter = self
            .requests_per_second
            .and_then(NonZeroU32::new)
            .map(|rps| RateLimiter::direct(Quota::per_second(rps)));

        Ok(DohResolver {
            inner: Arc::new(DohInner {
                http,
                endpoint,
                rate_limiter,
            }),
        })
    }
}

/// Turn the presentation form of TXT data (`"part one" "part two"`) into the
/// concatenated record value. `\DDD` escapes are decimal bytes, so UTF-8 text
/// arrives as several of them. Unquoted data is returned as is.
fn unquote_txt(data: &str) -> String {
    let trimmed = data.trim();
    if !trimmed.starts_with('"') {
        return trimmed.to_string();
    }

    let bytes = trimmed.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut in_quotes = false;
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        i += 1;
        match b {
            b'"' => in_quotes = !in_quotes,
            b'\\' if in_quotes => {
                if let Some(value) = decimal_escape(&bytes[i..]) {
                    out.push(value);
                    i += 3;
                } else if let Some(&escaped) = bytes.get(i) {
                    out.push(escaped);
                    i += 1;
                }
            }
            _ if in_quotes => out.push(b),
            _ => {}
        }
    }

    String::from_utf8_lossy(&out).into_owned()
}

/// The byte written as `DDD` at the start of `rest`, if any.
fn decimal_escape(rest: &[u8]) -> Option<u8> {
    let digits = rest.get(..3)?;
    if !digits.iter().all(u8::is_ascii_digit) {
        return None;
    }
    let value = digits
        .iter()
        .fold(0u16, |acc, d| acc * 10 + u16::from(d - b'0'));
    u8::try_from(value).ok()
}
