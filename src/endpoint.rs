//! Search endpoint addressing.
//!
//! Builds the request target for a query: a fixed host, port and service
//! path, followed by the query payload percent-encoded as one path segment.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use url::Url;

use crate::error::{BatchError, Result};
use crate::query::Query;

/// Characters left as-is, matching JavaScript's `encodeURIComponent`.
const QUERY_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 3333;
pub const DEFAULT_SERVICE_PATH: &str = "v2/searchextended";

/// A fixed search endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    host: String,
    port: u16,
    service_path: String,
}

impl Endpoint {
    /// Creates an endpoint, rejecting hosts that do not form a valid URL.
    ///
    /// The host must parse back as exactly itself, so values carrying a
    /// path, userinfo, port, query or fragment are refused.
    pub fn new(host: impl Into<String>, port: u16, service_path: &str) -> Result<Self> {
        let host = host.into();
        let base = format!("http://{host}:{port}/");
        let url = Url::parse(&base)
            .map_err(|e| BatchError::config(format!("Invalid endpoint '{base}': {e}")))?;

        let host_matches = url.host_str().is_some_and(|parsed| {
            strip_brackets(parsed).eq_ignore_ascii_case(strip_brackets(&host))
        });
        let is_bare = url.path() == "/"
            && url.username().is_empty()
            && url.password().is_none()
            && url.query().is_none()
            && url.fragment().is_none()
            && url.port_or_known_default() == Some(port);

        if !host_matches || !is_bare {
            return Err(BatchError::config(format!(
                "Invalid endpoint host '{host}': expected a bare host name or IP address"
            )));
        }

        Ok(Self {
            host,
            port,
            service_path: service_path.trim_matches('/').to_string(),
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn service_path(&self) -> &str {
        &self.service_path
    }

    /// Returns `http://host:port` without a trailing slash.
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    /// Returns the path component for a query, e.g. `/v2/searchextended/PREFIX%20...`.
    ///
    /// Payloads of exactly `.` or `..` are refused: URL parsing would collapse
    /// them as dot segments, even percent-encoded, and change the target.
    pub fn path_for(&self, query: &Query) -> Result<String> {
        if matches!(query.text(), "." | "..") {
            return Err(BatchError::query(format!(
                "'{}' cannot be sent as a path segment",
                query.text()
            )));
        }

        let encoded = encode_query(query.text());
        if self.service_path.is_empty() {
            Ok(format!("/{encoded}"))
        } else {
            Ok(format!("/{}/{encoded}", self.service_path))
        }
    }

    /// Returns the absolute URL for a query.
    pub fn url_for(&self, query: &Query) -> Result<String> {
        Ok(format!("{}{}", self.base_url(), self.path_for(query)?))
    }

    /// Returns a display string for logs.
    pub fn display_string(&self) -> String {
        if self.service_path.is_empty() {
            self.base_url()
        } else {
            format!("{}/{}", self.base_url(), self.service_path)
        }
    }
}

impl Default for Endpoint {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            service_path: DEFAULT_SERVICE_PATH.to_string(),
        }
    }
}

fn strip_brackets(host: &str) -> &str {
    host.trim_start_matches('[').trim_end_matches(']')
}

/// Percent-encodes a query payload so it fits in one path segment.
pub fn encode_query(text: &str) -> String {
    utf8_percent_encode(text, QUERY_SEGMENT).to_string()
}
