//! HTTP transport backed by reqwest.

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use tracing::debug;

use super::{SearchResponse, SearchTransport};
use crate::error::{BatchError, Result};

/// Issues search requests over HTTP.
///
/// The client sets no timeout of its own; the executor owns the deadline.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Creates a new HTTP transport.
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("sparql-batch/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| BatchError::internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

fn map_request_error(e: reqwest::Error) -> BatchError {
    if e.is_timeout() {
        BatchError::transport(format!("Request timed out: {}", e))
    } else if e.is_connect() {
        BatchError::transport(format!("Failed to connect: {}", e))
    } else {
        BatchError::transport(format!("Request failed: {}", e))
    }
}

#[async_trait]
impl SearchTransport for HttpTransport {
    async fn get(&self, url: &str) -> Result<SearchResponse> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_request_error)?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned());
        debug!(status, content_type = ?content_type, "Response head received");

        let body = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(|e| BatchError::transport(format!("Stream error: {}", e))))
            .boxed();

        Ok(SearchResponse {
            status,
            content_type,
            body,
        })
    }
}
