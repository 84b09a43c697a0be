//! Transport layer for sparql-batch.
//!
//! Provides a trait-based interface for issuing one GET against the search
//! endpoint, so the executor can run against real HTTP or a scripted mock.

mod http;
mod mock;

pub use http::HttpTransport;
pub use mock::{MockResponse, MockTransport};

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;
use futures::StreamExt;

use crate::error::Result;

/// Streamed response body; each item is one chunk as it arrives.
pub type BodyStream = BoxStream<'static, Result<Bytes>>;

/// A response whose head has arrived and whose body is still streaming.
pub struct SearchResponse {
    /// HTTP status code.
    pub status: u16,
    /// Raw `Content-Type` header, if present.
    pub content_type: Option<String>,
    /// Body chunks, not yet read.
    pub body: BodyStream,
}

impl SearchResponse {
    /// Reads the body to completion.
    ///
    /// A chunk error aborts the read and is returned as-is.
    pub async fn read_body(mut self) -> Result<Vec<u8>> {
        let mut raw = Vec::new();
        while let Some(chunk) = self.body.next().await {
            raw.extend_from_slice(&chunk?);
        }
        Ok(raw)
    }
}

impl std::fmt::Debug for SearchResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchResponse")
            .field("status", &self.status)
            .field("content_type", &self.content_type)
            .finish_non_exhaustive()
    }
}

/// Trait for transports that can issue a search request.
///
/// Implementations must be thread-safe (Send + Sync) to support async operations.
#[async_trait]
pub trait SearchTransport: Send + Sync {
    /// Issues a GET for `url` and returns once the response head has arrived.
    async fn get(&self, url: &str) -> Result<SearchResponse>;
}
