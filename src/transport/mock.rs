//! Scripted transport for testing.
//!
//! Replays canned responses in order and records every requested URL.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream;
use futures::StreamExt;

use super::{SearchResponse, SearchTransport};
use crate::error::{BatchError, Result};

/// One scripted reply.
#[derive(Debug, Clone)]
pub struct MockResponse {
    status: u16,
    content_type: Option<String>,
    chunks: Vec<Bytes>,
    /// Abort the body with this message after the chunks are sent.
    abort: Option<String>,
    /// Fail before any response head with this message.
    connect_error: Option<String>,
    delay: Option<Duration>,
}

impl MockResponse {
    /// A 200 response with the given JSON body.
    pub fn json(body: impl Into<String>) -> Self {
        Self::new(200, Some("application/json; charset=utf-8"), body)
    }

    /// A response with an arbitrary status, content type and body.
    pub fn new(status: u16, content_type: Option<&str>, body: impl Into<String>) -> Self {
        Self {
            status,
            content_type: content_type.map(String::from),
            chunks: vec![Bytes::from(body.into())],
            abort: None,
            connect_error: None,
            delay: None,
        }
    }

    /// A request that fails before any response arrives.
    pub fn connect_error(msg: impl Into<String>) -> Self {
        Self {
            connect_error: Some(msg.into()),
            ..Self::new(0, None, "")
        }
    }

    /// Splits the body into the given chunks instead of one.
    pub fn with_chunks<I, S>(mut self, chunks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Bytes>,
    {
        self.chunks = chunks.into_iter().map(Into::into).collect();
        self
    }

    /// Aborts the body stream after the chunks with a transport error.
    pub fn aborting(mut self, msg: impl Into<String>) -> Self {
        self.abort = Some(msg.into());
        self
    }

    /// Waits before returning the response head.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

/// A transport that returns scripted responses and records requests.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    responses: Arc<Mutex<VecDeque<MockResponse>>>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl MockTransport {
    /// Creates a mock with no scripted responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mock that replays `responses` in order.
    pub fn with_responses(responses: impl IntoIterator<Item = MockResponse>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses.into_iter().collect())),
            requests: Arc::default(),
        }
    }

    /// Returns every URL requested so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }

    /// Returns the number of requests issued so far.
    pub fn request_count(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or_default()
    }
}

#[async_trait]
impl SearchTransport for MockTransport {
    async fn get(&self, url: &str) -> Result<SearchResponse> {
        self.requests
            .lock()
            .map_err(|_| BatchError::internal("mock request log poisoned"))?
            .push(url.to_string());

        let scripted = self
            .responses
            .lock()
            .map_err(|_| BatchError::internal("mock responses poisoned"))?
            .pop_front()
            .ok_or_else(|| BatchError::transport(format!("No scripted response for {url}")))?;

        if let Some(delay) = scripted.delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(msg) = scripted.connect_error {
            return Err(BatchError::transport(msg));
        }

        let mut items: Vec<Result<Bytes>> = scripted.chunks.into_iter().map(Ok).collect();
        if let Some(msg) = scripted.abort {
            items.push(Err(BatchError::transport(msg)));
        }

        Ok(SearchResponse {
            status: scripted.status,
            content_type: scripted.content_type,
            body: stream::iter(items).boxed(),
        })
    }
}
