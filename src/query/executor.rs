//! Sequential batch execution.
//!
//! Walks a queue with a cursor, one request at a time. Each outcome is
//! reported before the next request is issued, and the first failure of any
//! kind halts the batch.

use std::fmt;
use std::time::{Duration, Instant};

use serde_json::Value;
use tracing::{debug, info, warn};

use super::{Query, QueryQueue};
use crate::classify::classify;
use crate::endpoint::Endpoint;
use crate::error::{BatchError, Result};
use crate::report::{QueryFailure, Reporter};
use crate::transport::SearchTransport;

/// Default field read from each response for the progress line.
pub const DEFAULT_SUMMARY_FIELD: &str = "schema:numberOfItems";

/// Runs query batches against one endpoint.
pub struct BatchExecutor<'a> {
    transport: &'a dyn SearchTransport,
    endpoint: &'a Endpoint,
    summary_field: String,
    deadline: Option<Duration>,
}

impl<'a> BatchExecutor<'a> {
    /// Creates a new executor with no deadline.
    pub fn new(transport: &'a dyn SearchTransport, endpoint: &'a Endpoint) -> Self {
        Self {
            transport,
            endpoint,
            summary_field: DEFAULT_SUMMARY_FIELD.to_string(),
            deadline: None,
        }
    }

    /// Sets the field reported from each payload.
    ///
    /// A field starting with `/` is treated as a JSON pointer.
    pub fn with_summary_field(mut self, field: impl Into<String>) -> Self {
        self.summary_field = field.into();
        self
    }

    /// Bounds each request, from issue to end of body.
    pub fn with_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.deadline = deadline;
        self
    }

    /// Runs the whole queue from the first query.
    pub async fn run(
        &self,
        queue: &QueryQueue,
        reporter: &mut dyn Reporter,
    ) -> Result<BatchStatus> {
        self.run_from(queue, 0, reporter).await
    }

    /// Runs the queue starting at `start`.
    ///
    /// A start at or past the end issues nothing and completes. The returned
    /// error is only for a broken output channel; halts are a `BatchStatus`.
    pub async fn run_from(
        &self,
        queue: &QueryQueue,
        start: usize,
        reporter: &mut dyn Reporter,
    ) -> Result<BatchStatus> {
        let mut cursor = start;

        while let Some(query) = queue.get(cursor) {
            match self.execute_one(cursor, query).await {
                Ok(outcome) => {
                    info!(
                        index = cursor,
                        elapsed_ms = outcome.elapsed.as_millis() as u64,
                        "Query completed"
                    );
                    reporter.succeeded(&outcome).map_err(output_error)?;
                    cursor += 1;
                }
                Err(halt) => {
                    warn!(index = cursor, "Batch halted: {}", halt.error);
                    reporter
                        .failed(&QueryFailure {
                            index: cursor,
                            label: query.label(),
                            error: &halt.error,
                            body: halt.body.as_deref(),
                        })
                        .map_err(output_error)?;

                    let status = BatchStatus::Halted {
                        index: cursor,
                        completed: cursor - start,
                        error: halt.error,
                    };
                    reporter.finished(&status).map_err(output_error)?;
                    return Ok(status);
                }
            }
        }

        let status = BatchStatus::Completed {
            completed: cursor - start,
        };
        info!("{status}");
        reporter.finished(&status).map_err(output_error)?;
        Ok(status)
    }

    async fn execute_one(
        &self,
        index: usize,
        query: &Query,
    ) -> std::result::Result<QueryOutcome, Halt> {
        let url = self.endpoint.url_for(query)?;
        debug!(index, query = %query, %url, "Issuing query");

        let start = Instant::now();
        let raw = match self.deadline {
            Some(deadline) => tokio::time::timeout(deadline, self.fetch(&url))
                .await
                .map_err(|_| {
                    Halt::from(BatchError::transport(format!(
                        "No complete response within {} ms",
                        deadline.as_millis()
                    )))
                })??,
            None => self.fetch(&url).await?,
        };
        let elapsed = start.elapsed();

        let payload: Value = serde_json::from_slice(&raw)
            .map_err(|e| Halt::from(BatchError::parse(e.to_string())))?;

        Ok(QueryOutcome {
            index,
            label: query.label().map(String::from),
            summary: summary_of(&payload, &self.summary_field),
            body: String::from_utf8_lossy(&raw).into_owned(),
            elapsed,
        })
    }

    /// Issues the request and reads the body of an accepted response.
    ///
    /// A rejected response is still read to the end before halting.
    async fn fetch(&self, url: &str) -> std::result::Result<Vec<u8>, Halt> {
        let response = self.transport.get(url).await?;

        if let Err(rejection) = classify(response.status, response.content_type.as_deref()) {
            let body = match response.read_body().await {
                Ok(raw) => Some(String::from_utf8_lossy(&raw).into_owned()),
                Err(e) => {
                    warn!("Failed to read body of rejected response: {e}");
                    None
                }
            };
            return Err(Halt {
                error: rejection.into(),
                body,
            });
        }

        Ok(response.read_body().await?)
    }
}

fn summary_of(payload: &Value, field: &str) -> Option<Value> {
    if field.starts_with('/') {
        payload.pointer(field).cloned()
    } else {
        payload.get(field).cloned()
    }
}

fn output_error(e: std::io::Error) -> BatchError {
    BatchError::io(format!("Failed to write report: {e}"))
}

/// Why a single query stopped the batch.
struct Halt {
    error: BatchError,
    body: Option<String>,
}

impl From<BatchError> for Halt {
    fn from(error: BatchError) -> Self {
        Self { error, body: None }
    }
}

/// Successful execution of one query.
#[derive(Debug, Clone)]
pub struct QueryOutcome {
    /// Position in the queue.
    pub index: usize,
    /// Label of the query, if it had one.
    pub label: Option<String>,
    /// Value of the summary field, if the payload had it.
    pub summary: Option<Value>,
    /// Raw response body.
    pub body: String,
    /// Time from issuing the request to the end of the body.
    pub elapsed: Duration,
}

/// Terminal state of a batch run.
#[derive(Debug)]
pub enum BatchStatus {
    /// Every query from the start position succeeded.
    Completed { completed: usize },
    /// The query at `index` failed; nothing after it was issued.
    Halted {
        index: usize,
        completed: usize,
        error: BatchError,
    },
}

impl BatchStatus {
    /// Number of queries that succeeded in this run.
    pub fn completed(&self) -> usize {
        match self {
            Self::Completed { completed } | Self::Halted { completed, .. } => *completed,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }
}

impl fmt::Display for BatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Completed { completed } => write!(f, "Batch completed: {completed} queries"),
            Self::Halted {
                index,
                completed,
                error,
            } => write!(
                f,
                "Batch halted at query {index} after {completed} completed: {}",
                error.category()
            ),
        }
    }
}
