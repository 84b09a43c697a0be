//! Query batches for sparql-batch.
//!
//! A batch is an ordered, immutable queue of opaque query payloads. The
//! executor walks it strictly in order, one request at a time.

pub mod executor;
mod loader;

pub use executor::{BatchExecutor, BatchStatus, QueryOutcome};
pub use loader::{load_queue, QUERY_EXTENSIONS};

use std::fmt;

/// A single opaque query payload.
///
/// The harness never inspects the text; the label is only used in reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    text: String,
    label: Option<String>,
}

impl Query {
    /// Creates an unlabelled query.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            label: None,
        }
    }

    /// Attaches a label (usually the fixture file name).
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Returns the raw query payload.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the label, if any.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.label {
            Some(label) => write!(f, "{label}"),
            None => write!(f, "<{} bytes>", self.text.len()),
        }
    }
}

/// Ordered queue of queries, fixed at construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryQueue {
    queries: Vec<Query>,
}

impl QueryQueue {
    /// Creates a queue; insertion order is execution order.
    pub fn new(queries: Vec<Query>) -> Self {
        Self { queries }
    }

    pub fn len(&self) -> usize {
        self.queries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }

    /// Returns the query at `index`, or `None` past the end.
    pub fn get(&self, index: usize) -> Option<&Query> {
        self.queries.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Query> {
        self.queries.iter()
    }
}

impl<S: Into<String>> FromIterator<S> for QueryQueue {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(Query::new).collect())
    }
}
