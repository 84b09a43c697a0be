//! Error types for sparql-batch.
//!
//! Defines the main error enum used throughout the application.

use thiserror::Error;

use crate::classify::Rejection;

/// Main error type for sparql-batch operations.
#[derive(Error, Debug)]
pub enum BatchError {
    /// The response did not meet the success contract (status or content type).
    #[error("Classification error: {0}")]
    Classification(#[from] Rejection),

    /// The response body could not be parsed as JSON.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Connection-level failures (refused, reset, mid-stream abort, deadline).
    #[error("Transport error: {0}")]
    Transport(String),

    /// A query payload that cannot be sent as one path segment.
    #[error("Query error: {0}")]
    Query(String),

    /// Configuration errors (invalid config file, bad endpoint, no queries, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Filesystem errors while loading query fixtures.
    #[error("I/O error: {0}")]
    Io(String),

    /// Internal application errors (unexpected states, bugs, etc.)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl BatchError {
    /// Creates a parse error with the given message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Creates a transport error with the given message.
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Creates a query error with the given message.
    pub fn query(msg: impl Into<String>) -> Self {
        Self::Query(msg.into())
    }

    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates an I/O error with the given message.
    pub fn io(msg: impl Into<String>) -> Self {
        Self::Io(msg.into())
    }

    /// Creates an internal error with the given message.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Classification(_) => "Classification Error",
            Self::Parse(_) => "Parse Error",
            Self::Transport(_) => "Transport Error",
            Self::Query(_) => "Query Error",
            Self::Config(_) => "Configuration Error",
            Self::Io(_) => "I/O Error",
            Self::Internal(_) => "Internal Error",
        }
    }
}

/// Result type alias using BatchError.
pub type Result<T> = std::result::Result<T, BatchError>;
