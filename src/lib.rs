//! sparql-batch - runs SPARQL search queries one at a time and reports timings.
//!
//! This library exposes the core modules for use in integration tests.

pub mod classify;
pub mod cli;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod logging;
pub mod query;
pub mod report;
pub mod transport;
