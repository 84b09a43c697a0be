//! Output channel for batch results.
//!
//! Each outcome is written as soon as it is known and then dropped. Two
//! formats are supported: plain text and JSON lines.

use std::io::{self, Write};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::BatchError;
use crate::query::{BatchStatus, QueryOutcome};

/// Separator line written after every successful query in text mode.
pub const SEPARATOR: &str = "++++++++++";

/// Output format for reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Summary, raw body, duration and separator per query.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Invalid output format: {s}. Expected: text or json")),
        }
    }
}

/// A failed query, as handed to a reporter.
#[derive(Debug)]
pub struct QueryFailure<'a> {
    pub index: usize,
    pub label: Option<&'a str>,
    pub error: &'a BatchError,
    /// Body read from a rejected response, if one was received.
    pub body: Option<&'a str>,
}

/// Receives batch events in order.
pub trait Reporter {
    /// Called once per successful query, before the next request is issued.
    fn succeeded(&mut self, outcome: &QueryOutcome) -> io::Result<()>;

    /// Called at most once per batch, for the query that halted it.
    fn failed(&mut self, failure: &QueryFailure<'_>) -> io::Result<()>;

    /// Called once when the batch ends.
    fn finished(&mut self, status: &BatchStatus) -> io::Result<()>;
}

/// Renders a summary value the way it should appear on its own line.
pub fn summary_text(summary: Option<&Value>) -> String {
    match summary {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => "(missing)".to_string(),
    }
}

/// Plain-text reporter: results to `out`, errors and status to `err`.
pub struct TextReporter<O: Write, E: Write> {
    out: O,
    err: E,
    print_body: bool,
}

impl<O: Write, E: Write> TextReporter<O, E> {
    pub fn new(out: O, err: E) -> Self {
        Self {
            out,
            err,
            print_body: true,
        }
    }

    /// Controls whether raw response bodies are written.
    pub fn with_body(mut self, print_body: bool) -> Self {
        self.print_body = print_body;
        self
    }

    /// Returns the writers, for inspection in tests.
    pub fn into_inner(self) -> (O, E) {
        (self.out, self.err)
    }
}

impl<O: Write, E: Write> Reporter for TextReporter<O, E> {
    fn succeeded(&mut self, outcome: &QueryOutcome) -> io::Result<()> {
        writeln!(self.out, "{}", summary_text(outcome.summary.as_ref()))?;
        if self.print_body {
            writeln!(self.out, "{}", outcome.body)?;
        }
        writeln!(self.out, "Duration in millis: {}", outcome.elapsed.as_millis())?;
        writeln!(self.out, "{SEPARATOR}")?;
        self.out.flush()
    }

    fn failed(&mut self, failure: &QueryFailure<'_>) -> io::Result<()> {
        let position = match failure.label {
            Some(label) => format!("query {} ({label})", failure.index),
            None => format!("query {}", failure.index),
        };
        writeln!(self.err, "{position}: {}", failure.error)?;
        self.err.flush()?;

        if let Some(body) = failure.body {
            writeln!(self.out, "{body}")?;
            self.out.flush()?;
        }
        Ok(())
    }

    fn finished(&mut self, status: &BatchStatus) -> io::Result<()> {
        writeln!(self.err, "{status}")?;
        self.err.flush()
    }
}

#[derive(Serialize)]
#[serde(tag = "event", rename_all = "lowercase")]
enum JsonEvent<'a> {
    Succeeded {
        index: usize,
        label: Option<&'a str>,
        summary: Option<&'a Value>,
        elapsed_ms: u64,
        #[serde(skip_serializing_if = "Option::is_none")]
        body: Option<&'a str>,
    },
    Failed {
        index: usize,
        label: Option<&'a str>,
        category: &'static str,
        message: String,
        body: Option<&'a str>,
    },
    Finished {
        status: &'static str,
        completed: usize,
        #[serde(skip_serializing_if = "Option::is_none")]
        halted_at: Option<usize>,
    },
}

/// JSON-lines reporter.
pub struct JsonReporter<O: Write> {
    out: O,
    print_body: bool,
}

impl<O: Write> JsonReporter<O> {
    pub fn new(out: O) -> Self {
        Self {
            out,
            print_body: false,
        }
    }

    /// Includes raw bodies of successful responses in each event.
    pub fn with_body(mut self, print_body: bool) -> Self {
        self.print_body = print_body;
        self
    }

    pub fn into_inner(self) -> O {
        self.out
    }

    fn emit(&mut self, event: &JsonEvent<'_>) -> io::Result<()> {
        serde_json::to_writer(&mut self.out, event)?;
        writeln!(self.out)?;
        self.out.flush()
    }
}

impl<O: Write> Reporter for JsonReporter<O> {
    fn succeeded(&mut self, outcome: &QueryOutcome) -> io::Result<()> {
        let body = self.print_body.then_some(outcome.body.as_str());
        self.emit(&JsonEvent::Succeeded {
            index: outcome.index,
            label: outcome.label.as_deref(),
            summary: outcome.summary.as_ref(),
            elapsed_ms: outcome.elapsed.as_millis() as u64,
            body,
        })
    }

    fn failed(&mut self, failure: &QueryFailure<'_>) -> io::Result<()> {
        self.emit(&JsonEvent::Failed {
            index: failure.index,
            label: failure.label,
            category: failure.error.category(),
            message: failure.error.to_string(),
            body: failure.body,
        })
    }

    fn finished(&mut self, status: &BatchStatus) -> io::Result<()> {
        let (name, halted_at) = match status {
            BatchStatus::Completed { .. } => ("completed", None),
            BatchStatus::Halted { index, .. } => ("halted", Some(*index)),
        };
        self.emit(&JsonEvent::Finished {
            status: name,
            completed: status.completed(),
            halted_at,
        })
    }
}
