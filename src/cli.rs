//! Command-line argument parsing for sparql-batch.
//!
//! Uses clap; flags given here override the config file.

use crate::config::Config;
use crate::report::OutputFormat;
use clap::Parser;
use std::path::PathBuf;

/// Runs SPARQL queries against a search endpoint one at a time and reports timings.
#[derive(Parser, Debug)]
#[command(name = "sparql-batch")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Query files or directories of .rq/.sparql files, run in the order given
    #[arg(value_name = "PATH", required = true)]
    pub paths: Vec<PathBuf>,

    /// Endpoint host
    #[arg(short = 'H', long, value_name = "HOST")]
    pub host: Option<String>,

    /// Endpoint port
    #[arg(short = 'p', long, value_name = "PORT")]
    pub port: Option<u16>,

    /// Path before the encoded query (e.g., v2/searchextended)
    #[arg(long, value_name = "PATH")]
    pub service_path: Option<String>,

    /// Per-request deadline in seconds (0 disables)
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Config file path
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Response field printed per query (a leading '/' makes it a JSON pointer)
    #[arg(long, value_name = "FIELD")]
    pub summary_field: Option<String>,

    /// Do not print raw response bodies
    #[arg(long)]
    pub no_body: bool,

    /// Output format
    #[arg(long, value_name = "FORMAT")]
    pub output: Option<OutputFormat>,

    /// Index of the first query to run
    #[arg(long, value_name = "INDEX", default_value_t = 0)]
    pub start: usize,

    /// Log at debug level unless RUST_LOG is set
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Parses command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Returns the config file path to use.
    ///
    /// Uses the --config argument if provided, otherwise the default path.
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(Config::default_path)
    }

    /// Applies CLI overrides on top of a loaded config.
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(host) = &self.host {
            config.endpoint.host = host.clone();
        }
        if let Some(port) = self.port {
            config.endpoint.port = port;
        }
        if let Some(service_path) = &self.service_path {
            config.endpoint.service_path = service_path.clone();
        }
        if let Some(timeout) = self.timeout {
            config.endpoint.timeout_secs = Some(timeout);
        }
        if let Some(field) = &self.summary_field {
            config.report.summary_field = field.clone();
        }
        if self.no_body {
            config.report.print_body = false;
        }
        if let Some(format) = self.output {
            config.report.format = format;
        }
    }
}
