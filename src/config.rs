//! Configuration management for sparql-batch.
//!
//! Handles loading configuration from TOML files and environment variables:
//! where the search endpoint lives and how results are reported.

use crate::endpoint::{Endpoint, DEFAULT_HOST, DEFAULT_PORT, DEFAULT_SERVICE_PATH};
use crate::error::{BatchError, Result};
use crate::query::executor::DEFAULT_SUMMARY_FIELD;
use crate::report::OutputFormat;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable overriding the default host.
pub const HOST_ENV: &str = "SPARQL_BATCH_HOST";

/// Environment variable overriding the default port.
pub const PORT_ENV: &str = "SPARQL_BATCH_PORT";

/// Main configuration structure for sparql-batch.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Search endpoint configuration.
    #[serde(default)]
    pub endpoint: EndpointConfig,

    /// Output configuration.
    #[serde(default)]
    pub report: ReportConfig,
}

/// Search endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointConfig {
    /// Endpoint host.
    #[serde(default = "default_host")]
    pub host: String,

    /// Endpoint port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Path prefix before the encoded query (e.g., "v2/searchextended").
    #[serde(default = "default_service_path")]
    pub service_path: String,

    /// Per-request deadline in seconds. Absent means wait indefinitely.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_service_path() -> String {
    DEFAULT_SERVICE_PATH.to_string()
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            service_path: default_service_path(),
            timeout_secs: None,
        }
    }
}

impl EndpointConfig {
    /// Applies environment variables as defaults for fields still at their default.
    pub fn apply_env_defaults(&mut self) {
        if self.host == DEFAULT_HOST {
            if let Ok(host) = std::env::var(HOST_ENV) {
                self.host = host;
            }
        }
        if self.port == default_port() {
            if let Ok(port_str) = std::env::var(PORT_ENV) {
                if let Ok(port) = port_str.parse() {
                    self.port = port;
                }
            }
        }
    }

    /// Builds the endpoint, validating the host.
    pub fn to_endpoint(&self) -> Result<Endpoint> {
        Endpoint::new(self.host.clone(), self.port, &self.service_path)
    }

    /// Returns the per-request deadline, if one is configured.
    ///
    /// A value of zero is treated as no deadline.
    pub fn deadline(&self) -> Option<Duration> {
        self.timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }
}

/// Output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Field of each payload printed as the progress line.
    #[serde(default = "default_summary_field")]
    pub summary_field: String,

    /// Whether raw response bodies are printed.
    #[serde(default = "default_print_body")]
    pub print_body: bool,

    /// Output format: "text" or "json".
    #[serde(default)]
    pub format: OutputFormat,
}

fn default_summary_field() -> String {
    DEFAULT_SUMMARY_FIELD.to_string()
}

fn default_print_body() -> bool {
    true
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            summary_field: default_summary_field(),
            print_body: default_print_body(),
            format: OutputFormat::default(),
        }
    }
}

impl Config {
    /// Returns the default config file path for the current platform.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("sparql-batch")
            .join("config.toml")
    }

    /// Loads configuration from a TOML file.
    ///
    /// A missing file yields the defaults.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| BatchError::config(format!("Failed to read config file: {e}")))?;

        Self::parse_toml(&content, path)
    }

    /// Parses configuration from a TOML string.
    fn parse_toml(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|e| {
            BatchError::config(format!("Invalid config file {}:\n  {}", path.display(), e))
        })
    }
}
