//! Top-level configuration for the exporter core.
//!
//! This module aggregates configuration for:
//!
//! - the IRI node API client (base URI + request timeout),
//! - the scrape step (optional scrape-status gauges).
//!
//! Binaries construct a [`BridgeConfig`] from defaults, CLI flags, or
//! environment variables as needed, then call [`BridgeConfig::validate`]
//! before wiring up the client.

use std::time::Duration;

use reqwest::Url;
use thiserror::Error;

/// Node API base URI used when `IRI_API_URI` is not set.
pub const DEFAULT_IRI_API_URI: &str = "http://localhost:14265";

/// Default bound on a single node API request.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors raised for configuration values that cannot be used.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("node API URI must not be empty")]
    EmptyUri,
    #[error("node API URI `{uri}` is not a valid URL: {reason}")]
    InvalidUri { uri: String, reason: String },
    #[error("node API URI `{0}` must use the http or https scheme")]
    UnsupportedScheme(String),
    #[error("node API URI `{0}` has no host")]
    MissingHost(String),
    #[error("node API request timeout must be greater than zero")]
    ZeroTimeout,
}

/// Configuration for the IRI node API client.
#[derive(Clone, Debug)]
pub struct NodeApiConfig {
    /// Endpoint the commands are POSTed to, e.g. `"http://localhost:14265"`.
    pub base_url: String,
    /// Upper bound on each request, covering connect, send, and body read.
    pub timeout: Duration,
}

impl Default for NodeApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_IRI_API_URI.to_string(),
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl NodeApiConfig {
    /// Checks that the URI is an absolute HTTP(S) URI and the timeout is
    /// non-zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let uri = self.base_url.trim();
        if uri.is_empty() {
            return Err(ConfigError::EmptyUri);
        }
        let url = Url::parse(uri).map_err(|e| ConfigError::InvalidUri {
            uri: uri.to_string(),
            reason: e.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::UnsupportedScheme(uri.to_string()));
        }
        if url.host_str().is_none_or(str::is_empty) {
            return Err(ConfigError::MissingHost(uri.to_string()));
        }
        if self.timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }
}

/// Configuration for the scrape step.
#[derive(Clone, Debug, Default)]
pub struct ScrapeConfig {
    /// Also export `iriNodeInfoUp` / `iriNeighborsUp` gauges reporting
    /// whether each upstream fetch succeeded. Off by default so the output
    /// carries only the node's own counters.
    pub scrape_status: bool,
}

/// Top-level configuration for the exporter core.
#[derive(Clone, Debug, Default)]
pub struct BridgeConfig {
    pub node_api: NodeApiConfig,
    pub scrape: ScrapeConfig,
}

impl BridgeConfig {
    /// Validates every sub-config.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.node_api.validate()
    }
}
