//! Core of the IRI Prometheus exporter.
//!
//! This crate provides the building blocks of a scrape:
//!
//! - wire types of the node API responses (`types`),
//! - the node API client and its trait seam (`node_client`),
//! - the per-scrape Prometheus registry and encoders (`metrics`),
//! - the scrape step tying them together (`scrape`),
//! - and a top-level configuration (`config`).
//!
//! The HTTP server that serves `/metrics` lives in the `exporter` binary.

pub mod config;
pub mod metrics;
pub mod node_client;
pub mod scrape;
pub mod types;

// Re-export top-level configuration types.
pub use config::{
    BridgeConfig, ConfigError, DEFAULT_IRI_API_URI, DEFAULT_REQUEST_TIMEOUT, NodeApiConfig,
    ScrapeConfig,
};

// Re-export the node API seam and the HTTP client.
pub use node_client::{HttpNodeClient, NodeApi, NodeApiError};

// Re-export the per-scrape registry.
pub use metrics::{ExpositionFormat, MetricsError, ScrapeMetrics};

pub use scrape::{ScrapeOutput, ScrapeReport, Scraper};

// Re-export wire types at the crate root for convenience.
pub use types::*;
