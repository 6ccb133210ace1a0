//! Exporter configuration.
//!
//! Every setting can come from a CLI flag or an environment variable;
//! flags win. `IRI_API_URI` keeps the name existing deployments already
//! set for the node endpoint.

use std::net::SocketAddr;
use std::time::Duration;

use bridge::{
    BridgeConfig, DEFAULT_IRI_API_URI, DEFAULT_REQUEST_TIMEOUT, NodeApiConfig, ScrapeConfig,
};
use clap::Parser;

/// Command-line interface of the exporter.
#[derive(Debug, Parser)]
#[command(
    name = "exporter",
    about = "Exposes IRI node statistics on /metrics for Prometheus"
)]
pub struct Cli {
    /// IRI node API endpoint the commands are POSTed to.
    #[arg(long, env = "IRI_API_URI", default_value = DEFAULT_IRI_API_URI)]
    pub iri_api_uri: String,

    /// Timeout for each node API request, in seconds.
    #[arg(long, env = "IRI_API_TIMEOUT_SECS", default_value_t = DEFAULT_REQUEST_TIMEOUT.as_secs())]
    pub timeout_secs: u64,

    /// Address the HTTP server binds to.
    #[arg(long, env = "IRI_EXPORTER_LISTEN_ADDR", default_value = "0.0.0.0:9311")]
    pub listen_addr: SocketAddr,

    /// Also export iriNodeInfoUp / iriNeighborsUp gauges.
    #[arg(long, env = "IRI_EXPORTER_SCRAPE_STATUS")]
    pub scrape_status: bool,
}

/// Resolved configuration for the exporter binary.
#[derive(Clone, Debug)]
pub struct ExporterConfig {
    /// Address to bind the HTTP server to.
    pub listen_addr: SocketAddr,
    /// Node client and scrape settings.
    pub bridge: BridgeConfig,
}

impl From<Cli> for ExporterConfig {
    fn from(cli: Cli) -> Self {
        Self {
            listen_addr: cli.listen_addr,
            bridge: BridgeConfig {
                node_api: NodeApiConfig {
                    base_url: cli.iri_api_uri,
                    timeout: Duration::from_secs(cli.timeout_secs),
                },
                scrape: ScrapeConfig {
                    scrape_status: cli.scrape_status,
                },
            },
        }
    }
}
