//! Clients for the IRI node API.
//!
//! [`NodeApi`] is the seam between the scrape step and the node: the
//! scraper only needs the two snapshots, and tests substitute an
//! in-memory implementation. [`HttpNodeClient`] is the production
//! implementation that POSTs commands to the node over HTTP.

pub mod http;

pub use http::HttpNodeClient;

use async_trait::async_trait;
use reqwest::StatusCode;
use thiserror::Error;

use crate::types::{Command, NeighborsResponse, NodeStatus};

/// Errors that can occur while talking to the node API.
///
/// The scraper treats every variant as "no data" for the affected command;
/// the distinction exists for logging and tests.
#[derive(Debug, Error)]
pub enum NodeApiError {
    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    /// Connection refused, timeout, or the body could not be read.
    #[error("{command} request failed: {source}")]
    Transport {
        command: Command,
        #[source]
        source: reqwest::Error,
    },
    /// The node answered with a non-success status code.
    #[error("{command} returned HTTP status {status}")]
    Status { command: Command, status: StatusCode },
    /// The response body was not the expected JSON document.
    #[error("failed to decode {command} response: {source}")]
    Decode {
        command: Command,
        #[source]
        source: serde_json::Error,
    },
}

impl NodeApiError {
    /// Command the failed call was issued for, if any.
    pub fn command(&self) -> Option<Command> {
        match self {
            NodeApiError::Client(_) => None,
            NodeApiError::Transport { command, .. }
            | NodeApiError::Status { command, .. }
            | NodeApiError::Decode { command, .. } => Some(*command),
        }
    }
}

/// Source of node snapshots for a scrape.
///
/// Each call is a single attempt; implementations must not retry.
#[async_trait]
pub trait NodeApi: Send + Sync {
    /// Issues `getNodeInfo`.
    async fn get_node_info(&self) -> Result<NodeStatus, NodeApiError>;

    /// Issues `getNeighbors`.
    async fn get_neighbors(&self) -> Result<NeighborsResponse, NodeApiError>;
}
