//! HTTP client for the IRI node API.
//!
//! The node exposes a single JSON endpoint. Every call is a `POST` of a
//! command object to the base URI:
//!
//! ```json
//! POST /
//! X-IOTA-API-Version: 1
//! Content-Type: application/json
//!
//! {"command":"getNodeInfo"}
//! ```
//!
//! and the node replies with the command's JSON document (see
//! [`crate::types`]).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::{NodeApi, NodeApiError};
use crate::config::NodeApiConfig;
use crate::types::{Command, NeighborsResponse, NodeStatus};

/// Header carrying the API version the node should speak.
pub const API_VERSION_HEADER: &str = "X-IOTA-API-Version";

/// API version sent with every request.
pub const API_VERSION: &str = "1";

/// HTTP-based node API client.
///
/// Cheap to share: the inner `reqwest::Client` pools connections and is
/// `Send + Sync`. Every request is bounded by the configured timeout.
#[derive(Clone, Debug)]
pub struct HttpNodeClient {
    base_url: String,
    client: Client,
    timeout: Duration,
}

/// Request payload sent to the node.
#[derive(Debug, Serialize)]
struct CommandRequest {
    command: &'static str,
}

impl HttpNodeClient {
    /// Constructs a client that POSTs to `base_url`, bounding each call by
    /// `timeout`.
    ///
    /// `base_url` is used verbatim as the request URI, e.g.
    /// `"http://localhost:14265"`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, NodeApiError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(NodeApiError::Client)?;

        Ok(Self {
            base_url: base_url.into(),
            client,
            timeout,
        })
    }

    /// Constructs a client from a [`NodeApiConfig`].
    pub fn from_config(cfg: &NodeApiConfig) -> Result<Self, NodeApiError> {
        Self::new(cfg.base_url.trim(), cfg.timeout)
    }

    /// URI every command is sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn post_command<T: DeserializeOwned>(&self, command: Command) -> Result<T, NodeApiError> {
        let resp = self
            .client
            .post(&self.base_url)
            .header(API_VERSION_HEADER, API_VERSION)
            .json(&CommandRequest {
                command: command.as_str(),
            })
            .send()
            .await
            .map_err(|source| NodeApiError::Transport { command, source })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(NodeApiError::Status { command, status });
        }

        let body = resp
            .bytes()
            .await
            .map_err(|source| NodeApiError::Transport { command, source })?;

        serde_json::from_slice(&body).map_err(|source| NodeApiError::Decode { command, source })
    }
}

#[async_trait]
impl NodeApi for HttpNodeClient {
    async fn get_node_info(&self) -> Result<NodeStatus, NodeApiError> {
        self.post_command(Command::GetNodeInfo).await
    }

    async fn get_neighbors(&self) -> Result<NeighborsResponse, NodeApiError> {
        self.post_command(Command::GetNeighbors).await
    }
}
