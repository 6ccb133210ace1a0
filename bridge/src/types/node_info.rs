//! Node status snapshot (`getNodeInfo`).

use serde::Deserialize;

/// Node-level status reported by `getNodeInfo`.
///
/// Only five fields become metrics (see [`NodeStatus::latest_milestone_index`]
/// and friends). The remaining fields are informational; they are logged
/// at debug level on each scrape but never exported.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct NodeStatus {
    /// Name of the node software, e.g. `"IRI"`.
    pub app_name: String,
    /// Version string of the node software.
    pub app_version: String,
    /// Time the node spent answering the request, in milliseconds.
    pub duration: u64,

    pub jre_available_processors: u64,
    pub jre_free_memory: u64,
    pub jre_max_memory: u64,
    pub jre_total_memory: u64,
    pub jre_version: String,

    /// Hash of the latest milestone seen by the node.
    pub latest_milestone: String,
    /// Index of the latest milestone seen by the node.
    pub latest_milestone_index: u64,
    /// Hash of the latest solid (fully confirmed) milestone.
    pub latest_solid_subtangle_milestone: String,
    /// Index of the latest solid milestone.
    pub latest_solid_subtangle_milestone_index: u64,

    /// Number of connected neighbors.
    pub neighbors: u64,
    pub packets_queue_size: u64,
    /// Node wall-clock time, in milliseconds since the Unix epoch.
    pub time: u64,
    /// Number of tips in the node's tangle view.
    pub tips: u64,
    /// Number of transactions the node is still requesting from peers.
    pub transactions_to_request: u64,
}
