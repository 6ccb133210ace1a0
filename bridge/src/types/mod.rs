//! Wire types returned by the IRI node API.
//!
//! These are transient snapshots: each one is deserialized from a single
//! API response, read while populating a scrape's metrics, and dropped at
//! the end of that scrape. Nothing here is persisted or shared between
//! requests.
//!
//! All types use the node's camelCase JSON keys. Missing fields fall back
//! to their zero value, so older node versions that omit a field still
//! yield a usable snapshot.

/// Response of the `getNodeInfo` command.
pub mod node_info;

/// Response of the `getNeighbors` command.
pub mod neighbors;

pub use neighbors::{NeighborStats, NeighborsResponse};
pub use node_info::NodeStatus;

/// API commands understood by the node and used by the exporter.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Command {
    /// `getNodeInfo`: node-level scalar counters.
    GetNodeInfo,
    /// `getNeighbors`: per-peer relay statistics.
    GetNeighbors,
}

impl Command {
    /// Name of the command as it appears in the request body.
    pub fn as_str(&self) -> &'static str {
        match self {
            Command::GetNodeInfo => "getNodeInfo",
            Command::GetNeighbors => "getNeighbors",
        }
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
