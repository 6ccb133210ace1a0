//! Peer statistics snapshot (`getNeighbors`).

use serde::Deserialize;

/// Relay statistics for one connected peer.
///
/// `address` and `connection_type` together identify the label set of
/// the per-neighbor counters. The five counters are running totals kept
/// by the node itself; the exporter does not check that they are
/// monotonic.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct NeighborStats {
    /// Peer address as reported by the node, e.g. `"1.2.3.4:15600"`.
    pub address: String,
    /// Transport used for this peer, e.g. `"tcp"` or `"udp"`.
    pub connection_type: String,
    pub number_of_all_transactions: u64,
    pub number_of_random_transaction_requests: u64,
    pub number_of_new_transactions: u64,
    pub number_of_invalid_transactions: u64,
    pub number_of_sent_transactions: u64,
}

/// Response of `getNeighbors`.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct NeighborsResponse {
    pub neighbors: Vec<NeighborStats>,
    /// Time the node spent answering the request, in milliseconds.
    pub duration: u64,
}
