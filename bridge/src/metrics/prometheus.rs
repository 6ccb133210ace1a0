//! Prometheus-backed scrape registry and exposition encoding.
//!
//! [`ScrapeMetrics`] owns a private `prometheus::Registry` plus the
//! strongly-typed counters that are filled from node snapshots. It is
//! meant to live for exactly one scrape.

use prometheus::{
    self, Encoder, IntCounter, IntCounterVec, IntGauge, Opts, ProtobufEncoder, Registry,
    TextEncoder, proto::MetricFamily,
};
use thiserror::Error;

use crate::types::{NeighborStats, NodeStatus};

/// Label names of the per-neighbor counters, in registration order.
pub const NEIGHBOR_LABELS: [&str; 2] = ["address", "connectionType"];

/// Errors raised while building or encoding a scrape's metrics.
#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("prometheus error: {0}")]
    Prometheus(#[from] prometheus::Error),
    #[error("node status already recorded for this scrape")]
    NodeStatusAlreadyRecorded,
}

/// Wire format of a scrape response.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ExpositionFormat {
    /// Prometheus text format, version 0.0.4.
    #[default]
    Text,
    /// Length-delimited `io.prometheus.client.MetricFamily` protobuf messages.
    Protobuf,
}

impl ExpositionFormat {
    /// Picks the format for a request's `Accept` header.
    ///
    /// Protobuf is chosen only when a media range names
    /// `application/vnd.google.protobuf` with
    /// `proto=io.prometheus.client.MetricFamily` and `encoding=delimited`.
    /// Ranges weighted `q=0` are not acceptable and are skipped. Anything
    /// else, including a missing header, yields text.
    pub fn from_accept(accept: Option<&str>) -> Self {
        let Some(accept) = accept else {
            return Self::Text;
        };

        for range in accept.split(',') {
            let mut parts = range.split(';').map(str::trim);
            let media_type = parts.next().unwrap_or_default();
            if !media_type.eq_ignore_ascii_case("application/vnd.google.protobuf") {
                continue;
            }

            let mut proto = false;
            let mut delimited = false;
            let mut acceptable = true;
            for param in parts {
                let Some((key, value)) = param.split_once('=') else {
                    continue;
                };
                let value = value.trim().trim_matches('"');
                match key.trim() {
                    "proto" => proto = value == "io.prometheus.client.MetricFamily",
                    "encoding" => delimited = value == "delimited",
                    "q" => acceptable = value.parse::<f32>().is_ok_and(|q| q > 0.0),
                    _ => {}
                }
            }

            if proto && delimited && acceptable {
                return Self::Protobuf;
            }
        }

        Self::Text
    }

    /// `Content-Type` header value matching the encoded body.
    pub fn content_type(&self) -> &'static str {
        match self {
            ExpositionFormat::Text => prometheus::TEXT_FORMAT,
            ExpositionFormat::Protobuf => prometheus::PROTOBUF_FORMAT,
        }
    }
}

fn int_counter(
    registry: &Registry,
    name: &str,
    help: &str,
) -> Result<IntCounter, prometheus::Error> {
    let counter = IntCounter::with_opts(Opts::new(name, help))?;
    registry.register(Box::new(counter.clone()))?;
    Ok(counter)
}

fn neighbor_counter(
    registry: &Registry,
    name: &str,
    help: &str,
) -> Result<IntCounterVec, prometheus::Error> {
    let counter = IntCounterVec::new(Opts::new(name, help), &NEIGHBOR_LABELS)?;
    registry.register(Box::new(counter.clone()))?;
    Ok(counter)
}

fn int_gauge(registry: &Registry, name: &str, help: &str) -> Result<IntGauge, prometheus::Error> {
    let gauge = IntGauge::with_opts(Opts::new(name, help))?;
    registry.register(Box::new(gauge.clone()))?;
    Ok(gauge)
}

/// Per-neighbor relay counters, labeled by `address` and `connectionType`.
#[derive(Clone)]
pub struct NeighborCounters {
    pub all_transactions: IntCounterVec,
    pub random_transaction_requests: IntCounterVec,
    pub new_transactions: IntCounterVec,
    pub invalid_transactions: IntCounterVec,
    pub sent_transactions: IntCounterVec,
}

impl NeighborCounters {
    /// Registers the five neighbor counters into `registry`.
    pub fn register(registry: &Registry) -> Result<Self, prometheus::Error> {
        Ok(Self {
            all_transactions: neighbor_counter(
                registry,
                "numberOfAllTransactions",
                "Transactions received from the neighbor",
            )?,
            random_transaction_requests: neighbor_counter(
                registry,
                "numberOfRandomTransactionRequests",
                "Random transaction requests received from the neighbor",
            )?,
            new_transactions: neighbor_counter(
                registry,
                "numberOfNewTransactions",
                "New transactions received from the neighbor",
            )?,
            invalid_transactions: neighbor_counter(
                registry,
                "numberOfInvalidTransactions",
                "Invalid transactions received from the neighbor",
            )?,
            sent_transactions: neighbor_counter(
                registry,
                "numberOfSentTransactions",
                "Transactions sent to the neighbor",
            )?,
        })
    }

    /// Adds one neighbor's totals to its label set.
    ///
    /// Counters start at zero, so after a single call the series equal the
    /// node-reported totals.
    pub fn record(&self, neighbor: &NeighborStats) {
        let labels = [
            neighbor.address.as_str(),
            neighbor.connection_type.as_str(),
        ];
        self.all_transactions
            .with_label_values(&labels)
            .inc_by(neighbor.number_of_all_transactions);
        self.random_transaction_requests
            .with_label_values(&labels)
            .inc_by(neighbor.number_of_random_transaction_requests);
        self.new_transactions
            .with_label_values(&labels)
            .inc_by(neighbor.number_of_new_transactions);
        self.invalid_transactions
            .with_label_values(&labels)
            .inc_by(neighbor.number_of_invalid_transactions);
        self.sent_transactions
            .with_label_values(&labels)
            .inc_by(neighbor.number_of_sent_transactions);
    }
}

/// Node-level scalar counters, only present when `getNodeInfo` succeeded.
#[derive(Clone)]
pub struct NodeCounters {
    pub latest_milestone_index: IntCounter,
    pub latest_solid_subtangle_milestone_index: IntCounter,
    pub number_of_neighbors: IntCounter,
    pub number_of_tips: IntCounter,
    pub number_of_transactions_to_request: IntCounter,
}

impl NodeCounters {
    /// Registers the five node counters into `registry`.
    pub fn register(registry: &Registry) -> Result<Self, prometheus::Error> {
        Ok(Self {
            latest_milestone_index: int_counter(
                registry,
                "latestMilestoneIndex",
                "Index of the latest milestone seen by the node",
            )?,
            latest_solid_subtangle_milestone_index: int_counter(
                registry,
                "latestSolidSubtangleMilestoneIndex",
                "Index of the latest solid subtangle milestone",
            )?,
            number_of_neighbors: int_counter(
                registry,
                "numberOfNeighbors",
                "Number of neighbors connected to the node",
            )?,
            number_of_tips: int_counter(registry, "numberOfTips", "Number of tips")?,
            number_of_transactions_to_request: int_counter(
                registry,
                "numberOfTransactionsToRequest",
                "Number of transactions the node is requesting",
            )?,
        })
    }

    /// Sets every counter to the matching status field.
    pub fn record(&self, status: &NodeStatus) {
        self.latest_milestone_index
            .inc_by(status.latest_milestone_index);
        self.latest_solid_subtangle_milestone_index
            .inc_by(status.latest_solid_subtangle_milestone_index);
        self.number_of_neighbors.inc_by(status.neighbors);
        self.number_of_tips.inc_by(status.tips);
        self.number_of_transactions_to_request
            .inc_by(status.transactions_to_request);
    }
}

/// Metrics of a single scrape.
///
/// The neighbor counters are registered up front so their names are part
/// of every scrape; node counters are registered only once a status
/// snapshot arrives. Dropping the value discards every series.
pub struct ScrapeMetrics {
    registry: Registry,
    neighbors: NeighborCounters,
    node: Option<NodeCounters>,
}

impl ScrapeMetrics {
    /// Creates an empty registry with the neighbor counters registered.
    pub fn new() -> Result<Self, MetricsError> {
        let registry = Registry::new();
        let neighbors = NeighborCounters::register(&registry)?;
        Ok(Self {
            registry,
            neighbors,
            node: None,
        })
    }

    /// Registers the node counters and sets them from `status`.
    ///
    /// Fails if a status was already recorded, since a second call would
    /// add onto the first snapshot.
    pub fn record_node_status(&mut self, status: &NodeStatus) -> Result<(), MetricsError> {
        if self.node.is_some() {
            return Err(MetricsError::NodeStatusAlreadyRecorded);
        }
        let counters = NodeCounters::register(&self.registry)?;
        counters.record(status);
        self.node = Some(counters);
        Ok(())
    }

    /// Records every neighbor's totals under its label set.
    pub fn record_neighbors(&self, neighbors: &[NeighborStats]) {
        for neighbor in neighbors {
            self.neighbors.record(neighbor);
        }
    }

    /// Exports `iriNodeInfoUp` and `iriNeighborsUp`, 1 for a successful
    /// fetch and 0 otherwise.
    pub fn record_fetch_status(
        &self,
        node_info_up: bool,
        neighbors_up: bool,
    ) -> Result<(), MetricsError> {
        let node_info = int_gauge(
            &self.registry,
            "iriNodeInfoUp",
            "Whether the getNodeInfo call of this scrape succeeded",
        )?;
        let neighbors = int_gauge(
            &self.registry,
            "iriNeighborsUp",
            "Whether the getNeighbors call of this scrape succeeded",
        )?;
        node_info.set(i64::from(node_info_up));
        neighbors.set(i64::from(neighbors_up));
        Ok(())
    }

    /// Neighbor counters of this scrape.
    pub fn neighbors(&self) -> &NeighborCounters {
        &self.neighbors
    }

    /// Node counters, if a status snapshot was recorded.
    pub fn node(&self) -> Option<&NodeCounters> {
        self.node.as_ref()
    }

    /// Collects all metric families with at least one sample.
    pub fn gather(&self) -> Vec<MetricFamily> {
        self.registry.gather()
    }

    /// Encodes all metrics in the requested exposition format.
    pub fn encode(&self, format: ExpositionFormat) -> Result<Vec<u8>, MetricsError> {
        let metric_families = self.gather();
        let mut buffer = Vec::new();
        match format {
            ExpositionFormat::Text => TextEncoder::new().encode(&metric_families, &mut buffer)?,
            ExpositionFormat::Protobuf => {
                ProtobufEncoder::new().encode(&metric_families, &mut buffer)?
            }
        }
        Ok(buffer)
    }
}
