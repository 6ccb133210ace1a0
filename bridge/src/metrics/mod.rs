//! Per-scrape Prometheus metrics.
//!
//! Every scrape builds its own [`ScrapeMetrics`], fills it from the node's
//! latest snapshots, encodes it, and drops it. No metric value outlives
//! the request that produced it, so concurrent scrapes never see each
//! other's series.
//!
//! Typical usage:
//!
//! ```ignore
//! use bridge::metrics::{ExpositionFormat, ScrapeMetrics};
//!
//! let mut metrics = ScrapeMetrics::new()?;
//! metrics.record_node_status(&status)?;
//! metrics.record_neighbors(&neighbors.neighbors);
//!
//! let format = ExpositionFormat::from_accept(Some("text/plain"));
//! let body = metrics.encode(format)?;
//! ```

pub mod prometheus;

pub use self::prometheus::{
    ExpositionFormat, MetricsError, NEIGHBOR_LABELS, NeighborCounters, NodeCounters,
    ScrapeMetrics,
};
