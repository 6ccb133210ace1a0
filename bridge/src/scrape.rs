//! The scrape step: node snapshots in, exposition body out.
//!
//! One call to [`Scraper::scrape`] is one Prometheus scrape:
//!
//! 1. build a fresh [`ScrapeMetrics`] (neighbor counters always registered),
//! 2. fetch `getNodeInfo` and, if it succeeds, set the node counters,
//! 3. fetch `getNeighbors` and, if it succeeds, set one labeled series per
//!    neighbor,
//! 4. encode everything in the negotiated format.
//!
//! Upstream failures are soft: the affected metrics are left out and the
//! scrape carries on. Metric state never outlives the call.

use std::sync::Arc;

use tracing::{debug, error, warn};

use crate::config::ScrapeConfig;
use crate::metrics::{ExpositionFormat, MetricsError, ScrapeMetrics};
use crate::node_client::NodeApi;
use crate::types::{NeighborsResponse, NodeStatus};

/// Which upstream calls of a scrape produced data.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ScrapeReport {
    /// `getNodeInfo` succeeded and the node counters were exported.
    pub node_info: bool,
    /// `getNeighbors` succeeded and its series were exported.
    pub neighbors: bool,
    /// Number of neighbors reported by a successful `getNeighbors`.
    pub neighbor_count: usize,
}

/// Encoded result of one scrape.
#[derive(Clone, Debug)]
pub struct ScrapeOutput {
    pub body: Vec<u8>,
    /// `Content-Type` matching `body`.
    pub content_type: &'static str,
    pub report: ScrapeReport,
}

/// Translates node API snapshots into a metrics exposition, one scrape
/// at a time.
///
/// A `Scraper` holds no metric state, only the API handle and settings,
/// so it can serve any number of concurrent scrapes.
#[derive(Clone)]
pub struct Scraper {
    api: Arc<dyn NodeApi>,
    cfg: ScrapeConfig,
}

impl Scraper {
    pub fn new(api: Arc<dyn NodeApi>, cfg: ScrapeConfig) -> Self {
        Self { api, cfg }
    }

    /// Runs one scrape and encodes it as `format`.
    ///
    /// Never fails: if the metrics cannot be built or encoded the error is
    /// logged and an empty body is returned with the same content type.
    pub async fn scrape(&self, format: ExpositionFormat) -> ScrapeOutput {
        match self.try_scrape(format).await {
            Ok(output) => output,
            Err(e) => {
                error!("failed to build metrics for scrape: {e}");
                ScrapeOutput {
                    body: Vec::new(),
                    content_type: format.content_type(),
                    report: ScrapeReport::default(),
                }
            }
        }
    }

    async fn try_scrape(&self, format: ExpositionFormat) -> Result<ScrapeOutput, MetricsError> {
        let mut metrics = ScrapeMetrics::new()?;
        let mut report = ScrapeReport::default();

        if let Some(status) = self.fetch_node_status().await {
            metrics.record_node_status(&status)?;
            report.node_info = true;
        }

        if let Some(resp) = self.fetch_neighbors().await {
            metrics.record_neighbors(&resp.neighbors);
            report.neighbors = true;
            report.neighbor_count = resp.neighbors.len();
        }

        if self.cfg.scrape_status {
            metrics.record_fetch_status(report.node_info, report.neighbors)?;
        }

        let body = metrics.encode(format)?;
        debug!(
            node_info = report.node_info,
            neighbors = report.neighbors,
            neighbor_count = report.neighbor_count,
            bytes = body.len(),
            "scrape complete"
        );

        Ok(ScrapeOutput {
            body,
            content_type: format.content_type(),
            report,
        })
    }

    async fn fetch_node_status(&self) -> Option<NodeStatus> {
        match self.api.get_node_info().await {
            Ok(status) => {
                debug!(
                    app_name = %status.app_name,
                    app_version = %status.app_version,
                    jre_version = %status.jre_version,
                    jre_free_memory = status.jre_free_memory,
                    jre_total_memory = status.jre_total_memory,
                    latest_milestone = %status.latest_milestone,
                    packets_queue_size = status.packets_queue_size,
                    duration_ms = status.duration,
                    "fetched node info"
                );
                Some(status)
            }
            Err(e) => {
                warn!("skipping node counters: {e}");
                None
            }
        }
    }

    async fn fetch_neighbors(&self) -> Option<NeighborsResponse> {
        match self.api.get_neighbors().await {
            Ok(resp) => {
                debug!(
                    count = resp.neighbors.len(),
                    duration_ms = resp.duration,
                    "fetched neighbors"
                );
                Some(resp)
            }
            Err(e) => {
                warn!("skipping neighbor counters: {e}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use reqwest::StatusCode;

    use super::*;
    use crate::node_client::NodeApiError;
    use crate::types::{Command, NeighborStats};

    /// In-memory node whose answers can be swapped between scrapes.
    #[derive(Default)]
    struct FakeNode {
        status: Mutex<Option<NodeStatus>>,
        neighbors: Mutex<Option<Vec<NeighborStats>>>,
    }

    impl FakeNode {
        fn set_status(&self, status: Option<NodeStatus>) {
            *self.status.lock().unwrap() = status;
        }

        fn set_neighbors(&self, neighbors: Option<Vec<NeighborStats>>) {
            *self.neighbors.lock().unwrap() = neighbors;
        }
    }

    fn unavailable(command: Command) -> NodeApiError {
        NodeApiError::Status {
            command,
            status: StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    #[async_trait]
    impl NodeApi for FakeNode {
        async fn get_node_info(&self) -> Result<NodeStatus, NodeApiError> {
            self.status
                .lock()
                .unwrap()
                .clone()
                .ok_or_else(|| unavailable(Command::GetNodeInfo))
        }

        async fn get_neighbors(&self) -> Result<NeighborsResponse, NodeApiError> {
            self.neighbors
                .lock()
                .unwrap()
                .clone()
                .map(|neighbors| NeighborsResponse {
                    neighbors,
                    duration: 1,
                })
                .ok_or_else(|| unavailable(Command::GetNeighbors))
        }
    }

    fn status(latest_milestone_index: u64, neighbors: u64) -> NodeStatus {
        NodeStatus {
            app_name: "IRI".to_string(),
            latest_milestone_index,
            latest_solid_subtangle_milestone_index: latest_milestone_index - 1,
            neighbors,
            tips: 5000,
            transactions_to_request: 3,
            ..NodeStatus::default()
        }
    }

    fn neighbor(address: &str, all: u64) -> NeighborStats {
        NeighborStats {
            address: address.to_string(),
            connection_type: "tcp".to_string(),
            number_of_all_transactions: all,
            number_of_random_transaction_requests: all / 10,
            number_of_new_transactions: all / 2,
            number_of_invalid_transactions: 0,
            number_of_sent_transactions: all * 2,
        }
    }

    fn scraper(node: Arc<FakeNode>, scrape_status: bool) -> Scraper {
        Scraper::new(node, ScrapeConfig { scrape_status })
    }

    async fn scrape_text(scraper: &Scraper) -> (String, ScrapeReport) {
        let out = scraper.scrape(ExpositionFormat::Text).await;
        assert_eq!(out.content_type, "text/plain; version=0.0.4");
        (
            String::from_utf8(out.body).expect("text body is UTF-8"),
            out.report,
        )
    }

    #[tokio::test]
    async fn full_scrape_exports_status_and_neighbors() {
        let node = Arc::new(FakeNode::default());
        node.set_status(Some(status(42, 2)));
        node.set_neighbors(Some(vec![neighbor("A", 100), neighbor("B", 200)]));

        let (body, report) = scrape_text(&scraper(node, false)).await;

        assert_eq!(
            report,
            ScrapeReport {
                node_info: true,
                neighbors: true,
                neighbor_count: 2,
            }
        );
        assert!(body.contains("\nlatestMilestoneIndex 42\n"));
        assert!(body.contains("\nlatestSolidSubtangleMilestoneIndex 41\n"));
        assert!(body.contains("\nnumberOfNeighbors 2\n"));
        assert!(body.contains("\nnumberOfTips 5000\n"));
        assert!(body.contains("\nnumberOfTransactionsToRequest 3\n"));
        assert!(body.contains(r#"numberOfAllTransactions{address="A",connectionType="tcp"} 100"#));
        assert!(body.contains(r#"numberOfAllTransactions{address="B",connectionType="tcp"} 200"#));
        assert!(body.contains(
            r#"numberOfRandomTransactionRequests{address="B",connectionType="tcp"} 20"#
        ));
        assert!(body.contains(r#"numberOfNewTransactions{address="A",connectionType="tcp"} 50"#));
        assert!(
            body.contains(r#"numberOfInvalidTransactions{address="A",connectionType="tcp"} 0"#)
        );
        assert!(body.contains(r#"numberOfSentTransactions{address="B",connectionType="tcp"} 400"#));
        assert!(!body.contains("iriNodeInfoUp"));
    }

    #[tokio::test]
    async fn n_neighbors_yield_n_label_sets_per_counter() {
        let node = Arc::new(FakeNode::default());
        let neighbors: Vec<_> = (0..4)
            .map(|i| neighbor(&format!("10.0.0.{i}:15600"), i))
            .collect();
        node.set_neighbors(Some(neighbors));

        let (body, _) = scrape_text(&scraper(node, false)).await;

        for name in [
            "numberOfAllTransactions",
            "numberOfRandomTransactionRequests",
            "numberOfNewTransactions",
            "numberOfInvalidTransactions",
            "numberOfSentTransactions",
        ] {
            let series = body
                .lines()
                .filter(|l| l.starts_with(&format!("{name}{{")))
                .count();
            assert_eq!(series, 4, "series for {name}");
        }
    }

    #[tokio::test]
    async fn node_info_failure_omits_scalar_counters() {
        let node = Arc::new(FakeNode::default());
        node.set_neighbors(Some(vec![neighbor("A", 100)]));

        let (body, report) = scrape_text(&scraper(node, false)).await;

        assert!(!report.node_info);
        assert!(report.neighbors);
        assert!(body.contains(r#"numberOfAllTransactions{address="A",connectionType="tcp"} 100"#));
        for name in [
            "latestMilestoneIndex",
            "latestSolidSubtangleMilestoneIndex",
            "numberOfNeighbors",
            "numberOfTips",
            "numberOfTransactionsToRequest",
        ] {
            assert!(!body.contains(name), "{name} should be absent");
        }
    }

    #[tokio::test]
    async fn neighbors_failure_omits_neighbor_series() {
        let node = Arc::new(FakeNode::default());
        node.set_status(Some(status(42, 2)));

        let (body, report) = scrape_text(&scraper(node, false)).await;

        assert!(report.node_info);
        assert!(!report.neighbors);
        assert!(body.contains("\nlatestMilestoneIndex 42\n"));
        assert!(!body.contains("numberOfAllTransactions"));
        assert!(!body.contains("connectionType"));
    }

    #[tokio::test]
    async fn total_outage_yields_empty_body() {
        let node = Arc::new(FakeNode::default());
        let (body, report) = scrape_text(&scraper(node, false)).await;
        assert!(body.is_empty());
        assert_eq!(report, ScrapeReport::default());
    }

    #[tokio::test]
    async fn sequential_scrapes_do_not_share_series() {
        let node = Arc::new(FakeNode::default());
        let scraper = scraper(node.clone(), false);

        node.set_status(Some(status(42, 1)));
        node.set_neighbors(Some(vec![neighbor("A", 100)]));
        let (first, _) = scrape_text(&scraper).await;
        assert!(first.contains(r#"address="A""#));

        node.set_status(Some(status(43, 1)));
        node.set_neighbors(Some(vec![neighbor("B", 7)]));
        let (second, _) = scrape_text(&scraper).await;

        assert!(!second.contains(r#"address="A""#));
        assert!(second.contains(r#"numberOfAllTransactions{address="B",connectionType="tcp"} 7"#));
        // Absolute values, not 42 + 43.
        assert!(second.contains("\nlatestMilestoneIndex 43\n"));
    }

    #[tokio::test]
    async fn concurrent_scrapes_are_isolated() {
        let node = Arc::new(FakeNode::default());
        node.set_status(Some(status(10, 1)));
        node.set_neighbors(Some(vec![neighbor("A", 1)]));
        let scraper = scraper(node, false);

        let (a, b) = tokio::join!(
            scraper.scrape(ExpositionFormat::Text),
            scraper.scrape(ExpositionFormat::Text)
        );
        assert_eq!(a.body, b.body);
        let body = String::from_utf8(a.body).expect("text body is UTF-8");
        assert!(body.contains("\nlatestMilestoneIndex 10\n"));
        assert!(body.contains(r#"numberOfAllTransactions{address="A",connectionType="tcp"} 1"#));
    }

    #[tokio::test]
    async fn scrape_status_gauges_follow_fetch_outcome() {
        let node = Arc::new(FakeNode::default());
        node.set_status(Some(status(42, 0)));

        let (body, _) = scrape_text(&scraper(node, true)).await;
        assert!(body.contains("\niriNodeInfoUp 1\n"));
        assert!(body.contains("\niriNeighborsUp 0\n"));
    }

    #[tokio::test]
    async fn protobuf_scrape_uses_protobuf_content_type() {
        let node = Arc::new(FakeNode::default());
        node.set_status(Some(status(42, 0)));

        let out = scraper(node, false).scrape(ExpositionFormat::Protobuf).await;
        assert_eq!(
            out.content_type,
            "application/vnd.google.protobuf; proto=io.prometheus.client.MetricFamily; encoding=delimited"
        );
        assert!(!out.body.is_empty());
        assert!(!out.body.starts_with(b"# HELP"));
    }
}
