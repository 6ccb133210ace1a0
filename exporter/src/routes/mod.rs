//! HTTP routes of the exporter.

pub mod health;
pub mod metrics;

use axum::{Router, routing::get};

use crate::state::SharedState;

/// Builds the exporter router.
///
/// `/Metrics` is served as well as `/metrics` for scrape configs that
/// still use the capitalised path.
pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/metrics", get(metrics::metrics))
        .route("/Metrics", get(metrics::metrics))
        .route("/health", get(health::health))
        .with_state(state)
}
