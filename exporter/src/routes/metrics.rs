use axum::{
    extract::State,
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
};
use bridge::ExpositionFormat;

use crate::state::SharedState;

/// `GET /metrics`
///
/// Runs one scrape against the node and returns it in the format picked
/// from the `Accept` header. Always answers `200 OK`: when the node is
/// unreachable the body simply lacks the affected metrics.
pub async fn metrics(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    let accept = headers
        .get_all(header::ACCEPT)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .collect::<Vec<_>>()
        .join(",");
    let format = ExpositionFormat::from_accept((!accept.is_empty()).then_some(accept.as_str()));

    let output = state.scraper.scrape(format).await;
    tracing::debug!(
        node_info = output.report.node_info,
        neighbors = output.report.neighbors,
        ?format,
        "served scrape"
    );

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, output.content_type)],
        output.body,
    )
        .into_response()
}
