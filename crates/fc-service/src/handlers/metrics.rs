//! Prometheus scrape endpoint.
//!
//! Unauthenticated. Labels are bounded and carry no identifiers.

use axum::{extract::State, response::IntoResponse};
use metrics_exporter_prometheus::PrometheusHandle;

/// GET /metrics
#[tracing::instrument(skip_all, name = "fc.metrics.scrape")]
pub async fn metrics_handler(State(handle): State<PrometheusHandle>) -> impl IntoResponse {
    handle.render()
}
