//! Prometheus scrape endpoint
//!
//! Renders the process-wide recorder: HTTP traffic plus the fleet counters
//! (`fleet_trip_requests_total`, `fleet_trips_total`,
//! `fleet_accounts_provisioned_total`, `fleet_report_exports_total`) and
//! the `fleet_trip_distance_km` histogram.

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub struct MetricsState {
    pub handle: PrometheusHandle,
}

/// `GET /metrics`, unauthenticated
pub async fn prometheus_metrics(State(state): State<MetricsState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
        state.handle.render(),
    )
}
