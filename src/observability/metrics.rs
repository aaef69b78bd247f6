//! Metrics collection and exposition.
//!
//! # Metrics
//! - `newscat_requests_total` (counter): requests by method, route, status
//! - `newscat_request_duration_seconds` (histogram): latency by method, route
//! - `newscat_upstream_calls_total` (counter): upstream calls by upstream, outcome
//!
//! # Design Decisions
//! - Recording is a no-op until a recorder is installed
//! - Route label is the matched route template, never the raw path

use std::net::SocketAddr;
use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record a finished inbound request.
pub fn record_request(method: &str, route: &str, status: u16, start: Instant) {
    ::metrics::counter!(
        "newscat_requests_total",
        "method" => method.to_string(),
        "route" => route.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    ::metrics::histogram!(
        "newscat_request_duration_seconds",
        "method" => method.to_string(),
        "route" => route.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}

/// Record one call to an upstream service.
pub fn record_upstream_call(upstream: &'static str, outcome: &'static str) {
    ::metrics::counter!(
        "newscat_upstream_calls_total",
        "upstream" => upstream,
        "outcome" => outcome
    )
    .increment(1);
}

/// Middleware recording count and latency for every request.
pub async fn track_metrics(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(request).await;
    record_request(&method, &route, response.status().as_u16(), start);
    response
}
