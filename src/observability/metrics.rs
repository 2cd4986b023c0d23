//! Metrics collection and exposition.
//!
//! # Metrics
//!
//! - `mintly_requests_total` (counter): HTTP requests by method, path, status
//! - `mintly_request_duration_seconds` (histogram): HTTP latency by path
//! - `mintly_mints_total` (counter): mint requests by network and outcome
//! - `mintly_mint_duration_seconds` (histogram): mint latency by network
//! - `mintly_mint_step_failures_total` (counter): failed mints by step
//!
//! The exporter serves Prometheus text format on its own listener so the
//! public API port never exposes it.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on its own listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one handled HTTP request.
pub fn record_request(method: &str, status: u16, path: &str, start: Instant) {
    metrics::counter!(
        "mintly_requests_total",
        "method" => method.to_string(),
        "path" => path.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("mintly_request_duration_seconds", "path" => path.to_string())
        .record(start.elapsed().as_secs_f64());
}

/// Record a mint request outcome.
pub fn record_mint(network: &str, success: bool, start: Instant) {
    let outcome = if success { "success" } else { "failure" };
    metrics::counter!(
        "mintly_mints_total",
        "network" => network.to_string(),
        "outcome" => outcome
    )
    .increment(1);
    metrics::histogram!("mintly_mint_duration_seconds", "network" => network.to_string())
        .record(start.elapsed().as_secs_f64());
}

/// Record which step a failed mint died in.
pub fn record_mint_step_failure(step: &'static str) {
    metrics::counter!("mintly_mint_step_failures_total", "step" => step).increment(1);
}
