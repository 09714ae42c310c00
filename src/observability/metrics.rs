//! Metrics collection and exposition.
//!
//! # Metrics
//! - `planner_requests_total` (counter): requests by endpoint, status
//! - `planner_request_duration_seconds` (histogram): latency by endpoint
//! - `planner_provider_calls_total` (counter): provider calls by api, outcome
//! - `planner_addresses_geocoded_total` (counter): resolved vs unresolved
//! - `planner_addresses_excluded_total` (counter): entries dropped before optimization
//!
//! Without an installed recorder every call is a no-op.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => {
            tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter")
        }
    }
}

pub fn record_request(endpoint: &str, status: u16, start: Instant) {
    metrics::counter!(
        "planner_requests_total",
        "endpoint" => endpoint.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("planner_request_duration_seconds", "endpoint" => endpoint.to_string())
        .record(start.elapsed().as_secs_f64());
}

pub fn record_provider_call(api: &'static str, outcome: &'static str) {
    metrics::counter!("planner_provider_calls_total", "api" => api, "outcome" => outcome)
        .increment(1);
}

pub fn record_geocoded(resolved: bool) {
    let outcome = if resolved { "resolved" } else { "unresolved" };
    metrics::counter!("planner_addresses_geocoded_total", "outcome" => outcome).increment(1);
}

pub fn record_excluded(count: usize) {
    metrics::counter!("planner_addresses_excluded_total").increment(count as u64);
}
