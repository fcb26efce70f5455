//! Metrics collection and exposition.
//!
//! # Metrics
//! - `middleman_requests_total` (counter): forwarded calls by operation, status
//! - `middleman_request_duration_seconds` (histogram): end-to-end latency
//!
//! # Design Decisions
//! - Recording goes through the `metrics` facade; without an installed
//!   recorder it is a no-op, so tests need no setup
//! - Prometheus exposition is opt-in (`METRICS_ENABLED`)

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_request(operation: &'static str, status: u16, start: Instant) {
    metrics::counter!(
        "middleman_requests_total",
        "operation" => operation,
        "status" => status.to_string()
    )
    .increment(1);

    metrics::histogram!("middleman_request_duration_seconds", "operation" => operation)
        .record(start.elapsed().as_secs_f64());
}
