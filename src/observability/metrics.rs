//! Metrics collection and exposition.
//!
//! # Metrics
//! - `observer_requests_total` (counter): observed requests by `tracked`
//! - `observer_telemetry_events_total` (counter): emission outcome
//! - `observer_body_capture_total` (counter): capture outcome
//! - `observer_captured_body_bytes` (histogram): size of captured bodies
//!
//! Recording is a no-op until `init_metrics` installs the exporter.

use std::net::SocketAddr;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

pub fn record_request(tracked: bool) {
    counter!("observer_requests_total", "tracked" => if tracked { "true" } else { "false" })
        .increment(1);
}

pub fn record_telemetry(outcome: &'static str) {
    counter!("observer_telemetry_events_total", "outcome" => outcome).increment(1);
}

pub fn record_body_capture(outcome: &'static str, bytes: usize) {
    counter!("observer_body_capture_total", "outcome" => outcome).increment(1);
    if bytes > 0 {
        histogram!("observer_captured_body_bytes").record(bytes as f64);
    }
}
