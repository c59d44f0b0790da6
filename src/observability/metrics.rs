//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): requests by method, status
//! - `gateway_request_duration_seconds` (histogram): latency by method
//! - `gateway_rewrite_decisions_total` (counter): rewrite filter outcomes
//! - `gateway_authorization_total` (counter): authorization gate outcomes
//!
//! Recording without an installed recorder is a no-op, so tests and
//! `metrics_enabled = false` need no special casing.

use std::net::SocketAddr;
use std::time::Instant;

use ::metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::routing::RewriteDecision;

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(method: &str, status: u16, start: Instant) {
    counter!(
        "gateway_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("gateway_request_duration_seconds", "method" => method.to_string())
        .record(start.elapsed().as_secs_f64());
}

pub fn record_rewrite(decision: &RewriteDecision) {
    counter!(
        "gateway_rewrite_decisions_total",
        "outcome" => rewrite_outcome(decision)
    )
    .increment(1);
}

/// Label for a rewrite decision. A rewrite is also a match, so it is tested first.
fn rewrite_outcome(decision: &RewriteDecision) -> &'static str {
    if decision.rewrites() {
        "rewritten"
    } else if decision.is_match() {
        "matched"
    } else {
        "pass_through"
    }
}

/// `decision` is one of `permitted`, `authenticated`, `rejected`.
pub fn record_authorization(decision: &'static str) {
    counter!("gateway_authorization_total", "decision" => decision).increment(1);
}
