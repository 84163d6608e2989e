//! Metrics collection and exposition.
//!
//! # Metrics
//! - `lockout_failures_total` (counter): booking code failures counted
//! - `lockout_lockouts_total` (counter): lockouts imposed
//! - `lockout_clears_total` (counter): records cleared after success
//! - `lockout_gate_rejections_total` (counter): requests refused by the gate
//! - `lockout_store_errors_total` (counter): store failures by operation
//! - `lockout_evictions_total` (counter): idle records evicted
//! - `lockout_tracked_subjects` (gauge): records currently held

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Start the Prometheus scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), Box<dyn std::error::Error>> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Prometheus metrics endpoint started");
    Ok(())
}

pub fn record_failure() {
    metrics::counter!("lockout_failures_total").increment(1);
}

pub fn record_lockout() {
    metrics::counter!("lockout_lockouts_total").increment(1);
}

pub fn record_clear() {
    metrics::counter!("lockout_clears_total").increment(1);
}

pub fn record_gate_rejection(reason: &'static str) {
    metrics::counter!("lockout_gate_rejections_total", "reason" => reason).increment(1);
}

pub fn record_store_error(operation: &'static str) {
    metrics::counter!("lockout_store_errors_total", "operation" => operation).increment(1);
}

pub fn record_evictions(count: usize) {
    metrics::counter!("lockout_evictions_total").increment(count as u64);
}

pub fn record_tracked_subjects(count: usize) {
    metrics::gauge!("lockout_tracked_subjects").set(count as f64);
}
