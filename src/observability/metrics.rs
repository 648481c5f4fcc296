//! Metrics collection and exposition.
//!
//! # Metrics
//! - `referrer_filter_decisions_total` (counter): decisions by verdict
//! - `referrer_filter_allowed_origins` (gauge): exact-origin table size
//! - `referrer_filter_allowed_patterns` (gauge): regex table size

use std::net::SocketAddr;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::filter::{FilterSnapshot, Verdict};

/// Start the Prometheus scrape endpoint. Must run inside a Tokio runtime.
pub fn init_exporter(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

pub fn record_decision(verdict: &Verdict) {
    metrics::counter!("referrer_filter_decisions_total", "verdict" => verdict.label()).increment(1);
}

pub fn record_snapshot(snapshot: &FilterSnapshot) {
    metrics::gauge!("referrer_filter_allowed_origins")
        .set(snapshot.allow_list().origins().len() as f64);
    metrics::gauge!("referrer_filter_allowed_patterns")
        .set(snapshot.allow_list().patterns().len() as f64);
}
