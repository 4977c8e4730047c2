//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define redirector metrics (resolutions, sheet fetches, table builds)
//! - Expose Prometheus-compatible metrics endpoint
//!
//! # Metrics
//! - `redirect_resolutions_total` (counter): requests by outcome (found, not_found, source_error)
//! - `redirect_resolution_duration_seconds` (histogram): fetch + build + resolve latency
//! - `sheet_fetch_total` (counter): fetches by outcome (ok, error)
//! - `sheet_fetch_duration_seconds` (histogram): fetch latency including retries
//! - `sheet_fetch_retries_total` (counter): retried attempts
//! - `shortcut_table_entries` (gauge): entries in the most recently built table
//! - `shortcut_table_diagnostics_total` (counter): diagnostics by kind
//! - `shortcut_table_skipped_rows_total` (counter): rows dropped during build

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::shortcuts::{BuildReport, Diagnostic};

/// Install the Prometheus recorder and its HTTP listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record one request resolution.
pub fn record_resolution(outcome: &'static str, started: Instant) {
    counter!("redirect_resolutions_total", "outcome" => outcome).increment(1);
    histogram!("redirect_resolution_duration_seconds", "outcome" => outcome)
        .record(started.elapsed().as_secs_f64());
}

/// Record one sheet fetch (all attempts).
pub fn record_fetch(outcome: &'static str, started: Instant) {
    counter!("sheet_fetch_total", "outcome" => outcome).increment(1);
    histogram!("sheet_fetch_duration_seconds").record(started.elapsed().as_secs_f64());
}

/// Record a retried fetch attempt.
pub fn record_fetch_retry() {
    counter!("sheet_fetch_retries_total").increment(1);
}

/// Record the shape of a freshly built table.
pub fn record_table_build(report: &BuildReport) {
    gauge!("shortcut_table_entries").set(report.table.len() as f64);
    counter!("shortcut_table_skipped_rows_total").increment(report.skipped as u64);
    for diagnostic in &report.diagnostics {
        let kind = match diagnostic {
            Diagnostic::InvalidTarget { .. } => "invalid_target",
            Diagnostic::DuplicateKey { .. } => "duplicate_key",
        };
        counter!("shortcut_table_diagnostics_total", "kind" => kind).increment(1);
    }
}
