//! Prometheus metrics for request outcomes and store latency.
//!
//! This module provides:
//! - Per-operation request counters, labelled by outcome
//! - Store query latency histograms
//! - A counter of requests rejected by the closed connectivity gate

use std::time::Instant;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use tracing::debug;

use crate::store::Operation;

// === Metric Name Constants ===

/// User request counter metric name.
pub const METRIC_USER_REQUESTS: &str = "user_requests_total";
/// Store query latency metric name.
pub const METRIC_STORE_QUERY_LATENCY: &str = "store_query_latency_ms";
/// Gate rejections counter metric name.
pub const METRIC_STORE_UNAVAILABLE: &str = "store_unavailable_rejections_total";

/// Outcome label for successful requests.
pub const OUTCOME_OK: &str = "ok";

/// Install the Prometheus recorder as the global metrics recorder.
pub fn install_prometheus_recorder() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}

/// Initialize all metric descriptions.
/// Call this once at startup, after installing a recorder.
pub fn init_metrics() {
    describe_counter!(
        METRIC_USER_REQUESTS,
        "Total number of user requests by operation and outcome"
    );
    describe_histogram!(
        METRIC_STORE_QUERY_LATENCY,
        "Store query latency in milliseconds"
    );
    describe_counter!(
        METRIC_STORE_UNAVAILABLE,
        "Requests rejected because the store was unreachable at startup"
    );

    debug!("Metrics initialized");
}

/// Count one handled user request.
pub fn inc_user_request(operation: Operation, outcome: &'static str) {
    let operation: &'static str = operation.into();
    counter!(METRIC_USER_REQUESTS, "operation" => operation, "outcome" => outcome).increment(1);
}

/// Count one request rejected by the gate.
pub fn inc_store_unavailable() {
    counter!(METRIC_STORE_UNAVAILABLE).increment(1);
}

/// RAII guard for timing store queries.
/// Automatically records latency when dropped.
pub struct LatencyTimer {
    start: Instant,
    operation: &'static str,
}

impl LatencyTimer {
    /// Create a new latency timer for the given operation.
    pub fn new(operation: Operation) -> Self {
        Self {
            start: Instant::now(),
            operation: operation.into(),
        }
    }

    /// Get elapsed time in milliseconds (without recording).
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

impl Drop for LatencyTimer {
    fn drop(&mut self) {
        histogram!(METRIC_STORE_QUERY_LATENCY, "operation" => self.operation)
            .record(self.elapsed_ms());
    }
}

/// Create a latency timer for a store query.
pub fn timer_store_query(operation: Operation) -> LatencyTimer {
    LatencyTimer::new(operation)
}
