//! Prometheus metrics for request latency and process health.
//!
//! This module provides:
//! - The request duration histogram observed by the tracking middleware
//! - Recorder installation with fixed histogram buckets
//! - Periodic collection of process-wide metrics (CPU, memory, fds)

use std::time::{Duration, Instant};

use axum::http::{Method, StatusCode};
use metrics::{describe_histogram, histogram};
use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder, PrometheusHandle};
use tracing::debug;

// === Metric Name Constants ===

/// HTTP request duration histogram metric name.
pub const METRIC_HTTP_REQUEST_DURATION: &str = "http_request_duration_seconds";

/// Fixed bucket boundaries for the request duration histogram, in seconds.
pub const DURATION_BUCKETS: &[f64] = &[0.1, 0.5, 1.0, 2.0, 5.0];

/// Interval between process metrics collections.
pub const PROCESS_COLLECT_INTERVAL: Duration = Duration::from_millis(5000);

/// Prometheus text exposition content type.
pub const EXPOSITION_CONTENT_TYPE: &str = "text/plain; version=0.0.4";

/// Install the Prometheus recorder and return a handle for rendering.
///
/// Call this once at startup. The returned handle is cheap to clone and is
/// what the `/metrics` handler renders from.
pub fn install_recorder() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full(METRIC_HTTP_REQUEST_DURATION.to_string()),
            DURATION_BUCKETS,
        )?
        .install_recorder()?;

    describe_histogram!(
        METRIC_HTTP_REQUEST_DURATION,
        "Duration of HTTP requests in seconds"
    );

    debug!("Metrics recorder installed");
    Ok(handle)
}

/// Record one request's duration, labeled by method, route, and status code.
pub fn record_request_duration(method: &Method, route: &str, status: StatusCode, start: Instant) {
    let elapsed = start.elapsed().as_secs_f64();
    histogram!(
        METRIC_HTTP_REQUEST_DURATION,
        "method" => method.to_string(),
        "route" => route.to_string(),
        "status_code" => status.as_u16().to_string(),
    )
    .record(elapsed);
}

/// Spawn the background task that collects process-wide metrics
/// (CPU, memory, file descriptors) for the lifetime of the process.
pub fn spawn_process_collector() {
    let collector = metrics_process::Collector::default();
    collector.describe();

    tokio::spawn(async move {
        let mut interval = tokio::time::interval(PROCESS_COLLECT_INTERVAL);
        loop {
            interval.tick().await;
            collector.collect();
        }
    });

    debug!("Process metrics collector started");
}
