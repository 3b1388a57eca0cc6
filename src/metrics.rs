/// Metrics and telemetry for Creator Hub
///
/// Provides Prometheus-compatible metrics for monitoring:
/// - HTTP request counts and latencies
/// - Login attempts by outcome
/// - Creator status transitions
/// - Best-effort writes that failed silently

use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter, register_int_counter_vec, Encoder,
    HistogramVec, IntCounter, IntCounterVec, TextEncoder,
};

lazy_static! {
    /// Total HTTP requests by method, path, and status
    pub static ref HTTP_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "http_requests_total",
        "Total number of HTTP requests",
        &["method", "path", "status"]
    )
    .unwrap();

    /// HTTP request duration in seconds
    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "http_request_duration_seconds",
        "HTTP request latencies in seconds",
        &["method", "path"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0]
    )
    .unwrap();

    pub static ref LOGIN_ATTEMPTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "login_attempts_total",
        "Admin login attempts by outcome",
        &["outcome"]
    )
    .unwrap();

    /// Status writes, split by single admin update vs bulk polling batch
    pub static ref CREATOR_STATUS_CHANGES_TOTAL: IntCounterVec = register_int_counter_vec!(
        "creator_status_changes_total",
        "Creator status updates submitted",
        &["source"]
    )
    .unwrap();

    /// Writes whose failure is logged but not reported to the caller
    pub static ref BEST_EFFORT_FAILURES_TOTAL: IntCounterVec = register_int_counter_vec!(
        "best_effort_failures_total",
        "Failed best-effort writes",
        &["operation"]
    )
    .unwrap();

    pub static ref AVATAR_UPLOADS_TOTAL: IntCounter = register_int_counter!(
        "avatar_uploads_total",
        "Total number of avatar uploads stored"
    )
    .unwrap();
}

/// Render metrics in Prometheus text format
pub fn render_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::warn!("failed to encode metrics: {}", e);
    }
    String::from_utf8_lossy(&buffer).into_owned()
}

/// Record an HTTP request
pub fn record_http_request(method: &str, path: &str, status: u16, duration: f64) {
    HTTP_REQUESTS_TOTAL
        .with_label_values(&[method, path, &status.to_string()])
        .inc();
    HTTP_REQUEST_DURATION_SECONDS
        .with_label_values(&[method, path])
        .observe(duration);
}

pub fn record_login_attempt(outcome: &str) {
    LOGIN_ATTEMPTS_TOTAL.with_label_values(&[outcome]).inc();
}

pub fn record_status_changes(source: &str, count: u64) {
    CREATOR_STATUS_CHANGES_TOTAL
        .with_label_values(&[source])
        .inc_by(count);
}

pub fn record_best_effort_failure(operation: &str) {
    BEST_EFFORT_FAILURES_TOTAL
        .with_label_values(&[operation])
        .inc();
}

pub fn record_avatar_upload() {
    AVATAR_UPLOADS_TOTAL.inc();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_http_request() {
        record_http_request("GET", "/api/creators", 200, 0.05);
        let metrics = render_metrics();
        assert!(metrics.contains("http_requests_total"));
        assert!(metrics.contains("http_request_duration_seconds"));
    }

    #[test]
    fn test_record_domain_counters() {
        record_login_attempt("success");
        record_status_changes("bulk", 3);
        record_best_effort_failure("analytics_event");
        record_avatar_upload();

        let metrics = render_metrics();
        assert!(metrics.contains("login_attempts_total"));
        assert!(metrics.contains("creator_status_changes_total"));
        assert!(metrics.contains("best_effort_failures_total"));
        assert!(metrics.contains("avatar_uploads_total"));
    }
}
