//! Prometheus metrics for monitoring the game server.
//!
//! Metrics are recorded through the `metrics` facade; when an exporter is
//! installed with [`init_metrics`] they are served in Prometheus text format.
//! Without an exporter every call is a no-op.
//!
//! # Metrics Categories
//!
//! - **HTTP Metrics**: Request counts, duration, status codes
//! - **Game Metrics**: Games started and finished, guesses by outcome

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

/// Initialize Prometheus metrics exporter.
///
/// Metrics will be available at `http://<addr>/metrics`.
///
/// # Arguments
///
/// - `addr`: Address to bind the metrics server to (e.g., `0.0.0.0:9090`)
pub fn init_metrics(addr: SocketAddr) -> Result<(), String> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| format!("Failed to install Prometheus exporter: {}", e))
}

// ============================================================================
// HTTP Metrics
// ============================================================================

/// Record HTTP request.
///
/// Increments the total HTTP request counter with method, path, and status labels.
pub fn http_requests_total(method: &str, path: &str, status: u16) {
    metrics::counter!("http_requests_total",
        "method" => method.to_string(),
        "path" => path.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// Record HTTP request duration in milliseconds.
pub fn http_request_duration_ms(method: &str, path: &str, duration_ms: f64) {
    metrics::histogram!("http_request_duration_ms",
        "method" => method.to_string(),
        "path" => path.to_string()
    )
    .record(duration_ms);
}

// ============================================================================
// Game Metrics
// ============================================================================

/// Increment games started counter.
pub fn games_started_total() {
    metrics::counter!("games_started_total").increment(1);
}

/// Increment guesses counter, labelled by outcome.
pub fn guesses_total(reason: &str) {
    metrics::counter!("guesses_total",
        "reason" => reason.to_string()
    )
    .increment(1);
}

/// Increment finished games counter, labelled by terminal status.
pub fn games_finished_total(status: &str) {
    metrics::counter!("games_finished_total",
        "status" => status.to_string()
    )
    .increment(1);
}

/// Increment rejected guesses counter, labelled by error code.
pub fn guesses_rejected_total(code: &str) {
    metrics::counter!("guesses_rejected_total",
        "code" => code.to_string()
    )
    .increment(1);
}
