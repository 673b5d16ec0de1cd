//! Prometheus metrics for monitoring the slot server.
//!
//! Metrics are recorded through the `metrics` facade and exported in
//! Prometheus text format when a listener is installed. Without one, every
//! call is a no-op.
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use slots_server::metrics;
//! use std::net::SocketAddr;
//!
//! let addr: SocketAddr = "127.0.0.1:9090".parse().unwrap();
//! metrics::init_metrics(addr).unwrap();
//!
//! metrics::spins_total(true);
//! metrics::payout_amount(1000);
//! ```

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

/// Initialize Prometheus metrics exporter.
///
/// Metrics will be available at `http://<addr>/metrics`.
///
/// # Errors
///
/// Returns an error message if the exporter cannot be installed
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
pub fn http_requests_total(method: &str, path: &str, status: u16) {
    metrics::counter!("http_requests_total",
        "method" => method.to_string(),
        "path" => path.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

// ============================================================================
// Game Metrics
// ============================================================================

/// Increment spins counter, labelled by outcome.
pub fn spins_total(winner: bool) {
    metrics::counter!("spins_total",
        "winner" => winner.to_string()
    )
    .increment(1);
}

/// Record payout distribution.
pub fn payout_amount(amount: i64) {
    metrics::histogram!("payout_amount").record(amount as f64);
}

/// Set current number of games held in memory.
pub fn active_games(count: usize) {
    metrics::gauge!("active_games").set(count as f64);
}

// ============================================================================
// Auth Metrics
// ============================================================================

/// Increment login attempts counter.
pub fn login_attempts_total(success: bool) {
    metrics::counter!("login_attempts_total",
        "success" => success.to_string()
    )
    .increment(1);
}

/// Set current active sessions count.
pub fn active_sessions(count: usize) {
    metrics::gauge!("active_sessions").set(count as f64);
}
