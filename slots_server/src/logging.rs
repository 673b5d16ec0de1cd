//! Structured logging configuration.
//!
//! This module provides structured logging with request correlation and
//! security event tracking.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize structured logging
///
/// Log levels are configurable via the `RUST_LOG` env var. Records emitted
/// through the `log` facade by the game library are captured as well.
///
/// # Example
///
/// ```no_run
/// use slots_server::logging;
///
/// #[tokio::main]
/// async fn main() {
///     logging::init();
///     tracing::info!("Server starting");
/// }
/// ```
pub fn init() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn,hyper=warn"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    tracing::info!("Structured logging initialized");
}

/// Log security event with structured data
///
/// # Arguments
///
/// * `event_type` - Type of security event
/// * `user_id` - Optional user ID
/// * `username` - Optional username the event concerns
/// * `message` - Event message
///
/// # Example
///
/// ```
/// use slots_server::logging::log_security_event;
///
/// log_security_event("failed_login", None, Some("lucky7"), "Invalid password attempt");
/// ```
pub fn log_security_event(
    event_type: &str,
    user_id: Option<i64>,
    username: Option<&str>,
    message: &str,
) {
    tracing::warn!(
        event_type = event_type,
        user_id = user_id,
        username = username,
        "SECURITY: {}",
        message
    );
}

/// Log a finished spin
pub fn log_spin(player: &str, bet: i64, winnings: i64, balance: i64) {
    if winnings > 0 {
        tracing::info!(
            player = player,
            bet = bet,
            winnings = winnings,
            balance = balance,
            "Winning spin"
        );
    } else {
        tracing::debug!(player = player, bet = bet, balance = balance, "Spin lost");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_security_event() {
        // Just ensure it doesn't panic
        log_security_event("test_event", Some(1), Some("tester"), "Test message");
        log_security_event("test_event", None, None, "Test message");
    }

    #[test]
    fn test_log_spin() {
        log_spin("guest", 5, 1000, 1095);
        log_spin("user:1", 5, 0, 90);
    }
}
