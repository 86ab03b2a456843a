//! Structured logging configuration.
//!
//! Sets up `tracing` output for the server and bridges `log` records from
//! the `hangman` library into the same subscriber.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize structured logging
///
/// Log levels are configurable via the `RUST_LOG` env var and default to
/// `info,sqlx=warn,hyper=warn`.
///
/// # Example
///
/// ```no_run
/// use hm_server::logging;
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

/// Log a finished game
///
/// # Arguments
///
/// * `game_id` - Game identifier
/// * `status` - Terminal status (`WON` or `LOST`)
/// * `failed_attempts` - Wrong guesses made
/// * `max_attempts` - Attempt limit of the game
pub fn log_game_finished(game_id: &str, status: &str, failed_attempts: u32, max_attempts: u32) {
    tracing::info!(
        game_id = game_id,
        status = status,
        failed_attempts = failed_attempts,
        max_attempts = max_attempts,
        "Game finished"
    );
}

/// Log a rejected client request
///
/// # Arguments
///
/// * `request_id` - Request correlation ID
/// * `code` - Error category code
/// * `message` - Client-facing message
pub fn log_rejected_request(request_id: &str, code: &str, message: &str) {
    tracing::warn!(
        request_id = request_id,
        error_code = code,
        "Request rejected: {}",
        message
    );
}

/// Log API request/response
///
/// Requests slower than one second are logged as warnings.
///
/// # Arguments
///
/// * `method` - HTTP method
/// * `path` - Request path
/// * `status_code` - Response status code
/// * `duration_ms` - Request duration in milliseconds
pub fn log_api_request(method: &str, path: &str, status_code: u16, duration_ms: u64) {
    if duration_ms > 1000 {
        tracing::warn!(
            http_method = method,
            http_path = path,
            http_status = status_code,
            duration_ms = duration_ms,
            "Slow API request"
        );
    } else {
        tracing::info!(
            http_method = method,
            http_path = path,
            http_status = status_code,
            duration_ms = duration_ms,
            "API request completed"
        );
    }
}
