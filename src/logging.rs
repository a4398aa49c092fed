//! Logging setup.
//!
//! Installs a `tracing-subscriber` registry with a compact console layer and,
//! when `LOG_DIR` is set, a daily-rolling JSON file layer.
//!
//! # Configuration
//!
//! - **Log Level**: `LOG_LEVEL` environment variable (default: "info"), or a
//!   full `RUST_LOG` filter which takes precedence
//! - **File Output**: `LOG_DIR` directory for `rollbook.log.<date>` files
//! - **Filtering**: HTTP client internals are held at warn level

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

fn env_filter(log_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "rollbook={level},rollbook_cli={level},reqwest=warn,hyper=warn,hyper_util=warn",
            level = log_level
        ))
    })
}

/// Initialize logging for a binary.
///
/// Returns the file writer guard when file logging is active; keep it alive
/// for the lifetime of the program so buffered lines are flushed.
pub fn init_logging() -> Option<WorkerGuard> {
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

    let console_layer = fmt::layer()
        .compact()
        .with_target(true)
        .with_writer(std::io::stderr)
        .with_filter(env_filter(&log_level));

    let (file_layer, guard) = match std::env::var("LOG_DIR") {
        Ok(dir) if !dir.trim().is_empty() => {
            let appender = RollingFileAppender::new(Rotation::DAILY, dir.trim(), "rollbook.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .json()
                .with_writer(writer)
                .with_ansi(false)
                .with_filter(env_filter(&log_level));
            (Some(layer), Some(guard))
        }
        _ => (None, None),
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();

    guard
}
