//! Logging Module
//!
//! Sets up `tracing` with a JSON file appender (daily rolling) and bridges
//! `log` macros into it. The TUI variant omits the stdout layer so log lines
//! never land on the alternate screen.

use std::fs;
use std::io;
use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, EnvFilter, Layer};

use crate::config::AppConfig;

const LOG_FILE_PREFIX: &str = "socialsync.log";
const DEFAULT_FILTER: &str = "info";

/// Directory holding the rolling log files.
pub fn log_dir() -> PathBuf {
    AppConfig::data_dir().join("logs")
}

fn prepare_log_dir() -> PathBuf {
    let dir = log_dir();
    if !dir.exists() {
        if let Err(e) = fs::create_dir_all(&dir) {
            eprintln!("Failed to create logs directory: {}", e);
        }
    }
    dir
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Set the global subscriber and redirect `log` macros into it.
fn install<S>(subscriber: S)
where
    S: tracing::Subscriber + Send + Sync + 'static,
{
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
    if let Err(e) = tracing_log::LogTracer::init() {
        eprintln!("Failed to initialize LogTracer: {}", e);
    }
}

/// Initialize logging with both the file layer and a pretty stdout layer.
///
/// Returns a `WorkerGuard` which must be kept alive for the duration of the
/// application so buffered logs are flushed on shutdown.
pub fn init() -> WorkerGuard {
    let dir = prepare_log_dir();
    let file_appender = tracing_appender::rolling::daily(&dir, LOG_FILE_PREFIX);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .json()
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .with_filter(env_filter());

    let stdout_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stdout)
        .pretty()
        .with_filter(env_filter());

    let subscriber = tracing_subscriber::registry()
        .with(file_layer)
        .with(stdout_layer);
    install(subscriber);

    log::info!(
        "Logging initialized. Writing to: {:?} (daily rolling)",
        dir.join(LOG_FILE_PREFIX)
    );

    guard
}

/// Initialize logging for TUI mode: file appender only.
pub fn init_tui() -> WorkerGuard {
    let dir = prepare_log_dir();
    let file_appender = tracing_appender::rolling::daily(&dir, LOG_FILE_PREFIX);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .json()
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .with_filter(env_filter());

    // No stdout layer, the TUI owns the terminal
    install(tracing_subscriber::registry().with(file_layer));

    guard
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_dir_is_app_scoped() {
        let dir = log_dir();
        assert!(dir.ends_with("logs"));
        assert!(dir.to_string_lossy().contains("socialsync") || dir.starts_with("data"));
    }
}
