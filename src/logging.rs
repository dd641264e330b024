//! Logging initialization for the binary.
//!
//! The library only emits `tracing` events; installing a subscriber is left
//! to `main`.

use std::path::Path;

use tracing::level_filters::LevelFilter;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Map an npm log level onto a tracing level filter.
///
/// Unknown levels fall back to the npm default (`notice`).
pub fn level_filter(loglevel: &str) -> LevelFilter {
    match loglevel {
        "silent" => LevelFilter::OFF,
        "error" => LevelFilter::ERROR,
        "warn" | "notice" => LevelFilter::WARN,
        "http" | "info" => LevelFilter::INFO,
        "verbose" => LevelFilter::DEBUG,
        "silly" => LevelFilter::TRACE,
        _ => LevelFilter::WARN,
    }
}

/// Initialize the tracing subscriber.
///
/// Human-readable events go to stderr, filtered by `loglevel` unless
/// `RUST_LOG` is set. With `log_file`, JSON lines are appended there too; keep
/// the returned guard alive until exit so buffered lines are flushed.
///
/// # Panics
/// Panics if the subscriber cannot be initialized (e.g., called twice).
pub fn init(loglevel: &str, log_file: Option<&Path>) -> Option<WorkerGuard> {
    let filter = EnvFilter::builder()
        .with_default_directive(level_filter(loglevel).into())
        .from_env_lossy();

    let (file_layer, guard) = match log_file.and_then(split_log_path) {
        Some((dir, file_name)) => {
            let appender = tracing_appender::rolling::never(dir, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .json()
                .with_current_span(true)
                .with_span_list(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(file_layer)
        .init();

    guard
}

fn split_log_path(path: &Path) -> Option<(&Path, &std::ffi::OsStr)> {
    let file_name = path.file_name()?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    Some((dir, file_name))
}
