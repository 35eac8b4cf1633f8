//! Logging infrastructure for Slideshow Builder.
//!
//! This module provides:
//! - Per-run loggers with file + callback dual output
//! - Compact mode with progress filtering
//! - Tail buffer of encoder output for failure diagnosis
//! - Application-wide `tracing` setup
//!
//! # Example
//!
//! ```no_run
//! use ssb_core::logging::{LogConfig, RunLogger};
//!
//! let logger = RunLogger::new("holiday_reel", "/path/to/logs", LogConfig::default(), None)
//!     .unwrap();
//!
//! logger.step("Rendering segments");
//! logger.command("ffmpeg -y -loop 1 -i 1.jpg -i 1.mp3 ...");
//! logger.progress(50.0);
//! logger.done("Final video created");
//! ```

mod run_logger;
mod types;

use std::path::Path;

pub use run_logger::{RunLogger, RunLoggerBuilder};
pub use types::{GuiLogCallback, LogConfig, LogLevel, MessagePrefix};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Application log file name prefix inside the logs folder.
const APP_LOG_PREFIX: &str = "slideshow-builder.log";

/// Initialize the global tracing subscriber (stderr only).
///
/// Respects `RUST_LOG`, falling back to `default_level`.
pub fn init_tracing(default_level: LogLevel) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_to_filter_str(default_level)));

    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_thread_ids(false))
        .with(filter)
        .try_init();
}

/// Initialize tracing to stderr plus a daily-rolling file in `logs_dir`.
///
/// The returned guard must be kept alive for the lifetime of the process,
/// otherwise buffered file output is lost. Returns `None` (stderr only) if
/// the logs directory cannot be created.
pub fn init_tracing_with_file(default_level: LogLevel, logs_dir: &Path) -> Option<WorkerGuard> {
    if let Err(e) = std::fs::create_dir_all(logs_dir) {
        init_tracing(default_level);
        tracing::warn!("Could not create logs folder {}: {}", logs_dir.display(), e);
        return None;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_to_filter_str(default_level)));

    let file_appender = tracing_appender::rolling::daily(logs_dir, APP_LOG_PREFIX);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(fmt::layer().with_ansi(false).with_writer(file_writer))
        .try_init();

    Some(guard)
}

/// Initialize tracing for tests (only logs warnings and above).
#[cfg(test)]
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("warn")
        .with_test_writer()
        .try_init();
}

fn level_to_filter_str(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Debug => "debug",
        LogLevel::Info => "info",
        LogLevel::Warn => "warn",
        LogLevel::Error => "error",
    }
}
