//! File logging for filebeam.
//!
//! The terminal is owned by the UI, so events go to a daily rolling file under the configured
//! log directory (or the user cache dir). `FILEBEAM_LOG` overrides the configured level.

use crate::config::LogConfig;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use std::fs;
use std::path::PathBuf;

pub const LOG_ENV: &str = "FILEBEAM_LOG";
const LOG_FILE_PREFIX: &str = "filebeam.log";

/// Directory log files are written to.
pub fn log_dir(config: &LogConfig) -> Option<PathBuf> {
    match config.dir() {
        Some(dir) => Some(dir.to_path_buf()),
        None => dirs::cache_dir().map(|d| d.join("filebeam")),
    }
}

/// Builds the filter from `FILEBEAM_LOG`, falling back to the configured level.
pub fn build_filter(config: &LogConfig) -> EnvFilter {
    let from_env = std::env::var(LOG_ENV).ok();
    filter_from(from_env.as_deref(), config.level())
}

/// First valid directive of `override_directive` and `level`, else `info`.
fn filter_from(override_directive: Option<&str>, level: &str) -> EnvFilter {
    override_directive
        .and_then(|d| EnvFilter::try_new(d).ok())
        .or_else(|| EnvFilter::try_new(level).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

/// Installs the global subscriber.
///
/// The returned guard flushes buffered events on drop and must live until exit. Returns `None`
/// when no log directory is usable or a subscriber is already installed; the app runs unlogged.
pub fn init_logging(config: &LogConfig) -> Option<WorkerGuard> {
    let dir = log_dir(config)?;
    if let Err(e) = fs::create_dir_all(&dir) {
        eprintln!("[filebeam] Cannot create log dir {}: {}", dir.display(), e);
        return None;
    }

    let appender = rolling::daily(&dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let file_layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true);

    tracing_subscriber::registry()
        .with(build_filter(config))
        .with(file_layer)
        .try_init()
        .ok()?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), dir = %dir.display(), "filebeam started");
    Some(guard)
}
