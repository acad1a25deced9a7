//! Tracing setup
//!
//! CLI mode logs to stderr. TUI mode owns the terminal, so it logs to a
//! daily-rolling file instead.

use anyhow::{Context, Result};
use std::io;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::{self, time::ChronoUtc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Build the level filter from `-v` count / `--quiet`.
///
/// 0 = warn, 1 = debug (hyper noise suppressed), 2+ = trace.
/// RUST_LOG wins unless quiet.
pub fn filter(verbose: u8, quiet: bool) -> EnvFilter {
    if quiet {
        return EnvFilter::new("error");
    }

    let default = match verbose {
        0 => "warn",
        1 => "debug,hyper=warn,hyper_util=warn,reqwest=info",
        _ => "trace",
    };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// A subscriber installed earlier (tests, embedding) is kept
fn already_installed() -> bool {
    tracing::dispatcher::has_been_set()
}

/// Log to stderr (CLI mode)
pub fn init_stderr(verbose: u8, quiet: bool) {
    if already_installed() {
        return;
    }

    let json = std::env::var("RUST_LOG_JSON")
        .map(|v| v == "true")
        .unwrap_or(false);

    let registry = Registry::default().with(filter(verbose, quiet));
    let result = if json {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_writer(io::stderr),
            )
            .try_init()
    } else {
        registry
            .with(
                fmt::layer()
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_writer(io::stderr),
            )
            .try_init()
    };

    if let Err(e) = result {
        eprintln!("warning: logging disabled: {}", e);
    }
}

/// Log to a daily-rolling file (TUI mode).
///
/// The returned guard must live until exit so buffered lines are flushed.
/// `None` when a subscriber was already installed.
pub fn init_file(verbose: u8, log_path: &Path) -> Result<Option<WorkerGuard>> {
    if already_installed() {
        return Ok(None);
    }

    let log_dir = log_path
        .parent()
        .ok_or_else(|| anyhow::anyhow!("Log file path has no parent directory"))?;
    std::fs::create_dir_all(log_dir)?;

    let log_filename = log_path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| anyhow::anyhow!("Invalid log filename"))?;

    // Files will be named reelpeek.log.2026-01-17 etc.
    let appender = RollingFileAppender::new(Rotation::DAILY, log_dir, log_filename);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    Registry::default()
        .with(filter(verbose.max(1), false))
        .with(
            fmt::layer()
                .with_timer(ChronoUtc::rfc_3339())
                .with_ansi(false)
                .with_writer(writer),
        )
        .try_init()
        .context("Failed to install log subscriber")?;

    Ok(Some(guard))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiet_filter_is_error() {
        assert_eq!(filter(3, true).to_string(), "error");
    }

    #[test]
    fn test_init_file_then_existing_subscriber_kept() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("reelpeek.log");
        let first = init_file(0, &path).unwrap();
        assert!(first.is_some());
        assert!(path.parent().unwrap().exists());

        // Second install is skipped, not an error
        let other = dir.path().join("other").join("reelpeek.log");
        assert!(init_file(0, &other).unwrap().is_none());
        assert!(!other.parent().unwrap().exists());
        init_stderr(0, false);
    }
}
