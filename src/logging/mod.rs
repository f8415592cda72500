//! Diagnostic logging to disk.
//!
//! The terminal is owned by the UI, so `tracing` output is written to a
//! daily rolling file `bookshelf.log.<date>` in the configured log directory
//! (default: `~/.local/share/bookshelf/logs/`). `BOOKSHELF_LOG` overrides the
//! configured filter.

use crate::config::{self, LoggingConfig};
use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const FILTER_ENV: &str = "BOOKSHELF_LOG";

/// Install the global subscriber. The returned guard must be held for the
/// lifetime of the program so buffered lines are flushed on exit.
pub fn init(cfg: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    if !cfg.enabled {
        return Ok(None);
    }

    let log_dir = config::expand_home(&cfg.log_dir);
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;

    let appender = tracing_appender::rolling::daily(&log_dir, "bookshelf.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_env(FILTER_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(&cfg.level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true),
        )
        .try_init()
        .context("Failed to install tracing subscriber")?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "bookshelf starting");
    Ok(Some(guard))
}

fn default_directive(level: &str) -> String {
    format!("bookshelf={},reqwest=warn", level)
}
