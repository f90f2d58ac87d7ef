//! File logging for the engine and its front ends
//!
//! Stdout belongs to headless NDJSON output, so every trace line goes to a
//! daily-rotated file under the user's data directory instead. The
//! `DOCSITE_LOG` variable takes a standard filter string, e.g.
//!
//! ```bash
//! DOCSITE_LOG=debug docsite --headless /en
//! DOCSITE_LOG=docsite_app::handler=trace,docsite_net=debug docsite --headless /en
//! ```

use std::path::PathBuf;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::error::Result;

/// Environment variable holding the filter string
pub const LOG_ENV: &str = "DOCSITE_LOG";

const LOG_FILE_NAME: &str = "docsite.log";

/// Used when `DOCSITE_LOG` is unset, empty or unparsable.
/// Our own crates log at info, dependencies only at warn.
const DEFAULT_DIRECTIVES: &[&str] = &[
    "warn",
    "docsite=info",
    "docsite_app=info",
    "docsite_net=info",
];

/// Install the global subscriber writing to [`log_file`].
pub fn init() -> Result<()> {
    let dir = log_directory();
    std::fs::create_dir_all(&dir)?;

    let raw = std::env::var(LOG_ENV).ok();
    let (filter, rejected) = build_filter(raw.as_deref());

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(RollingFileAppender::new(Rotation::DAILY, &dir, LOG_FILE_NAME))
                .with_ansi(false)
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_timer(fmt::time::ChronoLocal::new(
                    "%Y-%m-%d %H:%M:%S%.3f".to_string(),
                )),
        )
        .init();

    tracing::info!("── docsite {} ──", env!("CARGO_PKG_VERSION"));
    tracing::info!("Writing logs to {}", dir.display());
    if let Some(bad) = rejected {
        tracing::warn!("Ignoring {}='{}', using default filter", LOG_ENV, bad);
    }

    Ok(())
}

/// Filter for a raw `DOCSITE_LOG` value.
///
/// Returns the value back alongside the default filter when it does not
/// parse, so the caller can report it once a subscriber exists.
pub fn build_filter(raw: Option<&str>) -> (EnvFilter, Option<String>) {
    let raw = raw.map(str::trim).filter(|s| !s.is_empty());
    match raw.map(EnvFilter::try_new) {
        Some(Ok(filter)) => (filter, None),
        Some(Err(_)) => (default_filter(), raw.map(str::to_string)),
        None => (default_filter(), None),
    }
}

fn default_filter() -> EnvFilter {
    EnvFilter::new(DEFAULT_DIRECTIVES.join(","))
}

/// `<data dir>/docsite/logs`, or `./docsite/logs` without a data dir
pub fn log_directory() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("docsite")
        .join("logs")
}

/// Base name of today's log file; the appender adds a date suffix
pub fn log_file() -> PathBuf {
    log_directory().join(LOG_FILE_NAME)
}
