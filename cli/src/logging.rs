//! Logging initialization: logs go to a file or are dropped, never to the console.
//!
//! Reads `RUST_LOG` (filter) and `LOG_FILE` (path) from env, typically via `.env` or
//! `~/.config/ravl/config.toml`. stdout carries only the answer; `--verbose` stage
//! progress goes to stderr through the runner's event stream, not through tracing.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

use crate::log_format::TurnTaggedText;

/// Installs the global subscriber.
///
/// - **RUST_LOG**: filter, e.g. `info`, `ravl=debug`. Default: `info` with HTTP client noise off.
/// - **LOG_FILE**: append logs to this file as plain text. Unset: logs are dropped.
///
/// Keep the returned guard alive until exit so buffered lines are flushed.
pub fn init() -> Result<Option<WorkerGuard>, Box<dyn std::error::Error>> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,hyper_util=off,reqwest=off"));

    let Ok(path) = std::env::var("LOG_FILE") else {
        let sink_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::sink)
            .with_filter(filter);
        tracing_subscriber::registry().with(sink_layer).try_init()?;
        return Ok(None);
    };

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(Path::new(&path))?;
    let (writer, guard) = tracing_appender::non_blocking(file);
    let file_layer = tracing_subscriber::fmt::layer()
        .event_format(TurnTaggedText::new())
        .with_writer(writer)
        .with_ansi(false)
        .with_filter(filter);
    tracing_subscriber::registry().with(file_layer).try_init()?;
    tracing::info!(path = %path, "ravl logging to file");
    Ok(Some(guard))
}
