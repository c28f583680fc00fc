use std::fs::OpenOptions;
use std::path::Path;

use anyhow::{Context, Error};
use tracing::level_filters::LevelFilter;
use tracing::span::Span;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::LogLevel;

pub trait LogError {
    fn log_error(&self, error: Error);
}

impl LogError for Span {
    fn log_error(&self, error: Error) {
        self.in_scope(|| {
            tracing::error!("Error: {error:?}");
        });
    }
}

/// Installs the process-wide subscriber, which writes to standard output and appends to
/// `log_file`. Both outputs are filtered by `level`.
///
/// Lines written to the file are buffered until the returned guard is dropped, so it has to be
/// kept alive until the process shuts down.
pub fn init_logging(level: LogLevel, log_file: &Path) -> anyhow::Result<WorkerGuard> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .with_context(|| format!("Cannot open log file {}", log_file.display()))?;
    let (file_writer, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::registry()
        .with(LevelFilter::from(level))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stdout))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_writer)
                .with_ansi(false),
        )
        .try_init()
        .context("Cannot initialize logging")?;
    Ok(guard)
}
