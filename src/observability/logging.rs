//! Structured logging.
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - JSON format for production, pretty format for development
//! - `RUST_LOG` overrides the configured level
//! - Optional rolling file output through a non-blocking writer

use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling::{InitError, RollingFileAppender, Rotation},
};
use tracing_subscriber::{
    filter::ParseError, fmt, layer::SubscriberExt, util::SubscriberInitExt, util::TryInitError,
    EnvFilter, Layer, Registry,
};

use crate::config::{LogFileConfig, LogFormat, LogRotation, LoggingConfig};

/// Errors raised while installing the subscriber.
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("invalid log level: {0}")]
    Filter(#[from] ParseError),
    #[error("failed to open log file: {0}")]
    File(#[from] InitError),
    #[error("failed to install subscriber: {0}")]
    Init(#[from] TryInitError),
}

/// Keeps the file writer flushing. Hold it for the life of the process.
#[must_use]
pub struct LoggingGuard {
    _file: Option<WorkerGuard>,
}

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Install the global subscriber described by `config`.
pub fn init_logging(config: &LoggingConfig) -> Result<LoggingGuard, LoggingError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_directives(&config.level))?,
    };

    let mut layers: Vec<BoxedLayer> = vec![match config.format {
        LogFormat::Pretty => fmt::layer().boxed(),
        LogFormat::Json => fmt::layer().json().boxed(),
    }];

    let mut file_guard = None;
    if let Some(file) = &config.file {
        let (writer, guard) = tracing_appender::non_blocking(file_appender(file)?);
        file_guard = Some(guard);
        layers.push(fmt::layer().with_ansi(false).with_writer(writer).boxed());
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init()?;

    Ok(LoggingGuard { _file: file_guard })
}

fn default_directives(level: &str) -> String {
    format!("request_observer={level},tower_http={level},telemetry={level}")
}

fn file_appender(config: &LogFileConfig) -> Result<RollingFileAppender, InitError> {
    let rotation = match config.rotation {
        LogRotation::Hourly => Rotation::HOURLY,
        LogRotation::Daily => Rotation::DAILY,
        LogRotation::Never => Rotation::NEVER,
    };

    RollingFileAppender::builder()
        .rotation(rotation)
        .filename_prefix(config.file_name_prefix.as_str())
        .filename_suffix("log")
        .max_log_files(config.retained_file_count_limit)
        .build(&config.directory)
}
