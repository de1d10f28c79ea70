//! Logging via the tracing crate.

use std::io;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{subscriber::SetGlobalDefaultError, Subscriber};
use tracing_subscriber::{
    field::MakeExt,
    filter::{FromEnvError, ParseError},
    fmt::{format, MakeWriter},
    EnvFilter,
};

const DEFAULT_LEVEL: &str = "info";

/// Logging configuration.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Output format for log.
    pub format: LoggingFormat,
    /// Filter directive used when `RUST_LOG` is not set, e.g. `info` or
    /// `ride_execution_engine=trace`.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            format: LoggingFormat::default(),
            level: DEFAULT_LEVEL.to_string(),
        }
    }
}

/// Logging output format.
///
/// Defaults to "text".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoggingFormat {
    /// Text format.
    Text,
    /// JSON format.
    Json,
}

impl Default for LoggingFormat {
    fn default() -> Self {
        LoggingFormat::Text
    }
}

/// Failure to install the global logger.
#[derive(Error, Debug)]
pub enum LoggingError {
    /// The filter directive is malformed.
    #[error("invalid log filter: {0}")]
    Filter(#[from] ParseError),
    /// `RUST_LOG` holds a malformed directive.
    #[error("invalid RUST_LOG: {0}")]
    Env(#[from] FromEnvError),
    /// A global logger was already installed.
    #[error(transparent)]
    AlreadyInstalled(#[from] SetGlobalDefaultError),
}

/// Initializes the logging system with the default parameters.
pub fn init() -> Result<(), LoggingError> {
    init_with_config(&LoggingConfig::default())
}

/// Initializes the logging system.
///
/// This function should only be called once during the lifetime of the application; the installed
/// logger is global. `RUST_LOG` takes precedence over the configured level.
pub fn init_with_config(config: &LoggingConfig) -> Result<(), LoggingError> {
    let filter = env_filter(config)?;

    match config.format {
        LoggingFormat::Text => {
            tracing::subscriber::set_global_default(text_subscriber(filter, io::stdout))?
        }
        LoggingFormat::Json => tracing::subscriber::set_global_default(
            tracing_subscriber::fmt()
                .with_writer(io::stdout)
                .with_env_filter(filter)
                .json()
                .finish(),
        )?,
    }

    Ok(())
}

fn text_subscriber<W>(filter: EnvFilter, writer: W) -> impl Subscriber + Send + Sync
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let formatter = format::debug_fn(|writer, field, value| {
        if field.name() == "message" {
            write!(writer, "{:?}", value)
        } else {
            write!(writer, "{}={:?}", field, value)
        }
    })
    .delimited("; ");
    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_env_filter(filter)
        .fmt_fields(formatter)
        .finish()
}

fn env_filter(config: &LoggingConfig) -> Result<EnvFilter, LoggingError> {
    if std::env::var_os(EnvFilter::DEFAULT_ENV).is_some() {
        return Ok(EnvFilter::try_from_default_env()?);
    }
    Ok(EnvFilter::try_new(&config.level)?)
}
