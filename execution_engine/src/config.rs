//! Configuration file layout for hosts embedding the execution layer.

use std::{fs, io, path::Path};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{engine_config::EngineConfig, logging::LoggingConfig};

/// Root configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Protocol limits.
    pub engine: EngineConfig,
    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Failure to load a configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read {path}: {error}")]
    Io {
        /// Path of the file.
        path: String,
        /// Underlying error.
        error: io::Error,
    },
    /// The contents are not a valid configuration.
    #[error("failed to parse config: {0}")]
    Toml(#[from] toml::de::Error),
}

impl Config {
    /// Parses a configuration from TOML text.
    pub fn from_toml_str(contents: &str) -> Result<Config, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Reads and parses a TOML configuration file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|error| ConfigError::Io {
            path: path.display().to_string(),
            error,
        })?;
        Config::from_toml_str(&contents)
    }
}
