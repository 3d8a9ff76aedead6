//! crates/logging/src/config.rs
//! Logger configuration and the per-environment layered loader.
//!
//! A configuration document is a JSON object keyed by environment name:
//!
//! ```json
//! {
//!   "development": { "logDir": "logs", "appName": "billing", "logLevelAtStart": "debug" },
//!   "production":  { "logDir": "/var/log/billing", "logLevelAtStart": "info", "colorize": false }
//! }
//! ```
//!
//! Resolving `production` starts from the built-in defaults, overlays the
//! `development` layer, then overlays the `production` layer. Keys a layer
//! leaves out keep the value from the layer below.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::levels::{Severity, UnknownLevel};
use crate::timestamp::{TimeFormatError, TimestampFormat};

/// Name of the base layer every environment is merged onto.
pub const DEFAULT_ENVIRONMENT: &str = "development";

/// Default rotation size for file sinks: 5 MiB.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 5 * 1024 * 1024;

/// Default number of files kept per file sink.
pub const DEFAULT_MAX_FILES: usize = 5;

/// Errors raised while loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read log configuration '{}': {source}", path.display())]
    Io {
        /// File that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The document is not valid JSON or has the wrong shape.
    #[error("invalid log configuration: {0}")]
    Parse(#[from] serde_json::Error),
    /// `logLevelAtStart` names an unknown level.
    #[error("invalid logLevelAtStart: {0}")]
    InvalidLevel(#[from] UnknownLevel),
    /// `timeFormat` could not be compiled.
    #[error(transparent)]
    InvalidTimeFormat(#[from] TimeFormatError),
    /// A numeric limit is out of range.
    #[error("{field} must be greater than zero")]
    InvalidLimit {
        /// Offending key.
        field: &'static str,
    },
    /// `appName` is empty.
    #[error("appName must not be empty")]
    EmptyAppName,
}

/// Fully resolved configuration consumed by the logger.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggerConfig {
    /// Directory holding the log files.
    pub log_dir: PathBuf,
    /// Application name: file name prefix and output label.
    pub app_name: String,
    /// Threshold in effect when the logger starts.
    pub log_level_at_start: Severity,
    /// Moment-style timestamp pattern; RFC 3339 when absent.
    pub time_format: Option<String>,
    /// Colour console output by level.
    pub colorize: bool,
    /// Size in bytes at which a log file is rotated.
    pub max_file_size: u64,
    /// Number of files kept per file sink, the active one included.
    pub max_files: usize,
    /// Write the text representation to standard output as well.
    pub console: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from("logs"),
            app_name: "app".to_owned(),
            log_level_at_start: Severity::Info,
            time_format: None,
            colorize: false,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            max_files: DEFAULT_MAX_FILES,
            console: true,
        }
    }
}

impl LoggerConfig {
    /// Checks the invariants the logger relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.app_name.is_empty() {
            return Err(ConfigError::EmptyAppName);
        }
        if self.max_file_size == 0 {
            return Err(ConfigError::InvalidLimit {
                field: "maxFileSize",
            });
        }
        if self.max_files == 0 {
            return Err(ConfigError::InvalidLimit { field: "maxFiles" });
        }
        self.timestamp_format()?;
        Ok(())
    }

    /// Compiles [`time_format`](Self::time_format).
    pub fn timestamp_format(&self) -> Result<TimestampFormat, ConfigError> {
        Ok(TimestampFormat::from_config(self.time_format.as_deref())?)
    }

    /// Path of the text log file: `<logDir>/<appName>.log`.
    #[must_use]
    pub fn text_log_path(&self) -> PathBuf {
        self.log_dir.join(format!("{}.log", self.app_name))
    }

    /// Path of the structured log file: `<logDir>/<appName>-ELK.log`.
    #[must_use]
    pub fn structured_log_path(&self) -> PathBuf {
        self.log_dir.join(format!("{}-ELK.log", self.app_name))
    }
}

/// One configuration layer. Every key is optional.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialConfig {
    /// See [`LoggerConfig::log_dir`].
    pub log_dir: Option<PathBuf>,
    /// See [`LoggerConfig::app_name`].
    pub app_name: Option<String>,
    /// See [`LoggerConfig::log_level_at_start`]; validated on resolution.
    pub log_level_at_start: Option<String>,
    /// See [`LoggerConfig::time_format`].
    pub time_format: Option<String>,
    /// See [`LoggerConfig::colorize`].
    pub colorize: Option<bool>,
    /// See [`LoggerConfig::max_file_size`].
    pub max_file_size: Option<u64>,
    /// See [`LoggerConfig::max_files`].
    pub max_files: Option<usize>,
    /// See [`LoggerConfig::console`].
    pub console: Option<bool>,
}

impl PartialConfig {
    /// Overlays `upper` onto `self`; keys set in `upper` win.
    pub fn overlay(&mut self, upper: Self) {
        macro_rules! take {
            ($($field:ident),* $(,)?) => {
                $(if upper.$field.is_some() {
                    self.$field = upper.$field;
                })*
            };
        }
        take!(
            log_dir,
            app_name,
            log_level_at_start,
            time_format,
            colorize,
            max_file_size,
            max_files,
            console,
        );
    }

    /// Applies the layer on top of `base`.
    pub fn apply(self, base: LoggerConfig) -> Result<LoggerConfig, ConfigError> {
        let log_level_at_start = match self.log_level_at_start {
            Some(name) => name.parse::<Severity>()?,
            None => base.log_level_at_start,
        };
        Ok(LoggerConfig {
            log_dir: self.log_dir.unwrap_or(base.log_dir),
            app_name: self.app_name.unwrap_or(base.app_name),
            log_level_at_start,
            time_format: self.time_format.or(base.time_format),
            colorize: self.colorize.unwrap_or(base.colorize),
            max_file_size: self.max_file_size.unwrap_or(base.max_file_size),
            max_files: self.max_files.unwrap_or(base.max_files),
            console: self.console.unwrap_or(base.console),
        })
    }
}

/// Configuration document: one [`PartialConfig`] per environment name.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(transparent)]
pub struct ConfigLayers {
    layers: BTreeMap<String, PartialConfig>,
}

impl ConfigLayers {
    /// Parses a JSON configuration document.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Reads and parses the configuration document at `path`.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Adds or replaces the layer for `environment`.
    pub fn insert(&mut self, environment: impl Into<String>, layer: PartialConfig) {
        self.layers.insert(environment.into(), layer);
    }

    /// Reports whether a layer exists for `environment`.
    #[must_use]
    pub fn contains(&self, environment: &str) -> bool {
        self.layers.contains_key(environment)
    }

    /// Resolves and validates the configuration for `environment`.
    ///
    /// An environment without a layer of its own resolves to the
    /// development configuration.
    pub fn resolve(&self, environment: &str) -> Result<LoggerConfig, ConfigError> {
        let mut merged = self
            .layers
            .get(DEFAULT_ENVIRONMENT)
            .cloned()
            .unwrap_or_default();

        if environment != DEFAULT_ENVIRONMENT {
            match self.layers.get(environment) {
                Some(layer) => merged.overlay(layer.clone()),
                None => tracing::debug!(
                    target: "logging::config",
                    environment,
                    "no configuration layer for environment, using {DEFAULT_ENVIRONMENT}"
                ),
            }
        }

        let config = merged.apply(LoggerConfig::default())?;
        config.validate()?;
        Ok(config)
    }
}
