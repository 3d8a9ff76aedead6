//! src/logger.rs
//! The logger facade: normalization, threshold control and sink ownership.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use logging::{
    Clock, ConfigError, Dispatcher, EventFields, LevelTable, LogCall, LoggerConfig, Severity,
    SinkGroup, UnknownLevel, normalize,
};
use logging_sink::{RotatingFileSink, StreamSink};
use serde_json::Value;

/// Errors raised while constructing or installing a [`Logger`].
#[derive(Debug, thiserror::Error)]
pub enum InitError {
    /// The resolved configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The log directory could not be created.
    #[error("failed to create log directory '{}': {source}", path.display())]
    CreateDir {
        /// Directory that was being created.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// A log file could not be opened.
    #[error("failed to open log file '{}': {source}", path.display())]
    OpenSink {
        /// File that was being opened.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// The process-wide logger has already been installed.
    #[error("the global logger is already initialized")]
    AlreadyInitialized,
}

/// Process logger writing a text and a structured representation of every
/// accepted event.
///
/// A `Logger` is usable on its own; [`crate::global`] and [`crate::init`]
/// manage the single process-wide instance.
#[derive(Debug)]
pub struct Logger {
    dispatcher: Dispatcher,
    config: LoggerConfig,
}

impl Logger {
    /// Builds a logger with the sinks described by `config`.
    ///
    /// Creates `log_dir` if needed, then opens `<app>.log` (and stdout when
    /// `console` is set) for text and `<app>-ELK.log` for structured output.
    pub fn from_config(config: LoggerConfig) -> Result<Self, InitError> {
        config.validate()?;
        fs::create_dir_all(&config.log_dir).map_err(|source| InitError::CreateDir {
            path: config.log_dir.clone(),
            source,
        })?;

        let mut text = console_group(&config);
        text.push(open_file(&config.text_log_path(), &config)?);
        let structured =
            SinkGroup::new("structured").with(open_file(&config.structured_log_path(), &config)?);

        Self::with_sinks(config, text, structured)
    }

    /// Builds a logger that only writes text to the console.
    ///
    /// The structured group is left empty.
    pub fn console_only(config: LoggerConfig) -> Result<Self, InitError> {
        let text = console_group(&config);
        Self::with_sinks(config, text, SinkGroup::new("structured"))
    }

    /// Console-only logger over the built-in defaults.
    #[must_use]
    pub fn fallback() -> Self {
        let config = LoggerConfig::default();
        let dispatcher = Dispatcher::new(
            &config.app_name,
            config.log_level_at_start,
            console_group(&config),
            SinkGroup::new("structured"),
        );
        Self { dispatcher, config }
    }

    /// Builds a logger over caller-supplied sink groups.
    pub fn with_sinks(
        config: LoggerConfig,
        text: SinkGroup,
        structured: SinkGroup,
    ) -> Result<Self, InitError> {
        config.validate()?;
        let dispatcher = Dispatcher::new(
            &config.app_name,
            config.log_level_at_start,
            text,
            structured,
        )
        .with_timestamp_format(config.timestamp_format()?);
        Ok(Self { dispatcher, config })
    }

    /// Replaces the clock used to timestamp events.
    #[must_use]
    pub fn with_clock(self, clock: impl Clock + 'static) -> Self {
        Self {
            dispatcher: self.dispatcher.with_clock(clock),
            config: self.config,
        }
    }

    /// Logs a call in either shape.
    ///
    /// Returns `true` when the event was written to both sink groups and
    /// `false` when it was rejected or filtered. Never panics.
    pub fn log(&self, call: impl Into<LogCall>) -> bool {
        match normalize(call) {
            Ok(event) => self.dispatcher.dispatch(&event),
            Err(error) => {
                tracing::debug!(target: "duallog", %error, "log call rejected");
                false
            }
        }
    }

    /// Logs a structured call.
    pub fn log_fields(&self, fields: EventFields) -> bool {
        self.log(fields)
    }

    /// Logs a structured call given as a JSON object.
    ///
    /// Accepts `subjectId`, `subject_id` or `insured_person` for the subject.
    /// Anything that is not an object of the expected shape is rejected.
    pub fn log_json(&self, value: &Value) -> bool {
        match serde_json::from_value::<EventFields>(value.clone()) {
            Ok(fields) => self.log(fields),
            Err(error) => {
                tracing::debug!(target: "duallog", %error, "structured log call rejected");
                false
            }
        }
    }

    /// Sets the threshold by level name.
    ///
    /// An unknown name is rejected and the threshold is left unchanged.
    pub fn set_level(&self, name: &str) -> Result<(), UnknownLevel> {
        let level = name.parse::<Severity>()?;
        self.set_severity(level);
        Ok(())
    }

    /// Sets the threshold.
    pub fn set_severity(&self, level: Severity) {
        self.dispatcher.set_threshold(level);
    }

    /// Current threshold.
    pub fn level(&self) -> Severity {
        self.dispatcher.threshold()
    }

    /// Reports whether an event at `level` would be written.
    pub fn is_enabled(&self, level: Severity) -> bool {
        self.dispatcher.is_enabled(level)
    }

    /// The severity table.
    #[must_use]
    pub const fn levels(&self) -> LevelTable {
        logging::levels()
    }

    /// Configuration the logger was built from.
    #[must_use]
    pub const fn config(&self) -> &LoggerConfig {
        &self.config
    }

    /// Number of sinks in the text and structured groups.
    pub fn sink_counts(&self) -> (usize, usize) {
        self.dispatcher.sink_counts()
    }

    /// Flushes every sink.
    pub fn flush(&self) {
        self.dispatcher.flush();
    }
}

fn console_group(config: &LoggerConfig) -> SinkGroup {
    let mut group = SinkGroup::new("text");
    if config.console {
        group.push(StreamSink::stdout(config.colorize));
    }
    group
}

fn open_file(path: &Path, config: &LoggerConfig) -> Result<RotatingFileSink, InitError> {
    RotatingFileSink::open(path, config.max_file_size, config.max_files).map_err(|source| {
        InitError::OpenSink {
            path: path.to_path_buf(),
            source,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use logging::FixedClock;
    use logging_sink::CaptureSink;
    use serde_json::json;
    use time::macros::datetime;

    fn captured(threshold: Severity) -> (Logger, CaptureSink, CaptureSink) {
        let text = CaptureSink::new("text");
        let structured = CaptureSink::new("structured");
        let config = LoggerConfig {
            app_name: "importer".to_owned(),
            log_level_at_start: threshold,
            time_format: Some("YYYY-MM-DD HH:mm:ss".to_owned()),
            console: false,
            ..LoggerConfig::default()
        };
        let logger = Logger::with_sinks(
            config,
            SinkGroup::new("text").with(text.clone()),
            SinkGroup::new("structured").with(structured.clone()),
        )
        .expect("valid config")
        .with_clock(FixedClock::new(datetime!(2024-03-05 14:07:09 UTC)));
        (logger, text, structured)
    }

    #[test]
    fn initial_threshold_comes_from_config() {
        let (logger, _, _) = captured(Severity::Notice);
        assert_eq!(logger.level(), Severity::Notice);
        assert!(logger.is_enabled(Severity::Notice));
        assert!(!logger.is_enabled(Severity::Info));
    }

    #[test]
    fn set_level_rejects_unknown_names() {
        let (logger, _, _) = captured(Severity::Info);
        let err = logger.set_level("verbose").unwrap_err();
        assert_eq!(err.name(), "verbose");
        assert_eq!(logger.level(), Severity::Info);

        logger.set_level("crit").expect("known level");
        assert_eq!(logger.level(), Severity::Crit);
    }

    #[test]
    fn log_json_accepts_structured_object() {
        let (logger, text, structured) = captured(Severity::Debug);
        let accepted = logger.log_json(&json!({
            "level": "notice",
            "message": "synced",
            "insured_person": 42,
            "route": "/sync"
        }));

        assert!(accepted);
        assert_eq!(
            text.payloads(),
            vec!["2024-03-05 14:07:09 - importer - [notice] - 42 - /sync - synced"]
        );
        let line: Value = serde_json::from_str(&structured.payloads()[0]).expect("json");
        assert_eq!(line["insured_person"], json!(42));
    }

    #[test]
    fn log_json_accepts_float_and_large_unsigned_subjects() {
        let (logger, text, structured) = captured(Severity::Debug);

        assert!(logger.log_json(&json!({"level": "info", "message": "m", "subjectId": 12.5})));
        assert!(logger.log_json(&json!({
            "level": "info",
            "message": "m",
            "insured_person": 18_446_744_073_709_551_615_u64
        })));

        assert_eq!(
            text.payloads(),
            vec![
                "2024-03-05 14:07:09 - importer - [info] - 12.5 - m",
                "2024-03-05 14:07:09 - importer - [info] - 18446744073709551615 - m",
            ]
        );
        let lines: Vec<Value> = structured
            .payloads()
            .iter()
            .map(|line| serde_json::from_str(line).expect("json"))
            .collect();
        assert_eq!(lines[0]["insured_person"], json!(12.5));
        assert_eq!(lines[1]["insured_person"], json!(u64::MAX));
    }

    #[test]
    fn log_json_rejects_non_objects() {
        let (logger, text, structured) = captured(Severity::Debug);
        assert!(!logger.log_json(&json!(["info", "message"])));
        assert!(!logger.log_json(&json!({"level": "info"})));
        assert!(text.is_empty());
        assert!(structured.is_empty());
    }

    #[test]
    fn invalid_time_format_is_a_config_error() {
        let config = LoggerConfig {
            time_format: Some("[unterminated".to_owned()),
            ..LoggerConfig::default()
        };
        let err = Logger::with_sinks(config, SinkGroup::default(), SinkGroup::default())
            .unwrap_err();
        assert!(matches!(err, InitError::Config(ConfigError::InvalidTimeFormat(_))));
    }
}
