#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `duallog` is a process-wide structured logger. Every accepted event is
//! written twice: as a human-readable line to the console and
//! `<logDir>/<appName>.log`, and as a single-line JSON object to
//! `<logDir>/<appName>-ELK.log`.
//!
//! # Design
//!
//! - [`Logger`] owns the resolved [`LoggerConfig`], the threshold and both
//!   sink groups. It exposes [`Logger::log`], [`Logger::set_level`] and
//!   [`Logger::levels`].
//! - [`global`] returns the process-wide instance, bootstrapping it from the
//!   environment on first use; [`init`] installs one explicitly.
//! - [`bootstrap`] reads the environment name and configuration document.
//! - [`log_event!`] is shorthand for positional calls.
//! - [`install_panic_hook`] records panics at `crit` before the previous
//!   panic hook runs.
//! - With the `bridge` feature, `DualLayer` forwards `tracing` events into a
//!   logger.
//!
//! The filtering and rendering pipeline lives in the `logging` crate and the
//! concrete sinks in `logging-sink`; both are re-exported here.
//!
//! # Invariants
//!
//! - Exactly one process-wide logger exists once [`global`] or [`init`] has
//!   run.
//! - Threshold changes are visible to every later call from any thread.
//! - Logging never panics and never returns an error; rejected and filtered
//!   calls return `false`.
//!
//! # Errors
//!
//! Construction reports [`InitError`]. Level changes report
//! [`UnknownLevel`].
//!
//! # Examples
//!
//! ```
//! use duallog::{CaptureSink, LogCall, Logger, LoggerConfig, Severity, SinkGroup};
//!
//! let text = CaptureSink::new("text");
//! let structured = CaptureSink::new("structured");
//! let config = LoggerConfig { app_name: "billing".into(), console: false, ..LoggerConfig::default() };
//! let logger = Logger::with_sinks(
//!     config,
//!     SinkGroup::new("text").with(text.clone()),
//!     SinkGroup::new("structured").with(structured.clone()),
//! )
//! .unwrap();
//!
//! assert!(logger.log(LogCall::positional("info", "START").operation("import")));
//! logger.set_level("error").unwrap();
//! assert!(!logger.log(LogCall::positional(Severity::Warning, "disk at 80%")));
//!
//! assert_eq!(text.len(), 1);
//! assert!(structured.payloads()[0].contains(r#""operation":"import""#));
//! ```

pub mod bootstrap;
mod global;
mod logger;
mod macros;
mod panic_hook;

#[cfg(feature = "bridge")]
mod bridge;

pub use global::{global, init, init_from_env, install, is_initialized};
pub use logger::{InitError, Logger};
pub use panic_hook::{install_panic_hook, install_panic_hook_for};

#[cfg(feature = "bridge")]
pub use bridge::{DualLayer, init_tracing, init_tracing_with_filter};

pub use logging::{
    Clock, ConfigError, ConfigLayers, EventFields, FixedClock, LevelTable, LogCall, LogEvent,
    LoggerConfig, NormalizeError, PartialConfig, Payload, PositionalCall, Severity, Sink,
    SinkGroup, SubjectId, SystemClock, TimestampFormat, UnknownLevel, levels,
};
pub use logging_sink::{CaptureSink, CapturedLine, RotatingFileSink, StreamSink};
