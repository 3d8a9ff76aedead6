#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `logging` is the core of duallog: it validates log calls, filters them by
//! severity and renders every accepted event twice, once as a
//! human-readable text line and once as a single-line JSON object, before
//! handing each representation to its own [`SinkGroup`].
//!
//! # Design
//!
//! - [`levels`] holds the fixed severity table (`emerg` = 0 through
//!   `debug` = 7) and the `candidate <= threshold` comparison.
//! - [`event`] accepts the two call shapes, [`EventFields`] and
//!   [`LogCall::positional`], and turns either into a [`LogEvent`] through
//!   [`normalize`]. Payloads are classified once, into [`Payload`].
//! - [`render`] provides [`TextRenderer`] and [`StructuredRenderer`].
//! - [`dispatch`] provides [`Dispatcher`], which owns the threshold, the
//!   renderers and both sink groups.
//! - [`config`] describes [`LoggerConfig`] and resolves layered,
//!   per-environment documents through [`ConfigLayers`].
//! - [`timestamp`] provides the [`Clock`] seam and [`TimestampFormat`].
//!
//! # Invariants
//!
//! - A [`LogEvent`] always carries a known level and a non-empty message.
//! - Events below the threshold are dropped before the clock is read or any
//!   rendering happens.
//! - An accepted event reaches both sink groups; a rejected one reaches
//!   neither.
//!
//! # Errors
//!
//! Normalization reports [`NormalizeError`]; configuration loading reports
//! [`ConfigError`]. Sink failures are absorbed by [`SinkGroup`] and reported
//! through `tracing` under the `logging::sink` target.
//!
//! # Examples
//!
//! ```
//! use logging::{Dispatcher, LogCall, Severity, SinkGroup, normalize};
//!
//! let dispatcher = Dispatcher::new("billing", Severity::Info, SinkGroup::new("text"), SinkGroup::new("structured"));
//!
//! let accepted = normalize(LogCall::positional("info", "START").operation("import")).unwrap();
//! assert!(dispatcher.dispatch(&accepted));
//!
//! let filtered = normalize(LogCall::positional("debug", "details")).unwrap();
//! assert!(!dispatcher.dispatch(&filtered));
//! ```

pub mod config;
pub mod dispatch;
pub mod event;
pub mod levels;
pub mod render;
pub mod sink;
pub mod timestamp;

pub use config::{ConfigError, ConfigLayers, DEFAULT_ENVIRONMENT, LoggerConfig, PartialConfig};
pub use dispatch::Dispatcher;
pub use event::{
    EventFields, LogCall, LogEvent, NormalizeError, Payload, PositionalCall, SubjectId, normalize,
};
pub use levels::{LevelTable, Severity, UnknownLevel, is_enabled, levels};
pub use render::{StructuredRenderer, TextRenderer};
pub use sink::{Sink, SinkGroup};
pub use timestamp::{Clock, FixedClock, SystemClock, TimeFormatError, TimestampFormat};
