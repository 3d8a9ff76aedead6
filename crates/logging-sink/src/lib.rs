#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `logging-sink` provides the concrete destinations behind the
//! [`logging::Sink`] trait: console streams, size-rotated files and an
//! in-memory capture. A logger installs one or more of these in each of its
//! two sink groups.
//!
//! # Design
//!
//! - [`StreamSink`] wraps any [`std::io::Write`] implementor and writes one
//!   line per payload, optionally wrapped in the level's ANSI colour.
//! - [`RotatingFileSink`] appends to a file and rotates it by size, keeping a
//!   bounded number of rotated copies next to it.
//! - [`CaptureSink`] records payloads in shared memory so callers can inspect
//!   exactly what a logger emitted.
//!
//! # Invariants
//!
//! - Every payload is written as a single newline-terminated line.
//! - Colour is only ever applied by [`StreamSink`]; file sinks write plain
//!   text.
//! - [`RotatingFileSink`] never holds more than its configured number of
//!   files, the active one included.
//!
//! # Errors
//!
//! Sinks report [`std::io::Error`] values from the underlying writer or file
//! system. [`logging::SinkGroup`] absorbs them so one failing destination
//! does not prevent delivery to the rest.
//!
//! # Examples
//!
//! ```
//! use logging::{Severity, Sink};
//! use logging_sink::StreamSink;
//!
//! let mut sink = StreamSink::new("buffer", Vec::new());
//! sink.write(Severity::Info, "ready").unwrap();
//! assert_eq!(sink.into_inner(), b"ready\n");
//! ```

mod capture;
mod rotating;
mod stream;

pub use capture::{CaptureSink, CapturedLine};
pub use rotating::RotatingFileSink;
pub use stream::{StreamSink, level_color};
