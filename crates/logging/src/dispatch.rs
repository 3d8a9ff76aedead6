//! crates/logging/src/dispatch.rs
//! Threshold check and routing of events to the two sink groups.

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::event::LogEvent;
use crate::levels::{Severity, is_enabled};
use crate::render::{StructuredRenderer, TextRenderer};
use crate::sink::SinkGroup;
use crate::timestamp::{Clock, SystemClock, TimestampFormat};

/// Routes events that pass the current threshold to both sink groups.
///
/// The threshold is held in an atomic so [`set_threshold`](Self::set_threshold)
/// is visible to every later [`dispatch`](Self::dispatch) from any thread.
/// Each sink group sits behind its own mutex; a poisoned lock is recovered so
/// a panic in one caller never silences the logger for the others.
pub struct Dispatcher {
    threshold: AtomicU8,
    timestamps: TimestampFormat,
    clock: Box<dyn Clock>,
    text: TextRenderer,
    structured: StructuredRenderer,
    text_sinks: Mutex<SinkGroup>,
    structured_sinks: Mutex<SinkGroup>,
}

impl Dispatcher {
    /// Creates a dispatcher labelling output with `app_name`.
    ///
    /// Timestamps default to RFC 3339 from the [`SystemClock`].
    pub fn new(
        app_name: &str,
        threshold: Severity,
        text_sinks: SinkGroup,
        structured_sinks: SinkGroup,
    ) -> Self {
        Self {
            threshold: AtomicU8::new(threshold.rank()),
            timestamps: TimestampFormat::default(),
            clock: Box::new(SystemClock),
            text: TextRenderer::new(app_name),
            structured: StructuredRenderer::new(app_name),
            text_sinks: Mutex::new(text_sinks),
            structured_sinks: Mutex::new(structured_sinks),
        }
    }

    /// Replaces the timestamp format.
    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamps = format;
        self
    }

    /// Replaces the clock.
    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Current threshold.
    pub fn threshold(&self) -> Severity {
        Severity::from_rank(self.threshold.load(Ordering::Acquire)).unwrap_or(Severity::Debug)
    }

    /// Replaces the threshold for all subsequent dispatches.
    pub fn set_threshold(&self, level: Severity) {
        self.threshold.store(level.rank(), Ordering::Release);
    }

    /// Reports whether an event at `level` would be dispatched.
    pub fn is_enabled(&self, level: Severity) -> bool {
        is_enabled(level.rank(), self.threshold.load(Ordering::Acquire))
    }

    /// Renders `event` and writes it to both sink groups.
    ///
    /// Returns `false` without reading the clock or rendering anything when
    /// the event is below the threshold. Both representations are rendered
    /// before either group is written, so the groups receive the event
    /// together or not at all.
    pub fn dispatch(&self, event: &LogEvent) -> bool {
        if !self.is_enabled(event.level()) {
            return false;
        }

        let timestamp = self.timestamps.format(self.clock.now());
        let text = self.text.render(event, &timestamp);
        let structured = match self.structured.render(event, &timestamp) {
            Ok(line) => line,
            Err(error) => {
                tracing::warn!(target: "logging::dispatch", %error, "structured rendering failed");
                return false;
            }
        };

        lock(&self.text_sinks).write(event.level(), &text);
        lock(&self.structured_sinks).write(event.level(), &structured);
        true
    }

    /// Number of sinks in the text and structured groups.
    pub fn sink_counts(&self) -> (usize, usize) {
        (lock(&self.text_sinks).len(), lock(&self.structured_sinks).len())
    }

    /// Flushes both sink groups.
    pub fn flush(&self) {
        lock(&self.text_sinks).flush();
        lock(&self.structured_sinks).flush();
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("threshold", &self.threshold())
            .field("timestamps", &self.timestamps)
            .field("text", &self.text)
            .field("structured", &self.structured)
            .finish_non_exhaustive()
    }
}

fn lock(group: &Mutex<SinkGroup>) -> MutexGuard<'_, SinkGroup> {
    group.lock().unwrap_or_else(PoisonError::into_inner)
}
