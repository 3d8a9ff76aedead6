//! crates/logging/src/sink.rs
//! Sink contract and sink groups.
//!
//! A [`Sink`] persists or streams one rendered payload per call. Sinks are
//! collected into a [`SinkGroup`]; the dispatcher owns one group per
//! representation. Write failures stop at the group: they are reported
//! through `tracing` and never reach the caller of `log`.

use std::fmt;
use std::io;

use crate::levels::Severity;

/// Destination for rendered log payloads.
pub trait Sink: Send {
    /// Short name used in diagnostics, for example a file path.
    fn name(&self) -> &str;

    /// Writes one rendered payload. Implementations append the line
    /// terminator themselves.
    fn write(&mut self, level: Severity, payload: &str) -> io::Result<()>;

    /// Flushes buffered output.
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<S> Sink for Box<S>
where
    S: Sink + ?Sized,
{
    fn name(&self) -> &str {
        (**self).name()
    }

    fn write(&mut self, level: Severity, payload: &str) -> io::Result<()> {
        (**self).write(level, payload)
    }

    fn flush(&mut self) -> io::Result<()> {
        (**self).flush()
    }
}

/// Ordered set of sinks that receive the same representation.
#[derive(Default)]
pub struct SinkGroup {
    label: &'static str,
    sinks: Vec<Box<dyn Sink>>,
}

impl SinkGroup {
    /// Creates an empty group. `label` identifies the group in diagnostics.
    #[must_use]
    pub const fn new(label: &'static str) -> Self {
        Self {
            label,
            sinks: Vec::new(),
        }
    }

    /// Adds a sink and returns the group.
    #[must_use]
    pub fn with(mut self, sink: impl Sink + 'static) -> Self {
        self.push(sink);
        self
    }

    /// Adds a sink.
    pub fn push(&mut self, sink: impl Sink + 'static) {
        self.sinks.push(Box::new(sink));
    }

    /// Label given at construction.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        self.label
    }

    /// Number of sinks in the group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    /// Reports whether the group has no sinks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    /// Writes `payload` to every sink and returns how many accepted it.
    ///
    /// A failing sink does not prevent the remaining sinks from receiving
    /// the payload.
    pub fn write(&mut self, level: Severity, payload: &str) -> usize {
        let mut written = 0;
        for sink in &mut self.sinks {
            match sink.write(level, payload) {
                Ok(()) => written += 1,
                Err(error) => tracing::warn!(
                    target: "logging::sink",
                    group = self.label,
                    sink = sink.name(),
                    %error,
                    "log sink write failed"
                ),
            }
        }
        written
    }

    /// Flushes every sink, reporting failures the same way as [`write`](Self::write).
    pub fn flush(&mut self) {
        for sink in &mut self.sinks {
            if let Err(error) = sink.flush() {
                tracing::warn!(
                    target: "logging::sink",
                    group = self.label,
                    sink = sink.name(),
                    %error,
                    "log sink flush failed"
                );
            }
        }
    }
}

impl fmt::Debug for SinkGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SinkGroup")
            .field("label", &self.label)
            .field(
                "sinks",
                &self.sinks.iter().map(|sink| sink.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}
