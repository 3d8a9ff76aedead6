//! crates/logging-sink/src/capture.rs
//! In-memory sink for tests and embedders that inspect output.

use std::io;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use logging::{Severity, Sink};

/// One payload recorded by a [`CaptureSink`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CapturedLine {
    /// Level of the event that produced the payload.
    pub level: Severity,
    /// Rendered payload, without a trailing newline.
    pub payload: String,
}

/// Records every payload it receives.
///
/// Clones share storage, so a handle kept by the caller observes writes made
/// through the clone installed in a [`logging::SinkGroup`].
#[derive(Clone, Debug, Default)]
pub struct CaptureSink {
    name: Arc<str>,
    lines: Arc<Mutex<Vec<CapturedLine>>>,
}

impl CaptureSink {
    /// Creates an empty capture named `name`.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: Arc::from(name),
            lines: Arc::default(),
        }
    }

    /// Snapshot of the recorded lines.
    #[must_use]
    pub fn lines(&self) -> Vec<CapturedLine> {
        self.guard().clone()
    }

    /// Recorded payloads without their levels.
    #[must_use]
    pub fn payloads(&self) -> Vec<String> {
        self.guard().iter().map(|line| line.payload.clone()).collect()
    }

    /// Removes and returns the recorded lines.
    #[must_use]
    pub fn take(&self) -> Vec<CapturedLine> {
        std::mem::take(&mut *self.guard())
    }

    /// Number of recorded lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.guard().len()
    }

    /// Reports whether nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.guard().is_empty()
    }

    fn guard(&self) -> MutexGuard<'_, Vec<CapturedLine>> {
        self.lines.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Sink for CaptureSink {
    fn name(&self) -> &str {
        &self.name
    }

    fn write(&mut self, level: Severity, payload: &str) -> io::Result<()> {
        self.guard().push(CapturedLine {
            level,
            payload: payload.to_owned(),
        });
        Ok(())
    }
}
