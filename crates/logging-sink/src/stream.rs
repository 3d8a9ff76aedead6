//! crates/logging-sink/src/stream.rs
//! Line-oriented sink over any [`Write`] implementor, with optional ANSI colour.

use std::fmt;
use std::io::{self, Stderr, Stdout, Write};

use logging::{Severity, Sink};

const RESET: &str = "\x1b[39m";

/// ANSI foreground colour used for `level` when colouring is enabled.
///
/// Matches the conventional syslog palette: red for the error family,
/// yellow for `alert` and `notice`, green for `info`, blue for `debug`.
#[must_use]
pub const fn level_color(level: Severity) -> &'static str {
    match level {
        Severity::Emerg | Severity::Crit | Severity::Error | Severity::Warning => "\x1b[31m",
        Severity::Alert | Severity::Notice => "\x1b[33m",
        Severity::Info => "\x1b[32m",
        Severity::Debug => "\x1b[34m",
    }
}

/// Writes each payload followed by a newline to the wrapped writer.
///
/// When colouring is enabled the whole payload is wrapped in the level's
/// colour. The writer is flushed after every line so console output is not
/// held back behind a buffer.
pub struct StreamSink<W> {
    name: String,
    writer: W,
    colorize: bool,
}

impl StreamSink<Stdout> {
    /// Sink writing to standard output.
    #[must_use]
    pub fn stdout(colorize: bool) -> Self {
        Self::new("stdout", io::stdout()).colorized(colorize)
    }
}

impl StreamSink<Stderr> {
    /// Sink writing to standard error.
    #[must_use]
    pub fn stderr(colorize: bool) -> Self {
        Self::new("stderr", io::stderr()).colorized(colorize)
    }
}

impl<W> StreamSink<W> {
    /// Wraps `writer`; colouring starts disabled.
    pub fn new(name: impl Into<String>, writer: W) -> Self {
        Self {
            name: name.into(),
            writer,
            colorize: false,
        }
    }

    /// Enables or disables colouring.
    #[must_use]
    pub fn colorized(mut self, colorize: bool) -> Self {
        self.colorize = colorize;
        self
    }

    /// Reports whether colouring is enabled.
    #[must_use]
    pub const fn is_colorized(&self) -> bool {
        self.colorize
    }

    /// Borrows the underlying writer.
    #[must_use]
    pub const fn get_ref(&self) -> &W {
        &self.writer
    }

    /// Consumes the sink and returns the wrapped writer.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W> Sink for StreamSink<W>
where
    W: Write + Send,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn write(&mut self, level: Severity, payload: &str) -> io::Result<()> {
        if self.colorize {
            writeln!(self.writer, "{}{payload}{RESET}", level_color(level))?;
        } else {
            writeln!(self.writer, "{payload}")?;
        }
        self.writer.flush()
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

impl<W> fmt::Debug for StreamSink<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamSink")
            .field("name", &self.name)
            .field("colorize", &self.colorize)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_lines_end_with_newline() {
        let mut sink = StreamSink::new("buffer", Vec::new());
        sink.write(Severity::Info, "first").expect("write succeeds");
        sink.write(Severity::Error, "second").expect("write succeeds");

        let output = String::from_utf8(sink.into_inner()).expect("utf-8");
        assert_eq!(output, "first\nsecond\n");
    }

    #[test]
    fn colorized_lines_are_wrapped_in_level_colour() {
        let mut sink = StreamSink::new("buffer", Vec::new()).colorized(true);
        assert!(sink.is_colorized());
        sink.write(Severity::Info, "ready").expect("write succeeds");

        let output = String::from_utf8(sink.into_inner()).expect("utf-8");
        assert_eq!(output, "\x1b[32mready\x1b[39m\n");
    }

    #[test]
    fn palette_covers_every_level() {
        for level in Severity::ALL {
            assert!(level_color(level).starts_with("\x1b["));
        }
        assert_eq!(level_color(Severity::Debug), "\x1b[34m");
        assert_eq!(level_color(Severity::Notice), "\x1b[33m");
    }

    #[test]
    fn name_is_reported() {
        let sink = StreamSink::new("console", Vec::<u8>::new());
        assert_eq!(Sink::name(&sink), "console");
    }
}
