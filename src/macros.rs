//! src/macros.rs
//! Positional logging shorthand.

/// Logs a positional call through `logger`.
///
/// Optional context is given as `key = value` pairs naming the
/// [`PositionalCall`](crate::PositionalCall) builders: `subject`,
/// `operation`, `route` and `data`. Evaluates to the `bool` returned by
/// [`Logger::log`](crate::Logger::log).
///
/// ```
/// use duallog::{Logger, LoggerConfig, SinkGroup, log_event};
///
/// let config = LoggerConfig { console: false, ..LoggerConfig::default() };
/// let logger = Logger::with_sinks(config, SinkGroup::new("text"), SinkGroup::new("structured")).unwrap();
///
/// assert!(log_event!(logger, "info", "START", operation = "import"));
/// assert!(!log_event!(logger, "debug", "row parsed", subject = 17, data = "ok"));
/// ```
#[macro_export]
macro_rules! log_event {
    ($logger:expr, $level:expr, $message:expr $(, $key:ident = $value:expr)* $(,)?) => {{
        let call = $crate::LogCall::positional($level, $message);
        $(let call = call.$key($value);)*
        $logger.log(call)
    }};
}
