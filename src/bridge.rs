//! src/bridge.rs
//! Forwards `tracing` events into a [`Logger`].
//!
//! [`DualLayer`] is a `tracing_subscriber` layer that turns each event into a
//! positional log call. Levels map ERROR to `error`, WARN to `warning`, INFO
//! to `info` and DEBUG/TRACE to `debug`. The `operation`, `route`,
//! `subject_id` and `data` fields become the matching context; the
//! `message` field becomes the message.
//!
//! Events targeting the `logging` or `duallog` modules (the crate name itself
//! or a `::` path below it) are ignored so the logger's own diagnostics never
//! loop back into it.
//!
//! ```rust,ignore
//! let logger = duallog::global();
//! duallog::init_tracing(logger);
//!
//! tracing::info!(operation = "import", "START");
//! ```

use std::fmt;
use std::ops::Deref;

use serde_json::{Number, Value};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;

use crate::logger::Logger;
use logging::{LogCall, PositionalCall, Severity, SubjectId};

const IGNORED_TARGETS: [&str; 2] = ["logging", "duallog"];

/// Layer delivering `tracing` events to a [`Logger`].
///
/// Generic over the handle so it can hold `&'static Logger` or
/// `Arc<Logger>`.
pub struct DualLayer<L> {
    logger: L,
}

impl<L> DualLayer<L>
where
    L: Deref<Target = Logger>,
{
    /// Creates a layer writing to `logger`.
    pub const fn new(logger: L) -> Self {
        Self { logger }
    }

    const fn severity(level: &Level) -> Severity {
        match *level {
            Level::ERROR => Severity::Error,
            Level::WARN => Severity::Warning,
            Level::INFO => Severity::Info,
            Level::DEBUG | Level::TRACE => Severity::Debug,
        }
    }

    fn ignored(target: &str) -> bool {
        IGNORED_TARGETS.iter().any(|prefix| {
            target
                .strip_prefix(prefix)
                .is_some_and(|rest| rest.is_empty() || rest.starts_with("::"))
        })
    }
}

impl<S, L> Layer<S> for DualLayer<L>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    L: Deref<Target = Logger> + Send + Sync + 'static,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if Self::ignored(metadata.target()) {
            return;
        }
        let severity = Self::severity(metadata.level());
        if !self.logger.is_enabled(severity) {
            return;
        }

        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);
        if let Some(call) = visitor.into_call(severity) {
            self.logger.log(call);
        }
    }
}

impl<L> fmt::Debug for DualLayer<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DualLayer").finish_non_exhaustive()
    }
}

/// Collects the fields the logger understands.
#[derive(Default)]
struct EventVisitor {
    message: Option<String>,
    operation: Option<String>,
    route: Option<String>,
    subject_id: Option<SubjectId>,
    data: Option<Value>,
}

impl EventVisitor {
    fn into_call(self, severity: Severity) -> Option<PositionalCall> {
        let mut call = LogCall::positional(severity, self.message?);
        if let Some(subject) = self.subject_id {
            call = call.subject(subject);
        }
        if let Some(operation) = self.operation {
            call = call.operation(operation);
        }
        if let Some(route) = self.route {
            call = call.route(route);
        }
        if let Some(data) = self.data {
            call = call.data(data);
        }
        Some(call)
    }

    fn record_text(&mut self, field: &Field, value: String) {
        match field.name() {
            "message" => self.message = Some(value),
            "operation" => self.operation = Some(value),
            "route" => self.route = Some(value),
            "subject_id" => self.subject_id = Some(SubjectId::Text(value)),
            "data" => self.data = Some(Value::String(value)),
            _ => {}
        }
    }
}

impl Visit for EventVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.record_text(field, format!("{value:?}"));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.record_text(field, value.to_owned());
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        match field.name() {
            "subject_id" => self.subject_id = Some(SubjectId::from(value)),
            "data" => self.data = Some(Value::from(value)),
            _ => self.record_text(field, value.to_string()),
        }
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        match field.name() {
            "subject_id" => self.subject_id = Some(SubjectId::from(value)),
            "data" => self.data = Some(Value::from(value)),
            _ => self.record_text(field, value.to_string()),
        }
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        match (field.name(), Number::from_f64(value)) {
            ("subject_id", Some(number)) => self.subject_id = Some(SubjectId::Number(number)),
            ("data", Some(number)) => self.data = Some(Value::Number(number)),
            _ => self.record_text(field, value.to_string()),
        }
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        if field.name() == "data" {
            self.data = Some(Value::Bool(value));
        } else {
            self.record_text(field, value.to_string());
        }
    }
}

/// Installs a global subscriber that forwards every `tracing` event to
/// `logger`.
///
/// Panics if a global subscriber is already set, as
/// `tracing_subscriber::util::SubscriberInitExt::init` does.
pub fn init_tracing(logger: &'static Logger) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    tracing_subscriber::registry()
        .with(DualLayer::new(logger))
        .init();
}

/// Like [`init_tracing`], with an additional filter layer such as
/// `tracing_subscriber::EnvFilter`.
pub fn init_tracing_with_filter<F>(logger: &'static Logger, filter: F)
where
    F: Layer<tracing_subscriber::Registry> + Send + Sync + 'static,
{
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    tracing_subscriber::registry()
        .with(filter)
        .with(DualLayer::new(logger))
        .init();
}
