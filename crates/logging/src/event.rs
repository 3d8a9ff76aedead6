//! crates/logging/src/event.rs
//! Call shapes accepted by the logger and their normalization into [`LogEvent`].
//!
//! Callers either build an [`EventFields`] record (the structured shape, also
//! deserialisable from a JSON object) or use [`LogCall::positional`] with
//! optional builder steps (the positional shape). Both shapes go through
//! [`normalize`], which is the only way to obtain a [`LogEvent`].

use std::fmt;

use serde_json::{Number, Value};

use crate::levels::{Severity, UnknownLevel};

/// Identifier of the subject an event is about. Numeric or textual.
///
/// Any JSON number is accepted, including floats and unsigned values beyond
/// `i64::MAX`.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum SubjectId {
    /// Numeric identifier.
    Number(Number),
    /// Textual identifier.
    Text(String),
}

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(id) => write!(f, "{id}"),
            Self::Text(id) => f.write_str(id),
        }
    }
}

impl From<i64> for SubjectId {
    fn from(id: i64) -> Self {
        Self::Number(id.into())
    }
}

impl From<i32> for SubjectId {
    fn from(id: i32) -> Self {
        Self::Number(id.into())
    }
}

impl From<u32> for SubjectId {
    fn from(id: u32) -> Self {
        Self::Number(id.into())
    }
}

impl From<u64> for SubjectId {
    fn from(id: u64) -> Self {
        Self::Number(id.into())
    }
}

impl From<Number> for SubjectId {
    fn from(id: Number) -> Self {
        Self::Number(id)
    }
}

impl From<&str> for SubjectId {
    fn from(id: &str) -> Self {
        Self::Text(id.to_owned())
    }
}

impl From<String> for SubjectId {
    fn from(id: String) -> Self {
        Self::Text(id)
    }
}

/// Event payload, classified once when the event is normalized.
#[derive(Clone, Debug, PartialEq)]
pub enum Payload {
    /// Text that is valid JSON, or a JSON scalar. `raw` is the JSON text.
    Encoded {
        /// Text as supplied (or the scalar's JSON encoding).
        raw: String,
        /// Parsed value of `raw`.
        parsed: Value,
    },
    /// Text that does not parse as JSON.
    Text(String),
    /// A JSON object or array supplied as a value.
    Structured(Value),
}

impl Payload {
    /// Classifies a caller-supplied value. `null` and the empty string mean
    /// "no payload".
    #[must_use]
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::String(text) if text.is_empty() => None,
            Value::String(text) => Some(Self::from_text(text)),
            Value::Object(_) | Value::Array(_) => Some(Self::Structured(value)),
            scalar => Some(Self::Encoded {
                raw: scalar.to_string(),
                parsed: scalar,
            }),
        }
    }

    /// Classifies text by probing whether it parses as JSON.
    #[must_use]
    pub fn from_text(text: String) -> Self {
        match serde_json::from_str::<Value>(&text) {
            Ok(parsed) => Self::Encoded { raw: text, parsed },
            Err(_) => Self::Text(text),
        }
    }
}

/// Canonical, validated log record.
///
/// Only [`normalize`] builds values of this type, so the level is always a
/// known severity and the message is never empty. The timestamp is attached
/// later, when the event is rendered.
#[derive(Clone, Debug, PartialEq)]
pub struct LogEvent {
    level: Severity,
    message: String,
    operation: Option<String>,
    route: Option<String>,
    subject_id: Option<SubjectId>,
    data: Option<Payload>,
}

impl LogEvent {
    /// Severity of the event.
    #[must_use]
    pub const fn level(&self) -> Severity {
        self.level
    }

    /// Message text.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Operation label, if any.
    #[must_use]
    pub fn operation(&self) -> Option<&str> {
        self.operation.as_deref()
    }

    /// Route label, if any.
    #[must_use]
    pub fn route(&self) -> Option<&str> {
        self.route.as_deref()
    }

    /// Subject identifier, if any.
    #[must_use]
    pub const fn subject_id(&self) -> Option<&SubjectId> {
        self.subject_id.as_ref()
    }

    /// Classified payload, if any.
    #[must_use]
    pub const fn data(&self) -> Option<&Payload> {
        self.data.as_ref()
    }
}

/// Structured call shape: every field optional at the type level.
///
/// Deserialises from a JSON object such as
/// `{"level": "info", "message": "START", "operation": "import"}`. The subject
/// may be given as `subjectId`, `subject_id` or `insured_person`.
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize)]
pub struct EventFields {
    /// Level name.
    #[serde(default)]
    pub level: Option<String>,
    /// Message text.
    #[serde(default)]
    pub message: Option<String>,
    /// Operation label.
    #[serde(default)]
    pub operation: Option<String>,
    /// Route label.
    #[serde(default)]
    pub route: Option<String>,
    /// Subject identifier.
    #[serde(
        default,
        rename = "subjectId",
        alias = "subject_id",
        alias = "insured_person"
    )]
    pub subject_id: Option<SubjectId>,
    /// Payload, either JSON text or any JSON value.
    #[serde(default)]
    pub data: Option<Value>,
}

impl EventFields {
    /// Starts a record with the two required fields filled in.
    pub fn new(level: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: Some(level.into()),
            message: Some(message.into()),
            ..Self::default()
        }
    }
}

/// Positional call shape: `(level, message, subject?, operation?, route?, data?)`.
#[derive(Clone, Debug, PartialEq)]
pub struct PositionalCall {
    level: String,
    message: String,
    subject_id: Option<SubjectId>,
    operation: Option<String>,
    route: Option<String>,
    data: Option<Value>,
}

impl PositionalCall {
    /// Sets the subject identifier.
    pub fn subject(mut self, subject_id: impl Into<SubjectId>) -> Self {
        self.subject_id = Some(subject_id.into());
        self
    }

    /// Sets the operation label.
    pub fn operation(mut self, operation: impl Into<String>) -> Self {
        self.operation = Some(operation.into());
        self
    }

    /// Sets the route label.
    pub fn route(mut self, route: impl Into<String>) -> Self {
        self.route = Some(route.into());
        self
    }

    /// Attaches a payload. Strings are checked for JSON at normalization.
    pub fn data(mut self, data: impl Into<Value>) -> Self {
        self.data = Some(data.into());
        self
    }

    fn into_fields(self) -> EventFields {
        EventFields {
            level: Some(self.level),
            message: Some(self.message),
            operation: self.operation,
            route: self.route,
            subject_id: self.subject_id,
            data: self.data,
        }
    }
}

/// Either accepted call shape.
#[derive(Clone, Debug, PartialEq)]
pub enum LogCall {
    /// A single structured record.
    Structured(EventFields),
    /// Positional fields.
    Positional(PositionalCall),
}

impl LogCall {
    /// Starts a positional call.
    ///
    /// ```
    /// use logging::{LogCall, Severity, normalize};
    ///
    /// let event = normalize(LogCall::positional("info", "START").operation("import")).unwrap();
    /// assert_eq!(event.level(), Severity::Info);
    /// assert_eq!(event.operation(), Some("import"));
    /// ```
    pub fn positional(level: impl Into<String>, message: impl Into<String>) -> PositionalCall {
        PositionalCall {
            level: level.into(),
            message: message.into(),
            subject_id: None,
            operation: None,
            route: None,
            data: None,
        }
    }
}

impl From<EventFields> for LogCall {
    fn from(fields: EventFields) -> Self {
        Self::Structured(fields)
    }
}

impl From<PositionalCall> for LogCall {
    fn from(call: PositionalCall) -> Self {
        Self::Positional(call)
    }
}

impl From<Severity> for String {
    fn from(level: Severity) -> Self {
        level.name().to_owned()
    }
}

/// Reasons a call is rejected before dispatch.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum NormalizeError {
    /// No level was supplied.
    #[error("log event has no level")]
    MissingLevel,
    /// No message was supplied.
    #[error("log event has no message")]
    MissingMessage,
    /// The level is not in the severity table.
    #[error(transparent)]
    UnknownLevel(#[from] UnknownLevel),
}

/// Validates either call shape and produces the canonical event.
pub fn normalize(call: impl Into<LogCall>) -> Result<LogEvent, NormalizeError> {
    let fields = match call.into() {
        LogCall::Structured(fields) => fields,
        LogCall::Positional(call) => call.into_fields(),
    };

    let level = present(fields.level).ok_or(NormalizeError::MissingLevel)?;
    let message = present(fields.message).ok_or(NormalizeError::MissingMessage)?;
    let level = level.parse::<Severity>()?;

    Ok(LogEvent {
        level,
        message,
        operation: present(fields.operation),
        route: present(fields.route),
        subject_id: fields
            .subject_id
            .filter(|id| !matches!(id, SubjectId::Text(text) if text.is_empty())),
        data: fields.data.and_then(Payload::from_value),
    })
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.is_empty())
}
