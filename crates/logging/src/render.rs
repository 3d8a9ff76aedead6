//! crates/logging/src/render.rs
//! Text and structured (JSON) renderings of a [`LogEvent`].
//!
//! Both renderers receive the timestamp already formatted; neither reads the
//! clock nor applies colour.

use std::fmt::Write as _;

use serde::Serialize;
use serde_json::Value;

use crate::event::{LogEvent, Payload, SubjectId};
use crate::levels::Severity;

/// Separator placed between the fields of a text line.
pub const SEPARATOR: &str = " - ";

/// Renders the human-readable line.
///
/// Layout: `<timestamp> - <app> - [<level>] - <subject - ><operation - ><route - ><message>`
/// followed by the payload suffix. JSON payloads are appended inline with a
/// trailing separator; anything else goes on the following lines as
/// tab-indented JSON.
#[derive(Clone, Debug)]
pub struct TextRenderer {
    app_name: String,
}

impl TextRenderer {
    /// Creates a renderer labelling lines with `app_name`.
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
        }
    }

    /// Renders `event` without a trailing newline.
    #[must_use]
    pub fn render(&self, event: &LogEvent, timestamp: &str) -> String {
        let mut line = String::with_capacity(64 + event.message().len());
        let _ = write!(
            line,
            "{timestamp}{SEPARATOR}{}{SEPARATOR}[{}]{SEPARATOR}",
            self.app_name,
            event.level()
        );

        if let Some(subject) = event.subject_id() {
            let _ = write!(line, "{subject}{SEPARATOR}");
        }
        for label in [event.operation(), event.route()].into_iter().flatten() {
            line.push_str(label);
            line.push_str(SEPARATOR);
        }
        line.push_str(event.message());

        match event.data() {
            Some(Payload::Encoded { raw, .. }) => {
                line.push_str(raw);
                line.push_str(SEPARATOR);
            }
            Some(Payload::Text(text)) => {
                line.push('\n');
                line.push_str(&serde_json::to_string(text).unwrap_or_else(|_| text.clone()));
            }
            Some(Payload::Structured(value)) => {
                line.push('\n');
                line.push_str(&pretty(value));
            }
            None => {}
        }

        line
    }
}

fn pretty(value: &Value) -> String {
    let mut buffer = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"\t");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    if value.serialize(&mut serializer).is_err() {
        return value.to_string();
    }
    String::from_utf8(buffer).unwrap_or_else(|_| value.to_string())
}

/// Renders one compact JSON object per event.
#[derive(Clone, Debug)]
pub struct StructuredRenderer {
    label: String,
}

#[derive(Serialize)]
struct StructuredLine<'a> {
    timestamp: &'a str,
    level: Severity,
    label: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    operation: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    route: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    insured_person: Option<&'a SubjectId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<DataField<'a>>,
    message: &'a str,
}

#[derive(Serialize)]
#[serde(untagged)]
enum DataField<'a> {
    Value(&'a Value),
    Text(&'a str),
}

impl StructuredRenderer {
    /// Creates a renderer whose `label` key carries `label`.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }

    /// Renders `event` as a single-line JSON object.
    pub fn render(&self, event: &LogEvent, timestamp: &str) -> Result<String, serde_json::Error> {
        let data = event.data().map(|payload| match payload {
            Payload::Encoded { parsed, .. } => DataField::Value(parsed),
            Payload::Structured(value) => DataField::Value(value),
            Payload::Text(text) => DataField::Text(text),
        });

        let line = StructuredLine {
            timestamp,
            level: event.level(),
            label: &self.label,
            operation: event.operation(),
            route: event.route(),
            insured_person: event.subject_id(),
            data,
            message: event.message(),
        };
        serde_json::to_string(&line)
    }
}
