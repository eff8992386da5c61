//! The event record carried by the stream, and its decoder.
//!
//! Inbound frames look like:
//!
//! ```json
//! { "eventDate": "2024-01-01T00:00:00Z", "message": "deploy finished" }
//! ```
//!
//! Neither field is validated beyond its JSON type. Missing fields decode
//! to `None`; unknown fields are ignored.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DecodeError;

/// Source-provided point in time attached to an [`Event`].
///
/// Producers disagree on how to encode dates: JavaScript and Jackson emit
/// epoch milliseconds, most others emit RFC 3339 strings. Anything else is
/// kept as the raw string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EventDate {
    /// RFC 3339 timestamp, e.g. `"2024-01-01T00:00:00Z"`.
    Timestamp(DateTime<Utc>),
    /// Milliseconds since the Unix epoch.
    EpochMillis(serde_json::Number),
    /// Any other string, kept verbatim.
    Text(String),
}

impl EventDate {
    /// Resolves the date to a UTC timestamp when the encoding allows it.
    #[must_use]
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Timestamp(ts) => Some(*ts),
            Self::EpochMillis(n) => n.as_i64().and_then(DateTime::from_timestamp_millis),
            Self::Text(s) => DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|ts| ts.with_timezone(&Utc)),
        }
    }
}

impl fmt::Display for EventDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timestamp(ts) => write!(f, "{}", ts.to_rfc3339()),
            Self::EpochMillis(n) => match self.to_datetime() {
                Some(ts) => write!(f, "{}", ts.to_rfc3339()),
                None => write!(f, "{n}"),
            },
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<DateTime<Utc>> for EventDate {
    fn from(ts: DateTime<Utc>) -> Self {
        Self::Timestamp(ts)
    }
}

/// A timestamped message received from the stream.
///
/// Has no identity: two events with equal fields are indistinguishable,
/// and the display list never deduplicates them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// When the event happened, as reported by the producer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_date: Option<EventDate>,
    /// Human-readable event text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Event {
    /// Creates an event with both fields present.
    #[must_use]
    pub fn new(event_date: impl Into<EventDate>, message: impl Into<String>) -> Self {
        Self {
            event_date: Some(event_date.into()),
            message: Some(message.into()),
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.event_date {
            Some(date) => write!(f, "[{date}]")?,
            None => f.write_str("[-]")?,
        }
        match &self.message {
            Some(message) => write!(f, " {message}"),
            None => f.write_str(" <no message>"),
        }
    }
}

/// Decodes one inbound text frame into an [`Event`].
///
/// # Errors
///
/// - [`DecodeError::Malformed`] if `text` is not valid JSON.
/// - [`DecodeError::Shape`] if it is valid JSON but not an object, or a
///   known field has the wrong JSON type.
pub fn decode_event(text: &str) -> Result<Event, DecodeError> {
    let value: serde_json::Value = serde_json::from_str(text).map_err(DecodeError::from_json)?;
    if !value.is_object() {
        return Err(DecodeError::Shape(serde::de::Error::custom(format!(
            "expected a JSON object, found {}",
            json_kind(&value)
        ))));
    }
    serde_json::from_value(value).map_err(DecodeError::Shape)
}

/// Names the JSON type of `value` for error messages.
const fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        let Some(ts) = Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).single() else {
            panic!("invalid test date");
        };
        ts
    }

    #[test]
    fn decodes_rfc3339_event() {
        let Ok(event) = decode_event(r#"{"eventDate":"2024-01-01T00:00:00Z","message":"A"}"#)
        else {
            panic!("expected event to decode");
        };
        assert_eq!(event, Event::new(utc(2024, 1, 1), "A"));
    }

    #[test]
    fn decodes_epoch_millis() {
        let Ok(event) = decode_event(r#"{"eventDate":1704067200000,"message":"A"}"#) else {
            panic!("expected event to decode");
        };
        let Some(date) = event.event_date else {
            panic!("expected a date");
        };
        assert!(matches!(date, EventDate::EpochMillis(_)));
        assert_eq!(date.to_datetime(), Some(utc(2024, 1, 1)));
    }

    #[test]
    fn keeps_unparseable_date_text() {
        let Ok(event) = decode_event(r#"{"eventDate":"yesterday","message":"A"}"#) else {
            panic!("expected event to decode");
        };
        assert_eq!(event.event_date, Some(EventDate::Text("yesterday".to_string())));
        assert_eq!(event.event_date.and_then(|d| d.to_datetime()), None);
    }

    #[test]
    fn missing_message_is_tolerated() {
        let Ok(event) = decode_event(r#"{"eventDate":"2024-01-01T00:00:00Z"}"#) else {
            panic!("expected event to decode");
        };
        assert_eq!(event.message, None);
        assert!(event.event_date.is_some());
    }

    #[test]
    fn null_fields_decode_as_absent() {
        let Ok(event) = decode_event(r#"{"eventDate":null,"message":null}"#) else {
            panic!("expected event to decode");
        };
        assert_eq!(event, Event::default());
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let Ok(event) = decode_event(r#"{"message":"A","severity":"high"}"#) else {
            panic!("expected event to decode");
        };
        assert_eq!(event.message.as_deref(), Some("A"));
    }

    #[test]
    fn non_json_is_malformed() {
        let result = decode_event("not json");
        assert!(matches!(result, Err(DecodeError::Malformed(_))));
    }

    #[test]
    fn non_object_json_is_shape_error() {
        for text in [r#""not json""#, "42", "[1,2]", "null"] {
            let result = decode_event(text);
            assert!(
                matches!(result, Err(DecodeError::Shape(_))),
                "{text} should be a shape error"
            );
        }
    }

    #[test]
    fn wrong_field_type_is_shape_error() {
        let result = decode_event(r#"{"eventDate":"2024-01-01T00:00:00Z","message":5}"#);
        assert!(matches!(result, Err(DecodeError::Shape(_))));
    }

    #[test]
    fn serializes_back_to_wire_shape() {
        let event = Event::new(utc(2024, 1, 2), "B");
        let json = serde_json::to_string(&event).unwrap_or_default();
        assert_eq!(json, r#"{"eventDate":"2024-01-02T00:00:00Z","message":"B"}"#);
    }

    #[test]
    fn display_renders_date_and_message() {
        let event = Event::new(utc(2024, 1, 1), "A");
        assert_eq!(event.to_string(), "[2024-01-01T00:00:00+00:00] A");
        assert_eq!(Event::default().to_string(), "[-] <no message>");
    }
}
