//! Zoom event types: stored references, listing entries and details.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use crate::constants::APPROVAL_TYPE_NO_REGISTRATION;
use crate::errors::{RegBridgeError, Result};
use crate::impl_wire_name_conversions;

/// Kind of Zoom event a page registers people for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    #[default]
    Meeting,
    Webinar,
}

impl_wire_name_conversions!(EventType {
    Meeting => "meeting",
    Webinar => "webinar",
});

/// The event chosen by the editor, as stored on the form page.
///
/// Replaced wholesale when the editor picks a different event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventReference {
    pub event_id: String,
    pub event_type: EventType,
    pub event_topic: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct StoredEventReference {
    #[serde(default, deserialize_with = "deserialize_id")]
    event_id: String,
    #[serde(default)]
    event_type: Option<String>,
    #[serde(default)]
    event_topic: Option<String>,
}

impl EventReference {
    pub fn new(event_id: impl Into<String>, event_type: EventType) -> Self {
        Self { event_id: event_id.into(), event_type, event_topic: None }
    }

    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.event_topic = Some(topic.into());
        self
    }

    /// Parse the stored `zoom_event` text.
    ///
    /// Blank text and missing keys produce an empty reference. An unknown
    /// event type is only an error when an event id is actually set.
    pub fn from_stored(text: Option<&str>) -> Result<Self> {
        let text = match text.map(str::trim) {
            Some(t) if !t.is_empty() => t,
            _ => return Ok(Self::default()),
        };

        let stored: Option<StoredEventReference> = serde_json::from_str(text)
            .map_err(|e| RegBridgeError::InvalidInput(format!("Invalid stored event: {e}")))?;
        let stored = stored.unwrap_or_default();

        let event_type = match stored.event_type.as_deref().map(str::trim) {
            None | Some("") => EventType::default(),
            Some(raw) => match raw.parse::<EventType>() {
                Ok(kind) => kind,
                Err(_) if stored.event_id.is_empty() => EventType::default(),
                Err(e) => return Err(RegBridgeError::InvalidInput(e)),
            },
        };

        Ok(Self {
            event_id: stored.event_id,
            event_type,
            event_topic: stored.event_topic.filter(|t| !t.is_empty()),
        })
    }

    /// Serialize to the stored `zoom_event` text, always writing all keys.
    pub fn to_stored(&self) -> String {
        serde_json::json!({
            "event_id": self.event_id,
            "event_type": if self.event_id.is_empty() { String::new() } else { self.event_type.to_string() },
            "event_topic": self.event_topic.clone().unwrap_or_default(),
        })
        .to_string()
    }

    /// `true` when an event has been picked.
    pub fn is_set(&self) -> bool {
        !self.event_id.trim().is_empty()
    }
}

/// One meeting or webinar from the upcoming listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub topic: String,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub join_url: Option<String>,
    /// Set by the client from the endpoint the event was listed by.
    #[serde(default)]
    pub event_type: EventType,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Event {
    /// Creation time, if the vendor sent a parsable RFC 3339 timestamp.
    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        let raw = self.created_at.as_deref()?;
        match DateTime::parse_from_rfc3339(raw) {
            Ok(ts) => Some(ts.with_timezone(&Utc)),
            Err(e) => {
                warn!(event_id = %self.id, created_at = raw, error = %e, "unparsable created_at");
                None
            }
        }
    }

    /// Reference suitable for storing on a page.
    pub fn reference(&self) -> EventReference {
        EventReference {
            event_id: self.id.clone(),
            event_type: self.event_type,
            event_topic: Some(self.topic.clone()).filter(|t| !t.is_empty()),
        }
    }
}

/// Nested `settings` object of a meeting/webinar detail
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventSettings {
    #[serde(default)]
    pub approval_type: Option<u8>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Full meeting or webinar detail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventDetail {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub topic: String,
    #[serde(default)]
    pub settings: EventSettings,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl EventDetail {
    /// Zoom reports `approval_type == 2` for events without registration.
    pub fn registration_enabled(&self) -> bool {
        self.settings.approval_type != Some(APPROVAL_TYPE_NO_REGISTRATION)
    }
}

/// Standard question of the registrant form configured on Zoom
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationQuestion {
    pub field_name: String,
    #[serde(default)]
    pub required: bool,
}

/// Host-defined custom question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomQuestion {
    pub title: String,
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub answers: Vec<String>,
}

/// Response of `GET /meetings/{id}/registrants/questions`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationQuestions {
    #[serde(default)]
    pub questions: Vec<RegistrationQuestion>,
    #[serde(default)]
    pub custom_questions: Vec<CustomQuestion>,
}

/// Outcome of forwarding one submission. Never persisted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegistrationResult {
    pub success: bool,
    pub response: Option<Value>,
}

impl RegistrationResult {
    pub fn registered(response: Value) -> Self {
        Self { success: true, response: Some(response) }
    }

    pub fn failed() -> Self {
        Self::default()
    }
}

/// Zoom ids are numeric in listings but strings elsewhere; accept both.
pub(crate) fn deserialize_id<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Null => Ok(String::new()),
        other => Err(serde::de::Error::custom(format!("unexpected id value: {other}"))),
    }
}
