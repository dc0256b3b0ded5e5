//! Operator notifications raised by the forwarder and the mapping reconciler.

use std::fmt;

use regbridge_domain::EventReference;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// A submission could not be forwarded to Zoom
    ForwardingFailed,
    /// Form fields changed and the stored mapping was cleared
    MappingFieldsChanged,
    /// An event is set but no mapping exists
    MappingMissing,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperatorNotification {
    pub kind: NotificationKind,
    pub subject: String,
    pub message: String,
    pub event: Option<EventReference>,
    /// Rendered-but-unsent registration payload
    pub payload: Option<String>,
    pub error: Option<String>,
}

impl OperatorNotification {
    pub fn forwarding_failed(
        error: impl fmt::Display,
        payload: Option<String>,
        event: &EventReference,
    ) -> Self {
        let error = error.to_string();
        let event_data = serde_json::to_string(event).unwrap_or_default();
        let message = format!(
            "Error \n {error}\n  Rendered \n {}\n Zoom Form Data\n {event_data}",
            payload.as_deref().unwrap_or("None"),
        );

        Self {
            kind: NotificationKind::ForwardingFailed,
            subject: "Error adding user to zoom event".to_string(),
            message,
            event: Some(event.clone()),
            payload,
            error: Some(error),
        }
    }

    pub fn fields_changed(page_title: &str, event: &EventReference) -> Self {
        Self {
            kind: NotificationKind::MappingFieldsChanged,
            subject: "Zoom integration fields need updating".to_string(),
            message: format!(
                "Form fields were changed for page '{page_title}'. Please update Zoom integration \
                 fields as well."
            ),
            event: Some(event.clone()),
            payload: None,
            error: None,
        }
    }

    pub fn mapping_missing(page_title: &str, event: &EventReference) -> Self {
        Self {
            kind: NotificationKind::MappingMissing,
            subject: "Zoom integration fields not set up".to_string(),
            message: format!(
                "A zoom event is set for the page '{page_title}', but Zoom integration fields \
                 have not been set up. Please set up zoom integration fields as well"
            ),
            event: Some(event.clone()),
            payload: None,
            error: None,
        }
    }
}
