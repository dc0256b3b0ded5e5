//! Editor-side event selection.

use regbridge_domain::constants::NO_EVENTS_MESSAGE;
use regbridge_domain::{Event, EventDetail, EventReference, RegBridgeError, Result};
use serde::Serialize;
use tracing::{debug, instrument, warn};

use crate::ports::EventClient;

/// What the event picker shows: events, or a message explaining why there are none.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EventSelection {
    pub events: Vec<Event>,
    pub error: Option<String>,
}

impl EventSelection {
    pub fn has_events(&self) -> bool {
        !self.events.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EventSelectionService;

impl EventSelectionService {
    pub fn new() -> Self {
        Self
    }

    /// Upcoming meetings then webinars, up to `limit` of each.
    ///
    /// Failures become editor-facing text in [`EventSelection::error`].
    #[instrument(skip(self, client))]
    pub async fn selectable_events(&self, client: &dyn EventClient, limit: usize) -> EventSelection {
        match client.list_events(limit).await {
            Ok(events) if events.is_empty() => {
                debug!("no upcoming zoom events");
                EventSelection { events, error: Some(NO_EVENTS_MESSAGE.to_string()) }
            }
            Ok(events) => EventSelection { events, error: None },
            Err(err) => {
                warn!(error = %err, "could not list zoom events");
                EventSelection { events: Vec::new(), error: Some(err.user_message()) }
            }
        }
    }

    /// Detail for the picked event, rejecting events that take no registrations.
    ///
    /// # Errors
    /// `RegistrationDisabled` carrying the event topic, or whatever the client returns.
    #[instrument(skip(self, client), fields(event_id = %event.event_id))]
    pub async fn load_event(
        &self,
        client: &dyn EventClient,
        event: &EventReference,
    ) -> Result<EventDetail> {
        let detail = client.get_event(event).await?;

        if !detail.registration_enabled() {
            return Err(RegBridgeError::RegistrationDisabled(detail.topic));
        }

        Ok(detail)
    }
}

#[cfg(test)]
mod tests {
    use regbridge_domain::EventType;
    use serde_json::json;

    use super::*;
    use crate::testing::{event, FakeEventClient};

    #[tokio::test]
    async fn lists_meetings_then_webinars() {
        let client = FakeEventClient::new()
            .with_meetings(vec![event("1", EventType::Meeting), event("2", EventType::Meeting)])
            .with_webinars(vec![event("9", EventType::Webinar)]);

        let selection = EventSelectionService::new().selectable_events(&client, 5).await;

        let ids: Vec<_> = selection.events.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["1", "2", "9"]);
        assert!(selection.error.is_none());
    }

    #[tokio::test]
    async fn webinar_failure_still_shows_meetings() {
        let client = FakeEventClient::new()
            .with_meetings(vec![event("1", EventType::Meeting)])
            .with_webinar_listing_error(RegBridgeError::remote(400, None));

        let selection = EventSelectionService::new().selectable_events(&client, 5).await;

        assert_eq!(selection.events.len(), 1);
        assert!(selection.error.is_none());
    }

    #[tokio::test]
    async fn empty_listing_carries_message() {
        let selection =
            EventSelectionService::new().selectable_events(&FakeEventClient::new(), 5).await;

        assert!(!selection.has_events());
        assert_eq!(selection.error.as_deref(), Some(NO_EVENTS_MESSAGE));
    }

    #[tokio::test]
    async fn listing_failure_becomes_user_message() {
        let client = FakeEventClient::new().with_meeting_listing_error(RegBridgeError::remote(
            401,
            Some(r#"{"code":124,"message":"Invalid access token."}"#.to_string()),
        ));

        let selection = EventSelectionService::new().selectable_events(&client, 5).await;

        let error = selection.error.unwrap();
        assert!(error.starts_with("Error obtaining Zoom events."));
        assert!(error.ends_with("Specific Error: Invalid access token."));
    }

    #[tokio::test]
    async fn registration_disabled_events_are_rejected() {
        let client = FakeEventClient::new().with_detail(json!({
            "id": 123,
            "topic": "Town hall",
            "settings": {"approval_type": 2}
        }));

        let err = EventSelectionService::new()
            .load_event(&client, &EventReference::new("123", EventType::Meeting))
            .await
            .unwrap_err();

        assert_eq!(err, RegBridgeError::RegistrationDisabled("Town hall".to_string()));
    }

    #[tokio::test]
    async fn loads_webinar_detail() {
        let client = FakeEventClient::new().with_detail(json!({
            "id": "88",
            "topic": "Deep dive",
            "settings": {"approval_type": 0}
        }));

        let detail = EventSelectionService::new()
            .load_event(&client, &EventReference::new("88", EventType::Webinar))
            .await
            .unwrap();

        assert_eq!(detail.topic, "Deep dive");
        assert_eq!(client.detail_requests(), vec![(EventType::Webinar, "88".to_string())]);
    }
}
