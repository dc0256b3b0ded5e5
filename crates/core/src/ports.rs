//! Port interfaces for the registration bridge
//!
//! These traits define the boundaries between core business logic
//! and infrastructure implementations.

use async_trait::async_trait;
use regbridge_domain::{
    Event, EventDetail, EventReference, EventType, RegistrationQuestions, Result,
};
use serde_json::{Map, Value};
use tracing::warn;

use crate::notification::OperatorNotification;

/// Payload posted to the registrant endpoints
pub type RegistrationPayload = Map<String, Value>;

/// Authenticated access to the vendor's meeting/webinar API.
///
/// Implementations perform no retries; every failure propagates.
#[async_trait]
pub trait EventClient: Send + Sync {
    /// Upcoming meetings, most recently created first, at most `limit`.
    async fn list_upcoming_meetings(&self, limit: usize) -> Result<Vec<Event>>;

    /// Upcoming webinars, most recently created first, at most `limit`.
    async fn list_upcoming_webinars(&self, limit: usize) -> Result<Vec<Event>>;

    /// Meetings followed by webinars.
    ///
    /// The webinar leg is best effort: accounts without a webinar plan answer
    /// that endpoint with an error, and the editor should still see meetings.
    async fn list_events(&self, limit: usize) -> Result<Vec<Event>> {
        let mut events = self.list_upcoming_meetings(limit).await?;

        match self.list_upcoming_webinars(limit).await {
            Ok(webinars) => events.extend(webinars),
            Err(err) => warn!(error = %err, "webinar listing failed; returning meetings only"),
        }

        Ok(events)
    }

    async fn get_meeting(&self, meeting_id: &str) -> Result<EventDetail>;

    async fn get_webinar(&self, webinar_id: &str) -> Result<EventDetail>;

    async fn get_meeting_questions(&self, meeting_id: &str) -> Result<RegistrationQuestions>;

    async fn register_for_meeting(
        &self,
        meeting_id: &str,
        payload: &RegistrationPayload,
    ) -> Result<Value>;

    async fn register_for_webinar(
        &self,
        webinar_id: &str,
        payload: &RegistrationPayload,
    ) -> Result<Value>;

    /// Fetch detail for whichever kind of event `event` points at.
    async fn get_event(&self, event: &EventReference) -> Result<EventDetail> {
        match event.event_type {
            EventType::Meeting => self.get_meeting(&event.event_id).await,
            EventType::Webinar => self.get_webinar(&event.event_id).await,
        }
    }

    /// Register against whichever kind of event `event` points at.
    async fn register(&self, event: &EventReference, payload: &RegistrationPayload) -> Result<Value> {
        match event.event_type {
            EventType::Meeting => self.register_for_meeting(&event.event_id, payload).await,
            EventType::Webinar => self.register_for_webinar(&event.event_id, payload).await,
        }
    }
}

/// Operator-facing diagnostics channel.
///
/// Fire and forget: implementations must not fail the caller.
pub trait OperatorNotifier: Send + Sync {
    fn notify(&self, notification: &OperatorNotification);
}
