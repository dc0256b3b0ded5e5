//! In-memory doubles for the core ports.
//!
//! Compiled for this crate's tests and for dependents enabling `test-utils`.

use std::sync::Mutex;

use async_trait::async_trait;
use regbridge_domain::{
    Event, EventDetail, EventType, RegBridgeError, RegistrationQuestions, Result,
};
use serde_json::{json, Map, Value};

use crate::notification::OperatorNotification;
use crate::ports::{EventClient, OperatorNotifier, RegistrationPayload};

/// Listing entry with the given id and type.
pub fn event(id: &str, event_type: EventType) -> Event {
    Event {
        id: id.to_string(),
        topic: format!("Event {id}"),
        start_time: None,
        created_at: None,
        join_url: None,
        event_type,
        extra: Map::new(),
    }
}

#[derive(Default)]
struct Calls {
    meeting_listings: usize,
    webinar_listings: usize,
    details: Vec<(EventType, String)>,
    questions: Vec<String>,
    meeting_registrations: Vec<(String, Value)>,
    webinar_registrations: Vec<(String, Value)>,
}

/// Scripted [`EventClient`] that records every call.
pub struct FakeEventClient {
    meetings: Result<Vec<Event>>,
    webinars: Result<Vec<Event>>,
    detail: Result<Value>,
    registration: Result<Value>,
    calls: Mutex<Calls>,
}

impl Default for FakeEventClient {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeEventClient {
    pub fn new() -> Self {
        Self {
            meetings: Ok(Vec::new()),
            webinars: Ok(Vec::new()),
            detail: Err(RegBridgeError::remote(404, None)),
            registration: Ok(json!({})),
            calls: Mutex::new(Calls::default()),
        }
    }

    pub fn with_meetings(mut self, meetings: Vec<Event>) -> Self {
        self.meetings = Ok(meetings);
        self
    }

    pub fn with_webinars(mut self, webinars: Vec<Event>) -> Self {
        self.webinars = Ok(webinars);
        self
    }

    pub fn with_meeting_listing_error(mut self, err: RegBridgeError) -> Self {
        self.meetings = Err(err);
        self
    }

    pub fn with_webinar_listing_error(mut self, err: RegBridgeError) -> Self {
        self.webinars = Err(err);
        self
    }

    /// Raw detail JSON returned for both meetings and webinars.
    pub fn with_detail(mut self, detail: Value) -> Self {
        self.detail = Ok(detail);
        self
    }

    pub fn with_registration_response(mut self, response: Value) -> Self {
        self.registration = Ok(response);
        self
    }

    pub fn with_registration_error(mut self, err: RegBridgeError) -> Self {
        self.registration = Err(err);
        self
    }

    pub fn meeting_listing_count(&self) -> usize {
        self.calls().meeting_listings
    }

    pub fn webinar_listing_count(&self) -> usize {
        self.calls().webinar_listings
    }

    pub fn detail_requests(&self) -> Vec<(EventType, String)> {
        self.calls().details.clone()
    }

    pub fn meeting_registrations(&self) -> Vec<(String, Value)> {
        self.calls().meeting_registrations.clone()
    }

    pub fn webinar_registration_count(&self) -> usize {
        self.calls().webinar_registrations.len()
    }

    /// Every call of any kind.
    pub fn total_calls(&self) -> usize {
        let calls = self.calls();
        calls.meeting_listings
            + calls.webinar_listings
            + calls.details.len()
            + calls.questions.len()
            + calls.meeting_registrations.len()
            + calls.webinar_registrations.len()
    }

    fn calls(&self) -> std::sync::MutexGuard<'_, Calls> {
        self.calls.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn detail(&self) -> Result<EventDetail> {
        let raw = self.detail.clone()?;
        serde_json::from_value(raw).map_err(|e| RegBridgeError::Internal(e.to_string()))
    }
}

#[async_trait]
impl EventClient for FakeEventClient {
    async fn list_upcoming_meetings(&self, limit: usize) -> Result<Vec<Event>> {
        self.calls().meeting_listings += 1;
        self.meetings.clone().map(|mut events| {
            events.truncate(limit);
            events
        })
    }

    async fn list_upcoming_webinars(&self, limit: usize) -> Result<Vec<Event>> {
        self.calls().webinar_listings += 1;
        self.webinars.clone().map(|mut events| {
            events.truncate(limit);
            events
        })
    }

    async fn get_meeting(&self, meeting_id: &str) -> Result<EventDetail> {
        self.calls().details.push((EventType::Meeting, meeting_id.to_string()));
        self.detail()
    }

    async fn get_webinar(&self, webinar_id: &str) -> Result<EventDetail> {
        self.calls().details.push((EventType::Webinar, webinar_id.to_string()));
        self.detail()
    }

    async fn get_meeting_questions(&self, meeting_id: &str) -> Result<RegistrationQuestions> {
        self.calls().questions.push(meeting_id.to_string());
        Ok(RegistrationQuestions::default())
    }

    async fn register_for_meeting(
        &self,
        meeting_id: &str,
        payload: &RegistrationPayload,
    ) -> Result<Value> {
        self.calls()
            .meeting_registrations
            .push((meeting_id.to_string(), Value::Object(payload.clone())));
        self.registration.clone()
    }

    async fn register_for_webinar(
        &self,
        webinar_id: &str,
        payload: &RegistrationPayload,
    ) -> Result<Value> {
        self.calls()
            .webinar_registrations
            .push((webinar_id.to_string(), Value::Object(payload.clone())));
        self.registration.clone()
    }
}

/// [`OperatorNotifier`] that keeps every notification in memory.
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<OperatorNotification>>,
}

impl RecordingNotifier {
    pub fn notifications(&self) -> Vec<OperatorNotification> {
        self.sent.lock().unwrap_or_else(std::sync::PoisonError::into_inner).clone()
    }
}

impl OperatorNotifier for RecordingNotifier {
    fn notify(&self, notification: &OperatorNotification) {
        self.sent
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(notification.clone());
    }
}
