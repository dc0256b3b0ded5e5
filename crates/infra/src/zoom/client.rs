//! Zoom REST client implementing the core [`EventClient`] port.

use std::cmp::Reverse;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use regbridge_core::{EventClient, RegistrationPayload};
use regbridge_domain::{
    Event, EventDetail, EventType, RegistrationQuestions, Result, ZoomConfig,
};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, instrument};

use super::auth::{token_provider_for, AccessTokenProvider};
use super::types::{MeetingList, WebinarList};
use crate::http::HttpClient;

/// Authenticated client for `https://api.zoom.us/v2`.
///
/// Performs no retries; every non-2xx answer becomes `Remote` and every
/// connectivity failure `Transport`.
#[derive(Clone)]
pub struct ZoomClient {
    http: HttpClient,
    base_url: String,
    tokens: Arc<dyn AccessTokenProvider>,
}

impl ZoomClient {
    pub fn new(
        http: HttpClient,
        base_url: impl Into<String>,
        tokens: Arc<dyn AccessTokenProvider>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url, tokens }
    }

    /// Build the HTTP client and token provider from configuration.
    ///
    /// # Errors
    /// `Credential` when a credential component is missing.
    pub fn from_config(config: &ZoomConfig) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        let tokens = token_provider_for(&config.credentials, http.clone(), &config.token_url)?;

        Ok(Self::new(http, config.api_base_url.clone(), tokens))
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn authorized(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let token = self.tokens.access_token().await?;
        Ok(self.http.request(method, self.url(path)).bearer_auth(token))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T> {
        let request = self.authorized(Method::GET, path).await?.query(query);
        self.http.send_json(request).await
    }

    async fn post(&self, path: &str, payload: &RegistrationPayload) -> Result<Value> {
        let request = self
            .authorized(Method::POST, path)
            .await?
            .header(reqwest::header::ACCEPT, "application/json")
            .json(payload);
        self.http.send_json(request).await
    }
}

/// Most recently created first, at most `limit`, tagged with `event_type`.
fn newest_first(mut events: Vec<Event>, limit: usize, event_type: EventType) -> Vec<Event> {
    events.sort_by_cached_key(|event| Reverse(event.created_at_utc()));
    events.truncate(limit);

    for event in &mut events {
        event.event_type = event_type;
    }

    events
}

#[async_trait]
impl EventClient for ZoomClient {
    #[instrument(skip(self))]
    async fn list_upcoming_meetings(&self, limit: usize) -> Result<Vec<Event>> {
        let list: MeetingList =
            self.get("/users/me/meetings", &[("type", "upcoming_meetings")]).await?;
        debug!(received = list.meetings.len(), "listed zoom meetings");

        Ok(newest_first(list.meetings, limit, EventType::Meeting))
    }

    #[instrument(skip(self))]
    async fn list_upcoming_webinars(&self, limit: usize) -> Result<Vec<Event>> {
        let list: WebinarList = self.get("/users/me/webinars", &[("type", "upcoming")]).await?;
        debug!(received = list.webinars.len(), "listed zoom webinars");

        Ok(newest_first(list.webinars, limit, EventType::Webinar))
    }

    #[instrument(skip(self))]
    async fn get_meeting(&self, meeting_id: &str) -> Result<EventDetail> {
        self.get(&format!("/meetings/{meeting_id}"), &[]).await
    }

    #[instrument(skip(self))]
    async fn get_webinar(&self, webinar_id: &str) -> Result<EventDetail> {
        self.get(&format!("/webinars/{webinar_id}"), &[]).await
    }

    #[instrument(skip(self))]
    async fn get_meeting_questions(&self, meeting_id: &str) -> Result<RegistrationQuestions> {
        self.get(&format!("/meetings/{meeting_id}/registrants/questions"), &[]).await
    }

    #[instrument(skip(self, payload))]
    async fn register_for_meeting(
        &self,
        meeting_id: &str,
        payload: &RegistrationPayload,
    ) -> Result<Value> {
        let response = self.post(&format!("/meetings/{meeting_id}/registrants"), payload).await?;
        info!("added zoom meeting registrant");
        Ok(response)
    }

    #[instrument(skip(self, payload))]
    async fn register_for_webinar(
        &self,
        webinar_id: &str,
        payload: &RegistrationPayload,
    ) -> Result<Value> {
        let response = self.post(&format!("/webinars/{webinar_id}/registrants"), payload).await?;
        info!("added zoom webinar registrant");
        Ok(response)
    }
}
