//! Public Zoom Events API (no authentication).

use std::time::Duration;

use regbridge_domain::{Result, ZoomConfig};
use reqwest::Method;
use serde_json::Value;
use tracing::instrument;

use crate::http::HttpClient;

/// Sessions, speakers and sponsors of a Zoom Events event.
#[derive(Clone)]
pub struct ZoomEventsClient {
    http: HttpClient,
    base_url: String,
}

impl ZoomEventsClient {
    pub fn new(http: HttpClient, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    /// Client for `events_api_base_url` with the configured request timeout.
    ///
    /// # Errors
    /// `Transport` when the HTTP client cannot be built.
    pub fn from_config(config: &ZoomConfig) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self::new(http, config.events_api_base_url.clone()))
    }

    #[instrument(skip(self))]
    pub async fn event_sessions(&self, event_id: &str) -> Result<Value> {
        self.fetch("sessions", event_id).await
    }

    #[instrument(skip(self))]
    pub async fn event_speakers(&self, event_id: &str) -> Result<Value> {
        self.fetch("speakers", event_id).await
    }

    #[instrument(skip(self))]
    pub async fn event_sponsors(&self, event_id: &str) -> Result<Value> {
        self.fetch("sponsors", event_id).await
    }

    async fn fetch(&self, resource: &str, event_id: &str) -> Result<Value> {
        let url = format!("{}/e/v/events/{resource}", self.base_url);
        let request = self.http.request(Method::GET, url).query(&[("eventId", event_id)]);
        self.http.send_json(request).await
    }
}
