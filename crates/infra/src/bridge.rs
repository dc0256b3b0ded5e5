//! Composition root wiring configuration into the core services.

use std::sync::Arc;

use regbridge_core::{
    EventSelection, EventSelectionService, MappingReconciler, MappingStatus, OperatorNotifier,
    PayloadBuilder, SubmissionForwarder,
};
use regbridge_domain::{
    Config, EventDetail, EventReference, IntegrationSettings, RegistrationResult, Result,
    Submission, SubmitterField,
};

use crate::notify::TracingNotifier;
use crate::zoom::{ZoomClient, ZoomEventsClient};

/// Zoom client plus the services a host page needs.
pub struct RegistrationBridge {
    client: ZoomClient,
    events: ZoomEventsClient,
    forwarder: SubmissionForwarder,
    reconciler: MappingReconciler,
    selection: EventSelectionService,
    listing_limit: usize,
}

impl RegistrationBridge {
    /// Build with the [`TracingNotifier`] as operator channel.
    ///
    /// # Errors
    /// `Credential` when a credential component is missing.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::with_notifier(config, Arc::new(TracingNotifier))
    }

    /// # Errors
    /// `Credential` when a credential component is missing.
    pub fn with_notifier(config: &Config, notifier: Arc<dyn OperatorNotifier>) -> Result<Self> {
        let client = ZoomClient::from_config(&config.zoom)?;
        let events = ZoomEventsClient::from_config(&config.zoom)?;
        Ok(Self::new(client, events, config, notifier))
    }

    pub fn new(
        client: ZoomClient,
        events: ZoomEventsClient,
        config: &Config,
        notifier: Arc<dyn OperatorNotifier>,
    ) -> Self {
        Self {
            client,
            events,
            forwarder: SubmissionForwarder::new(
                PayloadBuilder::new(config.payload.strategy),
                notifier.clone(),
            ),
            reconciler: MappingReconciler::new(notifier),
            selection: EventSelectionService::new(),
            listing_limit: config.zoom.effective_listing_limit(),
        }
    }

    pub fn client(&self) -> &ZoomClient {
        &self.client
    }

    /// Public Zoom Events API (sessions, speakers, sponsors).
    pub fn events(&self) -> &ZoomEventsClient {
        &self.events
    }

    /// Events for the editor's picker.
    pub async fn selectable_events(&self) -> EventSelection {
        self.selection.selectable_events(&self.client, self.listing_limit).await
    }

    /// Detail for the picked event.
    ///
    /// # Errors
    /// `RegistrationDisabled` for events without registration, otherwise client errors.
    pub async fn load_event(&self, event: &EventReference) -> Result<EventDetail> {
        self.selection.load_event(&self.client, event).await
    }

    /// Register one form submitter.
    pub async fn forward(
        &self,
        settings: &IntegrationSettings,
        submission: Submission,
    ) -> RegistrationResult {
        self.forwarder.forward_settings(settings, submission, &self.client).await
    }

    /// Reconcile the stored mapping after the page's form was published.
    pub fn after_publish(
        &self,
        page_title: &str,
        settings: &mut IntegrationSettings,
        current_fields: &[SubmitterField],
    ) -> MappingStatus {
        self.reconciler.after_publish(page_title, settings, current_fields)
    }
}
