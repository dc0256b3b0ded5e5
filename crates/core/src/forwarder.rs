//! Submission forwarding
//!
//! Registers a form submitter with the configured Zoom event. Forwarding runs
//! after the host has already accepted the submission, so nothing here is
//! allowed to fail the caller: every error ends in a single operator
//! notification and a `success = false` result.

use std::sync::Arc;

use regbridge_domain::{
    EventReference, FieldMapping, IntegrationSettings, RegistrationResult, Submission,
};
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::mapping::PayloadBuilder;
use crate::notification::OperatorNotification;
use crate::ports::{EventClient, OperatorNotifier};

/// Stateless forwarder; the event, mapping and client are supplied per call.
pub struct SubmissionForwarder {
    builder: PayloadBuilder,
    notifier: Arc<dyn OperatorNotifier>,
}

impl SubmissionForwarder {
    pub fn new(builder: PayloadBuilder, notifier: Arc<dyn OperatorNotifier>) -> Self {
        Self { builder, notifier }
    }

    /// Register the submitter for `event` using `mapping`.
    ///
    /// Returns `success = false` without touching `client` when no event is
    /// picked or no mapping is stored.
    #[instrument(
        skip(self, mapping, submission, client),
        fields(event_id = %event.event_id, event_type = %event.event_type)
    )]
    pub async fn forward(
        &self,
        event: &EventReference,
        mapping: &FieldMapping,
        submission: Submission,
        client: &dyn EventClient,
    ) -> RegistrationResult {
        if !event.is_set() || mapping.is_empty() {
            debug!("zoom integration not configured; skipping registration");
            return RegistrationResult::failed();
        }

        let payload = match self.builder.build(mapping, &submission) {
            Ok(payload) => payload,
            Err(err) => {
                let rendered = self.builder.render(mapping, &submission);
                warn!(error = %err, "could not build registration payload");
                self.notifier.notify(&OperatorNotification::forwarding_failed(
                    &err,
                    Some(rendered),
                    event,
                ));
                return RegistrationResult::failed();
            }
        };

        match client.register(event, &payload).await {
            Ok(response) => {
                info!("registered submitter for zoom event");
                RegistrationResult::registered(response)
            }
            Err(err) => {
                warn!(error = %err, "zoom registration failed");
                self.notifier.notify(&OperatorNotification::forwarding_failed(
                    &err,
                    Some(Value::Object(payload).to_string()),
                    event,
                ));
                RegistrationResult::failed()
            }
        }
    }

    /// [`forward`](Self::forward) for settings loaded from a page.
    pub async fn forward_settings(
        &self,
        settings: &IntegrationSettings,
        submission: Submission,
        client: &dyn EventClient,
    ) -> RegistrationResult {
        self.forward(&settings.event, &settings.mapping, submission, client).await
    }
}
