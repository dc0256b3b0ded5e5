//! Mapping reconciliation after a form definition changes.
//!
//! When the page's form is edited and published, a stored mapping may point at
//! fields that no longer exist. Such a mapping is cleared outright; there is no
//! automatic repair.

use std::collections::HashSet;
use std::sync::Arc;

use regbridge_domain::{IntegrationSettings, SubmitterField};
use tracing::{info, instrument};

use crate::notification::OperatorNotification;
use crate::ports::OperatorNotifier;

/// Outcome of reconciling a page's stored mapping with its current fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MappingStatus {
    /// No event picked; nothing to check
    NotConfigured,
    /// Every referenced field still exists
    Ready,
    /// A referenced field disappeared and the mapping was cleared
    FieldsChanged,
    /// An event is picked but no mapping is stored
    MappingMissing,
}

impl MappingStatus {
    pub fn needs_attention(self) -> bool {
        matches!(self, Self::FieldsChanged | Self::MappingMissing)
    }
}

/// Reconcile `settings.mapping` against `current_fields`, clearing it when stale.
pub fn reconcile_mapping(
    settings: &mut IntegrationSettings,
    current_fields: &[SubmitterField],
) -> MappingStatus {
    if !settings.event.is_set() {
        return MappingStatus::NotConfigured;
    }

    if settings.mapping.is_empty() {
        return MappingStatus::MappingMissing;
    }

    let available: HashSet<&str> = current_fields.iter().map(|f| f.clean_name.as_str()).collect();
    let stale = settings.mapping.referenced_fields().any(|name| !available.contains(name));

    if stale {
        settings.mapping.clear();
        MappingStatus::FieldsChanged
    } else {
        MappingStatus::Ready
    }
}

/// Runs [`reconcile_mapping`] and tells the operator about pages that need attention.
pub struct MappingReconciler {
    notifier: Arc<dyn OperatorNotifier>,
}

impl MappingReconciler {
    pub fn new(notifier: Arc<dyn OperatorNotifier>) -> Self {
        Self { notifier }
    }

    #[instrument(skip(self, settings, current_fields), fields(event_id = %settings.event.event_id))]
    pub fn after_publish(
        &self,
        page_title: &str,
        settings: &mut IntegrationSettings,
        current_fields: &[SubmitterField],
    ) -> MappingStatus {
        let status = reconcile_mapping(settings, current_fields);

        match status {
            MappingStatus::FieldsChanged => {
                info!(page_title, "form fields changed; cleared zoom field mapping");
                self.notifier
                    .notify(&OperatorNotification::fields_changed(page_title, &settings.event));
            }
            MappingStatus::MappingMissing => {
                info!(page_title, "zoom event set without field mapping");
                self.notifier
                    .notify(&OperatorNotification::mapping_missing(page_title, &settings.event));
            }
            MappingStatus::NotConfigured | MappingStatus::Ready => {}
        }

        status
    }
}
