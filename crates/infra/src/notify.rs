//! Default operator channel: structured log events.

use regbridge_core::{NotificationKind, OperatorNotification, OperatorNotifier};
use tracing::{error, warn};

/// Emits each notification as a `tracing` event.
///
/// Forwarding failures are logged at `error`, mapping attention states at
/// `warn`. Hosts wanting mail or chat delivery supply their own notifier.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl OperatorNotifier for TracingNotifier {
    fn notify(&self, notification: &OperatorNotification) {
        let event_id = notification.event.as_ref().map_or("", |e| e.event_id.as_str());

        match notification.kind {
            NotificationKind::ForwardingFailed => error!(
                kind = ?notification.kind,
                subject = %notification.subject,
                event_id,
                error = notification.error.as_deref().unwrap_or_default(),
                payload = notification.payload.as_deref().unwrap_or_default(),
                "{}",
                notification.message
            ),
            NotificationKind::MappingFieldsChanged | NotificationKind::MappingMissing => warn!(
                kind = ?notification.kind,
                subject = %notification.subject,
                event_id,
                "{}",
                notification.message
            ),
        }
    }
}
