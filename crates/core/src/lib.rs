//! # RegBridge Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Port interfaces (traits) for the Zoom API and the operator channel
//! - Field mapping: editor choice table, validation, payload construction
//! - Services: submission forwarding, mapping reconciliation, event selection
//!
//! ## Architecture Principles
//! - Only depends on `regbridge-domain`
//! - No HTTP or persistence code
//! - All external dependencies via traits
//! - Pure, testable business logic

pub mod forwarder;
pub mod mapping;
pub mod notification;
pub mod ports;
pub mod reconcile;
pub mod selection;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use forwarder::SubmissionForwarder;
pub use mapping::{
    build_registration_payload, field_choices, mapping_form, validate_mapping, FieldChoice,
    MappingFormRow, PayloadBuilder,
};
pub use notification::{NotificationKind, OperatorNotification};
pub use ports::{EventClient, OperatorNotifier, RegistrationPayload};
pub use reconcile::{reconcile_mapping, MappingReconciler, MappingStatus};
pub use selection::{EventSelection, EventSelectionService};
