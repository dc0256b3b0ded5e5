//! Domain types and models

pub mod event;
pub mod fields;
pub mod mapping;

pub use event::{
    CustomQuestion, Event, EventDetail, EventReference, EventSettings, EventType,
    RegistrationQuestion, RegistrationQuestions, RegistrationResult,
};
pub use fields::{
    required_field, RequiredRegistrationField, RequiredValueKind, SubmitterField,
    SubmitterFieldKind, REQUIRED_REGISTRATION_FIELDS,
};
pub use mapping::{normalize_key, FieldMapping, IntegrationSettings, Submission};
