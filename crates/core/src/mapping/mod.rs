//! Field mapping: editor choices and payload construction

pub mod choices;
pub mod payload;

pub use choices::{field_choices, mapping_form, validate_mapping, FieldChoice, MappingFormRow};
pub use payload::{build_registration_payload, PayloadBuilder};
