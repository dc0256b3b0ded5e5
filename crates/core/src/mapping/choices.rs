//! Choice table and validation for the mapping editor.

use std::collections::BTreeMap;

use regbridge_domain::constants::MAPPING_PLACEHOLDER_LABEL;
use regbridge_domain::{
    required_field, FieldMapping, RegBridgeError, RequiredRegistrationField, Result,
    SubmitterField, REQUIRED_REGISTRATION_FIELDS,
};
use serde::Serialize;

/// One option in a mapping dropdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldChoice {
    pub value: String,
    pub label: String,
    pub selectable: bool,
}

impl FieldChoice {
    fn placeholder() -> Self {
        Self { value: String::new(), label: MAPPING_PLACEHOLDER_LABEL.to_string(), selectable: false }
    }

    fn from_field(field: &SubmitterField) -> Self {
        Self { value: field.clean_name.clone(), label: field.label.clone(), selectable: true }
    }
}

/// Placeholder followed by every submitter field that can feed `required`, in form order.
pub fn field_choices(
    required: &RequiredRegistrationField,
    submitter_fields: &[SubmitterField],
) -> Vec<FieldChoice> {
    std::iter::once(FieldChoice::placeholder())
        .chain(
            submitter_fields
                .iter()
                .filter(|field| required.value_kind.accepts(field.kind))
                .map(FieldChoice::from_field),
        )
        .collect()
}

/// One row of the mapping editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MappingFormRow {
    pub tag: &'static str,
    pub label: &'static str,
    pub required: bool,
    pub choices: Vec<FieldChoice>,
    /// Current clean_name, or empty when unset or no longer offered
    pub selected: String,
}

/// Rows for every catalog field, preselecting the stored mapping where it is still valid.
pub fn mapping_form(submitter_fields: &[SubmitterField], current: &FieldMapping) -> Vec<MappingFormRow> {
    REQUIRED_REGISTRATION_FIELDS
        .iter()
        .map(|required| {
            let choices = field_choices(required, submitter_fields);
            let selected = current
                .get(required.tag)
                .filter(|name| choices.iter().any(|c| c.selectable && c.value == *name))
                .unwrap_or_default()
                .to_string();

            MappingFormRow {
                tag: required.tag,
                label: required.display_name,
                required: required.required,
                choices,
                selected,
            }
        })
        .collect()
}

/// Check an editor's submitted mapping against the current form fields.
///
/// Every catalog tag appears in the result; tags the editor omitted are stored
/// unset.
///
/// # Errors
/// `InvalidInput` listing every problem found.
pub fn validate_mapping(
    submitted: &BTreeMap<String, String>,
    submitter_fields: &[SubmitterField],
) -> Result<FieldMapping> {
    let mut problems = Vec::new();

    for tag in submitted.keys() {
        if required_field(tag).is_none() {
            problems.push(format!("unknown registration field '{tag}'"));
        }
    }

    let mut mapping = FieldMapping::new();

    for required in &REQUIRED_REGISTRATION_FIELDS {
        let clean_name = submitted.get(required.tag).map(|s| s.trim()).unwrap_or_default();

        if clean_name.is_empty() {
            if required.required {
                problems.push(format!("'{}' must be mapped to a form field", required.display_name));
            }
            mapping.set(required.tag, "");
            continue;
        }

        match submitter_fields.iter().find(|field| field.clean_name == clean_name) {
            None => problems.push(format!(
                "'{}' refers to form field '{clean_name}', which does not exist",
                required.display_name
            )),
            Some(field) if !required.value_kind.accepts(field.kind) => problems.push(format!(
                "'{}' cannot be filled from '{}' ({} field)",
                required.display_name, field.label, field.kind
            )),
            Some(_) => {}
        }

        mapping.set(required.tag, clean_name);
    }

    if problems.is_empty() {
        Ok(mapping)
    } else {
        Err(RegBridgeError::InvalidInput(problems.join("; ")))
    }
}

#[cfg(test)]
mod tests {
    use regbridge_domain::SubmitterFieldKind;

    use super::*;

    fn fields() -> Vec<SubmitterField> {
        vec![
            SubmitterField::new("your_name", "Your name", SubmitterFieldKind::Singleline),
            SubmitterField::new("email_field", "Email", SubmitterFieldKind::Email),
            SubmitterField::new("bio", "Bio", SubmitterFieldKind::Multiline),
            SubmitterField::new("age", "Age", SubmitterFieldKind::Number),
            SubmitterField::new("surname", "Surname", SubmitterFieldKind::Singleline),
        ]
    }

    fn submitted(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect()
    }

    #[test]
    fn email_choices_only_offer_email_fields() {
        let email = required_field("email").unwrap();
        let choices = field_choices(email, &fields());

        assert_eq!(choices.len(), 2);
        assert_eq!(choices[0].label, MAPPING_PLACEHOLDER_LABEL);
        assert!(!choices[0].selectable);
        assert_eq!(choices[1].value, "email_field");
    }

    #[test]
    fn text_choices_keep_form_order() {
        let first_name = required_field("first_name").unwrap();
        let values: Vec<_> =
            field_choices(first_name, &fields()).into_iter().skip(1).map(|c| c.value).collect();

        assert_eq!(values, ["your_name", "bio", "surname"]);
    }

    #[test]
    fn form_preselects_valid_stored_values_only() {
        let current: FieldMapping =
            [("email", "email_field"), ("first_name", "age"), ("last_name", "gone")]
                .into_iter()
                .collect();

        let rows = mapping_form(&fields(), &current);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].selected, "email_field");
        assert_eq!(rows[1].selected, "");
        assert_eq!(rows[2].selected, "");
        assert_eq!(rows[1].label, "First Name");
    }

    #[test]
    fn valid_mapping_is_accepted() {
        let mapping = validate_mapping(
            &submitted(&[("email", "email_field"), ("first_name", "your_name"), ("last_name", "surname")]),
            &fields(),
        )
        .unwrap();

        assert_eq!(mapping.get("last_name"), Some("surname"));
        assert_eq!(mapping.mapped().count(), 3);
    }

    #[test]
    fn every_problem_is_reported() {
        let err = validate_mapping(
            &submitted(&[("email", "your_name"), ("first_name", "phone"), ("fax", "x")]),
            &fields(),
        )
        .unwrap_err();

        let RegBridgeError::InvalidInput(msg) = err else { panic!("expected InvalidInput") };
        assert!(msg.contains("unknown registration field 'fax'"));
        assert!(msg.contains("'Email' cannot be filled from 'Your name'"));
        assert!(msg.contains("form field 'phone'"));
        assert!(msg.contains("'Last Name' must be mapped"));
    }
}
