//! Registration fields required by Zoom and the form fields a page offers.

use serde::{Deserialize, Serialize};

use crate::impl_wire_name_conversions;

/// Value kind of a required registration field.
///
/// `Radio` is the single-choice kind and `Checkboxes` the multi-choice kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequiredValueKind {
    Email,
    Text,
    LongText,
    Number,
    Url,
    Radio,
    Dropdown,
    Checkboxes,
    Date,
    Birthday,
}

impl_wire_name_conversions!(RequiredValueKind {
    Email => "email",
    Text => "text",
    LongText => "long_text",
    Number => "number",
    Url => "url",
    Radio => "radio",
    Dropdown => "dropdown",
    Checkboxes => "checkboxes",
    Date => "date",
    Birthday => "birthday",
});

impl RequiredValueKind {
    /// Which submitter field kinds may feed a required field of this kind.
    pub fn compatible_kinds(self) -> &'static [SubmitterFieldKind] {
        use SubmitterFieldKind as K;

        match self {
            Self::Email => &[K::Email],
            Self::Number => &[K::Number],
            Self::Url => &[K::Url],
            Self::Radio => &[K::Radio],
            Self::Dropdown => &[K::Dropdown],
            Self::Checkboxes => &[K::Checkboxes],
            Self::Date | Self::Birthday => &[K::Date],
            Self::Text | Self::LongText => &[K::Singleline, K::Multiline],
        }
    }

    pub fn accepts(self, kind: SubmitterFieldKind) -> bool {
        self.compatible_kinds().contains(&kind)
    }
}

/// Field type of a form-builder field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmitterFieldKind {
    Singleline,
    Multiline,
    Email,
    Number,
    Url,
    Radio,
    Dropdown,
    Checkboxes,
    Date,
    Birthday,
    /// Any form-builder type outside the vocabulary above; never mappable.
    #[serde(other)]
    Unsupported,
}

impl_wire_name_conversions!(SubmitterFieldKind {
    Singleline => "singleline",
    Multiline => "multiline",
    Email => "email",
    Number => "number",
    Url => "url",
    Radio => "radio",
    Dropdown => "dropdown",
    Checkboxes => "checkboxes",
    Date => "date",
    Birthday => "birthday",
    Unsupported => "unsupported",
});

/// A vendor-mandated registration input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RequiredRegistrationField {
    pub tag: &'static str,
    pub display_name: &'static str,
    pub value_kind: RequiredValueKind,
    pub required: bool,
}

/// Fixed catalog of fields needed to register someone for a Zoom event.
pub const REQUIRED_REGISTRATION_FIELDS: [RequiredRegistrationField; 3] = [
    RequiredRegistrationField {
        tag: "email",
        display_name: "Email",
        value_kind: RequiredValueKind::Email,
        required: true,
    },
    RequiredRegistrationField {
        tag: "first_name",
        display_name: "First Name",
        value_kind: RequiredValueKind::Text,
        required: true,
    },
    RequiredRegistrationField {
        tag: "last_name",
        display_name: "Last Name",
        value_kind: RequiredValueKind::Text,
        required: true,
    },
];

/// Look up a catalog entry by tag.
pub fn required_field(tag: &str) -> Option<&'static RequiredRegistrationField> {
    REQUIRED_REGISTRATION_FIELDS.iter().find(|field| field.tag == tag)
}

/// One answer field of the page's own form, defined by the form builder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitterField {
    pub clean_name: String,
    pub label: String,
    #[serde(rename = "field_type")]
    pub kind: SubmitterFieldKind,
}

impl SubmitterField {
    pub fn new(
        clean_name: impl Into<String>,
        label: impl Into<String>,
        kind: SubmitterFieldKind,
    ) -> Self {
        Self { clean_name: clean_name.into(), label: label.into(), kind }
    }
}
