//! Field mapping, submissions and the page-side integration settings.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use super::event::EventReference;
use crate::errors::Result;

/// Required-field tag → submitter field clean_name (empty when unset).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldMapping(BTreeMap<String, String>);

impl FieldMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the stored `zoom_reg_fields_mapping` text.
    ///
    /// Unparsable text counts as "no mapping" so the page falls back to the
    /// needs-attention state instead of failing to load.
    pub fn from_stored(text: Option<&str>) -> Self {
        let Some(text) = text.map(str::trim).filter(|t| !t.is_empty()) else {
            return Self::default();
        };

        match serde_json::from_str::<BTreeMap<String, Option<String>>>(text) {
            Ok(raw) => Self(
                raw.into_iter().map(|(tag, name)| (tag, name.unwrap_or_default())).collect(),
            ),
            Err(e) => {
                warn!(error = %e, "stored field mapping is not valid JSON; treating as empty");
                Self::default()
            }
        }
    }

    pub fn to_stored(&self) -> String {
        serde_json::to_string(&self.0).unwrap_or_else(|_| "{}".to_string())
    }

    pub fn set(&mut self, tag: impl Into<String>, clean_name: impl Into<String>) {
        self.0.insert(tag.into(), clean_name.into());
    }

    pub fn get(&self, tag: &str) -> Option<&str> {
        self.0.get(tag).map(String::as_str)
    }

    /// `true` when nothing is stored at all.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Every stored pair, including unset ones.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(tag, name)| (tag.as_str(), name.as_str()))
    }

    /// Pairs whose clean_name is non-empty.
    pub fn mapped(&self) -> impl Iterator<Item = (&str, &str)> {
        self.iter().filter(|(_, name)| !name.is_empty())
    }

    /// Submitter clean_names this mapping depends on.
    pub fn referenced_fields(&self) -> impl Iterator<Item = &str> {
        self.mapped().map(|(_, name)| name)
    }
}

impl<K, V> FromIterator<(K, V)> for FieldMapping
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// One submitter's answers keyed by field clean_name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Submission {
    answers: BTreeMap<String, Value>,
}

impl Submission {
    pub fn new(answers: BTreeMap<String, Value>) -> Self {
        Self { answers }
    }

    pub fn get(&self, clean_name: &str) -> Option<&Value> {
        self.answers.get(clean_name)
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    /// Answers with hyphens in their keys replaced by underscores.
    pub fn normalized(&self) -> BTreeMap<String, Value> {
        self.answers.iter().map(|(key, value)| (normalize_key(key), value.clone())).collect()
    }
}

impl<K, V> FromIterator<(K, V)> for Submission
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self { answers: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect() }
    }
}

/// Form clean_names may contain hyphens; answer lookups use underscores.
pub fn normalize_key(key: &str) -> String {
    key.replace('-', "_")
}

/// Event reference plus field mapping as persisted on the form page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntegrationSettings {
    pub event: EventReference,
    pub mapping: FieldMapping,
}

impl IntegrationSettings {
    pub fn new(event: EventReference, mapping: FieldMapping) -> Self {
        Self { event, mapping }
    }

    /// Load from the page's `zoom_event` and `zoom_reg_fields_mapping` text.
    pub fn from_stored(zoom_event: Option<&str>, zoom_reg_fields_mapping: Option<&str>) -> Result<Self> {
        Ok(Self {
            event: EventReference::from_stored(zoom_event)?,
            mapping: FieldMapping::from_stored(zoom_reg_fields_mapping),
        })
    }

    /// An event is picked and a mapping exists.
    pub fn is_configured(&self) -> bool {
        self.event.is_set() && !self.mapping.is_empty()
    }
}
