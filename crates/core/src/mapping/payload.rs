//! Registration payload construction
//!
//! Turns a saved [`FieldMapping`] plus one [`Submission`] into the JSON object
//! posted to the registrant endpoints. Two strategies exist:
//!
//! - **Structured** (default): each mapped tag receives the submitter's answer
//!   text directly. Answer text can never corrupt the payload.
//! - **Template**: a `{"tag": "{{clean_name}}"}` template is rendered with the
//!   HTML-escaped answers and parsed back, matching payloads produced by older
//!   deployments. Quotes arrive as `&quot;`; a backslash still makes the
//!   rendered text invalid JSON and fails with `Template`.
//!
//! In both strategies answer keys are normalized (hyphens become underscores),
//! multi-choice answers are joined with `", "` and unresolved names render as
//! an empty string.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::{Captures, Regex};
use regbridge_domain::{normalize_key, FieldMapping, PayloadStrategy, RegBridgeError, Result, Submission};
use serde_json::{Map, Value};
use tracing::debug;

use crate::ports::RegistrationPayload;

/// Builds registration payloads with the configured strategy.
#[derive(Debug, Clone, Copy, Default)]
pub struct PayloadBuilder {
    strategy: PayloadStrategy,
}

impl PayloadBuilder {
    pub fn new(strategy: PayloadStrategy) -> Self {
        Self { strategy }
    }

    pub fn strategy(&self) -> PayloadStrategy {
        self.strategy
    }

    /// Build the payload object.
    ///
    /// # Errors
    /// `Template` when the template strategy renders text that is not a JSON
    /// object, or when a placeholder is not a valid variable name.
    pub fn build(&self, mapping: &FieldMapping, submission: &Submission) -> Result<RegistrationPayload> {
        let answers = submission.normalized();

        let payload = match self.strategy {
            PayloadStrategy::Structured => structured_payload(mapping, &answers),
            PayloadStrategy::Template => {
                let rendered = render_template(mapping, &answers)?;
                parse_rendered(&rendered)?
            }
        };

        debug!(strategy = ?self.strategy, keys = payload.len(), "built registration payload");
        Ok(payload)
    }

    /// Text form of the payload, for diagnostics when building or sending fails.
    ///
    /// For the template strategy this is the raw rendered template, even when
    /// it does not parse.
    pub fn render(&self, mapping: &FieldMapping, submission: &Submission) -> String {
        let answers = submission.normalized();

        match self.strategy {
            PayloadStrategy::Structured => {
                Value::Object(structured_payload(mapping, &answers)).to_string()
            }
            PayloadStrategy::Template => render_template(mapping, &answers)
                .unwrap_or_else(|_| template_source(mapping).to_string()),
        }
    }
}

/// Build a payload with the structured strategy.
pub fn build_registration_payload(
    mapping: &FieldMapping,
    submission: &Submission,
) -> Result<RegistrationPayload> {
    PayloadBuilder::default().build(mapping, submission)
}

fn structured_payload(mapping: &FieldMapping, answers: &BTreeMap<String, Value>) -> RegistrationPayload {
    mapping
        .mapped()
        .map(|(tag, clean_name)| {
            let text = answers.get(&normalize_key(clean_name)).map(answer_text);
            (tag.to_string(), Value::String(text.unwrap_or_default()))
        })
        .collect()
}

fn template_source(mapping: &FieldMapping) -> Value {
    let template: Map<String, Value> = mapping
        .mapped()
        .map(|(tag, clean_name)| (tag.to_string(), Value::String(format!("{{{{{clean_name}}}}}"))))
        .collect();
    Value::Object(template)
}

fn placeholder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\{\{\s*([^{}\s]*)\s*\}\}").expect("placeholder pattern is valid")
    })
}

fn variable_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9_]+$").expect("variable pattern is valid")
    })
}

fn render_template(mapping: &FieldMapping, answers: &BTreeMap<String, Value>) -> Result<String> {
    let source = template_source(mapping).to_string();

    if let Some(bad) = placeholder_pattern()
        .captures_iter(&source)
        .filter_map(|caps| caps.get(1))
        .find(|name| !variable_pattern().is_match(name.as_str()))
    {
        return Err(RegBridgeError::Template(format!(
            "invalid template variable '{}'",
            bad.as_str()
        )));
    }

    let rendered = placeholder_pattern().replace_all(&source, |caps: &Captures<'_>| {
        answers.get(&caps[1]).map(|value| escape_html(&answer_text(value))).unwrap_or_default()
    });

    Ok(rendered.into_owned())
}

fn parse_rendered(rendered: &str) -> Result<RegistrationPayload> {
    match serde_json::from_str::<Value>(rendered) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(RegBridgeError::Template(format!(
            "rendered payload is not a JSON object: {other}"
        ))),
        Err(e) => Err(RegBridgeError::Template(format!("rendered payload is not valid JSON: {e}"))),
    }
}

/// How an answer reads when substituted into template text.
fn answer_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(answer_text).collect::<Vec<_>>().join(", "),
        other => other.to_string(),
    }
}

/// Autoescaping applied to template substitutions.
fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn mapping() -> FieldMapping {
        [("email", "email_field"), ("first_name", "fname"), ("last_name", "lname")]
            .into_iter()
            .collect()
    }

    fn submission() -> Submission {
        [
            ("email_field", json!("a@b.com")),
            ("fname", json!("Ann")),
            ("lname", json!("Lee")),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn structured_assigns_answers_to_tags() {
        let payload = build_registration_payload(&mapping(), &submission()).unwrap();

        assert_eq!(
            Value::Object(payload),
            json!({"email": "a@b.com", "first_name": "Ann", "last_name": "Lee"})
        );
    }

    #[test]
    fn unmapped_tags_are_absent() {
        let mut mapping = mapping();
        mapping.set("last_name", "");

        let payload = build_registration_payload(&mapping, &submission()).unwrap();
        assert!(!payload.contains_key("last_name"));
        assert_eq!(payload.len(), 2);
    }

    #[test]
    fn unresolved_answers_render_empty() {
        let mapping: FieldMapping = [("email", "missing_field")].into_iter().collect();
        let payload = build_registration_payload(&mapping, &submission()).unwrap();

        assert_eq!(payload["email"], json!(""));
    }

    #[test]
    fn hyphenated_answer_keys_are_normalized() {
        let mapping: FieldMapping = [("first_name", "first_name")].into_iter().collect();
        let submission: Submission = [("first-name", json!("Ann"))].into_iter().collect();

        let payload = build_registration_payload(&mapping, &submission).unwrap();
        assert_eq!(payload["first_name"], json!("Ann"));
    }

    #[test]
    fn structured_survives_quotes_in_answers() {
        let submission: Submission = [
            ("email_field", json!("a@b.com")),
            ("fname", json!(r#"Ann "The Great""#)),
            ("lname", json!("Lee\\")),
        ]
        .into_iter()
        .collect();

        let payload = build_registration_payload(&mapping(), &submission).unwrap();
        assert_eq!(payload["first_name"], json!(r#"Ann "The Great""#));
    }

    #[test]
    fn template_strategy_matches_structured_for_plain_answers() {
        let builder = PayloadBuilder::new(PayloadStrategy::Template);
        let payload = builder.build(&mapping(), &submission()).unwrap();

        assert_eq!(payload, build_registration_payload(&mapping(), &submission()).unwrap());
    }

    #[test]
    fn template_strategy_escapes_markup_characters() {
        let submission: Submission = [
            ("email_field", json!("a@b.com")),
            ("fname", json!(r#"Ann "The Great""#)),
            ("lname", json!("O'Neil & Co <3>")),
        ]
        .into_iter()
        .collect();

        let payload =
            PayloadBuilder::new(PayloadStrategy::Template).build(&mapping(), &submission).unwrap();

        assert_eq!(payload["first_name"], json!("Ann &quot;The Great&quot;"));
        assert_eq!(payload["last_name"], json!("O&#x27;Neil &amp; Co &lt;3&gt;"));
    }

    #[test]
    fn template_strategy_fails_on_backslash() {
        let submission: Submission = [
            ("email_field", json!("a@b.com")),
            ("fname", json!(r"Ann\")),
            ("lname", json!("Lee")),
        ]
        .into_iter()
        .collect();

        let builder = PayloadBuilder::new(PayloadStrategy::Template);
        let err = builder.build(&mapping(), &submission).unwrap_err();
        assert!(matches!(err, RegBridgeError::Template(_)));

        let rendered = builder.render(&mapping(), &submission);
        assert!(rendered.contains(r#""first_name":"Ann\","#));
    }

    #[test]
    fn structured_joins_multi_choice_answers() {
        let mapping: FieldMapping = [("first_name", "topics")].into_iter().collect();
        let submission: Submission = [("topics", json!(["rust", "wasm"]))].into_iter().collect();

        let payload = build_registration_payload(&mapping, &submission).unwrap();
        assert_eq!(payload["first_name"], json!("rust, wasm"));
    }

    #[test]
    fn strategies_agree_on_non_string_answers() {
        let mapping: FieldMapping =
            [("first_name", "topics"), ("last_name", "age")].into_iter().collect();
        let submission: Submission =
            [("topics", json!(["rust", "wasm"])), ("age", json!(42))].into_iter().collect();

        let structured = build_registration_payload(&mapping, &submission).unwrap();
        let template =
            PayloadBuilder::new(PayloadStrategy::Template).build(&mapping, &submission).unwrap();

        assert_eq!(structured, template);
        assert_eq!(structured["last_name"], json!("42"));
    }

    #[test]
    fn template_strategy_rejects_hyphenated_placeholders() {
        let mapping: FieldMapping = [("first_name", "first-name")].into_iter().collect();
        let submission: Submission = [("first-name", json!("Ann"))].into_iter().collect();

        let err = PayloadBuilder::new(PayloadStrategy::Template)
            .build(&mapping, &submission)
            .unwrap_err();
        assert!(err.to_string().contains("first-name"));
    }

    #[test]
    fn template_joins_multi_choice_answers() {
        let mapping: FieldMapping = [("interests", "topics")].into_iter().collect();
        let submission: Submission = [("topics", json!(["rust", "wasm"]))].into_iter().collect();

        let payload =
            PayloadBuilder::new(PayloadStrategy::Template).build(&mapping, &submission).unwrap();
        assert_eq!(payload["interests"], json!("rust, wasm"));
    }

    #[test]
    fn structured_render_is_the_payload_text() {
        let text = PayloadBuilder::default().render(&mapping(), &submission());
        let parsed: Value = serde_json::from_str(&text).unwrap();

        assert_eq!(parsed["email"], json!("a@b.com"));
    }
}
