//! Error types used throughout the bridge

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for RegBridge
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum RegBridgeError {
    /// Stored API credentials are missing or incomplete.
    #[error("Credential error: {0}")]
    Credential(String),

    /// The vendor rejected the credentials (token exchange returned non-2xx).
    #[error("Remote authentication error: {0}")]
    RemoteAuth(String),

    /// The vendor answered with a non-2xx status.
    #[error("Remote error (HTTP {status}): {}", .message.as_deref().unwrap_or("no message"))]
    Remote {
        /// HTTP status code returned by the vendor
        status: u16,
        /// `message` field of the vendor error body, when present
        message: Option<String>,
        /// Raw response body, when readable
        body: Option<String>,
    },

    /// Connectivity failure (DNS, connect, timeout, TLS).
    #[error("Transport error: {0}")]
    Transport(String),

    /// The rendered registration payload is not a valid JSON object.
    #[error("Template error: {0}")]
    Template(String),

    /// The selected event does not accept registrations.
    #[error("Registration is not enabled for the event '{0}'")]
    RegistrationDisabled(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl RegBridgeError {
    /// Build a [`RegBridgeError::Remote`] from a status code and a raw body.
    ///
    /// The vendor `message` is extracted from JSON bodies of the form
    /// `{"code": 300, "message": "..."}`.
    pub fn remote(status: u16, body: Option<String>) -> Self {
        let message = body
            .as_deref()
            .and_then(|text| serde_json::from_str::<serde_json::Value>(text).ok())
            .and_then(|json| json.get("message").and_then(|m| m.as_str()).map(str::to_string));

        Self::Remote { status, message, body }
    }

    /// Vendor-supplied error message, if the vendor sent one.
    pub fn vendor_message(&self) -> Option<&str> {
        match self {
            Self::Remote { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// Editor-facing text for failures during event selection.
    pub fn user_message(&self) -> String {
        match self {
            Self::Credential(msg) => msg.clone(),
            Self::RemoteAuth(_) | Self::Remote { .. } => {
                let mut text = String::from(
                    "Error obtaining Zoom events. Please make sure the Zoom credentials in Zoom \
                     Settings are correct, and have required Zoom Account access scope.",
                );
                if let Some(message) = self.vendor_message() {
                    text.push_str(" - Specific Error: ");
                    text.push_str(message);
                }
                text
            }
            Self::Transport(_) => {
                "Could not reach Zoom. Please check your connection and try again.".to_string()
            }
            Self::RegistrationDisabled(topic) => format!(
                "Registration is not enabled for the event '{topic}'. Please enable registration \
                 for this event in your Zoom Account and try again"
            ),
            other => other.to_string(),
        }
    }
}

/// Result type alias for RegBridge operations
pub type Result<T> = std::result::Result<T, RegBridgeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_extracts_vendor_message() {
        let err = RegBridgeError::remote(
            404,
            Some(r#"{"code":3001,"message":"Meeting does not exist: 123."}"#.to_string()),
        );

        assert_eq!(err.vendor_message(), Some("Meeting does not exist: 123."));
        assert!(err.to_string().contains("HTTP 404"));
    }

    #[test]
    fn remote_tolerates_non_json_body() {
        let err = RegBridgeError::remote(502, Some("<html>bad gateway</html>".to_string()));

        assert_eq!(err.vendor_message(), None);
        assert!(err.to_string().contains("no message"));
    }

    #[test]
    fn user_message_appends_vendor_detail() {
        let err = RegBridgeError::remote(
            400,
            Some(r#"{"code":124,"message":"Invalid access token."}"#.to_string()),
        );

        let text = err.user_message();
        assert!(text.starts_with("Error obtaining Zoom events."));
        assert!(text.ends_with("- Specific Error: Invalid access token."));
    }

    #[test]
    fn credential_message_is_shown_verbatim() {
        let err = RegBridgeError::Credential("No Zoom API Key provided.".into());
        assert_eq!(err.user_message(), "No Zoom API Key provided.");
    }

    #[test]
    fn serializes_with_type_tag() {
        let err = RegBridgeError::Template("bad json".into());
        let json = serde_json::to_value(&err).unwrap();

        assert_eq!(json["type"], "Template");
        assert_eq!(json["message"], "bad json");
    }
}
