//! Configuration structures
//!
//! Loaded by `regbridge-infra::config` from environment variables or a
//! JSON/TOML file.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_API_BASE_URL, DEFAULT_API_KEY_LISTING_LIMIT, DEFAULT_EVENTS_API_BASE_URL,
    DEFAULT_OAUTH_LISTING_LIMIT, DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_TOKEN_URL,
};

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub zoom: ZoomConfig,
    #[serde(default)]
    pub payload: PayloadConfig,
}

/// Zoom API access
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoomConfig {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_token_url")]
    pub token_url: String,
    #[serde(default = "default_events_api_base_url")]
    pub events_api_base_url: String,
    pub credentials: Credentials,
    /// Events fetched per listing; falls back to a per-credential default.
    #[serde(default)]
    pub listing_limit: Option<usize>,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl ZoomConfig {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            api_base_url: default_api_base_url(),
            token_url: default_token_url(),
            events_api_base_url: default_events_api_base_url(),
            credentials,
            listing_limit: None,
            request_timeout_secs: default_request_timeout_secs(),
        }
    }

    pub fn effective_listing_limit(&self) -> usize {
        self.listing_limit.unwrap_or(match self.credentials {
            Credentials::OAuth { .. } => DEFAULT_OAUTH_LISTING_LIMIT,
            Credentials::ApiKey { .. } => DEFAULT_API_KEY_LISTING_LIMIT,
        })
    }
}

/// Stored API credentials.
///
/// Components are optional so that a half-filled settings form surfaces as a
/// credential error when authenticating rather than as a parse failure.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Credentials {
    /// Static key/secret used to sign short-lived tokens
    ApiKey {
        #[serde(default)]
        api_key: Option<String>,
        #[serde(default)]
        api_secret: Option<String>,
    },
    /// Server-to-server OAuth app
    #[serde(rename = "oauth")]
    OAuth {
        #[serde(default)]
        account_id: Option<String>,
        #[serde(default)]
        client_id: Option<String>,
        #[serde(default)]
        client_secret: Option<String>,
    },
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fn redact(value: &Option<String>) -> &'static str {
            if value.is_some() {
                "<set>"
            } else {
                "<unset>"
            }
        }

        match self {
            Self::ApiKey { api_key, api_secret } => f
                .debug_struct("ApiKey")
                .field("api_key", &redact(api_key))
                .field("api_secret", &redact(api_secret))
                .finish(),
            Self::OAuth { account_id, client_id, client_secret } => f
                .debug_struct("OAuth")
                .field("account_id", &redact(account_id))
                .field("client_id", &redact(client_id))
                .field("client_secret", &redact(client_secret))
                .finish(),
        }
    }
}

/// How registration payloads are built from submissions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayloadStrategy {
    /// Assign answers directly under each mapped tag
    #[default]
    Structured,
    /// Render a `{{ name }}` JSON template and parse it back
    Template,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PayloadConfig {
    #[serde(default)]
    pub strategy: PayloadStrategy,
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_token_url() -> String {
    DEFAULT_TOKEN_URL.to_string()
}

fn default_events_api_base_url() -> String {
    DEFAULT_EVENTS_API_BASE_URL.to_string()
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}
