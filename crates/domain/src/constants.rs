//! Domain constants
//!
//! Centralized location for vendor endpoints and defaults used across the
//! bridge.

// Vendor endpoints
pub const DEFAULT_API_BASE_URL: &str = "https://api.zoom.us/v2";
pub const DEFAULT_TOKEN_URL: &str = "https://zoom.us/oauth/token";
pub const DEFAULT_EVENTS_API_BASE_URL: &str = "https://events.zoom.us/api/v1";

// Listing defaults (per credential shape)
pub const DEFAULT_OAUTH_LISTING_LIMIT: usize = 20;
pub const DEFAULT_API_KEY_LISTING_LIMIT: usize = 5;

// Token lifecycle
pub const JWT_VALIDITY_SECS: i64 = 120;
pub const TOKEN_EXPIRY_SKEW_SECS: i64 = 30;

// HTTP
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

// Zoom `settings.approval_type` value meaning "no registration required"
pub const APPROVAL_TYPE_NO_REGISTRATION: u8 = 2;

// Mapping form
pub const MAPPING_PLACEHOLDER_LABEL: &str = "-- Select field to merge--";

// Editor messages
pub const NO_EVENTS_MESSAGE: &str =
    "No Upcoming or Ongoing Meetings/Webinars found. Please create one on Zoom and try again.";
