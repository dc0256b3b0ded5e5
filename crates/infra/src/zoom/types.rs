//! Wire shapes of Zoom REST responses not covered by domain types.

use regbridge_domain::Event;
use serde::Deserialize;

/// `GET /users/me/meetings`
#[derive(Debug, Deserialize)]
pub(crate) struct MeetingList {
    #[serde(default)]
    pub meetings: Vec<Event>,
}

/// `GET /users/me/webinars`
#[derive(Debug, Deserialize)]
pub(crate) struct WebinarList {
    #[serde(default)]
    pub webinars: Vec<Event>,
}
