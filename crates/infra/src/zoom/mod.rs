//! Zoom integration
//!
//! REST client for meetings/webinars (implements `EventClient`), token
//! providers for both credential shapes, and the public Zoom Events API.

pub mod auth;
pub mod client;
pub mod events_api;
mod types;

pub use auth::{
    token_provider_for, AccessTokenProvider, AuthContext, JwtTokenProvider, OAuthTokenProvider,
};
pub use client::ZoomClient;
pub use events_api::ZoomEventsClient;
