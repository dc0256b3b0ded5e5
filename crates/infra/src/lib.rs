//! # RegBridge Infrastructure
//!
//! Infrastructure implementations of core ports.
//!
//! This crate contains:
//! - HTTP client wrapper (reqwest)
//! - Zoom REST client, token providers and the public Zoom Events client
//! - Tracing-backed operator notifier
//! - Configuration loading and tracing subscriber setup
//!
//! ## Architecture
//! - Implements traits defined in `regbridge-core`
//! - Contains all "impure" code (network, environment, files)

pub mod bridge;
pub mod config;
pub mod errors;
pub mod http;
pub mod notify;
pub mod observability;
pub mod zoom;

// Re-export commonly used items
pub use bridge::RegistrationBridge;
pub use errors::InfraError;
pub use http::{HttpClient, HttpClientBuilder};
pub use notify::TracingNotifier;
pub use observability::init_tracing;
pub use zoom::{
    token_provider_for, AccessTokenProvider, AuthContext, JwtTokenProvider, OAuthTokenProvider,
    ZoomClient, ZoomEventsClient,
};
