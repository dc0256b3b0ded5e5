//! # RegBridge Domain
//!
//! Business domain types for the form-to-Zoom registration bridge.
//!
//! This crate contains:
//! - Event references, listings and details
//! - Required registration fields, submitter fields and field mappings
//! - Domain error types and Result definitions
//! - Configuration structures and constants
//!
//! ## Architecture
//! - No dependencies on other RegBridge crates
//! - No I/O

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
