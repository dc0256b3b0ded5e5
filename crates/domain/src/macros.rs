//! Macro for implementing Display and FromStr for wire-name enums
//!
//! Zoom event types and form field kinds travel as short lowercase strings
//! (stored page text, form-builder definitions). This macro keeps the
//! variant-to-string table in one place for both directions.
//!
//! # Example
//!
//! ```rust
//! use regbridge_domain::impl_wire_name_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Channel {
//!     Email,
//!     Sms,
//! }
//!
//! impl_wire_name_conversions!(Channel {
//!     Email => "email",
//!     Sms => "sms",
//! });
//!
//! assert_eq!(Channel::Sms.to_string(), "sms");
//! assert_eq!("EMAIL".parse::<Channel>(), Ok(Channel::Email));
//! ```

/// Implements Display and FromStr traits for wire-name enums
///
/// - Display writes the lowercase wire name
/// - FromStr parses case-insensitively, surrounding whitespace ignored
#[macro_export]
macro_rules! impl_wire_name_conversions {
    ($enum_name:ident { $($variant:ident => $str:literal),+ $(,)? }) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => write!(f, $str),)+
                }
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}
