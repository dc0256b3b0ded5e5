//! Conversions from external infrastructure errors into domain errors.

use regbridge_domain::RegBridgeError;
use reqwest::Error as HttpError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct InfraError(pub RegBridgeError);

impl From<InfraError> for RegBridgeError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<RegBridgeError> for InfraError {
    fn from(value: RegBridgeError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoRegBridgeError {
    fn into_regbridge(self) -> RegBridgeError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → RegBridgeError */
/* -------------------------------------------------------------------------- */

impl IntoRegBridgeError for HttpError {
    fn into_regbridge(self) -> RegBridgeError {
        if self.is_timeout() {
            return RegBridgeError::Transport("HTTP request timed out".into());
        }

        #[cfg(not(target_arch = "wasm32"))]
        if self.is_connect() {
            return RegBridgeError::Transport("HTTP connection failure".into());
        }

        if let Some(status) = self.status() {
            return RegBridgeError::remote(status.as_u16(), None);
        }

        if self.is_decode() {
            return RegBridgeError::Internal(format!("failed to decode HTTP response: {self}"));
        }

        RegBridgeError::Transport(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_regbridge())
    }
}

/* -------------------------------------------------------------------------- */
/* serde_json::Error → RegBridgeError */
/* -------------------------------------------------------------------------- */

impl IntoRegBridgeError for serde_json::Error {
    fn into_regbridge(self) -> RegBridgeError {
        RegBridgeError::Internal(format!("unexpected response shape: {self}"))
    }
}

impl From<serde_json::Error> for InfraError {
    fn from(value: serde_json::Error) -> Self {
        InfraError(value.into_regbridge())
    }
}

/* -------------------------------------------------------------------------- */
/* jsonwebtoken::errors::Error → RegBridgeError */
/* -------------------------------------------------------------------------- */

impl IntoRegBridgeError for jsonwebtoken::errors::Error {
    fn into_regbridge(self) -> RegBridgeError {
        RegBridgeError::Credential(format!("could not sign Zoom API token: {self}"))
    }
}

impl From<jsonwebtoken::errors::Error> for InfraError {
    fn from(value: jsonwebtoken::errors::Error) -> Self {
        InfraError(value.into_regbridge())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
