//! Remote catalog error types

use thiserror::Error;

/// Errors reported while talking to a remote catalog
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RemoteError {
    /// The remote could not be reached
    #[error("Network unavailable: {message}")]
    NetworkUnavailable { message: String },

    /// The remote answered with a non-success status
    #[error("Remote service error {code}: {message}")]
    ServiceError { code: u16, message: String },

    /// The remote answered with a body that could not be decoded
    #[error("Malformed remote response: {message}")]
    MalformedResponse { message: String },

    /// Unclassified remote failure
    #[error("Remote request failed: {message}")]
    Other { message: String },
}

impl RemoteError {
    /// Create a network unavailable error
    pub fn network_unavailable(message: &str) -> Self {
        Self::NetworkUnavailable {
            message: message.to_string(),
        }
    }

    /// Create a service error from a status code and message
    pub fn service_error(code: u16, message: &str) -> Self {
        Self::ServiceError {
            code,
            message: message.to_string(),
        }
    }

    /// Create a malformed response error
    pub fn malformed_response(message: &str) -> Self {
        Self::MalformedResponse {
            message: message.to_string(),
        }
    }

    /// Create an unclassified remote error
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }
}
