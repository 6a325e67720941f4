//! Validation error types

use thiserror::Error;

/// Input validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Pagination window is not usable
    #[error("Invalid pagination: {message}")]
    InvalidPagination { message: String },

    /// Configuration value is out of range or malformed
    #[error("Invalid configuration: {message}")]
    InvalidConfiguration { message: String },
}

impl ValidationError {
    /// Create an invalid pagination error
    pub fn invalid_pagination(message: &str) -> Self {
        Self::InvalidPagination {
            message: message.to_string(),
        }
    }

    /// Create an invalid configuration error
    pub fn invalid_configuration(message: &str) -> Self {
        Self::InvalidConfiguration {
            message: message.to_string(),
        }
    }
}
