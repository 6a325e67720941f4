//! Error types for the Gamedge catalog core
//!
//! Errors are grouped by the boundary they originate from:
//! - Remote errors: failures reported by the remote catalog
//! - Storage errors: local store, timestamp store and serialization failures
//! - Validation errors: invalid input such as a zero page size
//!
//! A lookup miss on a single entity is its own top-level variant so callers can
//! tell "not found" apart from an empty list.

use thiserror::Error;

pub mod remote;
pub mod storage;
pub mod validation;

pub use remote::RemoteError;
pub use storage::StorageError;
pub use validation::ValidationError;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the Gamedge catalog core
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Remote catalog errors
    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// Local storage errors
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Single entity lookup miss
    #[error("{entity} with id {id} was not found")]
    NotFound { entity: &'static str, id: i64 },

    /// Input validation errors
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Coarse error classification surfaced to front-ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NetworkUnavailable,
    RemoteServiceError,
    NotFound,
    Unknown,
}

impl ErrorKind {
    /// Human-readable message for a transient notification
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::NetworkUnavailable => "Network is unavailable. Showing cached data.",
            Self::RemoteServiceError => "The catalog service responded with an error.",
            Self::NotFound => "The requested item could not be found.",
            Self::Unknown => "Something went wrong.",
        }
    }
}

impl Error {
    /// Create a not found error for an entity
    pub fn not_found(entity: &'static str, id: i64) -> Self {
        Self::NotFound { entity, id }
    }

    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Remote(RemoteError::NetworkUnavailable { .. }) => ErrorKind::NetworkUnavailable,
            Self::Remote(RemoteError::ServiceError { .. })
            | Self::Remote(RemoteError::MalformedResponse { .. }) => ErrorKind::RemoteServiceError,
            Self::Remote(RemoteError::Other { .. }) => ErrorKind::Unknown,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Storage(_) | Self::Validation(_) => ErrorKind::Unknown,
        }
    }

    /// Human-readable message derived from the error kind
    pub fn user_message(&self) -> &'static str {
        self.kind().user_message()
    }
}

// Conversions from external error types

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Self::Storage(StorageError::io(&source.to_string(), None))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Storage(StorageError::serialization(&err.to_string()))
    }
}

#[cfg(feature = "database")]
impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        Self::Storage(StorageError::database(&err.to_string()))
    }
}
