//! Local storage error types

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised by local stores and the timestamp store
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// Database operation failed
    #[error("Database error: {message}")]
    Database { message: String },

    /// File system operation failed
    #[error("Storage I/O error{}: {message}", describe_path(.path))]
    Io {
        message: String,
        path: Option<PathBuf>,
    },

    /// Stored data could not be encoded or decoded
    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

fn describe_path(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| format!(" on '{}'", p.display()))
        .unwrap_or_default()
}

impl StorageError {
    /// Create a database error
    pub fn database(message: &str) -> Self {
        Self::Database {
            message: message.to_string(),
        }
    }

    /// Create an I/O error, optionally tied to a path
    pub fn io(message: &str, path: Option<&Path>) -> Self {
        Self::Io {
            message: message.to_string(),
            path: path.map(Path::to_path_buf),
        }
    }

    /// Create a serialization error
    pub fn serialization(message: &str) -> Self {
        Self::Serialization {
            message: message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_display_with_path() {
        let error = StorageError::io("disk full", Some(Path::new("/tmp/refresh.json")));
        assert_eq!(
            error.to_string(),
            "Storage I/O error on '/tmp/refresh.json': disk full"
        );
    }

    #[test]
    fn test_io_error_display_without_path() {
        let error = StorageError::io("disk full", None);
        assert_eq!(error.to_string(), "Storage I/O error: disk full");
    }
}
