//! Error types for the docsearch client.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Input rejected before any request is issued.
///
/// Validation failures are reported synchronously and never touch the
/// in-flight flags, result rows or chat transcript of a session.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationError {
    #[error("Query cannot be empty")]
    EmptyQuery,

    #[error("Query is too long ({len} characters, max {max})")]
    QueryTooLong { len: usize, max: usize },

    #[error("Folder '{folder_id}' has no uploaded files")]
    NoFiles { folder_id: String },

    #[error("Invalid folder name: {0}")]
    InvalidFolderName(String),

    #[error("Folder name already exists: {0}")]
    DuplicateFolderName(String),

    #[error("Root folder cannot be deleted")]
    RootFolderProtected,

    #[error("Too many files ({count}, max {max} per upload)")]
    TooManyFiles { count: usize, max: usize },

    #[error("File too large: {name} ({size} bytes, max {max})")]
    FileTooLarge { name: String, size: u64, max: u64 },

    #[error("Unsupported page size: {0}")]
    InvalidPageSize(usize),
}

/// A shared error type for the whole client.
#[derive(Error, Debug, Clone)]
pub enum DocsearchError {
    /// Input rejected locally
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The request was cancelled or superseded before it settled
    #[error("Request aborted")]
    Aborted,

    /// The server answered with a non-success status
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// The server answered, but not with the expected shape
    #[error("Malformed response: {0}")]
    Malformed(String),

    /// Connection, timeout or body read failure
    #[error("Transport error: {0}")]
    Transport(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },
}

impl DocsearchError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a Server error
    pub fn server(status: u16, message: impl Into<String>) -> Self {
        Self::Server {
            status,
            message: message.into(),
        }
    }

    /// Creates a Malformed error
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed(message.into())
    }

    /// Creates a Transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this error is the expected outcome of a cancellation.
    pub fn is_aborted(&self) -> bool {
        matches!(self, Self::Aborted)
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Message shown to the user when a search fails.
    ///
    /// Server errors surface the server's own detail text rather than the
    /// status-prefixed `Display` form.
    pub fn user_message(&self) -> String {
        match self {
            Self::Server { message, .. } if !message.trim().is_empty() => message.clone(),
            Self::Server { status, .. } => format!("Request failed with status {}", status),
            Self::Malformed(message) => format!("Unexpected response from server: {}", message),
            Self::Transport(message) => format!("Could not reach the server: {}", message),
            other => other.to_string(),
        }
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for DocsearchError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for DocsearchError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for DocsearchError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, DocsearchError>`.
pub type Result<T> = std::result::Result<T, DocsearchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_prefers_server_detail() {
        let err = DocsearchError::server(400, "Some files not in selected folder");
        assert_eq!(err.user_message(), "Some files not in selected folder");

        let err = DocsearchError::server(502, "  ");
        assert_eq!(err.user_message(), "Request failed with status 502");
    }

    #[test]
    fn test_validation_converts_into_shared_error() {
        let err: DocsearchError = ValidationError::EmptyQuery.into();
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "Query cannot be empty");
    }
}
