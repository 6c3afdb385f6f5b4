//! Error types for search operations.

use searchlink_signer::SigningError;
use thiserror::Error;

/// Search error type.
#[derive(Error, Debug)]
pub enum SearchError {
    /// The request never produced a response.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The cluster rejected the request signature or credentials.
    #[error("Authentication failed ({status}): {message}")]
    Auth {
        /// HTTP status code.
        status: u16,
        /// Response body.
        message: String,
    },

    /// Any other non-2xx response.
    #[error("HTTP error {status}: {body}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Response body.
        body: String,
    },

    /// Signing failed.
    #[error("Signing error: {0}")]
    Signing(#[from] SigningError),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The endpoint URL cannot be used.
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// The index name cannot be used in a URL path.
    #[error("Invalid index name: '{0}'")]
    InvalidIndex(String),
}

impl SearchError {
    /// Check if this error might succeed on a later attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Http { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }

    /// Get the HTTP status code if the cluster answered.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Auth { status, .. } | Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type alias for search operations.
pub type Result<T> = std::result::Result<T, SearchError>;
