//! Error types for the searchlink CLI.

use std::fmt;

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

/// CLI error types.
#[derive(Debug)]
pub enum CliError {
    /// IO error (reading input files, writing output)
    Io(std::io::Error),

    /// Missing or invalid settings
    Config(searchlink_config::ConfigError),

    /// Search failed
    Search(searchlink_search::SearchError),

    /// Publish failed
    Messaging(searchlink_messaging::MessagingError),

    /// Blob store setup failed
    Storage(searchlink_storage::BlobStoreError),

    /// Invalid argument
    InvalidArgument(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Io(e) => write!(f, "IO error: {}", e),
            CliError::Config(e) => write!(f, "Configuration error: {}", e),
            CliError::Search(e) => write!(f, "Search error: {}", e),
            CliError::Messaging(e) => write!(f, "Publish error: {}", e),
            CliError::Storage(e) => write!(f, "Storage error: {}", e),
            CliError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
        }
    }
}

impl std::error::Error for CliError {}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e)
    }
}

impl From<searchlink_config::ConfigError> for CliError {
    fn from(e: searchlink_config::ConfigError) -> Self {
        CliError::Config(e)
    }
}

impl From<searchlink_search::SearchError> for CliError {
    fn from(e: searchlink_search::SearchError) -> Self {
        CliError::Search(e)
    }
}

impl From<searchlink_messaging::MessagingError> for CliError {
    fn from(e: searchlink_messaging::MessagingError) -> Self {
        CliError::Messaging(e)
    }
}

impl From<searchlink_storage::BlobStoreError> for CliError {
    fn from(e: searchlink_storage::BlobStoreError) -> Self {
        CliError::Storage(e)
    }
}
