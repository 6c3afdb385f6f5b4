//! Blob store error types.

use thiserror::Error;

/// Result type for blob store operations.
pub type Result<T> = std::result::Result<T, BlobStoreError>;

/// Blob store errors.
#[derive(Debug, Error)]
pub enum BlobStoreError {
    /// Writing a blob failed.
    #[error("Failed to write s3://{bucket}/{key}: {message}")]
    Write {
        /// Target bucket.
        bucket: String,
        /// Target key.
        key: String,
        /// Backend message.
        message: String,
    },

    /// Reading a blob failed.
    #[error("Failed to read s3://{bucket}/{key}: {message}")]
    Read {
        /// Source bucket.
        bucket: String,
        /// Source key.
        key: String,
        /// Backend message.
        message: String,
    },

    /// No blob exists under the key.
    #[error("Blob not found: s3://{bucket}/{key}")]
    NotFound {
        /// Bucket searched.
        bucket: String,
        /// Missing key.
        key: String,
    },

    /// The key cannot be used.
    #[error("Invalid blob key: '{0}'")]
    InvalidKey(String),

    /// Backend configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl BlobStoreError {
    /// Check if this is a not found error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Bucket the failing operation targeted, if any.
    pub fn bucket(&self) -> Option<&str> {
        match self {
            Self::Write { bucket, .. } | Self::Read { bucket, .. } | Self::NotFound { bucket, .. } => {
                Some(bucket)
            }
            _ => None,
        }
    }

    /// Key the failing operation targeted, if any.
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::Write { key, .. } | Self::Read { key, .. } | Self::NotFound { key, .. } => {
                Some(key)
            }
            Self::InvalidKey(key) => Some(key),
            Self::Config(_) => None,
        }
    }
}
