//! Error types for messaging operations

use searchlink_storage::BlobStoreError;
use thiserror::Error;

/// Errors raised by a queue backend.
#[derive(Error, Debug)]
pub enum QueueError {
    /// The queue rejected or never received the message.
    #[error("Failed to send to {queue_url}: {message}")]
    Send {
        /// Target queue.
        queue_url: String,
        /// Backend message.
        message: String,
    },

    /// The queue accepted the message without returning its id.
    ///
    /// Repeating the send would deliver the message twice.
    #[error("Message accepted by {queue_url} without a message id")]
    MissingMessageId {
        /// Target queue.
        queue_url: String,
    },

    /// The queue URL cannot be used.
    #[error("Invalid queue URL: '{0}'")]
    InvalidQueueUrl(String),

    /// A message attribute was rejected before sending.
    #[error("Invalid message attribute '{name}': {message}")]
    InvalidAttribute {
        /// Attribute name.
        name: String,
        /// Reason.
        message: String,
    },
}

impl QueueError {
    /// Queue URL the failing send targeted, if known.
    pub fn queue_url(&self) -> Option<&str> {
        match self {
            Self::Send { queue_url, .. } | Self::MissingMessageId { queue_url } => Some(queue_url),
            Self::InvalidQueueUrl(url) => Some(url),
            Self::InvalidAttribute { .. } => None,
        }
    }
}

/// Errors that can occur while preparing, publishing or resolving messages
#[derive(Error, Debug)]
pub enum MessagingError {
    /// A command or document failed validation
    #[error("Invalid {field}: {message}")]
    Validation {
        /// Offending field
        field: &'static str,
        /// Reason
        message: String,
    },

    /// The offload policy leaves no room for the envelope
    #[error(
        "Offload threshold {threshold} plus {headroom} bytes of envelope headroom exceeds the queue limit of {queue_limit}"
    )]
    InvalidPolicy {
        /// Requested threshold
        threshold: usize,
        /// Queue message size limit
        queue_limit: usize,
        /// Reserved envelope headroom
        headroom: usize,
    },

    /// Failed to serialize or deserialize a command
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Blob store write or read failed
    #[error("Blob store error: {0}")]
    BlobStore(#[from] BlobStoreError),

    /// Queue publish failed
    #[error("Queue error: {0}")]
    Queue(#[from] QueueError),

    /// A received message does not follow the envelope convention
    #[error("Invalid envelope: {0}")]
    InvalidEnvelope(String),
}

impl MessagingError {
    pub(crate) fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    /// Check if this error was raised before anything was written.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. } | Self::InvalidPolicy { .. })
    }

    /// Check if this error came from the blob store.
    pub fn is_blob_store(&self) -> bool {
        matches!(self, Self::BlobStore(_))
    }

    /// Check if this error came from the queue.
    pub fn is_queue(&self) -> bool {
        matches!(self, Self::Queue(_))
    }

    /// Check if repeating the publish could succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::BlobStore(e) => matches!(
                e,
                BlobStoreError::Write { .. } | BlobStoreError::Read { .. }
            ),
            Self::Queue(e) => matches!(e, QueueError::Send { .. }),
            _ => false,
        }
    }
}

/// Result type alias for messaging operations
pub type Result<T> = std::result::Result<T, MessagingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_error_message() {
        let err = MessagingError::InvalidPolicy {
            threshold: 262_144,
            queue_limit: 262_144,
            headroom: 1024,
        };
        assert_eq!(
            err.to_string(),
            "Offload threshold 262144 plus 1024 bytes of envelope headroom exceeds the queue limit of 262144"
        );
        assert!(err.is_validation());
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_queue_error_conversion() {
        let err: MessagingError = QueueError::Send {
            queue_url: "https://sqs.eu-west-1.amazonaws.com/1/q".to_string(),
            message: "throttled".to_string(),
        }
        .into();

        assert!(err.is_queue());
        assert!(err.is_retryable());

        let err: MessagingError = QueueError::MissingMessageId {
            queue_url: "https://sqs.eu-west-1.amazonaws.com/1/q".to_string(),
        }
        .into();
        assert!(err.is_queue());
        assert!(!err.is_retryable());
        assert!(err.to_string().contains("https://sqs.eu-west-1.amazonaws.com/1/q"));
    }
}
