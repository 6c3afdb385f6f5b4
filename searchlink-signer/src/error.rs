//! Signing error types.

use thiserror::Error;

/// Result type for signing operations.
pub type Result<T> = std::result::Result<T, SigningError>;

/// Errors raised while signing a request.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SigningError {
    /// A credential field was empty.
    #[error("Credential field '{0}' is empty")]
    EmptyCredentialField(&'static str),

    /// The request URI has no host to sign.
    #[error("Request URI has no host: {0}")]
    MissingHost(String),

    /// The request carries a body hash that does not match its body.
    #[error("Body hash mismatch: header says {declared}, body hashes to {computed}")]
    BodyHashMismatch {
        /// Value found in the `x-amz-content-sha256` header.
        declared: String,
        /// Hash of the actual body.
        computed: String,
    },

    /// A body hash is required but the request does not carry one.
    #[error("Request is missing the required body hash header")]
    MissingBodyHash,
}
