//! Inline-or-offload decision for queue payloads.

use bytes::Bytes;
use searchlink_storage::{generate_key, BlobStore, BlobStoreError};
use std::sync::Arc;
use tracing::{debug, info};

use crate::envelope::{MessageEnvelope, OffloadedReference};
use crate::error::{MessagingError, Result};

/// Default per-message size limit of the queue, in bytes.
pub const DEFAULT_QUEUE_LIMIT: usize = 262_144;

/// Bytes reserved for the pointer body and message attributes.
pub const ENVELOPE_HEADROOM: usize = 1024;

/// Default offload threshold, in bytes.
pub const DEFAULT_THRESHOLD: usize = 256_000;

/// Size rule deciding which payloads are offloaded.
///
/// Payloads up to `threshold` bytes travel inline. The threshold must
/// leave [`ENVELOPE_HEADROOM`] bytes below the queue limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OffloadPolicy {
    threshold: usize,
    queue_limit: usize,
}

impl OffloadPolicy {
    /// Create a policy for a queue with the given message size limit.
    pub fn new(threshold: usize, queue_limit: usize) -> Result<Self> {
        match threshold.checked_add(ENVELOPE_HEADROOM) {
            Some(needed) if needed <= queue_limit => Ok(Self {
                threshold,
                queue_limit,
            }),
            _ => Err(MessagingError::InvalidPolicy {
                threshold,
                queue_limit,
                headroom: ENVELOPE_HEADROOM,
            }),
        }
    }

    /// Create a policy against [`DEFAULT_QUEUE_LIMIT`].
    pub fn with_threshold(threshold: usize) -> Result<Self> {
        Self::new(threshold, DEFAULT_QUEUE_LIMIT)
    }

    /// Create a policy from optional overrides.
    ///
    /// A missing queue limit falls back to [`DEFAULT_QUEUE_LIMIT`]. A
    /// missing threshold falls back to [`DEFAULT_THRESHOLD`], lowered when
    /// the queue limit leaves less room than that.
    pub fn from_overrides(threshold: Option<usize>, queue_limit: Option<usize>) -> Result<Self> {
        let queue_limit = queue_limit.unwrap_or(DEFAULT_QUEUE_LIMIT);
        let threshold = threshold.unwrap_or_else(|| {
            DEFAULT_THRESHOLD.min(queue_limit.saturating_sub(ENVELOPE_HEADROOM))
        });
        Self::new(threshold, queue_limit)
    }

    /// Largest payload sent inline.
    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// Queue message size limit.
    pub fn queue_limit(&self) -> usize {
        self.queue_limit
    }

    /// Whether a payload of `len` bytes travels inline.
    pub fn fits_inline(&self, len: usize) -> bool {
        len <= self.threshold
    }
}

impl Default for OffloadPolicy {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            queue_limit: DEFAULT_QUEUE_LIMIT,
        }
    }
}

/// Decides per payload whether to inline it or move it to the blob store.
#[derive(Clone)]
pub struct OffloadDecider {
    policy: OffloadPolicy,
    store: Arc<dyn BlobStore>,
}

impl OffloadDecider {
    /// Create a decider writing oversized payloads to `store`.
    pub fn new(policy: OffloadPolicy, store: Arc<dyn BlobStore>) -> Self {
        Self { policy, store }
    }

    /// Size policy.
    pub fn policy(&self) -> &OffloadPolicy {
        &self.policy
    }

    /// Blob store used for oversized payloads.
    pub fn store(&self) -> &Arc<dyn BlobStore> {
        &self.store
    }

    /// Wrap a payload in an envelope.
    ///
    /// Payloads within the threshold are returned unchanged. Larger ones
    /// are written once under a fresh key; if that write fails no envelope
    /// is produced.
    pub async fn prepare(&self, body: Bytes) -> std::result::Result<MessageEnvelope, BlobStoreError> {
        let size = body.len();

        if self.policy.fits_inline(size) {
            debug!(bytes = size, threshold = self.policy.threshold, "Sending payload inline");
            return Ok(MessageEnvelope::Inline(body));
        }

        let key = generate_key();
        self.store.put(&key, body).await?;

        info!(
            bucket = self.store.bucket(),
            key = %key,
            bytes = size,
            threshold = self.policy.threshold,
            "Offloaded payload to blob store"
        );

        Ok(MessageEnvelope::Offloaded(OffloadedReference::new(
            self.store.bucket(),
            key,
            size as u64,
        )))
    }
}

impl std::fmt::Debug for OffloadDecider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OffloadDecider")
            .field("policy", &self.policy)
            .field("bucket", &self.store.bucket())
            .finish()
    }
}
