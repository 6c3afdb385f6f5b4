//! Consumer-side payload resolution.

use bytes::Bytes;
use searchlink_storage::BlobStore;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

use crate::command::IndexCommand;
use crate::envelope::{offload_marker, MessageAttribute, OffloadedReference, OutboundMessage};
use crate::error::{MessagingError, Result};

/// Turns received queue messages back into payloads.
#[derive(Clone)]
pub struct PayloadResolver {
    store: Arc<dyn BlobStore>,
}

impl PayloadResolver {
    /// Create a resolver reading offloaded payloads from `store`.
    pub fn new(store: Arc<dyn BlobStore>) -> Self {
        Self { store }
    }

    /// Resolve a message body and its attributes to the original payload.
    ///
    /// Messages without an offload marker are returned as they are.
    pub async fn resolve(
        &self,
        body: &str,
        attributes: &BTreeMap<String, MessageAttribute>,
    ) -> Result<Bytes> {
        let Some(marker) = offload_marker(attributes) else {
            return Ok(Bytes::copy_from_slice(body.as_bytes()));
        };

        let size: u64 = marker.value().trim().parse().map_err(|_| {
            MessagingError::InvalidEnvelope(format!(
                "payload size '{}' is not a number",
                marker.value()
            ))
        })?;
        let reference = OffloadedReference::from_pointer_body(body, size)?;

        if reference.bucket() != self.store.bucket() {
            return Err(MessagingError::InvalidEnvelope(format!(
                "pointer references bucket '{}' but the store serves '{}'",
                reference.bucket(),
                self.store.bucket()
            )));
        }

        let payload = self.store.get(reference.key()).await?;
        if payload.len() as u64 != reference.size_bytes() {
            return Err(MessagingError::InvalidEnvelope(format!(
                "blob {} holds {} bytes, marker says {}",
                reference.key(),
                payload.len(),
                reference.size_bytes()
            )));
        }

        debug!(bucket = reference.bucket(), key = reference.key(), bytes = payload.len(), "Resolved offloaded payload");

        Ok(payload)
    }

    /// Resolve a message as built by the producer.
    pub async fn resolve_message(&self, message: &OutboundMessage) -> Result<Bytes> {
        self.resolve(message.body(), message.attributes()).await
    }

    /// Resolve and parse an index command.
    pub async fn resolve_command(&self, message: &OutboundMessage) -> Result<IndexCommand> {
        let payload = self.resolve_message(message).await?;
        IndexCommand::from_slice(&payload)
    }
}

impl std::fmt::Debug for PayloadResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PayloadResolver")
            .field("bucket", &self.store.bucket())
            .finish()
    }
}
