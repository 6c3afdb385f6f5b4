//! Index command producer.

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::command::IndexCommand;
use crate::envelope::OffloadedReference;
use crate::error::Result;
use crate::offload::OffloadDecider;
use crate::queue::MessageQueue;

/// Result of a successful publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReceipt {
    message_id: String,
    offloaded: Option<OffloadedReference>,
}

impl DeliveryReceipt {
    /// Delivery id assigned by the queue.
    pub fn message_id(&self) -> &str {
        &self.message_id
    }

    /// Where the payload went, if it was offloaded.
    pub fn offloaded(&self) -> Option<&OffloadedReference> {
        self.offloaded.as_ref()
    }
}

/// Publishes index commands, offloading oversized ones.
///
/// Offload and publish are not atomic. When the blob write succeeds and
/// the send then fails, the blob stays behind unreferenced; it is logged
/// at warn level and left to the bucket's lifecycle rules.
#[derive(Clone)]
pub struct IndexProducer {
    queue_url: String,
    decider: OffloadDecider,
    queue: Arc<dyn MessageQueue>,
}

impl IndexProducer {
    /// Create a producer for a queue.
    pub fn new(
        queue_url: impl Into<String>,
        decider: OffloadDecider,
        queue: Arc<dyn MessageQueue>,
    ) -> Self {
        Self {
            queue_url: queue_url.into(),
            decider,
            queue,
        }
    }

    /// Configured queue URL.
    pub fn queue_url(&self) -> &str {
        &self.queue_url
    }

    /// Offload decider.
    pub fn decider(&self) -> &OffloadDecider {
        &self.decider
    }

    /// Publish to the configured queue.
    pub async fn publish(&self, command: &IndexCommand) -> Result<DeliveryReceipt> {
        self.publish_to(&self.queue_url, command).await
    }

    /// Publish to a specific queue.
    ///
    /// The command is validated before anything is written. Nothing is
    /// sent when the blob write fails.
    pub async fn publish_to(&self, queue_url: &str, command: &IndexCommand) -> Result<DeliveryReceipt> {
        command.validate()?;
        let body = command.to_body()?;

        debug!(
            queue_url,
            verb = %command.verb(),
            index = command.index(),
            document_id = command.document().id(),
            bytes = body.len(),
            "Publishing index command"
        );

        let envelope = self.decider.prepare(body).await?;
        let message = envelope.to_outbound()?;

        let message_id = match self.queue.send(queue_url, &message).await {
            Ok(id) => id,
            Err(e) => {
                if let Some(reference) = envelope.reference() {
                    warn!(
                        bucket = reference.bucket(),
                        key = reference.key(),
                        queue_url,
                        "Publish failed after offload; blob is orphaned"
                    );
                }
                return Err(e.into());
            }
        };

        info!(
            message_id = %message_id,
            document_id = command.document().id(),
            offloaded = envelope.is_offloaded(),
            "Index command published"
        );

        Ok(DeliveryReceipt {
            message_id,
            offloaded: envelope.reference().cloned(),
        })
    }
}

impl std::fmt::Debug for IndexProducer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexProducer")
            .field("queue_url", &self.queue_url)
            .field("decider", &self.decider)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{IndexDocument, Site};
    use crate::envelope::EXTENDED_PAYLOAD_SIZE_ATTRIBUTE;
    use crate::offload::OffloadPolicy;
    use crate::queue::MemoryQueue;
    use chrono::NaiveDate;
    use searchlink_storage::{BlobStore, MemoryBlobStore};

    const QUEUE: &str = "https://sqs.eu-west-1.amazonaws.com/123456789012/index";

    fn command(content_len: usize) -> IndexCommand {
        let doc = IndexDocument::new(
            Site::Website,
            "title",
            "x".repeat(content_len),
            NaiveDate::from_ymd_opt(2019, 1, 14).unwrap(),
        )
        .with_id("1");
        IndexCommand::upsert("test", doc).unwrap()
    }

    fn producer() -> (IndexProducer, Arc<MemoryBlobStore>, Arc<MemoryQueue>) {
        let store = Arc::new(MemoryBlobStore::new("payloads"));
        let queue = Arc::new(MemoryQueue::new());
        let decider = OffloadDecider::new(OffloadPolicy::with_threshold(1000).unwrap(), store.clone());
        (IndexProducer::new(QUEUE, decider, queue.clone()), store, queue)
    }

    #[tokio::test]
    async fn test_small_command_inline() {
        let (producer, store, queue) = producer();
        let command = command(10);

        let receipt = producer.publish(&command).await.unwrap();
        let sent = queue.sent().await;

        assert!(receipt.offloaded().is_none());
        assert_eq!(sent[0].message_id, receipt.message_id());
        assert_eq!(sent[0].queue_url, QUEUE);
        assert_eq!(sent[0].message.body().as_bytes(), &command.to_body().unwrap()[..]);
        assert_eq!(store.put_count(), 0);
    }

    #[tokio::test]
    async fn test_large_command_offloaded() {
        let (producer, store, queue) = producer();
        let command = command(5000);

        let receipt = producer.publish(&command).await.unwrap();
        let reference = receipt.offloaded().unwrap();
        let sent = queue.sent().await;

        assert_eq!(store.get(reference.key()).await.unwrap(), command.to_body().unwrap());
        assert_eq!(
            sent[0].message.attribute(EXTENDED_PAYLOAD_SIZE_ATTRIBUTE).unwrap().value(),
            reference.size_bytes().to_string()
        );
    }

    #[tokio::test]
    async fn test_queue_failure_reports_queue_error() {
        let (producer, store, queue) = producer();
        queue.set_fail_sends(true);

        let err = producer.publish(&command(5000)).await.unwrap_err();

        assert!(err.is_queue());
        // the blob write happened and is left in place
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_unvalidated_command_not_published() {
        let (producer, store, queue) = producer();
        let command: IndexCommand = serde_json::from_str(
            r#"{
                "verb": "upsert",
                "index": "",
                "document": {
                    "id": "",
                    "site": "website",
                    "title": "t",
                    "content": "c",
                    "published_date": "2019-01-14",
                    "mime_type": "application/pdf"
                }
            }"#,
        )
        .unwrap();

        let err = producer.publish(&command).await.unwrap_err();

        assert!(err.is_validation());
        assert_eq!(queue.send_count(), 0);
        assert_eq!(store.put_count(), 0);
    }

    #[tokio::test]
    async fn test_publish_to_overrides_queue() {
        let (producer, _store, queue) = producer();

        producer.publish_to("memory://other", &command(1)).await.unwrap();

        assert_eq!(queue.sent().await[0].queue_url, "memory://other");
    }
}
