//! Queue backend seam and the in-memory backend.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::Mutex;
use tracing::debug;

use crate::envelope::OutboundMessage;
use crate::error::QueueError;

/// A queue that accepts messages and returns their delivery id.
#[async_trait]
pub trait MessageQueue: Send + Sync {
    /// Send one message to `queue_url`.
    async fn send(&self, queue_url: &str, message: &OutboundMessage) -> Result<String, QueueError>;
}

/// A message recorded by [`MemoryQueue`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    /// Assigned delivery id.
    pub message_id: String,
    /// Target queue.
    pub queue_url: String,
    /// The message as sent.
    pub message: OutboundMessage,
}

/// Queue that records messages in memory.
///
/// Counts every `send` attempt, including failed ones.
#[derive(Debug, Default)]
pub struct MemoryQueue {
    sent: Mutex<Vec<SentMessage>>,
    sends: AtomicUsize,
    fail_sends: AtomicBool,
}

impl MemoryQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent sends fail (or succeed again).
    pub fn set_fail_sends(&self, fail: bool) {
        self.fail_sends.store(fail, Ordering::SeqCst);
    }

    /// Number of `send` calls made so far.
    pub fn send_count(&self) -> usize {
        self.sends.load(Ordering::SeqCst)
    }

    /// Messages accepted so far, oldest first.
    pub async fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl MessageQueue for MemoryQueue {
    async fn send(&self, queue_url: &str, message: &OutboundMessage) -> Result<String, QueueError> {
        self.sends.fetch_add(1, Ordering::SeqCst);

        if queue_url.is_empty() {
            return Err(QueueError::InvalidQueueUrl(queue_url.to_string()));
        }
        if self.fail_sends.load(Ordering::SeqCst) {
            return Err(QueueError::Send {
                queue_url: queue_url.to_string(),
                message: "sends disabled".to_string(),
            });
        }

        let message_id = uuid::Uuid::new_v4().to_string();
        debug!(queue_url, message_id = %message_id, bytes = message.body().len(), "Queued message in memory");

        self.sent.lock().await.push(SentMessage {
            message_id: message_id.clone(),
            queue_url: queue_url.to_string(),
            message: message.clone(),
        });

        Ok(message_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_records_messages() {
        let queue = MemoryQueue::new();
        let message = OutboundMessage::new("hello").with_string_attribute("k", "v");

        let id = queue.send("memory://index", &message).await.unwrap();
        let sent = queue.sent().await;

        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].message_id, id);
        assert_eq!(sent[0].queue_url, "memory://index");
        assert_eq!(sent[0].message, message);
        assert_eq!(queue.send_count(), 1);
    }

    #[tokio::test]
    async fn test_failing_sends() {
        let queue = MemoryQueue::new();
        queue.set_fail_sends(true);

        let err = queue
            .send("memory://index", &OutboundMessage::new("x"))
            .await
            .unwrap_err();

        assert_eq!(err.queue_url(), Some("memory://index"));
        assert_eq!(queue.send_count(), 1);
        assert!(queue.sent().await.is_empty());
    }

    #[tokio::test]
    async fn test_empty_queue_url() {
        let queue = MemoryQueue::new();
        assert!(matches!(
            queue.send("", &OutboundMessage::new("x")).await,
            Err(QueueError::InvalidQueueUrl(_))
        ));
    }
}
