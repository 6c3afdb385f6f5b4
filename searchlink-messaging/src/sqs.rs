//! AWS SQS queue backend.

use async_trait::async_trait;
use aws_sdk_sqs::{
    Client,
    config::{BehaviorVersion, Credentials, Region},
    types::MessageAttributeValue,
};
use tracing::{debug, info, warn};

use crate::envelope::OutboundMessage;
use crate::error::QueueError;
use crate::queue::MessageQueue;

const CREDENTIALS_PROVIDER: &str = "searchlink";

/// Queue backend sending through SQS.
#[derive(Debug, Clone)]
pub struct SqsQueue {
    client: Client,
}

impl SqsQueue {
    /// Create a backend using the default AWS credential chain.
    pub async fn from_env() -> Self {
        let aws_config = aws_config::load_defaults(BehaviorVersion::latest()).await;
        info!("Initialized SQS queue from environment");

        Self {
            client: Client::new(&aws_config),
        }
    }

    /// Create a backend from static credentials.
    pub fn with_credentials(
        region: impl Into<String>,
        access_key_id: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Self {
        let region = region.into();
        let credentials = Credentials::new(
            access_key_id,
            secret_key,
            None,
            None,
            CREDENTIALS_PROVIDER,
        );
        let config = aws_sdk_sqs::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(region.clone()))
            .credentials_provider(credentials)
            .build();

        info!(region = %region, "Initialized SQS queue");

        Self {
            client: Client::from_conf(config),
        }
    }

    /// Create from an existing SDK client.
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl MessageQueue for SqsQueue {
    async fn send(&self, queue_url: &str, message: &OutboundMessage) -> Result<String, QueueError> {
        if queue_url.is_empty() {
            return Err(QueueError::InvalidQueueUrl(queue_url.to_string()));
        }

        let mut request = self
            .client
            .send_message()
            .queue_url(queue_url)
            .message_body(message.body());

        for (name, attribute) in message.attributes() {
            let value = MessageAttributeValue::builder()
                .data_type(attribute.data_type())
                .string_value(attribute.value())
                .build()
                .map_err(|e| QueueError::InvalidAttribute {
                    name: name.clone(),
                    message: e.to_string(),
                })?;
            request = request.message_attributes(name, value);
        }

        debug!(queue_url, bytes = message.body().len(), "Publishing to SQS");

        let response = request.send().await.map_err(|e| QueueError::Send {
            queue_url: queue_url.to_string(),
            message: e.to_string(),
        })?;

        accepted_message_id(queue_url, response.message_id())
    }
}

// The message was accepted even when no id comes back, so this must not be
// reported as a failed send.
fn accepted_message_id(queue_url: &str, message_id: Option<&str>) -> Result<String, QueueError> {
    match message_id {
        Some(id) => Ok(id.to_string()),
        None => {
            warn!(queue_url, "SQS accepted the message but returned no message id");
            Err(QueueError::MissingMessageId {
                queue_url: queue_url.to_string(),
            })
        }
    }
}
