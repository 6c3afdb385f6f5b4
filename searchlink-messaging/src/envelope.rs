//! Queue message envelope.
//!
//! Offloaded payloads follow the Amazon SQS Extended Client convention so
//! that existing consumers can read them: the message body is a pointer
//! array and the `ExtendedPayloadSize` number attribute marks the message
//! as offloaded.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{MessagingError, Result};

/// First element of the pointer array.
pub const POINTER_CLASS: &str = "software.amazon.payloadoffloading.PayloadS3Pointer";

/// Attribute carrying the original payload size of an offloaded message.
pub const EXTENDED_PAYLOAD_SIZE_ATTRIBUTE: &str = "ExtendedPayloadSize";

/// Marker attribute written by older extended clients.
pub const LEGACY_PAYLOAD_SIZE_ATTRIBUTE: &str = "SQSLargePayloadSize";

#[derive(Debug, Serialize, Deserialize)]
struct S3Pointer {
    #[serde(rename = "s3BucketName")]
    bucket: String,
    #[serde(rename = "s3Key")]
    key: String,
}

/// Location and size of an offloaded payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OffloadedReference {
    bucket: String,
    key: String,
    size_bytes: u64,
}

impl OffloadedReference {
    /// Create a reference.
    pub fn new(bucket: impl Into<String>, key: impl Into<String>, size_bytes: u64) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
            size_bytes,
        }
    }

    /// Bucket holding the payload.
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Key of the payload.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Size of the payload in bytes.
    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    /// Pointer body: `["<class>",{"s3BucketName":"..","s3Key":".."}]`.
    pub fn pointer_body(&self) -> Result<String> {
        let pointer = S3Pointer {
            bucket: self.bucket.clone(),
            key: self.key.clone(),
        };
        Ok(serde_json::to_string(&(POINTER_CLASS, pointer))?)
    }

    /// Parse a pointer body together with the size from the marker attribute.
    pub fn from_pointer_body(body: &str, size_bytes: u64) -> Result<Self> {
        let (class, pointer): (String, S3Pointer) = serde_json::from_str(body)
            .map_err(|e| MessagingError::InvalidEnvelope(format!("malformed pointer: {}", e)))?;

        if class != POINTER_CLASS {
            return Err(MessagingError::InvalidEnvelope(format!(
                "unexpected pointer class '{}'",
                class
            )));
        }

        Ok(Self::new(pointer.bucket, pointer.key, size_bytes))
    }
}

/// What a producer places on the queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageEnvelope {
    /// The payload itself.
    Inline(Bytes),
    /// A reference to the payload in the blob store.
    Offloaded(OffloadedReference),
}

impl MessageEnvelope {
    /// Whether the payload was offloaded.
    pub fn is_offloaded(&self) -> bool {
        matches!(self, Self::Offloaded(_))
    }

    /// The reference, if offloaded.
    pub fn reference(&self) -> Option<&OffloadedReference> {
        match self {
            Self::Offloaded(reference) => Some(reference),
            Self::Inline(_) => None,
        }
    }

    /// Render the queue message for this envelope.
    pub fn to_outbound(&self) -> Result<OutboundMessage> {
        match self {
            Self::Inline(body) => {
                let text = std::str::from_utf8(body).map_err(|e| {
                    MessagingError::InvalidEnvelope(format!("inline body is not UTF-8: {}", e))
                })?;
                Ok(OutboundMessage::new(text))
            }
            Self::Offloaded(reference) => Ok(OutboundMessage::new(reference.pointer_body()?)
                .with_number_attribute(
                    EXTENDED_PAYLOAD_SIZE_ATTRIBUTE,
                    reference.size_bytes(),
                )),
        }
    }
}

/// A typed message attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageAttribute {
    /// `String` attribute.
    String(String),
    /// `Number` attribute, kept in its decimal text form.
    Number(String),
}

impl MessageAttribute {
    /// SQS data type name.
    pub fn data_type(&self) -> &'static str {
        match self {
            Self::String(_) => "String",
            Self::Number(_) => "Number",
        }
    }

    /// Attribute value as text.
    pub fn value(&self) -> &str {
        match self {
            Self::String(value) | Self::Number(value) => value,
        }
    }
}

/// A message ready to hand to a queue backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    body: String,
    attributes: BTreeMap<String, MessageAttribute>,
}

impl OutboundMessage {
    /// Create a message with no attributes.
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            attributes: BTreeMap::new(),
        }
    }

    /// Add a string attribute.
    pub fn with_string_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes
            .insert(name.into(), MessageAttribute::String(value.into()));
        self
    }

    /// Add a number attribute.
    pub fn with_number_attribute(mut self, name: impl Into<String>, value: u64) -> Self {
        self.attributes
            .insert(name.into(), MessageAttribute::Number(value.to_string()));
        self
    }

    /// Message body.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// All attributes.
    pub fn attributes(&self) -> &BTreeMap<String, MessageAttribute> {
        &self.attributes
    }

    /// A single attribute.
    pub fn attribute(&self, name: &str) -> Option<&MessageAttribute> {
        self.attributes.get(name)
    }

    /// Whether the message carries an offload marker.
    pub fn is_offloaded(&self) -> bool {
        offload_marker(&self.attributes).is_some()
    }
}

/// Find the offload marker attribute, current name first.
pub(crate) fn offload_marker(
    attributes: &BTreeMap<String, MessageAttribute>,
) -> Option<&MessageAttribute> {
    attributes
        .get(EXTENDED_PAYLOAD_SIZE_ATTRIBUTE)
        .or_else(|| attributes.get(LEGACY_PAYLOAD_SIZE_ATTRIBUTE))
}
