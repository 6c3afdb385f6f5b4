//! Publishing of index commands to a queue, with large-payload offload.
//!
//! A command is serialized to JSON; payloads over the configured threshold
//! are written to a blob store and replaced on the queue by a pointer that
//! follows the Amazon SQS Extended Client convention.
//!
//! ## Features
//!
//! - `sqs` - [`SqsQueue`] backend via `aws-sdk-sqs`
//! - `s3` - S3 blob store from `searchlink-storage`
//! - `aws` - both of the above
//!
//! ## Example
//!
//! ```
//! use chrono::NaiveDate;
//! use searchlink_messaging::*;
//! use searchlink_storage::MemoryBlobStore;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<()> {
//! let store = Arc::new(MemoryBlobStore::new("payloads"));
//! let decider = OffloadDecider::new(OffloadPolicy::default(), store);
//! let producer = IndexProducer::new("memory://index", decider, Arc::new(MemoryQueue::new()));
//!
//! let document = IndexDocument::new(
//!     Site::Website,
//!     "An example searchable document",
//!     "This is a searchable document made purely for example purposes.",
//!     NaiveDate::from_ymd_opt(2019, 1, 14).unwrap(),
//! )
//! .with_keyword("http://vocab.jncc.gov.uk/jncc-web", "Example");
//!
//! let receipt = producer.publish(&IndexCommand::upsert("test", document)?).await?;
//! println!("{}", receipt.message_id());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod command;
mod document;
mod envelope;
mod error;
mod offload;
mod producer;
mod queue;
mod resolver;

#[cfg(feature = "sqs")]
mod sqs;

pub use command::{IndexCommand, Verb};
pub use document::{IndexDocument, Keyword, Site};
pub use envelope::{
    MessageAttribute, MessageEnvelope, OffloadedReference, OutboundMessage,
    EXTENDED_PAYLOAD_SIZE_ATTRIBUTE, LEGACY_PAYLOAD_SIZE_ATTRIBUTE, POINTER_CLASS,
};
pub use error::{MessagingError, QueueError, Result};
pub use offload::{
    OffloadDecider, OffloadPolicy, DEFAULT_QUEUE_LIMIT, DEFAULT_THRESHOLD, ENVELOPE_HEADROOM,
};
pub use producer::{DeliveryReceipt, IndexProducer};
pub use queue::{MemoryQueue, MessageQueue, SentMessage};
pub use resolver::PayloadResolver;

#[cfg(feature = "sqs")]
#[cfg_attr(docsrs, doc(cfg(feature = "sqs")))]
pub use sqs::SqsQueue;

/// Prelude for common imports
pub mod prelude {
    pub use crate::{
        DeliveryReceipt, IndexCommand, IndexDocument, IndexProducer, MessagingError,
        OffloadDecider, OffloadPolicy, Site, Verb,
    };
}
