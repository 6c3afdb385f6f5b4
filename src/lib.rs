// searchlink - signed search and large-payload queue publishing
//
// This library ties together SigV4 request signing, a typed search query
// client and an index command producer that offloads oversized payloads to
// a blob store using the SQS Extended Client pointer convention.

// Re-export the signer
pub use searchlink_signer::{
    Credential, RequestSigner, SignableRequest, SigningError, SigningSettings,
};

// Re-export optional crates
#[cfg(feature = "search")]
pub use searchlink_search;

#[cfg(feature = "storage")]
pub use searchlink_storage;

#[cfg(feature = "messaging")]
pub use searchlink_messaging;

#[cfg(feature = "config")]
pub use searchlink_config;

pub use searchlink_signer;

// Prelude for common imports
pub mod prelude {
    pub use crate::{Credential, RequestSigner, SignableRequest};

    #[cfg(feature = "search")]
    pub use searchlink_search::{SearchClient, SearchError, SearchQuery};

    #[cfg(feature = "storage")]
    pub use searchlink_storage::{BlobStore, BlobStoreError, MemoryBlobStore};

    #[cfg(feature = "messaging")]
    pub use searchlink_messaging::{
        DeliveryReceipt, IndexCommand, IndexDocument, IndexProducer, MemoryQueue,
        MessageQueue, MessagingError, OffloadDecider, OffloadPolicy, PayloadResolver, Site,
        Verb,
    };

    #[cfg(feature = "config")]
    pub use searchlink_config::{ConfigError, PublishSettings, SearchSettings};
}
