//! Blob storage for queue payloads too large to send inline.
//!
//! This crate provides:
//! - [`BlobStore`], the write/read seam used by the offload path
//! - [`MemoryBlobStore`], an in-process backend with call counters
//! - `S3BlobStore` (feature `s3`), backed by `aws-sdk-s3`
//!
//! # Example
//!
//! ```
//! use bytes::Bytes;
//! use searchlink_storage::{generate_key, BlobStore, MemoryBlobStore};
//!
//! # async fn example() -> Result<(), searchlink_storage::BlobStoreError> {
//! let store = MemoryBlobStore::new("payloads");
//! let key = generate_key();
//!
//! store.put(&key, Bytes::from_static(b"{\"verb\":\"upsert\"}")).await?;
//! assert_eq!(store.get(&key).await?, Bytes::from_static(b"{\"verb\":\"upsert\"}"));
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod error;
mod memory;
mod store;

#[cfg(feature = "s3")]
mod s3;

pub use error::{BlobStoreError, Result};
pub use memory::MemoryBlobStore;
pub use store::{generate_key, BlobStore};

#[cfg(feature = "s3")]
#[cfg_attr(docsrs, doc(cfg(feature = "s3")))]
pub use s3::S3BlobStore;
