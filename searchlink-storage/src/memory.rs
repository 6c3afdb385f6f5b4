//! In-memory blob store.

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::RwLock;
use tracing::debug;

use crate::{
    error::{BlobStoreError, Result},
    store::{check_key, BlobStore},
};

/// Blob store held in process memory.
///
/// Counts every `put` attempt, including failed ones, and can be told to
/// reject writes so the failure path of a caller can be exercised.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    bucket: String,
    blobs: RwLock<HashMap<String, Bytes>>,
    puts: AtomicUsize,
    fail_writes: AtomicBool,
}

impl MemoryBlobStore {
    /// Create an empty store for a bucket name.
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            ..Default::default()
        }
    }

    /// Make subsequent writes fail (or succeed again).
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of `put` calls made so far.
    pub fn put_count(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }

    /// Number of stored blobs.
    pub async fn len(&self) -> usize {
        self.blobs.read().await.len()
    }

    /// Whether no blob is stored.
    pub async fn is_empty(&self) -> bool {
        self.blobs.read().await.is_empty()
    }

    /// Stored keys, sorted.
    pub async fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.blobs.read().await.keys().cloned().collect();
        keys.sort();
        keys
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn put(&self, key: &str, data: Bytes) -> Result<()> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        check_key(key)?;

        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(BlobStoreError::Write {
                bucket: self.bucket.clone(),
                key: key.to_string(),
                message: "writes disabled".to_string(),
            });
        }

        debug!(bucket = %self.bucket, key, bytes = data.len(), "Stored blob in memory");
        self.blobs.write().await.insert(key.to_string(), data);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Bytes> {
        check_key(key)?;

        self.blobs
            .read()
            .await
            .get(key)
            .cloned()
            .ok_or_else(|| BlobStoreError::NotFound {
                bucket: self.bucket.clone(),
                key: key.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_get() {
        let store = MemoryBlobStore::new("payloads");
        store.put("k1", Bytes::from_static(b"hello")).await.unwrap();

        assert_eq!(store.get("k1").await.unwrap(), Bytes::from_static(b"hello"));
        assert_eq!(store.put_count(), 1);
        assert_eq!(store.len().await, 1);
        assert_eq!(store.bucket(), "payloads");
    }

    #[tokio::test]
    async fn test_get_missing() {
        let store = MemoryBlobStore::new("payloads");
        let err = store.get("nope").await.unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(err.bucket(), Some("payloads"));
    }

    #[tokio::test]
    async fn test_failing_writes_are_counted_and_not_stored() {
        let store = MemoryBlobStore::new("payloads");
        store.set_fail_writes(true);

        let err = store.put("k1", Bytes::from_static(b"x")).await.unwrap_err();
        assert!(matches!(err, BlobStoreError::Write { .. }));
        assert_eq!(store.put_count(), 1);
        assert!(store.is_empty().await);

        store.set_fail_writes(false);
        store.put("k1", Bytes::from_static(b"x")).await.unwrap();
        assert_eq!(store.keys().await, vec!["k1".to_string()]);
    }

    #[tokio::test]
    async fn test_put_replaces() {
        let store = MemoryBlobStore::new("payloads");
        store.put("k", Bytes::from_static(b"a")).await.unwrap();
        store.put("k", Bytes::from_static(b"b")).await.unwrap();

        assert_eq!(store.get("k").await.unwrap(), Bytes::from_static(b"b"));
        assert_eq!(store.len().await, 1);
    }
}
