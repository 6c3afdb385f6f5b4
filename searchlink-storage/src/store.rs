//! Blob store trait.

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::{BlobStoreError, Result};

/// Storage for payload blobs.
///
/// Blobs are written once and never tracked afterwards; their lifetime
/// belongs to the bucket's own retention rules.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Bucket every key of this store lives in.
    fn bucket(&self) -> &str;

    /// Store bytes under a key, replacing any previous blob.
    async fn put(&self, key: &str, data: Bytes) -> Result<()>;

    /// Retrieve the bytes stored under a key.
    async fn get(&self, key: &str) -> Result<Bytes>;
}

/// Generate a fresh, collision-free blob key.
pub fn generate_key() -> String {
    uuid::Uuid::new_v4().to_string()
}

pub(crate) fn check_key(key: &str) -> Result<()> {
    if key.is_empty() || key.starts_with('/') {
        return Err(BlobStoreError::InvalidKey(key.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generated_keys_are_uuids() {
        let key = generate_key();
        assert_eq!(uuid::Uuid::parse_str(&key).unwrap().get_version_num(), 4);
    }

    #[test]
    fn test_generated_keys_unique() {
        let keys: HashSet<String> = (0..1000).map(|_| generate_key()).collect();
        assert_eq!(keys.len(), 1000);
    }

    #[test]
    fn test_check_key() {
        assert!(check_key("a/b").is_ok());
        assert!(check_key("").is_err());
        assert!(check_key("/abs").is_err());
    }
}
