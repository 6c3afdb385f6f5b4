//! AWS S3 blob store.

use async_trait::async_trait;
use aws_sdk_s3::{
    Client,
    config::{BehaviorVersion, Credentials, Region},
    primitives::ByteStream,
};
use bytes::Bytes;
use tracing::{debug, info};

use crate::{
    error::{BlobStoreError, Result},
    store::{check_key, BlobStore},
};

const CREDENTIALS_PROVIDER: &str = "searchlink";

/// Blob store writing to a single S3 bucket.
#[derive(Debug, Clone)]
pub struct S3BlobStore {
    client: Client,
    bucket: String,
}

impl S3BlobStore {
    /// Create a store using the default AWS credential chain.
    pub async fn from_env(bucket: impl Into<String>) -> Self {
        let aws_config = aws_config::load_defaults(BehaviorVersion::latest()).await;
        let bucket = bucket.into();

        info!(bucket = %bucket, "Initialized S3 blob store");

        Self {
            client: Client::new(&aws_config),
            bucket,
        }
    }

    /// Create a store from static credentials.
    pub fn with_credentials(
        bucket: impl Into<String>,
        region: impl Into<String>,
        access_key_id: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Result<Self> {
        let bucket = bucket.into();
        let region = region.into();
        if bucket.is_empty() {
            return Err(BlobStoreError::Config("bucket name is empty".to_string()));
        }
        if region.is_empty() {
            return Err(BlobStoreError::Config("region is empty".to_string()));
        }

        let credentials = Credentials::new(
            access_key_id,
            secret_key,
            None,
            None,
            CREDENTIALS_PROVIDER,
        );
        let config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(region.clone()))
            .credentials_provider(credentials)
            .build();

        info!(bucket = %bucket, region = %region, "Initialized S3 blob store");

        Ok(Self {
            client: Client::from_conf(config),
            bucket,
        })
    }

    /// Create from an existing SDK client.
    pub fn from_client(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }
}

#[async_trait]
impl BlobStore for S3BlobStore {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn put(&self, key: &str, data: Bytes) -> Result<()> {
        check_key(key)?;
        let size = data.len();

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_length(size as i64)
            .body(ByteStream::from(data))
            .send()
            .await
            .map_err(|e| BlobStoreError::Write {
                bucket: self.bucket.clone(),
                key: key.to_string(),
                message: e.to_string(),
            })?;

        debug!(bucket = %self.bucket, key, bytes = size, "Uploaded blob to S3");

        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Bytes> {
        check_key(key)?;

        let response = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                if e.as_service_error().is_some_and(|se| se.is_no_such_key()) {
                    BlobStoreError::NotFound {
                        bucket: self.bucket.clone(),
                        key: key.to_string(),
                    }
                } else {
                    BlobStoreError::Read {
                        bucket: self.bucket.clone(),
                        key: key.to_string(),
                        message: e.to_string(),
                    }
                }
            })?;

        let bytes = response
            .body
            .collect()
            .await
            .map_err(|e| BlobStoreError::Read {
                bucket: self.bucket.clone(),
                key: key.to_string(),
                message: e.to_string(),
            })?;

        Ok(bytes.into_bytes())
    }
}
