// Typed settings for the search and publish paths

use crate::source::{ConfigSource, EnvSource};
use crate::{ConfigError, Result};
use once_cell::sync::OnceCell;
use searchlink_signer::Credential;
use std::sync::Arc;
use tracing::info;
use url::Url;

/// Signing service name of the search cluster.
pub const SEARCH_SERVICE: &str = "es";

/// Signing service name of the queue.
pub const QUEUE_SERVICE: &str = "sqs";

/// Index searched when `ELASTICSEARCH_INDEX` is not set.
pub const DEFAULT_INDEX: &str = "test";

/// Environment keys.
pub mod keys {
    pub const ELASTICSEARCH_AWS_REGION: &str = "ELASTICSEARCH_AWS_REGION";
    pub const ELASTICSEARCH_AWS_ACCESSKEY: &str = "ELASTICSEARCH_AWS_ACCESSKEY";
    pub const ELASTICSEARCH_AWS_SECRETACCESSKEY: &str = "ELASTICSEARCH_AWS_SECRETACCESSKEY";
    pub const ELASTICSEARCH_ENDPOINT: &str = "ELASTICSEARCH_ENDPOINT";
    pub const ELASTICSEARCH_INDEX: &str = "ELASTICSEARCH_INDEX";

    pub const AWS_REGION: &str = "AWS_REGION";
    pub const AWS_ACCESSKEY: &str = "AWS_ACCESSKEY";
    pub const AWS_SECRETACCESSKEY: &str = "AWS_SECRETACCESSKEY";
    pub const SQS_ENDPOINT: &str = "SQS_ENDPOINT";
    pub const SQS_PAYLOAD_BUCKET: &str = "SQS_PAYLOAD_BUCKET";
    pub const SQS_PAYLOAD_THRESHOLD: &str = "SQS_PAYLOAD_THRESHOLD";
    pub const SQS_MAX_MESSAGE_SIZE: &str = "SQS_MAX_MESSAGE_SIZE";
}

static SEARCH: OnceCell<SearchSettings> = OnceCell::new();
static PUBLISH: OnceCell<PublishSettings> = OnceCell::new();

/// Settings for signed searches.
#[derive(Debug, Clone)]
pub struct SearchSettings {
    credential: Arc<Credential>,
    endpoint: Url,
    index: String,
}

impl SearchSettings {
    /// Read settings from a source. Nothing is returned unless every
    /// required key is present and valid.
    pub fn from_source(source: &impl ConfigSource) -> Result<Self> {
        let region = source.required(keys::ELASTICSEARCH_AWS_REGION)?;
        let access_key_id = source.required(keys::ELASTICSEARCH_AWS_ACCESSKEY)?;
        let secret_key = source.required(keys::ELASTICSEARCH_AWS_SECRETACCESSKEY)?;
        let endpoint = parse_url(keys::ELASTICSEARCH_ENDPOINT, &source.required(keys::ELASTICSEARCH_ENDPOINT)?)?;
        let index = source
            .optional(keys::ELASTICSEARCH_INDEX)
            .unwrap_or_else(|| DEFAULT_INDEX.to_string());

        Ok(Self {
            credential: Arc::new(Credential::new(access_key_id, secret_key, region, SEARCH_SERVICE)),
            endpoint,
            index,
        })
    }

    /// Read the process environment (and `.env`) once; later calls return
    /// the same value.
    pub fn load() -> Result<&'static Self> {
        load_once(&SEARCH, || {
            let settings = Self::from_source(&EnvSource::with_dotenv(None)?)?;
            info!(endpoint = %settings.endpoint, index = %settings.index, region = settings.credential.region(), "Search settings loaded");
            Ok(settings)
        })
    }

    /// Signing credential, service `es`.
    pub fn credential(&self) -> &Arc<Credential> {
        &self.credential
    }

    /// Cluster endpoint.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Default index.
    pub fn index(&self) -> &str {
        &self.index
    }
}

/// Settings for publishing to the queue.
#[derive(Debug, Clone)]
pub struct PublishSettings {
    credential: Arc<Credential>,
    queue_url: Url,
    payload_bucket: String,
    payload_threshold: Option<usize>,
    max_message_size: Option<usize>,
}

impl PublishSettings {
    /// Read settings from a source. Nothing is returned unless every
    /// required key is present and valid.
    pub fn from_source(source: &impl ConfigSource) -> Result<Self> {
        let region = source.required(keys::AWS_REGION)?;
        let access_key_id = source.required(keys::AWS_ACCESSKEY)?;
        let secret_key = source.required(keys::AWS_SECRETACCESSKEY)?;
        let queue_url = parse_url(keys::SQS_ENDPOINT, &source.required(keys::SQS_ENDPOINT)?)?;
        let payload_bucket = source.required(keys::SQS_PAYLOAD_BUCKET)?;
        let payload_threshold = source.parsed::<usize>(keys::SQS_PAYLOAD_THRESHOLD)?;
        let max_message_size = source.parsed::<usize>(keys::SQS_MAX_MESSAGE_SIZE)?;

        Ok(Self {
            credential: Arc::new(Credential::new(access_key_id, secret_key, region, QUEUE_SERVICE)),
            queue_url,
            payload_bucket,
            payload_threshold,
            max_message_size,
        })
    }

    /// Read the process environment (and `.env`) once; later calls return
    /// the same value.
    pub fn load() -> Result<&'static Self> {
        load_once(&PUBLISH, || {
            let settings = Self::from_source(&EnvSource::with_dotenv(None)?)?;
            info!(queue_url = %settings.queue_url, bucket = %settings.payload_bucket, region = settings.credential.region(), "Publish settings loaded");
            Ok(settings)
        })
    }

    /// Credential shared by the queue and the payload bucket.
    pub fn credential(&self) -> &Arc<Credential> {
        &self.credential
    }

    /// AWS region.
    pub fn region(&self) -> &str {
        self.credential.region()
    }

    /// Queue URL.
    pub fn queue_url(&self) -> &Url {
        &self.queue_url
    }

    /// Bucket receiving offloaded payloads.
    pub fn payload_bucket(&self) -> &str {
        &self.payload_bucket
    }

    /// Offload threshold override, in bytes.
    pub fn payload_threshold(&self) -> Option<usize> {
        self.payload_threshold
    }

    /// Queue message size limit override, in bytes.
    pub fn max_message_size(&self) -> Option<usize> {
        self.max_message_size
    }
}

/// Initialize a cell once; a failed attempt leaves it empty.
pub(crate) fn load_once<T>(
    cell: &'static OnceCell<T>,
    init: impl FnOnce() -> Result<T>,
) -> Result<&'static T> {
    cell.get_or_try_init(init)
}

fn parse_url(key: &str, value: &str) -> Result<Url> {
    let url = Url::parse(value).map_err(|e| ConfigError::Invalid {
        key: key.to_string(),
        message: e.to_string(),
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::Invalid {
            key: key.to_string(),
            message: format!("unsupported scheme '{}'", url.scheme()),
        });
    }

    Ok(url)
}
