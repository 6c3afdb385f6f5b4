//! Search client implementation.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use http::{Method, StatusCode};
use searchlink_signer::{Credential, RequestSigner, SignableRequest};
use std::sync::Arc;
use tracing::{debug, warn};
use url::Url;

use crate::{
    error::{Result, SearchError},
    query::SearchQuery,
};

/// Source of signing timestamps.
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Client issuing signed, read-only searches.
///
/// Every call is a single request with no retry; deadlines belong on the
/// `reqwest::Client` handed to [`SearchClient::with_http_client`].
#[derive(Clone)]
pub struct SearchClient {
    http: reqwest::Client,
    endpoint: Url,
    credential: Arc<Credential>,
    signer: RequestSigner,
    clock: Clock,
}

impl SearchClient {
    /// Create a client for a cluster endpoint.
    pub fn new(endpoint: Url, credential: Arc<Credential>) -> Result<Self> {
        if !matches!(endpoint.scheme(), "http" | "https") || endpoint.host_str().is_none() {
            return Err(SearchError::InvalidEndpoint(endpoint.to_string()));
        }

        // Url::join replaces the last segment unless the path ends with '/'.
        let mut endpoint = endpoint;
        if !endpoint.path().ends_with('/') {
            let path = format!("{}/", endpoint.path());
            endpoint.set_path(&path);
        }

        debug!(endpoint = %endpoint, region = credential.region(), "Search client initialized");

        Ok(Self {
            http: reqwest::Client::new(),
            endpoint,
            credential,
            signer: RequestSigner::new(),
            clock: Arc::new(Utc::now),
        })
    }

    /// Use a preconfigured HTTP client (timeouts, proxies, TLS).
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http = client;
        self
    }

    /// Use a different signer.
    pub fn with_signer(mut self, signer: RequestSigner) -> Self {
        self.signer = signer;
        self
    }

    /// Use a fixed or custom clock for signing timestamps.
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Cluster endpoint, always ending in `/`.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// `<endpoint>/<index>/_search`
    pub fn search_url(&self, index: &str) -> Result<Url> {
        if index.is_empty() || index.contains(['/', '?', '#']) {
            return Err(SearchError::InvalidIndex(index.to_string()));
        }

        self.endpoint
            .join(&format!("{}/_search", index))
            .map_err(|e| SearchError::InvalidEndpoint(e.to_string()))
    }

    /// Build and sign the request for a search without sending it.
    pub fn signed_request(&self, index: &str, query: &SearchQuery) -> Result<SignableRequest> {
        let url = self.search_url(index)?;
        let body = query.to_body()?;

        let request = SignableRequest::new(Method::POST, url, (self.clock)())
            .with_header("content-type", "application/json")
            .with_body(body);

        Ok(self.signer.sign(&request, &self.credential)?)
    }

    /// Run a search and return the unparsed response body.
    pub async fn search(&self, index: &str, query: &SearchQuery) -> Result<Bytes> {
        let signed = self.signed_request(index, query)?;

        debug!(
            url = %signed.uri(),
            from = query.from(),
            size = query.size().get(),
            site = query.site(),
            "Dispatching search"
        );

        let mut request = self
            .http
            .request(signed.method().clone(), signed.uri().clone())
            .body(signed.body().clone());
        for (name, value) in signed.headers() {
            request = request.header(name, value);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            warn!(status = status.as_u16(), index, "Search request rejected");
            return Err(SearchError::Auth {
                status: status.as_u16(),
                message: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        if !status.is_success() {
            return Err(SearchError::Http {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        debug!(status = status.as_u16(), bytes = body.len(), "Search completed");

        Ok(body)
    }
}

impl std::fmt::Debug for SearchClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchClient")
            .field("endpoint", &self.endpoint.as_str())
            .field("credential", &self.credential)
            .finish()
    }
}
