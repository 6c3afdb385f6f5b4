//! Client-independent request model.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use http::Method;
use std::collections::BTreeMap;
use url::Url;

/// An HTTP request in the shape the signer needs.
///
/// Header names are stored lower-cased, so lookups are case-insensitive and
/// each name appears once. Iteration is ordered by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignableRequest {
    method: Method,
    uri: Url,
    headers: BTreeMap<String, String>,
    body: Bytes,
    timestamp: DateTime<Utc>,
}

impl SignableRequest {
    /// Create a request with no headers and an empty body.
    pub fn new(method: Method, uri: Url, timestamp: DateTime<Utc>) -> Self {
        Self {
            method,
            uri,
            headers: BTreeMap::new(),
            body: Bytes::new(),
            timestamp,
        }
    }

    /// Set a header, replacing any existing value with the same name.
    pub fn with_header(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.insert_header(name.as_ref(), value.into());
        self
    }

    /// Set the body.
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// HTTP method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Target URI.
    pub fn uri(&self) -> &Url {
        &self.uri
    }

    /// Look up a header by name, ignoring case.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Headers ordered by lower-cased name.
    pub fn headers(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Request body.
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Signing timestamp.
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub(crate) fn insert_header(&mut self, name: &str, value: String) {
        self.headers.insert(name.to_ascii_lowercase(), value);
    }

    pub(crate) fn remove_header(&mut self, name: &str) {
        self.headers.remove(&name.to_ascii_lowercase());
    }
}
