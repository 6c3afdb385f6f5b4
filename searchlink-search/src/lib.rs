//! Signed search queries for an AWS-hosted Elasticsearch/OpenSearch domain.
//!
//! This crate provides:
//! - [`SearchQuery`], a typed query document with a site filter, a
//!   common-terms relevance clause over `content`, a title boost and
//!   content highlighting
//! - [`SearchClient`], which serializes the query, signs the request with
//!   SigV4 and returns the raw response body
//!
//! # Example
//!
//! ```rust,no_run
//! use searchlink_search::{SearchClient, SearchQuery};
//! use searchlink_signer::Credential;
//! use std::num::NonZeroU32;
//! use std::sync::Arc;
//! use url::Url;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let credential = Arc::new(Credential::new("AKID", "secret", "eu-west-1", "es"));
//!     let endpoint = Url::parse("https://search-domain.eu-west-1.es.amazonaws.com/")?;
//!     let client = SearchClient::new(endpoint, credential)?;
//!
//!     let query = SearchQuery::build(0, NonZeroU32::new(10).unwrap(), "datahub", "habitats");
//!     let body = client.search("test", &query).await?;
//!
//!     println!("{}", String::from_utf8_lossy(&body));
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod client;
mod error;
mod query;

pub use client::{Clock, SearchClient};
pub use error::{Result, SearchError};
pub use query::{
    Clause, LowFreqOperator, SearchQuery, SearchQueryBuilder, CUTOFF_FREQUENCY,
    DEFAULT_MAX_RESULT_WINDOW, DEFAULT_SIZE,
};

/// Prelude for common imports.
pub mod prelude {
    pub use crate::{Result, SearchClient, SearchError, SearchQuery};
}
