//! AWS Signature Version 4 signing for outbound HTTP requests.
//!
//! The signer works on a plain [`SignableRequest`] value rather than on a
//! particular HTTP client's request type, so the same code signs requests
//! dispatched through `reqwest`, a test double, or anything else.
//!
//! # Example
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use http::Method;
//! use searchlink_signer::{Credential, RequestSigner, SignableRequest};
//! use url::Url;
//!
//! let credential = Credential::new("AKIDEXAMPLE", "secret", "eu-west-1", "es");
//! let request = SignableRequest::new(
//!     Method::POST,
//!     Url::parse("https://search.example.com/test/_search").unwrap(),
//!     Utc.with_ymd_and_hms(2019, 1, 14, 10, 0, 0).unwrap(),
//! )
//! .with_header("content-type", "application/json")
//! .with_body(r#"{"query":{"match_all":{}}}"#);
//!
//! let signed = RequestSigner::new().sign(&request, &credential).unwrap();
//! assert!(signed.header("authorization").unwrap().starts_with("AWS4-HMAC-SHA256"));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod canonical;
mod credential;
mod error;
mod request;
mod signer;

pub use canonical::CanonicalRequest;
pub use credential::{Credential, CredentialScope};
pub use error::{Result, SigningError};
pub use request::SignableRequest;
pub use signer::{derive_signing_key, headers, RequestSigner, SigningSettings, ALGORITHM};
