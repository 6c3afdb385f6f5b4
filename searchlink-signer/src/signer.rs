//! SigV4 signature computation.

use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};
use tracing::trace;
use url::Url;

use crate::{CanonicalRequest, Credential, Result, SignableRequest, SigningError};

type HmacSha256 = Hmac<Sha256>;

/// Algorithm name carried in the authorization header.
pub const ALGORITHM: &str = "AWS4-HMAC-SHA256";

/// Header names written by the signer.
pub mod headers {
    /// Authorization header.
    pub const AUTHORIZATION: &str = "authorization";

    /// Signing timestamp header.
    pub const AMZ_DATE: &str = "x-amz-date";

    /// Body hash header.
    pub const CONTENT_SHA256: &str = "x-amz-content-sha256";

    /// Host header.
    pub const HOST: &str = "host";
}

/// Signer options.
#[derive(Debug, Clone)]
pub struct SigningSettings {
    /// Add an `x-amz-content-sha256` header and sign it.
    pub include_content_sha256: bool,
}

impl Default for SigningSettings {
    fn default() -> Self {
        Self {
            include_content_sha256: true,
        }
    }
}

/// Signs [`SignableRequest`]s with AWS Signature Version 4.
#[derive(Debug, Clone, Default)]
pub struct RequestSigner {
    settings: SigningSettings,
}

impl RequestSigner {
    /// Create a signer with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a signer with explicit settings.
    pub fn with_settings(settings: SigningSettings) -> Self {
        Self { settings }
    }

    /// Signer settings.
    pub fn settings(&self) -> &SigningSettings {
        &self.settings
    }

    /// Return a signed copy of `request`.
    ///
    /// The copy gains `host` (when absent), `x-amz-date`, optionally
    /// `x-amz-content-sha256`, and `authorization`. Every header present on
    /// the copy is signed.
    pub fn sign(
        &self,
        request: &SignableRequest,
        credential: &Credential,
    ) -> Result<SignableRequest> {
        credential.validate()?;

        let payload_hash = hex_sha256(request.body());

        match request.header(headers::CONTENT_SHA256) {
            Some(declared) if declared != payload_hash => {
                return Err(SigningError::BodyHashMismatch {
                    declared: declared.to_string(),
                    computed: payload_hash,
                });
            }
            None if !self.settings.include_content_sha256 && requires_body_hash(credential) => {
                return Err(SigningError::MissingBodyHash);
            }
            _ => {}
        }

        let mut signed = request.clone();
        signed.remove_header(headers::AUTHORIZATION);

        if signed.header(headers::HOST).is_none() {
            let host = host_header(request.uri())
                .ok_or_else(|| SigningError::MissingHost(request.uri().to_string()))?;
            signed.insert_header(headers::HOST, host);
        }

        let timestamp = request.timestamp();
        let amz_date = timestamp.format("%Y%m%dT%H%M%SZ").to_string();
        signed.insert_header(headers::AMZ_DATE, amz_date.clone());

        if self.settings.include_content_sha256 {
            signed.insert_header(headers::CONTENT_SHA256, payload_hash.clone());
        }

        let scope = credential.scope(timestamp);
        let canonical =
            CanonicalRequest::from_request(&signed, &payload_hash, credential.service() != "s3");
        let canonical_text = canonical.to_string();

        let string_to_sign = format!(
            "{}\n{}\n{}\n{}",
            ALGORITHM,
            amz_date,
            scope,
            hex_sha256(canonical_text.as_bytes())
        );

        let key = derive_signing_key(
            credential.secret_key(),
            &scope.date,
            credential.region(),
            credential.service(),
        );
        let signature = hex::encode(hmac_sha256(&key, string_to_sign.as_bytes()));

        trace!(
            method = %canonical.method,
            uri = %canonical.uri,
            signed_headers = %canonical.signed_headers,
            "Signed request"
        );

        signed.insert_header(
            headers::AUTHORIZATION,
            format!(
                "{} Credential={}/{}, SignedHeaders={}, Signature={}",
                ALGORITHM,
                credential.access_key_id(),
                scope,
                canonical.signed_headers,
                signature
            ),
        );

        Ok(signed)
    }
}

/// Derive the signing key: date, then region, then service, then
/// `aws4_request`.
pub fn derive_signing_key(secret: &str, date: &str, region: &str, service: &str) -> Vec<u8> {
    let k_date = hmac_sha256(format!("AWS4{}", secret).as_bytes(), date.as_bytes());
    let k_region = hmac_sha256(&k_date, region.as_bytes());
    let k_service = hmac_sha256(&k_region, service.as_bytes());
    hmac_sha256(&k_service, b"aws4_request")
}

// S3 rejects requests whose body hash is not signed.
fn requires_body_hash(credential: &Credential) -> bool {
    credential.service() == "s3"
}

fn host_header(uri: &Url) -> Option<String> {
    let host = uri.host_str()?;
    Some(match uri.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    })
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can take any size key");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}

fn hex_sha256(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}
