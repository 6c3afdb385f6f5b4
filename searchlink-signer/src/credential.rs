//! Signing credentials and credential scope.

use chrono::{DateTime, Utc};
use std::fmt;

use crate::{Result, SigningError};

/// Suffix terminating every SigV4 credential scope.
const SCOPE_TERMINATOR: &str = "aws4_request";

/// Access key pair bound to a region and service.
///
/// Loaded once per process and shared read-only. The secret never appears
/// in `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    access_key_id: String,
    secret_key: String,
    region: String,
    service: String,
}

impl Credential {
    /// Create a credential.
    pub fn new(
        access_key_id: impl Into<String>,
        secret_key: impl Into<String>,
        region: impl Into<String>,
        service: impl Into<String>,
    ) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_key: secret_key.into(),
            region: region.into(),
            service: service.into(),
        }
    }

    /// Access key id.
    pub fn access_key_id(&self) -> &str {
        &self.access_key_id
    }

    /// Secret access key.
    pub fn secret_key(&self) -> &str {
        &self.secret_key
    }

    /// Region the credential signs for.
    pub fn region(&self) -> &str {
        &self.region
    }

    /// Service name the credential signs for (`es`, `sqs`, ...).
    pub fn service(&self) -> &str {
        &self.service
    }

    /// Reject credentials with blank fields.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("access_key_id", &self.access_key_id),
            ("secret_key", &self.secret_key),
            ("region", &self.region),
            ("service", &self.service),
        ];

        for (name, value) in fields {
            if value.trim().is_empty() {
                return Err(SigningError::EmptyCredentialField(name));
            }
        }

        Ok(())
    }

    /// Scope of this credential on the given day.
    pub fn scope(&self, timestamp: DateTime<Utc>) -> CredentialScope {
        CredentialScope {
            date: timestamp.format("%Y%m%d").to_string(),
            region: self.region.clone(),
            service: self.service.clone(),
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("access_key_id", &self.access_key_id)
            .field("secret_key", &"<redacted>")
            .field("region", &self.region)
            .field("service", &self.service)
            .finish()
    }
}

/// `<date>/<region>/<service>/aws4_request`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialScope {
    /// Day in `YYYYMMDD` form.
    pub date: String,
    /// Region.
    pub region: String,
    /// Service.
    pub service: String,
}

impl fmt::Display for CredentialScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}/{}",
            self.date, self.region, self.service, SCOPE_TERMINATOR
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_debug_redacts_secret() {
        let credential = Credential::new("AKID", "super-secret", "eu-west-1", "es");
        let debug = format!("{:?}", credential);

        assert!(debug.contains("AKID"));
        assert!(!debug.contains("super-secret"));
    }

    #[test]
    fn test_validate_names_empty_field() {
        let credential = Credential::new("AKID", " ", "eu-west-1", "es");
        assert_eq!(
            credential.validate(),
            Err(SigningError::EmptyCredentialField("secret_key"))
        );

        let credential = Credential::new("AKID", "secret", "eu-west-1", "");
        assert_eq!(
            credential.validate(),
            Err(SigningError::EmptyCredentialField("service"))
        );
    }

    #[test]
    fn test_scope_format() {
        let credential = Credential::new("AKID", "secret", "eu-west-1", "es");
        let timestamp = Utc.with_ymd_and_hms(2019, 1, 14, 23, 59, 59).unwrap();

        assert_eq!(
            credential.scope(timestamp).to_string(),
            "20190114/eu-west-1/es/aws4_request"
        );
    }
}
