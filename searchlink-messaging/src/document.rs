//! Searchable document model.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

use crate::error::{MessagingError, Result};

/// Site a document belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Site {
    /// Main website.
    Website,
    /// Data hub.
    Datahub,
    /// Special Areas of Conservation.
    Sac,
    /// Marine Habitat Classification.
    Mhc,
}

impl Site {
    /// Every site.
    pub const ALL: [Site; 4] = [Site::Website, Site::Datahub, Site::Sac, Site::Mhc];

    /// Wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Site::Website => "website",
            Site::Datahub => "datahub",
            Site::Sac => "sac",
            Site::Mhc => "mhc",
        }
    }
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Site {
    type Err = MessagingError;

    fn from_str(s: &str) -> Result<Self> {
        Site::ALL
            .into_iter()
            .find(|site| site.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                MessagingError::validation(
                    "site",
                    format!("'{}' is not one of website, datahub, sac, mhc", s),
                )
            })
    }
}

/// A keyword from a controlled vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keyword {
    /// Vocabulary URI.
    pub vocab: String,
    /// Term within the vocabulary.
    pub value: String,
}

impl Keyword {
    /// Create a keyword.
    pub fn new(vocab: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            vocab: vocab.into(),
            value: value.into(),
        }
    }
}

/// A document to index.
///
/// Absent optional fields are left out of the JSON entirely; `null` is
/// never written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexDocument {
    id: String,
    site: Site,
    title: String,
    content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    url: Option<String>,
    #[serde(default)]
    keywords: Vec<Keyword>,
    published_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    content_base64: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    mime_type: Option<String>,
}

impl IndexDocument {
    /// Create a document with a generated id.
    pub fn new(
        site: Site,
        title: impl Into<String>,
        content: impl Into<String>,
        published_date: NaiveDate,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            site,
            title: title.into(),
            content: content.into(),
            url: None,
            keywords: Vec::new(),
            published_date,
            content_base64: None,
            mime_type: None,
        }
    }

    /// Use a caller-assigned id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Set the click-through URL.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Append a keyword.
    pub fn with_keyword(mut self, vocab: impl Into<String>, value: impl Into<String>) -> Self {
        self.keywords.push(Keyword::new(vocab, value));
        self
    }

    /// Attach binary content (a PDF, for instance), base64-encoding it.
    pub fn with_attachment(mut self, mime_type: impl Into<String>, data: &[u8]) -> Self {
        self.content_base64 = Some(STANDARD.encode(data));
        self.mime_type = Some(mime_type.into());
        self
    }

    /// Set already-encoded content.
    pub fn with_content_base64(mut self, encoded: impl Into<String>) -> Self {
        self.content_base64 = Some(encoded.into());
        self
    }

    /// Set the MIME type of the encoded content.
    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    /// Document id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Owning site.
    pub fn site(&self) -> Site {
        self.site
    }

    /// Title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Searchable text.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Click-through URL.
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Keywords in order.
    pub fn keywords(&self) -> &[Keyword] {
        &self.keywords
    }

    /// Publication date.
    pub fn published_date(&self) -> NaiveDate {
        self.published_date
    }

    /// Base64-encoded binary content.
    pub fn content_base64(&self) -> Option<&str> {
        self.content_base64.as_deref()
    }

    /// MIME type of the binary content.
    pub fn mime_type(&self) -> Option<&str> {
        self.mime_type.as_deref()
    }

    /// Decode the attached binary content.
    pub fn decode_attachment(&self) -> Result<Option<Vec<u8>>> {
        self.content_base64
            .as_deref()
            .map(|encoded| {
                STANDARD
                    .decode(encoded)
                    .map_err(|e| MessagingError::validation("content_base64", e.to_string()))
            })
            .transpose()
    }

    /// Check field-level rules.
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(MessagingError::validation("id", "must not be empty"));
        }

        match (&self.content_base64, &self.mime_type) {
            (None, Some(_)) => {
                return Err(MessagingError::validation(
                    "mime_type",
                    "requires content_base64",
                ));
            }
            (Some(_), None) => {
                warn!(id = %self.id, "Document carries content_base64 without mime_type");
            }
            _ => {}
        }

        if let Some(mime_type) = &self.mime_type {
            if !mime_type.contains('/') {
                return Err(MessagingError::validation(
                    "mime_type",
                    format!("'{}' is not a MIME type", mime_type),
                ));
            }
        }

        self.decode_attachment()?;

        Ok(())
    }
}
