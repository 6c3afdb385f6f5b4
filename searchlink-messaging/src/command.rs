//! Index commands sent to the indexing pipeline.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::document::IndexDocument;
use crate::error::{MessagingError, Result};

/// What the consumer should do with the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verb {
    /// Create or replace the document.
    Upsert,
    /// Remove the document.
    Delete,
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verb::Upsert => f.write_str("upsert"),
            Verb::Delete => f.write_str("delete"),
        }
    }
}

/// A validated indexing command.
///
/// Wire format: `{"verb", "index", "document": {...}}`. Consumers are
/// expected to treat `document.id` plus `verb` as idempotent, which makes
/// republishing after a queue failure safe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexCommand {
    verb: Verb,
    index: String,
    document: IndexDocument,
}

impl IndexCommand {
    /// Create a command, validating the index name and document.
    pub fn new(verb: Verb, index: impl Into<String>, document: IndexDocument) -> Result<Self> {
        let command = Self {
            verb,
            index: index.into(),
            document,
        };
        command.validate()?;
        Ok(command)
    }

    /// Create an upsert command.
    pub fn upsert(index: impl Into<String>, document: IndexDocument) -> Result<Self> {
        Self::new(Verb::Upsert, index, document)
    }

    /// Create a delete command.
    pub fn delete(index: impl Into<String>, document: IndexDocument) -> Result<Self> {
        Self::new(Verb::Delete, index, document)
    }

    /// Parse and validate a command from its wire form.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let command: Self = serde_json::from_slice(bytes)?;
        command.validate()?;
        Ok(command)
    }

    /// Check the index name and document.
    ///
    /// Commands deserialized directly with serde skip this step.
    pub fn validate(&self) -> Result<()> {
        if self.index.trim().is_empty() {
            return Err(MessagingError::validation("index", "must not be empty"));
        }
        self.document.validate()
    }

    /// Verb.
    pub fn verb(&self) -> Verb {
        self.verb
    }

    /// Target index.
    pub fn index(&self) -> &str {
        &self.index
    }

    /// Document.
    pub fn document(&self) -> &IndexDocument {
        &self.document
    }

    /// Serialize to the wire form.
    pub fn to_body(&self) -> Result<Bytes> {
        Ok(Bytes::from(serde_json::to_vec(self)?))
    }
}
