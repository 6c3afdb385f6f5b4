// Error types for settings loading

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error(
        "The environment variable {0} couldn't be read. You may need to define it in your .env file."
    )]
    MissingKey(String),

    #[error("Invalid value for {key}: {message}")]
    Invalid { key: String, message: String },

    #[error("Failed to load .env file: {0}")]
    LoadError(String),
}

impl ConfigError {
    /// Key the error is about, if any.
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::MissingKey(key) | Self::Invalid { key, .. } => Some(key),
            Self::LoadError(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;
