// Key/value sources for settings

use crate::{ConfigError, Result};
use std::collections::HashMap;
use std::env;
use std::str::FromStr;
use tracing::debug;

/// Something settings can be read from.
pub trait ConfigSource {
    /// Raw value for a key.
    fn get(&self, key: &str) -> Option<String>;

    /// Value for a required key; blank counts as missing.
    fn required(&self, key: &str) -> Result<String> {
        self.optional(key)
            .ok_or_else(|| ConfigError::MissingKey(key.to_string()))
    }

    /// Value for an optional key; blank counts as absent.
    fn optional(&self, key: &str) -> Option<String> {
        self.get(key)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    /// Parse an optional key.
    fn parsed<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.optional(key)
            .map(|value| {
                value.parse().map_err(|e: T::Err| ConfigError::Invalid {
                    key: key.to_string(),
                    message: e.to_string(),
                })
            })
            .transpose()
    }
}

/// Process environment source
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvSource;

impl EnvSource {
    /// Load a `.env` file into the process environment, then read from it.
    ///
    /// A missing `.env` file is not an error; variables already set win.
    pub fn with_dotenv(path: Option<&str>) -> Result<Self> {
        let loaded = match path {
            Some(path) => dotenvy::from_path(path).map(|_| true),
            None => dotenvy::dotenv().map(|_| true),
        };

        match loaded {
            Ok(_) => debug!(path = path.unwrap_or(".env"), "Loaded .env file"),
            Err(e) if e.not_found() => debug!("No .env file found"),
            Err(e) => return Err(ConfigError::LoadError(e.to_string())),
        }

        Ok(Self)
    }
}

impl ConfigSource for EnvSource {
    fn get(&self, key: &str) -> Option<String> {
        env::var(key).ok()
    }
}

/// In-memory source, mostly for tests and embedding
#[derive(Debug, Clone, Default)]
pub struct MapSource {
    values: HashMap<String, String>,
}

impl MapSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a key/value pair.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Remove a key.
    pub fn without(mut self, key: &str) -> Self {
        self.values.remove(key);
        self
    }
}

impl<K, V> FromIterator<(K, V)> for MapSource
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl ConfigSource for MapSource {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_missing() {
        let source = MapSource::new();
        assert_eq!(
            source.required("AWS_REGION"),
            Err(ConfigError::MissingKey("AWS_REGION".to_string()))
        );
    }

    #[test]
    fn test_blank_is_missing() {
        let source = MapSource::new().with("AWS_REGION", "   ");
        assert!(source.optional("AWS_REGION").is_none());
        assert!(matches!(
            source.required("AWS_REGION"),
            Err(ConfigError::MissingKey(ref key)) if key == "AWS_REGION"
        ));
    }

    #[test]
    fn test_values_trimmed() {
        let source = MapSource::new().with("AWS_REGION", " eu-west-1\n");
        assert_eq!(source.required("AWS_REGION").unwrap(), "eu-west-1");
    }

    #[test]
    fn test_parsed() {
        let source: MapSource = [("N", "42"), ("BAD", "forty")].into_iter().collect();

        assert_eq!(source.parsed::<usize>("N").unwrap(), Some(42));
        assert_eq!(source.parsed::<usize>("ABSENT").unwrap(), None);
        assert!(matches!(
            source.parsed::<usize>("BAD"),
            Err(ConfigError::Invalid { ref key, .. }) if key == "BAD"
        ));
    }

    #[test]
    fn test_env_source_missing_var() {
        let source = EnvSource;
        assert!(source.required("SEARCHLINK_NONEXISTENT_VAR_67890").is_err());
    }

    #[test]
    fn test_env_source_path_exists() {
        // PATH is almost always set
        if std::env::var("PATH").is_ok() {
            assert!(EnvSource.optional("PATH").is_some());
        }
    }

    #[test]
    fn test_dotenv_missing_file_is_ok() {
        assert!(EnvSource::with_dotenv(Some("/nonexistent/searchlink/.env")).is_ok());
    }
}
