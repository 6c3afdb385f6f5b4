//! Integration tests for searchlink-config

use searchlink_config::*;
use std::io::Write;

fn full_source() -> MapSource {
    [
        (keys::ELASTICSEARCH_AWS_REGION, "eu-west-1"),
        (keys::ELASTICSEARCH_AWS_ACCESSKEY, "AKIDEXAMPLE"),
        (keys::ELASTICSEARCH_AWS_SECRETACCESSKEY, "es-secret"),
        (keys::ELASTICSEARCH_ENDPOINT, "https://search.example.com/"),
        (keys::AWS_REGION, "eu-west-2"),
        (keys::AWS_ACCESSKEY, "AKIDQUEUE"),
        (keys::AWS_SECRETACCESSKEY, "queue-secret"),
        (keys::SQS_ENDPOINT, "https://sqs.eu-west-2.amazonaws.com/1/index"),
        (keys::SQS_PAYLOAD_BUCKET, "payloads"),
    ]
    .into_iter()
    .collect()
}

#[test]
fn test_both_settings_from_one_source() {
    let source = full_source();

    let search = SearchSettings::from_source(&source).unwrap();
    let publish = PublishSettings::from_source(&source).unwrap();

    assert_eq!(search.credential().access_key_id(), "AKIDEXAMPLE");
    assert_eq!(search.credential().service(), SEARCH_SERVICE);
    assert_eq!(publish.credential().access_key_id(), "AKIDQUEUE");
    assert_eq!(publish.credential().service(), QUEUE_SERVICE);
    assert_eq!(publish.region(), "eu-west-2");
    assert_eq!(publish.queue_url().as_str(), "https://sqs.eu-west-2.amazonaws.com/1/index");
}

#[test]
fn test_missing_bucket_named_exactly() {
    let source = full_source().without(keys::SQS_PAYLOAD_BUCKET);
    let err = PublishSettings::from_source(&source).unwrap_err();

    assert_eq!(err, ConfigError::MissingKey("SQS_PAYLOAD_BUCKET".to_string()));
    assert_eq!(
        err.to_string(),
        "The environment variable SQS_PAYLOAD_BUCKET couldn't be read. You may need to define it in your .env file."
    );
}

#[test]
fn test_blank_secret_is_missing() {
    let source = full_source().with(keys::ELASTICSEARCH_AWS_SECRETACCESSKEY, "");
    assert_eq!(
        SearchSettings::from_source(&source).unwrap_err(),
        ConfigError::MissingKey(keys::ELASTICSEARCH_AWS_SECRETACCESSKEY.to_string())
    );
}

#[test]
fn test_custom_source() {
    struct Upper;

    impl ConfigSource for Upper {
        fn get(&self, key: &str) -> Option<String> {
            match key {
                "ELASTICSEARCH_ENDPOINT" => Some("http://localhost:9200".to_string()),
                _ => Some(key.to_lowercase()),
            }
        }
    }

    let settings = SearchSettings::from_source(&Upper).unwrap();
    assert_eq!(settings.index(), "elasticsearch_index");
    assert_eq!(settings.credential().region(), "elasticsearch_aws_region");
}

#[test]
fn test_malformed_dotenv_reported() {
    let dir = std::env::temp_dir().join(format!("searchlink-config-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join(".env");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "=== no key").unwrap();

    let result = EnvSource::with_dotenv(path.to_str());
    std::fs::remove_dir_all(&dir).ok();

    assert!(matches!(result, Err(ConfigError::LoadError(_))));
}
