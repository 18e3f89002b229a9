use super::data::{mask_secret, path_display, Config, ConfigKey};
use super::settings::{KeySource, Settings};
use crate::core::constants::{DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_REQUEST_TIMEOUT_SECS};
use std::collections::HashMap;
use std::time::Duration;
use tempfile::TempDir;

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |name| map.get(name).cloned()
}

#[test]
fn test_load_nonexistent_config() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("nonexistent_config.toml");

    let config = Config::load_from_path(&config_path).expect("Failed to load config");

    assert_eq!(config, Config::default());
}

#[test]
fn test_config_persistence_lifecycle() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("nested").join("config.toml");

    let mut config = Config::default();
    config.set(ConfigKey::Model, "gemini-pro").expect("set model");
    config
        .set(ConfigKey::RequestTimeout, "45")
        .expect("set timeout");
    config.save_to_path(&config_path).expect("Failed to save config");

    let loaded = Config::load_from_path(&config_path).expect("Failed to load config");
    assert_eq!(loaded.model.as_deref(), Some("gemini-pro"));
    assert_eq!(loaded.request_timeout_secs, Some(45));

    let mut config = loaded;
    config.unset(ConfigKey::Model);
    config.save_to_path(&config_path).expect("Failed to save config");
    let loaded = Config::load_from_path(&config_path).expect("Failed to load config");
    assert_eq!(loaded.model, None);
    assert_eq!(loaded.request_timeout_secs, Some(45));
}

#[test]
fn test_invalid_toml_reports_parse_error() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(&config_path, "model = [unterminated").expect("write");

    let err = Config::load_from_path(&config_path).expect_err("parse must fail");
    assert!(err.to_string().starts_with("Failed to parse config at"));
}

#[test]
fn test_set_rejects_bad_values() {
    let mut config = Config::default();
    assert!(config.set(ConfigKey::RequestTimeout, "0").is_err());
    assert!(config.set(ConfigKey::RequestTimeout, "soon").is_err());
    assert!(config.set(ConfigKey::BaseUrl, "ftp://example.com").is_err());
    assert!(config.set(ConfigKey::Model, "   ").is_err());
    assert_eq!(config, Config::default());
}

#[test]
fn test_config_key_parsing() {
    assert_eq!(ConfigKey::parse("api_key"), Some(ConfigKey::ApiKey));
    assert_eq!(ConfigKey::parse("Base-URL"), Some(ConfigKey::BaseUrl));
    assert_eq!(ConfigKey::parse("theme"), None);
}

#[test]
fn test_settings_defaults() {
    let settings = Settings::resolve(&Config::default(), env_from(&[]));
    assert_eq!(settings.api_key, None);
    assert_eq!(settings.key_source, KeySource::Missing);
    assert_eq!(settings.model, DEFAULT_MODEL);
    assert_eq!(settings.base_url, DEFAULT_BASE_URL);
    assert_eq!(
        settings.request_timeout,
        Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS)
    );
}

#[test]
fn test_environment_beats_config_file() {
    let config = Config {
        api_key: Some("from-file".to_string()),
        base_url: Some("https://file.example.com".to_string()),
        ..Default::default()
    };

    let settings = Settings::resolve(
        &config,
        env_from(&[
            ("GEMINI_API_KEY", "gemini-env"),
            ("FINCHAT_API_KEY", "finchat-env"),
            ("FINCHAT_BASE_URL", "https://env.example.com"),
        ]),
    );
    assert_eq!(settings.api_key.as_deref(), Some("finchat-env"));
    assert_eq!(settings.key_source, KeySource::Environment("FINCHAT_API_KEY"));
    assert_eq!(settings.base_url, "https://env.example.com");

    let settings = Settings::resolve(&config, env_from(&[("FINCHAT_API_KEY", "  ")]));
    assert_eq!(settings.api_key.as_deref(), Some("from-file"));
    assert_eq!(settings.key_source, KeySource::ConfigFile);
    assert_eq!(settings.base_url, "https://file.example.com");
}

#[test]
fn test_mask_secret() {
    assert_eq!(mask_secret("abcdefgh"), "****efgh");
    assert_eq!(mask_secret("abc"), "***");
}

#[test]
fn test_path_display_plain_relative_path() {
    assert_eq!(path_display("relative/config.toml"), "relative/config.toml");
}
