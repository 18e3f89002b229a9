use std::time::Duration;

use tracing::debug;

use crate::core::config::data::Config;
use crate::core::constants::{DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_REQUEST_TIMEOUT_SECS};

pub const API_KEY_ENV_VARS: [&str; 2] = ["FINCHAT_API_KEY", "GEMINI_API_KEY"];
pub const BASE_URL_ENV_VAR: &str = "FINCHAT_BASE_URL";

/// Where the resolved API key came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeySource {
    Environment(&'static str),
    ConfigFile,
    Missing,
}

/// Fully resolved runtime settings, read once when a conversation is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_key: Option<String>,
    pub key_source: KeySource,
    pub model: String,
    pub base_url: String,
    pub request_timeout: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: None,
            key_source: KeySource::Missing,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

impl Settings {
    /// Resolves settings from the process environment and `config`.
    pub fn from_env(config: &Config) -> Self {
        Self::resolve(config, |name| std::env::var(name).ok())
    }

    /// Resolves settings with an injectable environment lookup. Environment
    /// values win over the config file; blank values count as unset.
    pub fn resolve<F>(config: &Config, env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |value: Option<String>| value.filter(|v| !v.trim().is_empty());

        let (api_key, key_source) = API_KEY_ENV_VARS
            .iter()
            .find_map(|name| non_blank(env(name)).map(|key| (Some(key), KeySource::Environment(*name))))
            .or_else(|| {
                non_blank(config.api_key.clone()).map(|key| (Some(key), KeySource::ConfigFile))
            })
            .unwrap_or((None, KeySource::Missing));

        let base_url = non_blank(env(BASE_URL_ENV_VAR))
            .or_else(|| non_blank(config.base_url.clone()))
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let model = non_blank(config.model.clone()).unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let request_timeout = Duration::from_secs(
            config
                .request_timeout_secs
                .filter(|secs| *secs > 0)
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        );

        debug!(
            model = %model,
            base_url = %base_url,
            key_source = ?key_source,
            timeout_secs = request_timeout.as_secs(),
            "Resolved settings"
        );

        Self {
            api_key,
            key_source,
            model,
            base_url,
            request_timeout,
        }
    }
}
