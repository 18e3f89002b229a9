use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct Config {
    /// API key for the generative-language service. Environment variables
    /// take precedence over this value.
    pub api_key: Option<String>,
    /// Model name (e.g., "gemini-1.5-flash")
    pub model: Option<String>,
    /// Base URL of the API, without the `models/...` suffix
    pub base_url: Option<String>,
    /// Upper bound for a single request, in seconds
    pub request_timeout_secs: Option<u64>,
}

/// Keys accepted by `finchat set` / `finchat unset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    ApiKey,
    Model,
    BaseUrl,
    RequestTimeout,
}

impl ConfigKey {
    pub const ALL: [ConfigKey; 4] = [
        ConfigKey::ApiKey,
        ConfigKey::Model,
        ConfigKey::BaseUrl,
        ConfigKey::RequestTimeout,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ConfigKey::ApiKey => "api-key",
            ConfigKey::Model => "model",
            ConfigKey::BaseUrl => "base-url",
            ConfigKey::RequestTimeout => "request-timeout",
        }
    }

    pub fn parse(key: &str) -> Option<Self> {
        let normalized = key.trim().to_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|candidate| candidate.as_str() == normalized)
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rejected value for a config key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidValue {
    pub key: ConfigKey,
    pub reason: String,
}

impl fmt::Display for InvalidValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid value for {}: {}", self.key, self.reason)
    }
}

impl std::error::Error for InvalidValue {}

impl Config {
    pub fn set(&mut self, key: ConfigKey, value: &str) -> Result<(), InvalidValue> {
        let value = value.trim();
        if value.is_empty() {
            return Err(InvalidValue {
                key,
                reason: "value must not be empty".to_string(),
            });
        }

        match key {
            ConfigKey::ApiKey => self.api_key = Some(value.to_string()),
            ConfigKey::Model => self.model = Some(value.to_string()),
            ConfigKey::BaseUrl => {
                if !(value.starts_with("http://") || value.starts_with("https://")) {
                    return Err(InvalidValue {
                        key,
                        reason: "expected an http:// or https:// URL".to_string(),
                    });
                }
                self.base_url = Some(value.to_string());
            }
            ConfigKey::RequestTimeout => {
                let secs = value
                    .parse::<u64>()
                    .ok()
                    .filter(|secs| *secs > 0)
                    .ok_or_else(|| InvalidValue {
                        key,
                        reason: "expected a positive number of seconds".to_string(),
                    })?;
                self.request_timeout_secs = Some(secs);
            }
        }
        Ok(())
    }

    pub fn unset(&mut self, key: ConfigKey) {
        match key {
            ConfigKey::ApiKey => self.api_key = None,
            ConfigKey::Model => self.model = None,
            ConfigKey::BaseUrl => self.base_url = None,
            ConfigKey::RequestTimeout => self.request_timeout_secs = None,
        }
    }
}

/// Get a user-friendly display string for a path
/// Converts absolute paths to use ~ notation on Unix-like systems when possible
///
/// # Examples
/// - Unix: `/home/user/.config/finchat/config.toml` → `~/.config/finchat/config.toml`
/// - Windows: paths are shown unchanged
pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let home_path = PathBuf::from(home);
            if let Ok(relative) = path.strip_prefix(&home_path) {
                return format!("~/{}", relative.display());
            }
        }
    }

    path.display().to_string()
}

/// Masks all but the last four characters of a secret for display.
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let visible: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{}", "*".repeat(chars.len() - 4), visible)
}
