use crate::core::config::data::{mask_secret, Config};
use crate::core::config::settings::{KeySource, Settings};

impl Config {
    pub fn print_all(&self) {
        println!("Current configuration:");
        match &self.api_key {
            Some(key) => println!("  api-key: {}", mask_secret(key)),
            None => println!("  api-key: (unset)"),
        }
        match &self.model {
            Some(model) => println!("  model: {model}"),
            None => println!("  model: (unset)"),
        }
        match &self.base_url {
            Some(url) => println!("  base-url: {url}"),
            None => println!("  base-url: (unset)"),
        }
        match self.request_timeout_secs {
            Some(secs) => println!("  request-timeout: {secs}s"),
            None => println!("  request-timeout: (unset)"),
        }
    }
}

impl Settings {
    pub fn print_effective(&self) {
        println!("Effective settings:");
        println!("  model: {}", self.model);
        println!("  base-url: {}", self.base_url);
        println!("  request-timeout: {}s", self.request_timeout.as_secs());
        match &self.key_source {
            KeySource::Environment(name) => println!("  api-key: from ${name}"),
            KeySource::ConfigFile => println!("  api-key: from config file"),
            KeySource::Missing => println!("  api-key: (missing)"),
        }
    }
}
