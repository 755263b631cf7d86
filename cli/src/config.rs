use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use pushbullet::{HttpPushbulletClient, PushbulletError, DEFAULT_BASE_URL};
use serde::{Deserialize, Serialize};

/// Default YAML file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "pbpush.yaml";

/// CLI configuration loaded from multiple sources.
///
/// Configuration is loaded in priority order (lowest to highest):
/// 1. Struct defaults
/// 2. pbpush.yaml file (if exists)
/// 3. Environment variables with PB_ prefix (always wins)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Pushbullet API key (required — no compiled-in default).
    #[serde(default)]
    pub api_key: String,

    /// API root, overridable for proxies and stub servers.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Whole-request timeout applied to the HTTP transport. Unset means none.
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log level filter (debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_base_url(),
            timeout_secs: None,
            logging: LoggingConfig::default(),
        }
    }
}

/// Configuration loading and validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration error: {0}")]
    Figment(#[from] Box<figment::Error>),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("HTTP client error: {0}")]
    Client(#[from] PushbulletError),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

impl From<reqwest::Error> for ConfigError {
    fn from(err: reqwest::Error) -> Self {
        Self::Client(PushbulletError::Transport(err))
    }
}

impl Config {
    /// Load configuration from all sources, reading `pbpush.yaml`.
    ///
    /// # Errors
    /// Returns an error if configuration cannot be loaded or is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(DEFAULT_CONFIG_FILE)
    }

    /// Load configuration with a custom YAML file path.
    ///
    /// A missing file is not an error; its layer is simply empty.
    ///
    /// # Errors
    /// Returns an error if configuration cannot be loaded or is invalid.
    pub fn load_from(yaml_path: &str) -> Result<Self, ConfigError> {
        let config: Self = Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Yaml::file(yaml_path))
            .merge(Env::prefixed("PB_").split("__"))
            .extract()?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    /// Returns an error if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::Validation(
                "api_key is required. Set PB_API_KEY environment variable or configure in pbpush.yaml.".into(),
            ));
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ConfigError::Validation(format!(
                "base_url '{}' must start with http:// or https://",
                self.base_url
            )));
        }

        if self.timeout_secs == Some(0) {
            return Err(ConfigError::Validation(
                "timeout_secs cannot be 0 (omit it to disable the timeout)".into(),
            ));
        }

        Ok(())
    }

    /// Build the HTTP transport and wrap it in a Pushbullet client.
    ///
    /// # Errors
    /// Returns an error if the transport cannot be built or `base_url` is malformed.
    pub fn build_client(&self) -> Result<HttpPushbulletClient, ConfigError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = self.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let transport = builder.build()?;

        let client = HttpPushbulletClient::with_client(transport, self.api_key.clone())
            .with_base_url(&self.base_url)?;
        Ok(client)
    }
}
