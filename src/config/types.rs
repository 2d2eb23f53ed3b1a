use crate::api::client::{ApiConfig, DEFAULT_BASE_URL};
use crate::api::retry::{RetryPolicy, DEFAULT_MAX_RETRIES};
use crate::error::{Result, TldvError};
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

impl AppConfig {
    /// Client settings; fails when no API key was configured
    pub fn api_config(&self) -> Result<ApiConfig> {
        let api_key = self
            .api
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                TldvError::Config(
                    "API key is required (set TLDV_API_KEY or pass --api-key)".to_string(),
                )
            })?;

        Ok(ApiConfig {
            api_key,
            base_url: self.api.base_url.clone(),
            request_timeout: self.api.request_timeout_secs.map(Duration::from_secs),
            retry: self.api.retry.policy(),
        })
    }
}

#[derive(Clone, Deserialize)]
pub struct ApiSettings {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
    #[serde(default)]
    pub retry: RetryConfig,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            request_timeout_secs: None,
            retry: RetryConfig::default(),
        }
    }
}

// Keeps the key out of debug logs.
impl std::fmt::Debug for ApiSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiSettings")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("retry", &self.retry)
            .finish()
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct RetryConfig {
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            base_delay_ms: default_base_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
        }
    }
}

impl RetryConfig {
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_retries,
            base_delay: Duration::from_millis(self.base_delay_ms),
            max_delay: Duration::from_millis(self.max_delay_ms),
        }
    }
}

fn default_max_retries() -> u32 {
    DEFAULT_MAX_RETRIES
}

fn default_base_delay_ms() -> u64 {
    1000
}

fn default_max_delay_ms() -> u64 {
    2000
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Exit with a failure code when startup fails. When false the process
    /// logs the error and stays alive until interrupted, keeping stdio open
    /// for hosts that treat an exited server as a crash loop.
    #[serde(default = "default_exit_on_fatal")]
    pub exit_on_fatal: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            exit_on_fatal: default_exit_on_fatal(),
        }
    }
}

fn default_exit_on_fatal() -> bool {
    true
}
