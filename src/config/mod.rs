pub mod types;

use anyhow::{Context, Result};
use config::{Config, File};
use std::path::Path;
pub use types::*;

/// Load configuration from an optional TOML file; a missing file yields defaults
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path = path.as_ref();

    let config = Config::builder()
        .add_source(File::from(path).required(false))
        .build()
        .with_context(|| format!("Failed to load config from: {}", path.display()))?;

    let app_config: AppConfig = config
        .try_deserialize()
        .context("Failed to deserialize configuration")?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// Validate the loaded configuration
pub fn validate_config(config: &AppConfig) -> Result<()> {
    let base_url = &config.api.base_url;
    if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        anyhow::bail!("Invalid base URL '{}': must start with http:// or https://", base_url);
    }

    let retry = &config.api.retry;
    if retry.max_delay_ms < retry.base_delay_ms {
        anyhow::bail!(
            "Invalid retry settings: max_delay_ms ({}) is lower than base_delay_ms ({})",
            retry.max_delay_ms,
            retry.base_delay_ms
        );
    }

    if config.api.request_timeout_secs == Some(0) {
        anyhow::bail!("request_timeout_secs must be greater than 0 when set");
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.logging.level.as_str()) {
        anyhow::bail!(
            "Invalid log level '{}'. Valid levels: {}",
            config.logging.level,
            valid_levels.join(", ")
        );
    }

    let valid_formats = ["pretty", "json", "compact"];
    if !valid_formats.contains(&config.logging.format.as_str()) {
        anyhow::bail!(
            "Invalid log format '{}'. Valid formats: {}",
            config.logging.format,
            valid_formats.join(", ")
        );
    }

    Ok(())
}
