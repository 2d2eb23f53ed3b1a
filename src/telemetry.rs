//! Diagnostic logging.
//!
//! Stdout carries MCP frames, so logs must go to a separate sink. The sink is
//! injected as a [`MakeWriter`]: stderr in the binary, an in-memory buffer in
//! tests.

use crate::config::LoggingConfig;
use anyhow::{Context, Result};
use tracing::Subscriber;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// `RUST_LOG` wins over the configured level
pub fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level))
}

/// Build a subscriber writing formatted events to `writer`
pub fn build_subscriber<W>(
    config: &LoggingConfig,
    filter: EnvFilter,
    writer: W,
) -> Box<dyn Subscriber + Send + Sync>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let registry = tracing_subscriber::registry().with(filter);

    match config.format.as_str() {
        "json" => Box::new(
            registry.with(fmt::layer().json().with_ansi(false).with_writer(writer)),
        ),
        "compact" => Box::new(
            registry.with(fmt::layer().compact().with_ansi(false).with_writer(writer)),
        ),
        _ => Box::new(
            registry.with(fmt::layer().pretty().with_ansi(false).with_writer(writer)),
        ),
    }
}

/// Install the process-wide subscriber. Call once, before anything logs.
pub fn init_logging<W>(config: &LoggingConfig, writer: W) -> Result<()>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let subscriber = build_subscriber(config, env_filter(config), writer);
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to install logging subscriber")
}
