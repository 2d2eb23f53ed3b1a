use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tldv_mcp::config::{self, AppConfig, LoggingConfig};
use tldv_mcp::{server, telemetry, TldvClient, TldvServer};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

#[derive(Parser, Debug)]
#[command(name = "tldv-mcp")]
#[command(about = "MCP server for tl;dv meetings", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to an optional configuration file
    #[arg(short, long, default_value = "tldv-mcp.toml")]
    config: PathBuf,

    /// tl;dv API key
    #[arg(long, env = "TLDV_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Override the API base URL
    #[arg(long)]
    base_url: Option<String>,

    /// Override log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Override log format (pretty, json, compact)
    #[arg(long)]
    log_format: Option<String>,

    /// Stay alive after a fatal startup error instead of exiting
    #[arg(long)]
    keep_alive_on_error: bool,
}

impl Cli {
    fn apply_logging(&self, logging: &mut LoggingConfig) {
        if let Some(level) = &self.log_level {
            logging.level = level.clone();
        }
        if let Some(format) = &self.log_format {
            logging.format = format.clone();
        }
    }

    fn apply(&self, mut config: AppConfig) -> Result<AppConfig> {
        if let Some(api_key) = &self.api_key {
            config.api.api_key = Some(api_key.clone());
        }
        if let Some(base_url) = &self.base_url {
            config.api.base_url = base_url.clone();
        }
        if self.keep_alive_on_error {
            config.server.exit_on_fatal = false;
        }
        self.apply_logging(&mut config.logging);
        config::validate_config(&config)?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let loaded = config::load_config(&cli.config)
        .with_context(|| {
            format!(
                "Failed to load configuration from: {}",
                cli.config.display()
            )
        })
        .and_then(|config| cli.apply(config));

    // Logging must exist before a config error can be reported. Overrides may
    // be what made the config invalid, so fall back to plain defaults.
    let logging = match &loaded {
        Ok(config) => config.logging.clone(),
        Err(_) => LoggingConfig::default(),
    };
    if let Err(e) = telemetry::init_logging(&logging, std::io::stderr) {
        eprintln!("{:#}", e);
        return ExitCode::FAILURE;
    }

    let exit_on_fatal = loaded
        .as_ref()
        .map(|config| config.server.exit_on_fatal)
        .unwrap_or(!cli.keep_alive_on_error);

    let result = match loaded {
        Ok(config) => run(config).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Fatal error: {:#}", e);
            if !exit_on_fatal {
                warn!("exit_on_fatal is disabled; idling until interrupted");
                let _ = tokio::signal::ctrl_c().await;
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(config: AppConfig) -> Result<()> {
    let client = TldvClient::new(config.api_config()?)?;

    print_banner(&config);

    let ct = CancellationToken::new();
    let shutdown = ct.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupt received, shutting down");
            shutdown.cancel();
        }
    });

    server::serve_stdio(TldvServer::new(client), ct).await?;
    Ok(())
}

fn print_banner(config: &AppConfig) {
    info!("tldv-mcp v{}", env!("CARGO_PKG_VERSION"));
    info!("  → API: {}", config.api.base_url);
    info!(
        "  → Retries: {} (backoff {}ms, capped at {}ms)",
        config.api.retry.max_retries, config.api.retry.base_delay_ms, config.api.retry.max_delay_ms
    );
    info!(
        "  → Log Level: {} ({})",
        config.logging.level, config.logging.format
    );
    info!("  → Transport: stdio");
}
