//! Battle tower terminal client.
//!
//! Environment variables are documented on `BootstrapConfig::from_env`; a
//! `.env` file in the working directory is loaded first.

use anyhow::{Context, Result};
use client_bootstrap::{BootstrapConfig, RuntimeBuilder};
use tower_client::App;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = BootstrapConfig::from_env();
    let _guard = setup_logging(&config)?;

    tracing::info!("Starting tower client as {}", config.player);
    tracing::info!("Persistence: {}", config.enable_persistence);

    let setup = RuntimeBuilder::new(config).build().await?;
    App::new(setup).run().await
}

/// Log to a file only; stdout belongs to the prompts.
fn setup_logging(config: &BootstrapConfig) -> Result<WorkerGuard> {
    let log_file = config.log_file();
    let log_dir = log_file
        .parent()
        .map(|dir| dir.to_path_buf())
        .unwrap_or_default();
    let file_name = log_file
        .file_name()
        .context("log file path has no file name")?;
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("creating log directory {}", log_dir.display()))?;

    let file_appender = tracing_appender::rolling::never(&log_dir, file_name);
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::INFO.into());

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .init();

    tracing::info!("Log file: {}", log_file.display());
    Ok(guard)
}
