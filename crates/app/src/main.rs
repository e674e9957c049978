//! Sessiongate CLI entry point.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use sessiongate::cli::Cli;
use sessiongate::{Runtime, commands};
use sessiongate_infrastructure::{GateConfig, InMemoryNavigator};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so command output stays machine-readable
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => GateConfig::load_from(path, None),
        None => GateConfig::load(),
    }
    .context("failed to load configuration")?;

    tracing::debug!(
        "Starting sessiongate v{} against {}",
        env!("CARGO_PKG_VERSION"),
        config.api_base_url
    );

    let navigator = Arc::new(InMemoryNavigator::new(cli.at.clone()));
    let runtime = Runtime::bootstrap_with_files(config, navigator)
        .await
        .context("failed to start session gate")?;

    let result = commands::run(&runtime, cli.command).await;
    runtime.shutdown().await;
    result
}
