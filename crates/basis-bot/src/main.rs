//! Scheduled spot-futures divergence watcher - entry point.
//!
//! Designed to run once per schedule tick (cron or a systemd timer); all
//! state between ticks lives in the document store.

use anyhow::Result;
use clap::Parser;
use tracing::info;

/// Scheduled spot-futures divergence watcher
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file path (can also be set via BASIS_CONFIG env var)
    #[arg(short, long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    basis_telemetry::init_logging()?;

    info!("Starting basis watcher v{}", env!("CARGO_PKG_VERSION"));

    let config = match args.config {
        Some(path) => basis_bot::AppConfig::from_file(&path)?,
        None => basis_bot::AppConfig::load()?,
    };
    let credentials = basis_bot::Credentials::from_env()?;

    let app = basis_bot::Application::new(config, credentials)?;
    app.run().await?;

    Ok(())
}
