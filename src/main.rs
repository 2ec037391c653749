//! movies-api server binary.

use anyhow::{Context, Result};
use clap::Parser;
use movies_api::{http, Config};
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::parse();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(version = env!("CARGO_PKG_VERSION"), "movies-api starting");

    let models = config.open_models().context("failed to open movie store")?;
    http::serve(models, &config)
        .await
        .context("http server failed")?;

    Ok(())
}
