//! tuition-engine server binary.
//!
//! Loads the office configuration directory (`--config`), opens an
//! in-memory record store and serves the JSON API on `--addr`.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context as _;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use tuition_engine::api::{AppState, create_router};
use tuition_engine::config::ConfigLoader;
use tuition_engine::store::MemoryStore;

#[derive(Parser)]
#[command(author, version, about = "Tuition office back-office server")]
struct Cli {
    /// Directory holding organization.yaml, academic.yaml and payroll.yaml.
    #[arg(short, long, default_value = "config/default")]
    config: PathBuf,

    /// Address to listen on.
    #[arg(short, long, default_value = "127.0.0.1:3000")]
    addr: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let cli = Cli::parse();

    let config = ConfigLoader::load(&cli.config)
        .with_context(|| format!("failed to load configuration from {}", cli.config.display()))?;
    tracing::info!(
        organization = %config.organization().name,
        config_dir = %cli.config.display(),
        "Configuration loaded"
    );

    let state = AppState::new(config, Arc::new(MemoryStore::new()));
    let app = create_router(state);

    tracing::info!("Listening on http://{}", cli.addr);
    let listener = TcpListener::bind(&cli.addr)
        .await
        .with_context(|| format!("failed to bind {}", cli.addr))?;

    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}
