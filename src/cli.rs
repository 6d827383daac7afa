//! Command-line interface

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;

use crate::config_loader::load_config;
use crate::predictor_core::PredictorCore;
use crate::profile::CustomerProfile;

/// Top-level CLI interface for churnwatch
#[derive(Parser)]
#[command(
    name = "churnwatch",
    version = "0.1.0",
    about = "Customer churn risk predictor"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Serve the form and the JSON prediction API
    Serve {
        /// Host/IP to bind (overrides config)
        #[arg(long)]
        host: Option<String>,
        /// Port to bind (overrides config)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Score one customer profile from a JSON file and print the result
    Predict {
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Print artifact and schema status for the configured bundle
    Inspect,
}

pub fn dispatch(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Serve { host, port } => serve(host, port),
        Commands::Predict { input } => predict_file(&input),
        Commands::Inspect => inspect(),
    }
}

fn load_core() -> anyhow::Result<PredictorCore> {
    let config = load_config().context("Failed to load config")?;
    PredictorCore::load(Path::new(&config.artifact_dir))
        .with_context(|| format!("Failed to load artifacts from {}", config.artifact_dir))
}

fn serve(host: Option<String>, port: Option<u16>) -> anyhow::Result<()> {
    let config = load_config().context("Failed to load config")?;
    let core = PredictorCore::load(Path::new(&config.artifact_dir))
        .with_context(|| format!("Failed to load artifacts from {}", config.artifact_dir))?;
    let core = Arc::new(core);

    let host = host.unwrap_or(config.server.host);
    let port = port.unwrap_or(config.server.port);
    let addr = format!("{host}:{port}");

    let app = crate::churnweb::build_router(core);

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to build Tokio runtime")?;

    rt.block_on(async move {
        let socket_addr: std::net::SocketAddr = addr
            .parse()
            .with_context(|| format!("Invalid bind address {addr}"))?;
        let listener = tokio::net::TcpListener::bind(socket_addr)
            .await
            .with_context(|| format!("Failed to bind {addr}"))?;
        info!("HTTP server listening on http://{addr}");
        axum::serve(listener, app).await.context("Server error")
    })
}

fn predict_file(input: &Path) -> anyhow::Result<()> {
    let core = load_core()?;

    let raw = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read profile from {}", input.display()))?;
    let profile: CustomerProfile =
        serde_json::from_str(&raw).context("Failed to parse customer profile")?;
    let profile = profile.clamped()?;

    let prediction = core.predict(&profile)?;
    println!("{}", serde_json::to_string_pretty(&prediction)?);
    Ok(())
}

fn inspect() -> anyhow::Result<()> {
    let core = load_core()?;
    println!("{}", serde_json::to_string_pretty(&core.status())?);
    Ok(())
}
