// churnwatch - main.rs
// Bootstrap: tracing init, CLI parse, dispatch. Artifact-load failures
// abort startup with a nonzero exit.

use std::process::exit;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use churnwatch::cli::{dispatch, Cli};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = dispatch(cli) {
        error!("{e:#}");
        exit(1);
    }
}
