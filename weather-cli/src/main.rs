//! Binary crate for the `weather` command-line tool.
//!
//! This crate is the display surface of the weather screen:
//! - Parsing CLI arguments
//! - Interactive configuration of the mock sources
//! - Rendering presenter state as it changes

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod configure;
mod view;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cmd = cli::Cli::parse();
    cmd.run().await
}
