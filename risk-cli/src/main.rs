//! Binary crate for the `risk` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Interactive prompting and configuration
//! - Human-friendly output formatting

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod output;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries the assessment output.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cmd = cli::Cli::parse();
    cmd.run().await
}
