//! Binary crate for the `wetter` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - The interactive search prompt and configuration
//! - Rendering forecasts as a grid of day cards

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod view;

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "error",
        1 => "wetter=info,wetter_core=info",
        _ => "wetter=debug,wetter_core=debug",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cmd = cli::Cli::parse();
    init_tracing(cmd.verbose);
    cmd.run().await
}
