// SPDX-License-Identifier: MIT OR Apache-2.0
//! `clipline` - timeline editing from the command line.
//!
//! Imports a video into a project, detects silence, applies JSON action
//! batches (the same contract an AI agent uses), and writes render plans.

use clap::Parser;
use clipline_editor_app::cli::{run, Cli};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so command output on stdout stays machine readable
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive("clipline_editor_app=debug".parse()?)
        .add_directive("clipline_editor_media=info".parse()?);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::debug!("Starting clipline v{}", env!("CARGO_PKG_VERSION"));

    run(cli).await
}
