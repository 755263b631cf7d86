#![deny(
    clippy::expect_used,
    clippy::panic,
    clippy::print_stdout,
    clippy::todo,
    clippy::unimplemented,
    clippy::unwrap_used
)]

use anyhow::Context;
use clap::Parser;
use pbpush::{
    commands::{run, Cli},
    config::Config,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();

    // Load and validate configuration first (fail-fast)
    let config = match &cli.config {
        Some(path) => Config::load_from(&path.to_string_lossy()),
        None => Config::load(),
    }
    .context("failed to load configuration")?;

    // Logs go to stderr so command output stays pipeable
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.level))
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(
        version = env!("CARGO_PKG_VERSION"),
        base_url = %config.base_url,
        "pbpush starting"
    );

    let client = config.build_client()?;
    let mut stdout = std::io::stdout().lock();
    run(&client, cli.command, &mut stdout).await
}
