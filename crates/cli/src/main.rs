mod client;
mod commands;
mod config;
mod error;
mod local_state;
mod prompt;
mod render;

use clap::Parser;

use crate::{commands::Cli, error::Result};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = config::load(&cli.global)?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "reeni={level},engine={level}",
            level = config.level
        ))
        .with_writer(std::io::stderr)
        .init();

    commands::run(cli, config).await
}
