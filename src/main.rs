mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("downwatch=info")),
        )
        .init();

    let cli = Cli::parse();

    // Top-level boundary: any fatal failure is reported once with as much
    // context as it carries, then the process exits non-zero.
    let result = match &cli.command {
        Commands::Watch(args) => commands::watch(&cli, args).await,
        Commands::Health => commands::health(&cli).await,
        Commands::Check(args) => commands::check(&cli, args).await,
        Commands::Initiate(args) => commands::initiate(&cli, args).await,
        Commands::TestFailure => commands::test_failure(&cli).await,
    };

    if let Err(ref err) = result {
        tracing::error!(error = %err, "downwatch terminated");
    }

    result
}
