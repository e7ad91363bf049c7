use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "downwatch")]
#[command(about = "Headless monitoring client for the download backend", long_about = None)]
pub struct Cli {
    /// Override the backend base URL
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,

    /// Path to a TOML configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the monitoring session (health poll + download workflows)
    Watch(WatchArgs),
    /// One-shot health check
    Health,
    /// One-shot availability check for a file id
    Check(CheckArgs),
    /// Call the bulk initiate endpoint
    Initiate(InitiateArgs),
    /// Send a simulated failure through the reporting path
    TestFailure,
}

#[derive(clap::Args, Debug)]
pub struct WatchArgs {
    /// Comma-separated file ids; repeat the flag to submit separate batches
    #[arg(long = "files", value_name = "IDS")]
    pub batches: Vec<String>,

    /// Exit once every submitted job reaches a terminal state
    #[arg(long)]
    pub once: bool,
}

#[derive(clap::Args, Debug)]
pub struct CheckArgs {
    /// File id to check
    pub file_id: u64,
}

#[derive(clap::Args, Debug)]
pub struct InitiateArgs {
    /// Comma-separated file ids
    pub file_ids: String,
}
