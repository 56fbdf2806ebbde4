//! Container Dashboard CLI
//!
//! Lists containers, flags idle ones, starts and stops them, and shows
//! savings suggestions from a running dashboard server.

mod client;
mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{containers, suggestions};

/// Container Dashboard CLI
#[derive(Parser)]
#[command(name = "cdash")]
#[command(author, version, about = "CLI for the Container Dashboard", long_about = None)]
pub struct Cli {
    /// API endpoint URL (can also be set via CDASH_API_URL env var)
    #[arg(long, env = "CDASH_API_URL", default_value = "http://localhost:3001")]
    pub api_url: String,

    /// Output format
    #[arg(long, short, default_value = "table")]
    pub format: output::OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List all containers with CPU and memory usage
    Containers,

    /// List running containers with low resource usage
    Idle,

    /// Start a container
    Start {
        /// Container ID or name
        id: String,
    },

    /// Stop a container
    Stop {
        /// Container ID or name
        id: String,
    },

    /// Show stop suggestions and estimated savings
    Suggestions,

    /// Check the dashboard server
    Health,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let client = client::ApiClient::new(&cli.api_url)?;

    match cli.command {
        Commands::Containers => containers::list_containers(&client, cli.format).await?,
        Commands::Idle => containers::list_idle(&client, cli.format).await?,
        Commands::Start { id } => containers::start_container(&client, &id, cli.format).await?,
        Commands::Stop { id } => containers::stop_container(&client, &id, cli.format).await?,
        Commands::Suggestions => suggestions::show_suggestions(&client, cli.format).await?,
        Commands::Health => suggestions::show_health(&client, cli.format).await?,
    }

    Ok(())
}
