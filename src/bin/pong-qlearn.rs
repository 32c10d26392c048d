//! Pong Q-learning CLI
//!
//! This CLI provides:
//! - Headless training of the paddle agent against a scripted opponent
//! - Inspection of saved Q-table files

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "pong-qlearn")]
#[command(version, about = "Tabular Q-learning agent for a Pong paddle", long_about = None)]
struct Cli {
    /// Log at debug level (RUST_LOG overrides)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train the agent and save its Q-table
    Train(Box<pong_qlearn::cli::commands::train::TrainArgs>),

    /// Summarise a saved Q-table
    Inspect(pong_qlearn::cli::commands::inspect::InspectArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    match cli.command {
        Commands::Train(args) => pong_qlearn::cli::commands::train::execute(*args),
        Commands::Inspect(args) => pong_qlearn::cli::commands::inspect::execute(args),
    }
}
