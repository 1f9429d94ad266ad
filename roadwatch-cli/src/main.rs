//! RoadWatch CLI - Command-line interface
//!
//! Drives the RoadWatch library from a terminal: simulate a drive, replay a
//! recorded route through the real tracker, or ask what's on the road ahead.

mod commands;
mod error;
mod runner;

use clap::{Parser, Subcommand};

use commands::ahead::AheadArgs;
use commands::config::ConfigCommands;
use commands::replay::ReplayArgs;
use commands::simulate::SimulateArgs;
use error::CliError;
use runner::CliRunner;

#[derive(Parser)]
#[command(name = "roadwatch")]
#[command(version, about = "Position tracking and road-ahead incident reports", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Drive a built-in path with the virtual car
    Simulate(SimulateArgs),

    /// Replay a dummy route through the real position tracker
    Replay(ReplayArgs),

    /// Report incidents on the road ahead
    Ahead(AheadArgs),

    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        e.exit();
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Simulate(args) => {
            let runner = CliRunner::with_options(cli.debug, true)?;
            runner.log_startup("simulate");
            commands::simulate::run(args, &runner).await
        }
        Commands::Replay(args) => {
            let runner = CliRunner::with_options(cli.debug, true)?;
            runner.log_startup("replay");
            commands::replay::run(args, &runner).await
        }
        Commands::Ahead(args) => {
            let runner = CliRunner::with_options(cli.debug, !args.json)?;
            runner.log_startup("ahead");
            commands::ahead::run(args, &runner).await
        }
        Commands::Config { command } => commands::config::run(command),
    }
}
