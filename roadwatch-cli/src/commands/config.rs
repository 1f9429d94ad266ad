//! Configuration management CLI commands.
//!
//! Provides `config path`, `config init` and `config show`.

use clap::Subcommand;
use roadwatch::config::{config_file_path, ConfigFile};

use crate::error::CliError;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Show the configuration file path
    Path,

    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Show the effective configuration
    Show,
}

/// Run a config subcommand.
pub fn run(command: ConfigCommands) -> Result<(), CliError> {
    match command {
        ConfigCommands::Path => run_path(),
        ConfigCommands::Init { force } => run_init(force),
        ConfigCommands::Show => run_show(),
    }
}

fn run_path() -> Result<(), CliError> {
    println!("{}", config_file_path().display());
    Ok(())
}

fn run_init(force: bool) -> Result<(), CliError> {
    let path = config_file_path();
    if ConfigFile::init_at(&path, force)? {
        println!("Wrote default configuration: {}", path.display());
    } else {
        println!("Configuration already exists: {}", path.display());
        println!("Use --force to overwrite it with defaults.");
    }
    Ok(())
}

fn run_show() -> Result<(), CliError> {
    let config = ConfigFile::load()?;

    println!("[tracker]");
    println!("poll_interval_ms = {}", config.tracker.poll_interval_ms);
    println!("max_backoff_ms = {}", config.tracker.max_backoff_ms);
    println!("attempt_timeout_ms = {}", config.tracker.attempt_timeout_ms);
    println!("min_displacement_m = {}", config.tracker.min_displacement_m);
    println!();
    println!("[simulation]");
    println!("path = {}", config.simulation.path);
    println!("duration_ms = {}", config.simulation.duration_ms);
    println!("tick_ms = {}", config.simulation.tick_ms);
    println!();
    println!("[budget]");
    println!("max_calls = {}", config.budget.max_calls);
    println!("window_secs = {}", config.budget.window_secs);
    println!("cooldown_secs = {}", config.budget.cooldown_secs);
    println!();
    println!("[incidents]");
    println!("events_url = {}", config.incidents.events_url);
    println!("refresh_interval_secs = {}", config.incidents.refresh_interval_secs);
    println!("http_timeout_secs = {}", config.incidents.http_timeout_secs);
    println!("max_results = {}", config.incidents.max_results);
    println!();
    println!("[logging]");
    println!("file = {}", config.logging.file.display());

    Ok(())
}
