//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::process;

use roadwatch::config::ConfigFileError;
use roadwatch::incidents::FetchError;
use roadwatch::position::{LocationError, SimulationError};

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration error
    Config(String),
    /// Invalid command-line input
    InvalidInput(String),
    /// Location tracking could not start
    Location(LocationError),
    /// Simulator rejected its configuration
    Simulation(SimulationError),
    /// Incident feed fetch failed
    Fetch(FetchError),
    /// Failed to render output
    Output(String),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::Fetch(FetchError::Http(_)) | CliError::Fetch(FetchError::Status(_)) => {
                eprintln!();
                eprintln!("The incident endpoint could not be reached. Try:");
                eprintln!("  1. Checking your network connection");
                eprintln!("  2. Setting incidents.events_url in config.ini");
                eprintln!("  3. Using --file with a saved events payload");
            }
            CliError::Location(LocationError::NoCapability) => {
                eprintln!();
                eprintln!("No location sensor is available. Use 'roadwatch simulate' instead.");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            CliError::Location(e) => write!(f, "Location tracking failed: {}", e),
            CliError::Simulation(e) => write!(f, "Simulation failed: {}", e),
            CliError::Fetch(e) => write!(f, "Failed to fetch incidents: {}", e),
            CliError::Output(msg) => write!(f, "Failed to write output: {}", msg),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Location(e) => Some(e),
            CliError::Simulation(e) => Some(e),
            CliError::Fetch(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<LocationError> for CliError {
    fn from(e: LocationError) -> Self {
        CliError::Location(e)
    }
}

impl From<SimulationError> for CliError {
    fn from(e: SimulationError) -> Self {
        CliError::Simulation(e)
    }
}

impl From<FetchError> for CliError {
    fn from(e: FetchError) -> Self {
        CliError::Fetch(e)
    }
}
