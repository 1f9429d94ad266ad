//! CLI runner for common setup.
//!
//! Loads the configuration file and initializes logging once per command.

use crate::error::CliError;
use roadwatch::config::{ConfigFile, DEFAULT_LOG_FILE_NAME};
use roadwatch::logging::{init_logging, LoggingGuard};
use std::path::PathBuf;
use tracing::info;

/// Runner that manages CLI lifecycle and common operations.
pub struct CliRunner {
    /// Logging guard - keeps logging active while runner exists
    #[allow(dead_code)]
    logging_guard: LoggingGuard,
    /// Loaded configuration file
    config: ConfigFile,
}

impl CliRunner {
    /// Create a new CLI runner, loading config and initializing logging.
    ///
    /// # Arguments
    ///
    /// * `debug_mode` - Enables debug-level logging unless RUST_LOG overrides it
    /// * `console_logging` - Mirror log records to the terminal (stderr)
    pub fn with_options(debug_mode: bool, console_logging: bool) -> Result<Self, CliError> {
        let config = ConfigFile::load()?;

        let log_path = &config.logging.file;
        let log_dir = log_path
            .parent()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        let log_file = log_path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| DEFAULT_LOG_FILE_NAME.to_string());

        let logging_guard = init_logging(&log_dir, &log_file, console_logging, debug_mode)
            .map_err(|e| CliError::LoggingInit(e.to_string()))?;

        Ok(Self {
            logging_guard,
            config,
        })
    }

    /// Get the loaded configuration.
    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Log startup information for a command.
    pub fn log_startup(&self, command: &str) {
        info!("RoadWatch v{}", roadwatch::VERSION);
        info!(
            log_file = %self.config.logging.file.display(),
            "RoadWatch CLI: {} command", command
        );
    }
}
