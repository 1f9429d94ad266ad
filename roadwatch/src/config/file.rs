//! Reading and writing the RoadWatch `config.ini`.
//!
//! A missing file is not an error: every section falls back to the values the
//! tracker, simulator, call budget and incident feed use on their own.

use ini::Ini;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::settings::ConfigFile;

/// Errors surfaced while loading or writing `config.ini`.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    /// The file exists but is not readable INI.
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] ini::Error),

    #[error("Failed to write config file: {0}")]
    WriteError(String),

    /// A key parsed but its value is out of range for RoadWatch,
    /// e.g. `simulation.tick_ms = 0` or an unknown simulation path.
    #[error("Invalid configuration: {section}.{key} = '{value}' - {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },

    #[error("Failed to create config directory: {0}")]
    DirectoryError(std::io::Error),
}

impl ConfigFile {
    /// Load `~/.roadwatch/config.ini`, or the built-in settings when absent.
    pub fn load() -> Result<Self, ConfigFileError> {
        Self::load_from(&config_file_path())
    }

    /// Load settings from `path`, or the built-in settings when absent.
    pub fn load_from(path: &Path) -> Result<Self, ConfigFileError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using built-in settings");
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path)?;
        super::parser::parse_ini(&ini)
    }

    /// Write these settings as a commented INI file, creating `~/.roadwatch`
    /// (or any other parent) on the way.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigFileError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigFileError::DirectoryError)?;
        }

        let content = super::writer::to_config_string(self);
        std::fs::write(path, content).map_err(|e| ConfigFileError::WriteError(e.to_string()))
    }

    /// Write the built-in settings to `path`.
    ///
    /// An existing file is kept unless `overwrite` is set. Returns whether
    /// the file was written.
    pub fn init_at(path: &Path, overwrite: bool) -> Result<bool, ConfigFileError> {
        if path.exists() && !overwrite {
            return Ok(false);
        }
        Self::default().save_to(path)?;
        tracing::info!(path = %path.display(), "Wrote default configuration");
        Ok(true)
    }
}

/// `~/.roadwatch`, or `./.roadwatch` when no home directory is known.
pub fn config_directory() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".roadwatch")
}

/// `~/.roadwatch/config.ini`.
pub fn config_file_path() -> PathBuf {
    config_directory().join("config.ini")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::TempDir;

    use crate::position::{SimulatorConfig, TrackerConfig};

    fn roadwatch_dir(home: &TempDir) -> PathBuf {
        home.path().join(".roadwatch")
    }

    #[test]
    fn test_missing_file_gives_component_defaults() {
        let home = TempDir::new().unwrap();

        let config = ConfigFile::load_from(&roadwatch_dir(&home).join("config.ini")).unwrap();

        assert_eq!(SimulatorConfig::from(&config.simulation), SimulatorConfig::default());
        assert_eq!(
            TrackerConfig::from(&config.tracker).attempt_timeout,
            Duration::from_secs(10)
        );
        assert_eq!(config.simulation.path, "401_provided_east");
    }

    #[test]
    fn test_init_creates_directory_and_keeps_edits() {
        let home = TempDir::new().unwrap();
        let path = roadwatch_dir(&home).join("config.ini");

        assert!(ConfigFile::init_at(&path, false).unwrap());
        assert!(std::fs::read_to_string(&path).unwrap().contains("[budget]"));

        std::fs::write(&path, "[simulation]\ntick_ms = 250\n").unwrap();
        assert!(!ConfigFile::init_at(&path, false).unwrap());
        assert_eq!(ConfigFile::load_from(&path).unwrap().simulation.tick_ms, 250);

        assert!(ConfigFile::init_at(&path, true).unwrap());
        assert_eq!(ConfigFile::load_from(&path).unwrap(), ConfigFile::default());
    }

    #[test]
    fn test_unreadable_file_is_read_error() {
        let home = TempDir::new().unwrap();
        // A directory where config.ini should be
        let path = roadwatch_dir(&home).join("config.ini");
        std::fs::create_dir_all(&path).unwrap();

        let err = ConfigFile::load_from(&path).unwrap_err();

        assert!(matches!(err, ConfigFileError::ReadError(_)), "got {:?}", err);
    }

    #[test]
    fn test_out_of_range_value_names_the_key() {
        let home = TempDir::new().unwrap();
        let path = home.path().join("config.ini");
        std::fs::write(&path, "[budget]\nmax_calls = 0\n").unwrap();

        let err = ConfigFile::load_from(&path).unwrap_err();

        assert!(matches!(
            err,
            ConfigFileError::InvalidValue { ref section, ref key, .. }
                if section == "budget" && key == "max_calls"
        ));
    }

    #[test]
    fn test_save_fails_when_parent_is_a_file() {
        let home = TempDir::new().unwrap();
        let blocker = roadwatch_dir(&home);
        std::fs::write(&blocker, "not a directory").unwrap();

        let err = ConfigFile::default()
            .save_to(&blocker.join("config.ini"))
            .unwrap_err();

        assert!(matches!(err, ConfigFileError::DirectoryError(_)));
    }

    #[test]
    fn test_config_lives_under_roadwatch_dir() {
        assert!(config_file_path().ends_with(".roadwatch/config.ini"));
        assert!(config_file_path().starts_with(config_directory()));
    }
}
