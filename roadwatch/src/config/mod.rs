//! Configuration for RoadWatch components.
//!
//! The INI file at `~/.roadwatch/config.ini` is split by concern:
//!
//! - [`ConfigFile`] and one settings struct per `[section]`
//! - Defaults shared with the component configs
//! - Parsing (`Ini` → `ConfigFile`) with per-key validation
//! - Serialization back to a commented INI file
//!
//! # Example
//!
//! ```no_run
//! use roadwatch::config::ConfigFile;
//! use roadwatch::position::TrackerConfig;
//!
//! let config = ConfigFile::load()?;
//! let tracker_config = TrackerConfig::from(&config.tracker);
//! # Ok::<(), roadwatch::config::ConfigFileError>(())
//! ```

mod defaults;
mod file;
mod parser;
mod settings;
mod writer;

pub use defaults::*;
pub use file::{config_directory, config_file_path, ConfigFileError};
pub use settings::{
    BudgetSettings, ConfigFile, IncidentSettings, LoggingSettings, SimulationSettings,
    TrackerSettings,
};
