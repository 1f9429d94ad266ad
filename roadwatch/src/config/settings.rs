//! Settings structs for all configuration sections.
//!
//! Each struct represents one `[section]` of the INI config file.
//! Conversions into component configs live here too, so callers never
//! assemble component configs from raw numbers.

use std::path::PathBuf;
use std::time::Duration;

use crate::budget::BudgetConfig;
use crate::incidents::IncidentFeedConfig;
use crate::position::{SimulatorConfig, TrackerConfig};

/// Complete application configuration loaded from config.ini.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    /// Real position tracker settings
    pub tracker: TrackerSettings,
    /// Virtual car simulation settings
    pub simulation: SimulationSettings,
    /// Incident call budget settings
    pub budget: BudgetSettings,
    /// Incident feed settings
    pub incidents: IncidentSettings,
    /// Logging settings
    pub logging: LoggingSettings,
}

/// Real position tracker configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackerSettings {
    /// Delay between successful polls, also the backoff floor.
    pub poll_interval_ms: u64,
    /// Backoff ceiling.
    pub max_backoff_ms: u64,
    /// Timeout for a single sensor request.
    pub attempt_timeout_ms: u64,
    /// Minimum movement (metres) before direction is recomputed.
    pub min_displacement_m: f64,
}

/// Simulation configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationSettings {
    /// Built-in path id.
    pub path: String,
    /// Time to traverse the path.
    pub duration_ms: u64,
    /// Tick interval.
    pub tick_ms: u64,
}

/// Call budget configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetSettings {
    pub max_calls: usize,
    pub window_secs: u64,
    pub cooldown_secs: u64,
}

/// Incident feed configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct IncidentSettings {
    pub events_url: String,
    pub refresh_interval_secs: u64,
    pub http_timeout_secs: u64,
    /// Cap on results when no direction is known.
    pub max_results: usize,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    /// Log file path.
    pub file: PathBuf,
}

impl From<&TrackerSettings> for TrackerConfig {
    fn from(settings: &TrackerSettings) -> Self {
        Self {
            poll_interval: Duration::from_millis(settings.poll_interval_ms),
            max_backoff: Duration::from_millis(settings.max_backoff_ms),
            attempt_timeout: Duration::from_millis(settings.attempt_timeout_ms),
            min_displacement_km: settings.min_displacement_m / 1000.0,
        }
    }
}

impl From<&SimulationSettings> for SimulatorConfig {
    fn from(settings: &SimulationSettings) -> Self {
        Self {
            duration: Duration::from_millis(settings.duration_ms),
            tick_interval: Duration::from_millis(settings.tick_ms),
        }
    }
}

impl From<&BudgetSettings> for BudgetConfig {
    fn from(settings: &BudgetSettings) -> Self {
        Self {
            max_calls: settings.max_calls,
            window: Duration::from_secs(settings.window_secs),
            cooldown: Duration::from_secs(settings.cooldown_secs),
        }
    }
}

impl ConfigFile {
    /// Incident feed configuration, including the call budget.
    pub fn incident_feed_config(&self) -> IncidentFeedConfig {
        IncidentFeedConfig {
            events_url: self.incidents.events_url.clone(),
            refresh_interval: Duration::from_secs(self.incidents.refresh_interval_secs),
            http_timeout: Duration::from_secs(self.incidents.http_timeout_secs),
            max_results: self.incidents.max_results,
            budget: BudgetConfig::from(&self.budget),
        }
    }
}
