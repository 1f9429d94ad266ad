//! Default values and constants for all configuration settings.
//!
//! Contains the `DEFAULT_*` constants and the `ConfigFile::default()`
//! implementation.

use super::file::config_directory;
use super::settings::*;
use crate::budget::{DEFAULT_COOLDOWN, DEFAULT_MAX_CALLS, DEFAULT_WINDOW};
use crate::incidents::{
    DEFAULT_EVENTS_URL, DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_MAX_RESULTS,
    DEFAULT_REFRESH_INTERVAL_SECS,
};
use crate::position::{DEFAULT_SIM_DURATION, DEFAULT_SIM_PATH_ID, DEFAULT_SIM_TICK};

// =============================================================================
// Tracker
// =============================================================================

/// Default delay between successful polls (milliseconds).
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 5_000;

/// Default backoff ceiling (milliseconds).
pub const DEFAULT_MAX_BACKOFF_MS: u64 = 30_000;

/// Default sensor request timeout (milliseconds).
pub const DEFAULT_ATTEMPT_TIMEOUT_MS: u64 = 10_000;

/// Default minimum displacement before direction changes (metres).
pub const DEFAULT_MIN_DISPLACEMENT_M: f64 = 10.0;

// =============================================================================
// Logging
// =============================================================================

/// Default log file name inside the config directory.
pub const DEFAULT_LOG_FILE_NAME: &str = "roadwatch.log";

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            tracker: TrackerSettings {
                poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
                max_backoff_ms: DEFAULT_MAX_BACKOFF_MS,
                attempt_timeout_ms: DEFAULT_ATTEMPT_TIMEOUT_MS,
                min_displacement_m: DEFAULT_MIN_DISPLACEMENT_M,
            },
            simulation: SimulationSettings {
                path: DEFAULT_SIM_PATH_ID.to_string(),
                duration_ms: DEFAULT_SIM_DURATION.as_millis() as u64,
                tick_ms: DEFAULT_SIM_TICK.as_millis() as u64,
            },
            budget: BudgetSettings {
                max_calls: DEFAULT_MAX_CALLS,
                window_secs: DEFAULT_WINDOW.as_secs(),
                cooldown_secs: DEFAULT_COOLDOWN.as_secs(),
            },
            incidents: IncidentSettings {
                events_url: DEFAULT_EVENTS_URL.to_string(),
                refresh_interval_secs: DEFAULT_REFRESH_INTERVAL_SECS,
                http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
                max_results: DEFAULT_MAX_RESULTS,
            },
            logging: LoggingSettings {
                file: config_directory().join(DEFAULT_LOG_FILE_NAME),
            },
        }
    }
}
