//! INI serialization logic for converting `ConfigFile` → INI string.
//!
//! This module contains the `to_config_string()` function that produces
//! the commented INI representation written to `config.ini`.

use super::settings::ConfigFile;
use crate::position::DEFAULT_SIM_PATHS;

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    let path_ids: Vec<&str> = DEFAULT_SIM_PATHS.iter().map(|p| p.id).collect();

    format!(
        r#"[tracker]
; Delay between successful location polls, also the retry floor (default: 5000)
poll_interval_ms = {}
; Upper bound for the retry delay after repeated failures (default: 30000)
max_backoff_ms = {}
; Timeout for a single location request (default: 10000)
attempt_timeout_ms = {}
; Minimum movement in metres before direction of travel is recomputed (default: 10)
min_displacement_m = {}

[simulation]
; Built-in path: {}
path = {}
; Time to drive the whole path in milliseconds (default: 300000)
duration_ms = {}
; Position update interval in milliseconds (default: 1000)
tick_ms = {}

[budget]
; Maximum incident fetches per window (default: 10)
max_calls = {}
; Sliding window length in seconds (default: 60)
window_secs = {}
; Cooldown armed when the window is full, in seconds (default: 30)
cooldown_secs = {}

[incidents]
; Traffic events endpoint
events_url = {}
; Auto-refresh interval in seconds (default: 15)
refresh_interval_secs = {}
; HTTP timeout in seconds (default: 10)
http_timeout_secs = {}
; Maximum incidents listed when direction is unknown (default: 50)
max_results = {}

[logging]
; Log file location
file = {}
"#,
        config.tracker.poll_interval_ms,
        config.tracker.max_backoff_ms,
        config.tracker.attempt_timeout_ms,
        config.tracker.min_displacement_m,
        path_ids.join(", "),
        config.simulation.path,
        config.simulation.duration_ms,
        config.simulation.tick_ms,
        config.budget.max_calls,
        config.budget.window_secs,
        config.budget.cooldown_secs,
        config.incidents.events_url,
        config.incidents.refresh_interval_secs,
        config.incidents.http_timeout_secs,
        config.incidents.max_results,
        config.logging.file.to_string_lossy(),
    )
}
