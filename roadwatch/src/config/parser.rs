//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This module contains the `parse_ini()` function and its helpers.
//! It is the single place where INI key names are mapped to struct fields.

use std::path::PathBuf;
use std::str::FromStr;

use ini::{Ini, Properties};

use super::file::ConfigFileError;
use super::settings::ConfigFile;
use crate::position::{find_sim_path, DEFAULT_SIM_PATHS};

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [tracker] section
    if let Some(section) = ini.section(Some("tracker")) {
        if let Some(v) = positive(section, "tracker", "poll_interval_ms")? {
            config.tracker.poll_interval_ms = v;
        }
        if let Some(v) = positive(section, "tracker", "max_backoff_ms")? {
            config.tracker.max_backoff_ms = v;
        }
        if let Some(v) = positive(section, "tracker", "attempt_timeout_ms")? {
            config.tracker.attempt_timeout_ms = v;
        }
        if let Some(v) = section.get("min_displacement_m") {
            let parsed: f64 = parse_value(
                v,
                "tracker",
                "min_displacement_m",
                "must be a non-negative number (metres)",
            )?;
            if !parsed.is_finite() || parsed < 0.0 {
                return Err(invalid(
                    "tracker",
                    "min_displacement_m",
                    v,
                    "must be a non-negative number (metres)",
                ));
            }
            config.tracker.min_displacement_m = parsed;
        }
        if config.tracker.max_backoff_ms < config.tracker.poll_interval_ms {
            return Err(invalid(
                "tracker",
                "max_backoff_ms",
                &config.tracker.max_backoff_ms.to_string(),
                "must not be lower than poll_interval_ms",
            ));
        }
    }

    // [simulation] section
    if let Some(section) = ini.section(Some("simulation")) {
        if let Some(v) = section.get("path") {
            let v = v.trim();
            if find_sim_path(v).is_none() {
                let known: Vec<&str> = DEFAULT_SIM_PATHS.iter().map(|p| p.id).collect();
                return Err(invalid(
                    "simulation",
                    "path",
                    v,
                    &format!("must be one of: {}", known.join(", ")),
                ));
            }
            config.simulation.path = v.to_string();
        }
        if let Some(v) = positive(section, "simulation", "duration_ms")? {
            config.simulation.duration_ms = v;
        }
        if let Some(v) = positive(section, "simulation", "tick_ms")? {
            config.simulation.tick_ms = v;
        }
    }

    // [budget] section
    if let Some(section) = ini.section(Some("budget")) {
        if let Some(v) = positive(section, "budget", "max_calls")? {
            config.budget.max_calls = v;
        }
        if let Some(v) = positive(section, "budget", "window_secs")? {
            config.budget.window_secs = v;
        }
        if let Some(v) = section.get("cooldown_secs") {
            config.budget.cooldown_secs = parse_value(
                v,
                "budget",
                "cooldown_secs",
                "must be a non-negative integer (seconds)",
            )?;
        }
    }

    // [incidents] section
    if let Some(section) = ini.section(Some("incidents")) {
        if let Some(v) = section.get("events_url") {
            let v = v.trim();
            if !(v.starts_with("http://") || v.starts_with("https://")) {
                return Err(invalid(
                    "incidents",
                    "events_url",
                    v,
                    "must be an http:// or https:// URL",
                ));
            }
            config.incidents.events_url = v.to_string();
        }
        if let Some(v) = positive(section, "incidents", "refresh_interval_secs")? {
            config.incidents.refresh_interval_secs = v;
        }
        if let Some(v) = positive(section, "incidents", "http_timeout_secs")? {
            config.incidents.http_timeout_secs = v;
        }
        if let Some(v) = positive(section, "incidents", "max_results")? {
            config.incidents.max_results = v;
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("file") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.file = expand_tilde(v);
            }
        }
    }

    Ok(config)
}

/// Read an optional strictly positive integer.
fn positive<T>(section: &Properties, name: &str, key: &str) -> Result<Option<T>, ConfigFileError>
where
    T: FromStr + Default + PartialEq,
{
    let Some(v) = section.get(key) else {
        return Ok(None);
    };
    let parsed: T = parse_value(v, name, key, "must be a positive integer")?;
    if parsed == T::default() {
        return Err(invalid(name, key, v, "must be a positive integer"));
    }
    Ok(Some(parsed))
}

fn parse_value<T: FromStr>(
    value: &str,
    section: &str,
    key: &str,
    reason: &str,
) -> Result<T, ConfigFileError> {
    value
        .trim()
        .parse()
        .map_err(|_| invalid(section, key, value, reason))
}

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Expand a leading `~/` to the home directory.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::defaults::*;
    use tempfile::TempDir;

    fn load(content: &str) -> Result<ConfigFile, ConfigFileError> {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.ini");
        std::fs::write(&config_path, content).unwrap();
        ConfigFile::load_from(&config_path)
    }

    #[test]
    fn test_partial_config() {
        let config = load(
            r#"
[tracker]
poll_interval_ms = 2000

[budget]
max_calls = 5
"#,
        )
        .unwrap();

        assert_eq!(config.tracker.poll_interval_ms, 2000);
        assert_eq!(config.tracker.max_backoff_ms, DEFAULT_MAX_BACKOFF_MS);
        assert_eq!(config.budget.max_calls, 5);
        assert_eq!(config.budget.window_secs, 60);
        assert_eq!(config.simulation.path, "401_provided_east");
    }

    #[test]
    fn test_full_config() {
        let config = load(
            r#"
[tracker]
poll_interval_ms = 3000
max_backoff_ms = 20000
attempt_timeout_ms = 8000
min_displacement_m = 25

[simulation]
path = 401_412_to_keele_west
duration_ms = 60000
tick_ms = 500

[budget]
max_calls = 20
window_secs = 120
cooldown_secs = 0

[incidents]
events_url = http://localhost:8080/events
refresh_interval_secs = 30
http_timeout_secs = 5
max_results = 10

[logging]
file = /tmp/roadwatch-test.log
"#,
        )
        .unwrap();

        assert_eq!(config.tracker.attempt_timeout_ms, 8000);
        assert_eq!(config.tracker.min_displacement_m, 25.0);
        assert_eq!(config.simulation.path, "401_412_to_keele_west");
        assert_eq!(config.simulation.tick_ms, 500);
        assert_eq!(config.budget.cooldown_secs, 0);
        assert_eq!(config.incidents.events_url, "http://localhost:8080/events");
        assert_eq!(config.incidents.max_results, 10);
        assert_eq!(config.logging.file, PathBuf::from("/tmp/roadwatch-test.log"));
    }

    #[test]
    fn test_invalid_sim_path() {
        let err = load(
            r#"
[simulation]
path = hwy_999
"#,
        )
        .unwrap_err();

        assert!(err.to_string().contains("simulation.path"));
        assert!(err.to_string().contains("401_provided_east"));
    }

    #[test]
    fn test_zero_interval_rejected() {
        let err = load(
            r#"
[simulation]
tick_ms = 0
"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("tick_ms"));
    }

    #[test]
    fn test_non_numeric_rejected() {
        let err = load(
            r#"
[budget]
window_secs = soon
"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigFileError::InvalidValue { ref key, .. } if key == "window_secs"));
    }

    #[test]
    fn test_backoff_below_poll_interval_rejected() {
        let err = load(
            r#"
[tracker]
poll_interval_ms = 10000
max_backoff_ms = 5000
"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("max_backoff_ms"));
    }

    #[test]
    fn test_negative_displacement_rejected() {
        assert!(load("[tracker]\nmin_displacement_m = -1\n").is_err());
    }

    #[test]
    fn test_invalid_events_url() {
        let err = load("[incidents]\nevents_url = 511on.ca/api\n").unwrap_err();
        assert!(err.to_string().contains("events_url"));
    }

    #[test]
    fn test_expand_tilde() {
        let path = expand_tilde("~/test/path");
        if let Some(home) = dirs::home_dir() {
            assert_eq!(path, home.join("test/path"));
        }

        // Non-tilde paths should be unchanged
        let path = expand_tilde("/absolute/path");
        assert_eq!(path, PathBuf::from("/absolute/path"));
    }
}
