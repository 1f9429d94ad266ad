//! Common types and utilities shared across CLI commands.

use std::path::Path;

use clap::ValueEnum;
use roadwatch::config::ConfigFile;
use roadwatch::incidents::{
    AheadReport, FetchError, HttpIncidentClient, IncidentClient, StaticIncidentClient,
};
use roadwatch::position::{CardinalDirection, PositionStatus};
use serde_json::Value;

use crate::error::CliError;

/// Direction of travel selection for CLI arguments.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq)]
pub enum DirectionArg {
    /// Northbound
    North,
    /// Southbound
    South,
    /// Eastbound
    East,
    /// Westbound
    West,
    /// No direction filter
    Unknown,
}

impl From<DirectionArg> for CardinalDirection {
    fn from(arg: DirectionArg) -> Self {
        match arg {
            DirectionArg::North => CardinalDirection::North,
            DirectionArg::South => CardinalDirection::South,
            DirectionArg::East => CardinalDirection::East,
            DirectionArg::West => CardinalDirection::West,
            DirectionArg::Unknown => CardinalDirection::Unknown,
        }
    }
}

/// Where incident events come from: the live endpoint or a saved payload.
pub enum FeedSource {
    Http(HttpIncidentClient),
    File(StaticIncidentClient),
}

impl FeedSource {
    /// Build the source from an optional `--file` argument and the config.
    pub fn new(file: Option<&Path>, config: &ConfigFile) -> Result<Self, CliError> {
        match file {
            Some(path) => Ok(Self::File(StaticIncidentClient::from_file(path)?)),
            None => {
                let feed_config = config.incident_feed_config();
                let client =
                    HttpIncidentClient::new(feed_config.events_url, feed_config.http_timeout)?;
                Ok(Self::Http(client))
            }
        }
    }

    /// Short description for startup output.
    pub fn describe(&self) -> String {
        match self {
            Self::Http(client) => client.events_url().to_string(),
            Self::File(_) => "local file".to_string(),
        }
    }
}

impl IncidentClient for FeedSource {
    async fn fetch_events(&self) -> Result<Value, FetchError> {
        match self {
            Self::Http(client) => client.fetch_events().await,
            Self::File(client) => client.fetch_events().await,
        }
    }
}

/// One-line position status for terminal output.
pub fn format_status(status: &PositionStatus) -> String {
    let position = status
        .position
        .map(|p| p.to_string())
        .unwrap_or_else(|| "no position".to_string());
    let bearing = status
        .direction
        .bearing
        .map(|b| format!(" ({:.0}°)", b))
        .unwrap_or_default();

    let mut line = format!(
        "[{}] {} | heading {}{} | {} | GPS {}",
        status.mode, position, status.direction.cardinal, bearing, status.status, status.gps_quality
    );
    if let Some(error) = &status.error {
        line.push_str(&format!(" | {}", error));
    }
    line
}

/// Multi-line incident report for terminal output.
pub fn format_report(report: &AheadReport) -> String {
    let road = report.road.as_deref().unwrap_or("any road");
    let mut out = format!("Road ahead: {} heading {}\n", road, report.direction);

    if report.is_empty() {
        out.push_str("  No incidents ahead.\n");
        return out;
    }

    for ranked in &report.incidents {
        let distance = if ranked.distance_km.is_finite() {
            format!("{:.1} km", ranked.distance_km)
        } else {
            "? km".to_string()
        };
        out.push_str(&format!("  {:>8}  {}\n", distance, ranked.record));
    }
    out
}
