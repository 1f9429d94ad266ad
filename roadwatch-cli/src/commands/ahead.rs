//! `roadwatch ahead` - one-shot "what's ahead" incident report.

use std::path::PathBuf;

use clap::Args;
use roadwatch::incidents::{rate_limit_message, IncidentFeed, RefreshOutcome};
use roadwatch::position::{find_dummy_route, CardinalDirection, Position};
use tracing::info;

use super::common::{format_report, DirectionArg, FeedSource};
use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the ahead command.
#[derive(Debug, Args)]
pub struct AheadArgs {
    /// Latitude in decimal degrees
    #[arg(long, requires = "lon", allow_hyphen_values = true)]
    pub lat: Option<f64>,

    /// Longitude in decimal degrees
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    pub lon: Option<f64>,

    /// Direction of travel
    #[arg(long, value_enum)]
    pub direction: Option<DirectionArg>,

    /// Take position and direction from a dummy route
    #[arg(long, conflicts_with_all = ["lat", "lon", "direction"])]
    pub route: Option<String>,

    /// Read events from a saved JSON payload instead of the live endpoint
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Maximum incidents listed when the direction is unknown
    #[arg(long)]
    pub max: Option<usize>,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

/// Run the ahead command.
pub async fn run(args: AheadArgs, runner: &CliRunner) -> Result<(), CliError> {
    let (position, direction) = resolve_location(&args)?;

    let config = runner.config();
    let mut feed_config = config.incident_feed_config();
    if let Some(max) = args.max {
        feed_config.max_results = max;
    }

    let source = FeedSource::new(args.file.as_deref(), config)?;
    info!(source = %source.describe(), direction = %direction, "Fetching incidents");
    let feed = IncidentFeed::new(source, feed_config);

    match feed.refresh(position, direction).await? {
        RefreshOutcome::Updated(report) => {
            if args.json {
                let json = serde_json::to_string_pretty(&report)
                    .map_err(|e| CliError::Output(e.to_string()))?;
                println!("{}", json);
            } else {
                print!("{}", format_report(&report));
            }
        }
        RefreshOutcome::RateLimited(_) => {
            println!("{}", rate_limit_message(&feed.config().budget));
        }
    }

    Ok(())
}

fn resolve_location(args: &AheadArgs) -> Result<(Option<Position>, CardinalDirection), CliError> {
    if let Some(id) = &args.route {
        let route = find_dummy_route(id).ok_or_else(|| {
            CliError::InvalidInput(format!(
                "Unknown route '{}'. Use 'roadwatch replay --list' to see available routes.",
                id
            ))
        })?;
        return Ok((
            route.current_position(),
            route.direction_estimate().cardinal,
        ));
    }

    let position = match (args.lat, args.lon) {
        (Some(lat), Some(lon)) => {
            Some(Position::new(lat, lon).map_err(|e| CliError::InvalidInput(e.to_string()))?)
        }
        _ => None,
    };
    let direction = args
        .direction
        .map(CardinalDirection::from)
        .unwrap_or_default();

    Ok((position, direction))
}
