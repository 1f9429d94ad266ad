//! `roadwatch replay` - run the real tracker against a dummy route.

use std::sync::Arc;
use std::time::Duration;

use clap::Args;
use roadwatch::position::{
    find_dummy_route, PositionProvider, RealPositionTracker, RouteReplaySensor, SimulatorConfig,
    TrackerConfig, TrackingMode, UnifiedPositionProvider, VirtualCarSimulator, DUMMY_ROUTES,
};
use tracing::info;

use super::common::format_status;
use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the replay command.
#[derive(Debug, Args)]
pub struct ReplayArgs {
    /// Dummy route id
    #[arg(long, default_value = "hwy401East")]
    pub route: String,

    /// Poll interval in milliseconds
    #[arg(long, default_value = "1000")]
    pub interval_ms: u64,

    /// List dummy routes and exit
    #[arg(long)]
    pub list: bool,
}

/// Run the replay command.
pub async fn run(args: ReplayArgs, runner: &CliRunner) -> Result<(), CliError> {
    if args.list {
        println!("Dummy routes:");
        for route in DUMMY_ROUTES.iter() {
            println!(
                "  {:<16} {} ({} points, heading {})",
                route.id,
                route.name,
                route.points.len(),
                route.direction_estimate().cardinal
            );
        }
        return Ok(());
    }

    if args.interval_ms == 0 {
        return Err(CliError::InvalidInput(
            "--interval-ms must be greater than zero".to_string(),
        ));
    }

    let route = find_dummy_route(&args.route).ok_or_else(|| {
        CliError::InvalidInput(format!(
            "Unknown route '{}'. Use 'roadwatch replay --list' to see available routes.",
            args.route
        ))
    })?;

    let config = runner.config();
    let mut tracker_config = TrackerConfig::from(&config.tracker);
    tracker_config.poll_interval = Duration::from_millis(args.interval_ms);
    tracker_config.max_backoff = tracker_config.max_backoff.max(tracker_config.poll_interval);

    let sensor = Arc::new(RouteReplaySensor::new(route.points.to_vec()));
    let tracker = RealPositionTracker::with_config(Arc::clone(&sensor), tracker_config);
    let simulator = VirtualCarSimulator::new(SimulatorConfig::from(&config.simulation));
    let provider = UnifiedPositionProvider::new(TrackingMode::Real, tracker, simulator);

    provider.activate()?;
    info!(route = route.id, points = route.points.len(), "Route replay started");
    println!("Replaying {} ({} points)", route.name, route.points.len());

    let mut ticker = tokio::time::interval(Duration::from_millis(args.interval_ms));
    // First tick completes immediately.
    ticker.tick().await;

    while sensor.requests_served() < route.points.len() {
        ticker.tick().await;
        println!("  {}", format_status(&provider.status()));
    }

    provider.shutdown();

    let derived = provider.direction().cardinal;
    let expected = route.direction_estimate().cardinal;
    println!();
    println!("Derived heading: {} (route heading {})", derived, expected);

    Ok(())
}
