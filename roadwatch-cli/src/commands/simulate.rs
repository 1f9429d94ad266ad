//! `roadwatch simulate` - drive a built-in path with the virtual car.

use std::sync::Arc;
use std::time::Duration;

use clap::Args;
use roadwatch::incidents::{spawn_refresh_loop, HttpIncidentClient, IncidentFeed};
use roadwatch::position::{
    find_sim_path, spawn_position_logger, NoLocationCapability, PositionProvider,
    RealPositionTracker, SimulatorConfig, TrackerConfig, TrackingMode, UnifiedPositionProvider,
    VirtualCarSimulator, DEFAULT_LOG_INTERVAL, DEFAULT_SIM_PATHS,
};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::common::{format_report, format_status};
use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the simulate command.
#[derive(Debug, Args)]
pub struct SimulateArgs {
    /// Built-in path id (defaults to simulation.path in config.ini)
    #[arg(long)]
    pub path: Option<String>,

    /// Time to drive the whole path, in seconds
    #[arg(long)]
    pub duration_secs: Option<u64>,

    /// Simulator tick interval in milliseconds
    #[arg(long)]
    pub tick_ms: Option<u64>,

    /// Status report interval in seconds
    #[arg(long, default_value = "5")]
    pub report_secs: u64,

    /// Refresh incidents ahead while driving
    #[arg(long)]
    pub incidents: bool,

    /// List built-in paths and exit
    #[arg(long)]
    pub list: bool,
}

/// Run the simulate command.
pub async fn run(args: SimulateArgs, runner: &CliRunner) -> Result<(), CliError> {
    if args.list {
        println!("Built-in simulation paths:");
        for path in DEFAULT_SIM_PATHS.iter() {
            println!("  {:<24} {} ({:.1} km)", path.id, path.name, path.length_km());
        }
        return Ok(());
    }

    let config = runner.config();
    let path_id = args.path.as_deref().unwrap_or(&config.simulation.path);
    let path = find_sim_path(path_id).ok_or_else(|| {
        CliError::InvalidInput(format!(
            "Unknown path '{}'. Use 'roadwatch simulate --list' to see available paths.",
            path_id
        ))
    })?;

    let mut sim_config = SimulatorConfig::from(&config.simulation);
    if let Some(secs) = args.duration_secs {
        if secs == 0 {
            return Err(CliError::InvalidInput(
                "--duration-secs must be greater than zero".to_string(),
            ));
        }
        sim_config.duration = Duration::from_secs(secs);
    }
    if let Some(ms) = args.tick_ms {
        if ms == 0 {
            return Err(CliError::InvalidInput(
                "--tick-ms must be greater than zero".to_string(),
            ));
        }
        sim_config.tick_interval = Duration::from_millis(ms);
    }

    let tracker = RealPositionTracker::with_config(
        Arc::new(NoLocationCapability),
        TrackerConfig::from(&config.tracker),
    );
    let simulator = VirtualCarSimulator::with_path(path, sim_config);
    let provider = Arc::new(UnifiedPositionProvider::new(
        TrackingMode::Sim,
        tracker,
        simulator.clone(),
    ));

    let cancellation = CancellationToken::new();
    let logger = spawn_position_logger(
        Arc::clone(&provider),
        cancellation.clone(),
        DEFAULT_LOG_INTERVAL,
    );

    let feed = if args.incidents {
        let feed_config = config.incident_feed_config();
        let client = HttpIncidentClient::new(feed_config.events_url.clone(), feed_config.http_timeout)?;
        let interval = feed_config.refresh_interval;
        let feed = Arc::new(IncidentFeed::new(client, feed_config));
        spawn_refresh_loop(
            Arc::clone(&feed),
            Arc::clone(&provider),
            cancellation.clone(),
            interval,
        );
        Some(feed)
    } else {
        None
    };

    simulator.start()?;
    info!(path = %path, duration_secs = sim_config.duration.as_secs(), "Simulation started");
    println!(
        "Driving {} over {}s (Ctrl+C to stop)",
        path,
        sim_config.duration.as_secs()
    );

    let mut report = tokio::time::interval(Duration::from_secs(args.report_secs.max(1)));
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = report.tick() => {
                println!("{:>5.1}%  {}", simulator.progress() * 100.0, format_status(&provider.status()));
                if !simulator.is_running() {
                    break;
                }
            }
            _ = &mut ctrl_c => {
                println!("Interrupted");
                break;
            }
        }
    }

    provider.shutdown();
    cancellation.cancel();
    if let Err(e) = logger.await {
        warn!(error = %e, "Position logger task failed");
    }

    println!();
    println!("Final: {}", format_status(&provider.status()));
    if let Some(report) = feed.and_then(|feed| feed.latest()).map(|snapshot| snapshot.report) {
        print!("{}", format_report(&report));
    }

    Ok(())
}
