//! Periodic position logging daemon.
//!
//! Emits a DEBUG record of the active source's position at a fixed interval,
//! useful for reviewing a drive or a simulation run after the fact.
//!
//! # Output Format
//!
//! Structured fields:
//! - `mode` - Active source (real, sim)
//! - `lat`, `lon` - Position in decimal degrees
//! - `cardinal` - Direction of travel
//! - `bearing` - Raw bearing in degrees, when known
//! - `status` - Acquisition status
//! - `quality` - GPS quality of the served position

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::provider::PositionProvider;

/// Default logging interval (20 seconds).
pub const DEFAULT_LOG_INTERVAL: Duration = Duration::from_secs(20);

/// Spawns a background task that periodically logs the current position.
///
/// Stops when the cancellation token is triggered. Callers can skip spawning
/// when DEBUG is disabled:
///
/// ```ignore
/// if tracing::enabled!(tracing::Level::DEBUG) {
///     spawn_position_logger(provider, cancel, DEFAULT_LOG_INTERVAL);
/// }
/// ```
pub fn spawn_position_logger<P>(
    provider: P,
    cancellation: CancellationToken,
    interval: Duration,
) -> JoinHandle<()>
where
    P: PositionProvider + 'static,
{
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    log_position(&provider);
                }
                _ = cancellation.cancelled() => {
                    tracing::debug!("Position logger stopped");
                    break;
                }
            }
        }
    })
}

fn log_position<P: PositionProvider>(provider: &P) {
    let status = provider.status();

    if let Some(position) = status.position {
        tracing::debug!(
            mode = %status.mode,
            lat = format!("{:.5}", position.lat),
            lon = format!("{:.5}", position.lon),
            cardinal = %status.direction.cardinal,
            bearing = %format_bearing(status.direction.bearing),
            status = %status.status,
            quality = %status.gps_quality,
            "Position update"
        );
    } else {
        tracing::debug!(
            mode = %status.mode,
            status = %status.status,
            error = status.error.as_deref().unwrap_or(""),
            "Position update (no position data)"
        );
    }
}

/// Formats an optional bearing as whole degrees, or `-` when absent.
fn format_bearing(bearing: Option<f64>) -> String {
    match bearing {
        Some(b) => format!("{:03.0}", b),
        None => "-".to_string(),
    }
}
