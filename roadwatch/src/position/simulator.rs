//! Virtual car simulator.
//!
//! Moves a virtual car along a [`SimPath`] by linear interpolation over a
//! fixed duration, sampled on a fixed tick. Progress is derived from the wall
//! clock via a virtual epoch (`now - progress * duration`), so pausing and
//! resuming continues the timeline instead of restarting it.
//!
//! Direction is a two-way East/West classification by the sign of the
//! longitude change between ticks.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use thiserror::Error;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use super::paths::SimPath;
use super::state::{CardinalDirection, DirectionEstimate, Position};

/// Default time to traverse a path (5 minutes).
pub const DEFAULT_SIM_DURATION: Duration = Duration::from_millis(300_000);

/// Default tick interval (1 second).
pub const DEFAULT_SIM_TICK: Duration = Duration::from_millis(1000);

/// Longitude changes at or below this are ignored for direction.
const DIRECTION_EPSILON_DEG: f64 = 1e-7;

/// Simulator errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimulationError {
    #[error("No simulation path selected")]
    NoPath,

    #[error("Simulation duration must be greater than zero")]
    ZeroDuration,

    #[error("Simulation tick interval must be greater than zero")]
    ZeroTickInterval,
}

/// Simulator timing configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulatorConfig {
    /// Time to traverse the whole path.
    pub duration: Duration,
    /// Interval between position updates.
    pub tick_interval: Duration,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            duration: DEFAULT_SIM_DURATION,
            tick_interval: DEFAULT_SIM_TICK,
        }
    }
}

impl SimulatorConfig {
    /// Reject timings the tick loop cannot run with.
    pub fn validate(&self) -> Result<(), SimulationError> {
        if self.duration.is_zero() {
            return Err(SimulationError::ZeroDuration);
        }
        if self.tick_interval.is_zero() {
            return Err(SimulationError::ZeroTickInterval);
        }
        Ok(())
    }
}

/// Result of applying one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TickOutcome {
    Continue,
    Finished,
}

#[derive(Debug)]
struct SimState {
    path: Option<SimPath>,
    config: SimulatorConfig,
    progress: f64,
    running: bool,
    direction: DirectionEstimate,
    epoch: Option<Instant>,
    last_lon: Option<f64>,
    ticks: u64,
    generation: u64,
    timer: Option<JoinHandle<()>>,
}

impl SimState {
    fn position(&self) -> Option<Position> {
        self.path.map(|path| path.position_at(self.progress))
    }

    /// Cancel the timer and invalidate every scheduled tick.
    fn cancel_timer(&mut self) {
        self.generation += 1;
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }

    /// Drop interpolation anchors after a path or timing change.
    fn clear_anchors(&mut self) {
        self.cancel_timer();
        self.running = false;
        self.epoch = None;
        self.last_lon = None;
    }

    fn tick_at(&mut self, now: Instant) -> TickOutcome {
        let (Some(path), Some(epoch)) = (self.path, self.epoch) else {
            return TickOutcome::Finished;
        };

        let elapsed = now.saturating_duration_since(epoch);
        let progress = (elapsed.as_secs_f64() / self.config.duration.as_secs_f64()).min(1.0);
        let next = path.position_at(progress);

        if let Some(last_lon) = self.last_lon {
            let delta = next.lon - last_lon;
            if delta.abs() > DIRECTION_EPSILON_DEG {
                let cardinal = if delta > 0.0 {
                    CardinalDirection::East
                } else {
                    CardinalDirection::West
                };
                self.direction = DirectionEstimate::from_cardinal(cardinal);
            }
        }
        self.last_lon = Some(next.lon);
        self.progress = progress;
        self.ticks += 1;

        tracing::trace!(
            progress = format!("{:.3}", progress),
            lat = format!("{:.5}", next.lat),
            lon = format!("{:.5}", next.lon),
            cardinal = %self.direction.cardinal,
            "Simulation tick"
        );

        if progress >= 1.0 {
            self.running = false;
            self.epoch = None;
            self.timer = None;
            tracing::info!(path = path.id, "Simulation reached end of path");
            TickOutcome::Finished
        } else {
            TickOutcome::Continue
        }
    }
}

/// Deterministic path simulator.
///
/// Cloning yields a handle onto the same simulator.
#[derive(Clone)]
pub struct VirtualCarSimulator {
    state: Arc<Mutex<SimState>>,
}

impl VirtualCarSimulator {
    /// Create a simulator with no path selected.
    pub fn new(config: SimulatorConfig) -> Self {
        Self {
            state: Arc::new(Mutex::new(SimState {
                path: None,
                config,
                progress: 0.0,
                running: false,
                direction: DirectionEstimate::UNKNOWN,
                epoch: None,
                last_lon: None,
                ticks: 0,
                generation: 0,
                timer: None,
            })),
        }
    }

    /// Create a simulator for the given path.
    pub fn with_path(path: SimPath, config: SimulatorConfig) -> Self {
        let simulator = Self::new(config);
        simulator.lock_state().path = Some(path);
        simulator
    }

    /// Start or resume movement. Must be called within a tokio runtime.
    ///
    /// A finished run (progress 1) starts over from the beginning. Calling
    /// `start` on a running simulation leaves it untouched.
    pub fn start(&self) -> Result<(), SimulationError> {
        let mut state = self.lock_state();
        let Some(path) = state.path else {
            return Err(SimulationError::NoPath);
        };
        if state.running {
            return Ok(());
        }
        state.config.validate()?;

        if state.progress >= 1.0 {
            state.progress = 0.0;
            state.direction = DirectionEstimate::UNKNOWN;
            state.last_lon = None;
        }

        state.cancel_timer();

        let now = Instant::now();
        let offset = state.config.duration.mul_f64(state.progress);
        let epoch = now.checked_sub(offset).unwrap_or(now);
        state.epoch = Some(epoch);
        state.last_lon = Some(path.position_at(state.progress).lon);
        state.running = true;

        let generation = state.generation;
        let tick = state.config.tick_interval;
        state.timer = Some(tokio::spawn(tick_loop(
            Arc::clone(&self.state),
            generation,
            now + tick,
            tick,
        )));

        tracing::info!(
            path = path.id,
            progress = format!("{:.3}", state.progress),
            generation,
            "Simulation started"
        );
        Ok(())
    }

    /// Stop ticking, keeping progress so `start` resumes.
    pub fn pause(&self) {
        let mut state = self.lock_state();
        state.cancel_timer();
        if state.running {
            tracing::info!(
                progress = format!("{:.3}", state.progress),
                "Simulation paused"
            );
        }
        state.running = false;
    }

    /// Stop ticking and rewind to the start of the path.
    pub fn reset(&self) {
        let mut state = self.lock_state();
        state.clear_anchors();
        state.progress = 0.0;
        state.direction = DirectionEstimate::UNKNOWN;
        state.ticks = 0;
        tracing::debug!("Simulation reset");
    }

    /// Select a different path. Stops a running simulation without restarting it.
    pub fn set_path(&self, path: Option<SimPath>) {
        let mut state = self.lock_state();
        state.clear_anchors();
        state.path = path;
    }

    /// Change the traversal duration. Stops a running simulation.
    pub fn set_duration(&self, duration: Duration) -> Result<(), SimulationError> {
        if duration.is_zero() {
            return Err(SimulationError::ZeroDuration);
        }
        let mut state = self.lock_state();
        state.clear_anchors();
        state.config.duration = duration;
        Ok(())
    }

    /// Change the tick interval. Stops a running simulation.
    pub fn set_tick_interval(&self, tick_interval: Duration) -> Result<(), SimulationError> {
        if tick_interval.is_zero() {
            return Err(SimulationError::ZeroTickInterval);
        }
        let mut state = self.lock_state();
        state.clear_anchors();
        state.config.tick_interval = tick_interval;
        Ok(())
    }

    /// Interpolated position, or `None` without a path.
    pub fn position(&self) -> Option<Position> {
        self.lock_state().position()
    }

    pub fn direction(&self) -> DirectionEstimate {
        self.lock_state().direction
    }

    /// Fraction of the path covered, in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        self.lock_state().progress
    }

    pub fn is_running(&self) -> bool {
        self.lock_state().running
    }

    pub fn path(&self) -> Option<SimPath> {
        self.lock_state().path
    }

    pub fn config(&self) -> SimulatorConfig {
        self.lock_state().config
    }

    /// Number of ticks applied since the last reset.
    pub fn tick_count(&self) -> u64 {
        self.lock_state().ticks
    }

    fn lock_state(&self) -> MutexGuard<'_, SimState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

async fn tick_loop(
    state: Arc<Mutex<SimState>>,
    generation: u64,
    first_tick: Instant,
    period: Duration,
) {
    let mut ticker = tokio::time::interval_at(first_tick, period);
    loop {
        ticker.tick().await;
        let mut sim = state.lock().unwrap_or_else(PoisonError::into_inner);
        if sim.generation != generation {
            return;
        }
        if sim.tick_at(Instant::now()) == TickOutcome::Finished {
            return;
        }
    }
}
