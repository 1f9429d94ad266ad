//! Unified position provider.
//!
//! [`UnifiedPositionProvider`] selects between the real tracker and the
//! simulator by [`TrackingMode`] and exposes one query surface for both:
//!
//! - [`PositionProvider`] - Query API used by consumers and the logger
//! - [`UnifiedPositionProvider::set_mode`] - Source switching with teardown
//! - [`UnifiedPositionProvider::sim_controls`] - Simulator access in SIM mode

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::sensor::{LocationError, LocationSensor};
use super::simulator::VirtualCarSimulator;
use super::state::{
    DirectionEstimate, GpsQuality, LocationStatus, Position, PositionStatus, TrackingMode,
};
use super::tracker::RealPositionTracker;

/// Trait for querying the current position (pull API).
pub trait PositionProvider: Send + Sync {
    /// Complete status snapshot.
    fn status(&self) -> PositionStatus;

    /// Current position if one is available.
    fn position(&self) -> Option<Position>;

    /// Current direction estimate.
    fn direction(&self) -> DirectionEstimate;

    /// Active source.
    fn mode(&self) -> TrackingMode;
}

impl<P: PositionProvider + ?Sized> PositionProvider for Arc<P> {
    fn status(&self) -> PositionStatus {
        (**self).status()
    }

    fn position(&self) -> Option<Position> {
        (**self).position()
    }

    fn direction(&self) -> DirectionEstimate {
        (**self).direction()
    }

    fn mode(&self) -> TrackingMode {
        (**self).mode()
    }
}

/// Facade over the real tracker and the simulator.
///
/// Only the active source is ever read. Switching modes tears down the
/// previous source first: the tracker is stopped, the simulator is paused.
pub struct UnifiedPositionProvider<S: LocationSensor> {
    mode: Mutex<TrackingMode>,
    tracker: RealPositionTracker<S>,
    simulator: VirtualCarSimulator,
}

impl<S: LocationSensor + 'static> UnifiedPositionProvider<S> {
    /// Create a provider in the given mode. No source is started yet.
    pub fn new(
        mode: TrackingMode,
        tracker: RealPositionTracker<S>,
        simulator: VirtualCarSimulator,
    ) -> Self {
        Self {
            mode: Mutex::new(mode),
            tracker,
            simulator,
        }
    }

    /// Start the active source's background work.
    ///
    /// In REAL mode this starts the tracker. In SIM mode nothing moves until
    /// the simulator is started through [`sim_controls`](Self::sim_controls).
    pub fn activate(&self) -> Result<(), LocationError> {
        match *self.lock_mode() {
            TrackingMode::Real => self.tracker.start(),
            TrackingMode::Sim => Ok(()),
        }
    }

    /// Switch the active source.
    ///
    /// The previous source's timers are cancelled before the new one is
    /// activated. Setting the current mode again is a no-op.
    pub fn set_mode(&self, mode: TrackingMode) -> Result<(), LocationError> {
        let mut current = self.lock_mode();
        if *current == mode {
            return Ok(());
        }

        match *current {
            TrackingMode::Real => self.tracker.stop(),
            TrackingMode::Sim => self.simulator.pause(),
        }

        tracing::info!(from = %*current, to = %mode, "Tracking mode changed");
        *current = mode;

        match mode {
            TrackingMode::Real => self.tracker.start(),
            TrackingMode::Sim => Ok(()),
        }
    }

    /// Simulator controls, available only in SIM mode.
    pub fn sim_controls(&self) -> Option<&VirtualCarSimulator> {
        match *self.lock_mode() {
            TrackingMode::Sim => Some(&self.simulator),
            TrackingMode::Real => None,
        }
    }

    /// Acquisition status of the active source.
    pub fn location_status(&self) -> LocationStatus {
        self.status().status
    }

    /// Quality of the active source's position.
    pub fn gps_quality(&self) -> GpsQuality {
        self.status().gps_quality
    }

    /// The real tracker, regardless of mode.
    pub fn tracker(&self) -> &RealPositionTracker<S> {
        &self.tracker
    }

    /// Stop every source.
    pub fn shutdown(&self) {
        self.tracker.stop();
        self.simulator.pause();
    }

    fn sim_status(&self) -> PositionStatus {
        let position = self.simulator.position();
        let status = if self.simulator.is_running() {
            LocationStatus::Tracking
        } else if self.simulator.progress() > 0.0 {
            LocationStatus::Ready
        } else {
            LocationStatus::Idle
        };

        PositionStatus {
            mode: TrackingMode::Sim,
            position,
            direction: self.simulator.direction(),
            status,
            gps_quality: if position.is_some() {
                GpsQuality::High
            } else {
                GpsQuality::None
            },
            error: None,
        }
    }

    fn lock_mode(&self) -> MutexGuard<'_, TrackingMode> {
        self.mode.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<S: LocationSensor + 'static> PositionProvider for UnifiedPositionProvider<S> {
    fn status(&self) -> PositionStatus {
        match self.mode() {
            TrackingMode::Real => self.tracker.snapshot(),
            TrackingMode::Sim => self.sim_status(),
        }
    }

    fn position(&self) -> Option<Position> {
        match self.mode() {
            TrackingMode::Real => self.tracker.position(),
            TrackingMode::Sim => self.simulator.position(),
        }
    }

    fn direction(&self) -> DirectionEstimate {
        match self.mode() {
            TrackingMode::Real => self.tracker.direction(),
            TrackingMode::Sim => self.simulator.direction(),
        }
    }

    fn mode(&self) -> TrackingMode {
        *self.lock_mode()
    }
}
