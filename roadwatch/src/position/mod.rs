//! Position and direction tracking.
//!
//! This module provides a **single source** of the user's position and
//! direction of travel, backed either by the device location sensor or by a
//! deterministic path simulator.
//!
//! # Architecture
//!
//! ```text
//! UnifiedPositionProvider (mode: Real | Sim)
//!     │
//!     ├── RealPositionTracker ── LocationSensor (device, route replay)
//!     │       poll loop: high accuracy → low accuracy → backoff
//!     │
//!     └── VirtualCarSimulator ── SimPath (start → end over duration)
//!             tick loop: virtual epoch, auto-stop at progress 1
//! ```
//!
//! Both background loops are cancelled through a generation counter captured
//! when the loop is spawned. A loop whose generation no longer matches the
//! owner's current generation stops without touching state.
//!
//! # Usage
//!
//! ```ignore
//! use roadwatch::position::{
//!     PositionProvider, RealPositionTracker, RouteReplaySensor, TrackingMode,
//!     UnifiedPositionProvider, VirtualCarSimulator,
//! };
//!
//! let tracker = RealPositionTracker::new(Arc::new(sensor));
//! let simulator = VirtualCarSimulator::with_path(path, SimulatorConfig::default());
//! let provider = UnifiedPositionProvider::new(TrackingMode::Real, tracker, simulator);
//! provider.activate()?;
//!
//! if let Some(position) = provider.position() {
//!     println!("{} heading {}", position, provider.direction().cardinal);
//! }
//! ```
//!
//! # Components
//!
//! - `state` - Core types: `Position`, `DirectionEstimate`, `LocationStatus`, `GpsQuality`
//! - [`sensor`] - `LocationSensor` contract, `RouteReplaySensor`
//! - `tracker` - `RealPositionTracker` with accuracy fallback and backoff
//! - `simulator` - `VirtualCarSimulator`
//! - [`paths`] - Built-in simulation corridors and dummy routes
//! - `provider` - `UnifiedPositionProvider` and the `PositionProvider` trait

mod logger;
pub mod paths;
mod provider;
pub mod sensor;
mod simulator;
mod state;
mod tracker;

pub use logger::{spawn_position_logger, DEFAULT_LOG_INTERVAL};
pub use paths::{
    find_dummy_route, find_sim_path, DummyRoute, SimPath, DEFAULT_SIM_PATHS, DEFAULT_SIM_PATH_ID,
    DUMMY_ROUTES,
};
pub use provider::{PositionProvider, UnifiedPositionProvider};
pub use sensor::{
    LocationError, LocationSensor, NoLocationCapability, RouteReplaySensor, SensorReading,
    SensorRequest,
};
pub use simulator::{
    SimulationError, SimulatorConfig, VirtualCarSimulator, DEFAULT_SIM_DURATION, DEFAULT_SIM_TICK,
};
pub use state::{
    AccuracyMode, CardinalDirection, DirectionEstimate, GeoError, GpsQuality, LocationStatus,
    Position, PositionStatus, TrackingMode,
};
pub use tracker::{
    PollDecision, RealPositionTracker, TrackerConfig, DEFAULT_MAX_BACKOFF,
    DEFAULT_MIN_DISPLACEMENT_KM, DEFAULT_POLL_INTERVAL,
};
