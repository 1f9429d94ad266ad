//! RoadWatch - position and direction tracking for a traffic client
//!
//! This library answers two questions for a driver: where am I heading, and
//! what is on the road ahead.
//!
//! - [`position`] tracks the device (real sensor or a simulated car) and
//!   exposes a single source of position, direction and status
//! - [`incidents`] fetches traffic events and correlates them with the
//!   current road and direction
//! - [`budget`] limits how often the incident endpoint is called
//! - [`geo`] holds the great-circle math shared by the above
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use roadwatch::position::{
//!     NoLocationCapability, RealPositionTracker, SimulatorConfig, TrackingMode,
//!     UnifiedPositionProvider, VirtualCarSimulator, DEFAULT_SIM_PATHS,
//! };
//!
//! # async fn run() {
//! let tracker = RealPositionTracker::new(Arc::new(NoLocationCapability));
//! let simulator = VirtualCarSimulator::with_path(DEFAULT_SIM_PATHS[0], SimulatorConfig::default());
//! let provider = UnifiedPositionProvider::new(TrackingMode::Sim, tracker, simulator);
//!
//! if let Some(sim) = provider.sim_controls() {
//!     sim.start().ok();
//! }
//! # }
//! ```

pub mod budget;
pub mod config;
pub mod geo;
pub mod incidents;
pub mod logging;
pub mod position;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
