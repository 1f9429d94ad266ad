//! Traffic incidents near the current position.
//!
//! # Architecture
//!
//! ```text
//! IncidentFeed (budget-gated refresh, optional 15s auto-refresh loop)
//!     │
//!     ├── IncidentClient trait → HttpIncidentClient (direct reqwest)
//!     │
//!     ├── normalize_payload → Vec<IncidentRecord>   (boundary, key aliases)
//!     │
//!     └── what_is_ahead → nearest road → road filter → direction filter → rank
//! ```
//!
//! The correlator functions are pure and can be used on their own.

mod client;
mod config;
mod correlator;
mod error;
mod feed;
mod record;

pub use client::{HttpIncidentClient, IncidentClient, StaticIncidentClient};
pub use config::{
    IncidentFeedConfig, DEFAULT_EVENTS_URL, DEFAULT_HTTP_TIMEOUT_SECS,
    DEFAULT_REFRESH_INTERVAL_SECS,
};
pub use correlator::{
    filter_by_direction, filter_by_road, nearest_road, rank_by_distance, what_is_ahead,
    AheadReport, NearestRoad, RankedIncident, DEFAULT_MAX_RESULTS,
};
pub use error::FetchError;
pub use feed::{rate_limit_message, spawn_refresh_loop, FeedSnapshot, IncidentFeed, RefreshOutcome};
pub use record::{normalize_payload, IncidentImpact, IncidentRecord};
