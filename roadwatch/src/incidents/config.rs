//! Configuration for the incident feed.

use std::time::Duration;

use super::correlator::DEFAULT_MAX_RESULTS;
use crate::budget::BudgetConfig;

/// Default Ontario 511 events endpoint.
pub const DEFAULT_EVENTS_URL: &str = "https://511on.ca/api/v2/get/event";

/// Default auto-refresh interval.
pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 15;

/// Default HTTP timeout for one fetch.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

/// Configuration for [`IncidentFeed`](super::IncidentFeed).
#[derive(Debug, Clone, PartialEq)]
pub struct IncidentFeedConfig {
    /// Events endpoint URL.
    pub events_url: String,

    /// How often the refresh loop fetches.
    pub refresh_interval: Duration,

    /// Upper bound for one HTTP request.
    pub http_timeout: Duration,

    /// Cap on reported incidents when no direction is known.
    pub max_results: usize,

    /// Call budget gating every fetch.
    pub budget: BudgetConfig,
}

impl Default for IncidentFeedConfig {
    fn default() -> Self {
        Self {
            events_url: DEFAULT_EVENTS_URL.to_string(),
            refresh_interval: Duration::from_secs(DEFAULT_REFRESH_INTERVAL_SECS),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            max_results: DEFAULT_MAX_RESULTS,
            budget: BudgetConfig::default(),
        }
    }
}
