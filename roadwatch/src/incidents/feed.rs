//! Budget-gated incident feed.
//!
//! [`IncidentFeed`] combines an [`IncidentClient`], a [`CallBudgetLimiter`]
//! and the correlator:
//!
//! ```text
//! refresh(position, direction)
//!     │
//!     ├── can_call()? ── no ──► RefreshOutcome::RateLimited
//!     │
//!     ├── client.fetch_events() ──► FetchError (call not recorded)
//!     │
//!     ├── record_call()
//!     │
//!     └── normalize ──► what_is_ahead ──► RefreshOutcome::Updated
//! ```

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::client::IncidentClient;
use super::config::IncidentFeedConfig;
use super::correlator::{what_is_ahead, AheadReport};
use super::error::FetchError;
use super::record::{normalize_payload, IncidentRecord};
use crate::budget::{BudgetConfig, CallBudgetLimiter, RateLimitState};
use crate::position::{CardinalDirection, Position, PositionProvider};

/// Result of a refresh attempt that did not fail.
#[derive(Debug, Clone, PartialEq)]
pub enum RefreshOutcome {
    /// Fresh data was fetched and correlated.
    Updated(AheadReport),
    /// The call budget is exhausted; nothing was fetched.
    RateLimited(RateLimitState),
}

impl RefreshOutcome {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited(_))
    }
}

/// Latest successfully fetched data.
#[derive(Debug, Clone)]
pub struct FeedSnapshot {
    pub records: Vec<IncidentRecord>,
    pub report: AheadReport,
    pub fetched_at: DateTime<Utc>,
}

/// User-facing message for a rate-limited refresh.
pub fn rate_limit_message(budget: &BudgetConfig) -> String {
    format!(
        "Rate limit: Maximum {} calls per {} seconds. Please wait.",
        budget.max_calls,
        budget.window.as_secs()
    )
}

/// Incident feed with call budgeting.
pub struct IncidentFeed<C: IncidentClient> {
    client: C,
    limiter: Mutex<CallBudgetLimiter>,
    latest: Mutex<Option<FeedSnapshot>>,
    config: IncidentFeedConfig,
}

impl<C: IncidentClient> IncidentFeed<C> {
    pub fn new(client: C, config: IncidentFeedConfig) -> Self {
        Self {
            client,
            limiter: Mutex::new(CallBudgetLimiter::new(config.budget)),
            latest: Mutex::new(None),
            config,
        }
    }

    /// Fetch and correlate, if the call budget allows.
    ///
    /// A call is recorded against the budget only when the fetch succeeds.
    /// Fetch failures leave the previous snapshot in place.
    pub async fn refresh(
        &self,
        position: Option<Position>,
        direction: CardinalDirection,
    ) -> Result<RefreshOutcome, FetchError> {
        {
            let limiter = self.lock_limiter();
            if !limiter.can_call() {
                let state = limiter.state();
                tracing::warn!(
                    calls = state.window_count,
                    cooldown_secs = state.cooldown_remaining,
                    "{}",
                    rate_limit_message(limiter.config())
                );
                return Ok(RefreshOutcome::RateLimited(state));
            }
        }

        let payload = match self.client.fetch_events().await {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!(error = %e, "Incident fetch failed");
                return Err(e);
            }
        };
        self.lock_limiter().record_call();

        let records = normalize_payload(&payload)?;
        let report = what_is_ahead(position, direction, &records, self.config.max_results);

        tracing::info!(
            records = records.len(),
            matches = report.incidents.len(),
            road = report.road.as_deref().unwrap_or("-"),
            direction = %direction,
            "Incident feed refreshed"
        );

        *self.latest.lock().unwrap_or_else(PoisonError::into_inner) = Some(FeedSnapshot {
            records,
            report: report.clone(),
            fetched_at: Utc::now(),
        });

        Ok(RefreshOutcome::Updated(report))
    }

    /// Re-run correlation on the latest snapshot without fetching.
    pub fn correlate_latest(
        &self,
        position: Option<Position>,
        direction: CardinalDirection,
    ) -> Option<AheadReport> {
        let latest = self.latest.lock().unwrap_or_else(PoisonError::into_inner);
        latest.as_ref().map(|snapshot| {
            what_is_ahead(
                position,
                direction,
                &snapshot.records,
                self.config.max_results,
            )
        })
    }

    /// Latest successful snapshot.
    pub fn latest(&self) -> Option<FeedSnapshot> {
        self.latest
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Current budget state.
    pub fn budget_state(&self) -> RateLimitState {
        self.lock_limiter().state()
    }

    pub fn config(&self) -> &IncidentFeedConfig {
        &self.config
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    fn lock_limiter(&self) -> MutexGuard<'_, CallBudgetLimiter> {
        self.limiter.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Display for RefreshOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Updated(report) => write!(f, "{} incident(s) ahead", report.incidents.len()),
            Self::RateLimited(state) => write!(f, "rate limited ({})", state),
        }
    }
}

/// Spawns a background task that refreshes the feed at a fixed interval.
///
/// Each refresh uses the provider's position and direction at that moment.
/// Rate-limited and failed refreshes are logged and retried on the next tick.
pub fn spawn_refresh_loop<C, P>(
    feed: Arc<IncidentFeed<C>>,
    provider: P,
    cancellation: CancellationToken,
    interval: Duration,
) -> JoinHandle<()>
where
    C: IncidentClient + 'static,
    P: PositionProvider + 'static,
{
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let position = provider.position();
                    let direction = provider.direction().cardinal;
                    match feed.refresh(position, direction).await {
                        Ok(outcome) => tracing::debug!(outcome = %outcome, "Auto refresh"),
                        Err(e) => tracing::warn!(error = %e, "Auto refresh failed"),
                    }
                }
                _ = cancellation.cancelled() => {
                    tracing::debug!("Incident refresh loop stopped");
                    break;
                }
            }
        }
    })
}
