//! Call budget limiter for the incident feed.
//!
//! Gates outbound incident fetches with two independent conditions:
//!
//! - **Sliding window**: fewer than `max_calls` recorded calls in the trailing
//!   `window` (10 per 60 s by default)
//! - **Cooldown**: once a recorded call brings the window count to the
//!   maximum, every call is blocked for `cooldown` (30 s by default)
//!
//! Both gates must pass. The window count is always recomputed from the full
//! call log; entries are never pruned.
//!
//! ```text
//! calls:     |||||||||| (10 in window)
//! cooldown:  [=========30s=========]
//! can_call:  false ........................ true once both clear
//! ```

use std::fmt;
use std::time::Duration;

use tokio::time::Instant;

/// Default maximum calls per window.
pub const DEFAULT_MAX_CALLS: usize = 10;

/// Default sliding window length.
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(60);

/// Default cooldown armed when the window fills.
pub const DEFAULT_COOLDOWN: Duration = Duration::from_secs(30);

/// Limiter configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BudgetConfig {
    pub max_calls: usize,
    pub window: Duration,
    pub cooldown: Duration,
}

impl Default for BudgetConfig {
    fn default() -> Self {
        Self {
            max_calls: DEFAULT_MAX_CALLS,
            window: DEFAULT_WINDOW,
            cooldown: DEFAULT_COOLDOWN,
        }
    }
}

/// Snapshot of the limiter at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitState {
    /// Calls recorded within the trailing window.
    pub window_count: usize,
    /// Whole seconds left on the cooldown (0 when inactive).
    pub cooldown_remaining: u32,
}

impl fmt::Display for RateLimitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.cooldown_remaining > 0 {
            write!(
                f,
                "{} calls in window, cooldown {}s",
                self.window_count, self.cooldown_remaining
            )
        } else {
            write!(f, "{} calls in window", self.window_count)
        }
    }
}

/// Sliding-window call limiter with cooldown.
#[derive(Debug)]
pub struct CallBudgetLimiter {
    config: BudgetConfig,
    calls: Vec<Instant>,
    cooldown_until: Option<Instant>,
}

impl Default for CallBudgetLimiter {
    fn default() -> Self {
        Self::new(BudgetConfig::default())
    }
}

impl CallBudgetLimiter {
    pub fn new(config: BudgetConfig) -> Self {
        Self {
            config,
            calls: Vec::new(),
            cooldown_until: None,
        }
    }

    pub fn config(&self) -> &BudgetConfig {
        &self.config
    }

    /// Whether a call may be made now.
    pub fn can_call(&self) -> bool {
        self.can_call_at(Instant::now())
    }

    /// Whether a call may be made at `now`.
    pub fn can_call_at(&self, now: Instant) -> bool {
        self.recent_call_count_at(now) < self.config.max_calls
            && self.cooldown_remaining_at(now) == 0
    }

    /// Record a call made now.
    pub fn record_call(&mut self) {
        self.record_call_at(Instant::now());
    }

    /// Record a call made at `now`.
    ///
    /// Arms (or re-arms) the cooldown when the window count reaches the
    /// maximum.
    pub fn record_call_at(&mut self, now: Instant) {
        self.calls.push(now);

        let count = self.recent_call_count_at(now);
        if count >= self.config.max_calls {
            self.cooldown_until = Some(now + self.config.cooldown);
            tracing::warn!(
                calls = count,
                window_secs = self.config.window.as_secs(),
                cooldown_secs = self.config.cooldown.as_secs(),
                "Call budget exhausted, cooldown armed"
            );
        } else {
            tracing::debug!(calls = count, "Call recorded");
        }
    }

    /// Calls recorded within the trailing window.
    pub fn recent_call_count(&self) -> usize {
        self.recent_call_count_at(Instant::now())
    }

    pub fn recent_call_count_at(&self, now: Instant) -> usize {
        self.calls
            .iter()
            .filter(|&&t| t <= now && now.duration_since(t) < self.config.window)
            .count()
    }

    /// Whole seconds left on the cooldown, rounded up.
    pub fn cooldown_remaining(&self) -> u32 {
        self.cooldown_remaining_at(Instant::now())
    }

    pub fn cooldown_remaining_at(&self, now: Instant) -> u32 {
        match self.cooldown_until {
            Some(until) if until > now => (until - now).as_secs_f64().ceil() as u32,
            _ => 0,
        }
    }

    /// Snapshot of window count and cooldown.
    pub fn state(&self) -> RateLimitState {
        self.state_at(Instant::now())
    }

    pub fn state_at(&self, now: Instant) -> RateLimitState {
        RateLimitState {
            window_count: self.recent_call_count_at(now),
            cooldown_remaining: self.cooldown_remaining_at(now),
        }
    }
}
