//! Real position tracker - sensor-driven acquisition loop.
//!
//! The [`RealPositionTracker`] owns an explicit poll loop over a
//! [`LocationSensor`]: it requests one fix, applies the result to its state,
//! then decides when to ask again.
//!
//! # Policy
//!
//! - Success: replace the retained position, update direction if the
//!   displacement is at least 10 m, reset the backoff delay, poll again in 5 s.
//! - First retryable failure in high-accuracy mode: switch to low accuracy
//!   and retry immediately.
//! - Retryable failure in low-accuracy mode: back off
//!   (`delay = min(delay * 1.5, 30 s)`, starting from 5 s).
//! - With a retained position, retryable failures are absorbed
//!   (`GpsQuality::LastKnown`); without one they are surfaced as `Error`.
//! - Fatal failures (permission denied, no capability) stop the loop.
//!
//! # Cancellation
//!
//! Every loop iteration captures the tracker generation at spawn time and
//! re-checks it under the state lock before mutating anything. `stop()` bumps
//! the generation, so a sensor answer arriving after teardown is dropped.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;

use super::sensor::{LocationError, LocationSensor, SensorReading, SensorRequest};
use super::state::{
    AccuracyMode, DirectionEstimate, GpsQuality, LocationStatus, Position, PositionStatus,
    TrackingMode,
};
use crate::geo;

/// Default interval between successful polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(5000);

/// Default backoff ceiling.
pub const DEFAULT_MAX_BACKOFF: Duration = Duration::from_millis(30_000);

/// Default minimum displacement before the direction is recomputed (10 m).
pub const DEFAULT_MIN_DISPLACEMENT_KM: f64 = 0.01;

/// Backoff growth factor for consecutive low-accuracy failures.
const BACKOFF_FACTOR: f64 = 1.5;

/// Configuration for the real position tracker.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Delay before the next poll after a successful fix. Also the backoff floor.
    pub poll_interval: Duration,

    /// Upper bound for the retry delay.
    pub max_backoff: Duration,

    /// Upper bound for a single sensor request.
    pub attempt_timeout: Duration,

    /// Minimum movement (km) before the direction estimate changes.
    pub min_displacement_km: f64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_backoff: DEFAULT_MAX_BACKOFF,
            attempt_timeout: super::sensor::DEFAULT_ATTEMPT_TIMEOUT,
            min_displacement_km: DEFAULT_MIN_DISPLACEMENT_KM,
        }
    }
}

/// What the poll loop does after applying an observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollDecision {
    /// Issue the next request without waiting.
    RetryNow,
    /// Wait, then issue the next request.
    PollAfter(Duration),
    /// Terminal: no further requests.
    Stop,
}

/// Mutable tracker state, guarded by a single lock.
#[derive(Debug)]
struct TrackerState {
    status: LocationStatus,
    gps_quality: GpsQuality,
    position: Option<Position>,
    direction: DirectionEstimate,
    accuracy: AccuracyMode,
    retry_delay: Duration,
    last_error: Option<LocationError>,
    generation: u64,
}

impl TrackerState {
    fn new(config: &TrackerConfig) -> Self {
        Self {
            status: LocationStatus::Idle,
            gps_quality: GpsQuality::None,
            position: None,
            direction: DirectionEstimate::UNKNOWN,
            accuracy: AccuracyMode::High,
            retry_delay: config.poll_interval,
            last_error: None,
            generation: 0,
        }
    }

    /// Apply a successful sensor reading.
    fn apply_reading(&mut self, reading: SensorReading, config: &TrackerConfig) -> PollDecision {
        let new_position = match Position::new(reading.lat, reading.lon) {
            Ok(position) => position,
            Err(e) => {
                tracing::warn!(error = %e, "Discarding invalid sensor reading");
                return self.apply_error(LocationError::PositionUnavailable, config);
            }
        };

        self.retry_delay = config.poll_interval;
        self.gps_quality = self.accuracy.quality();

        if let Some(previous) = self.position {
            let displacement_km = geo::distance_km(previous, new_position);
            if displacement_km >= config.min_displacement_km {
                self.direction =
                    DirectionEstimate::from_bearing(geo::bearing_deg(previous, new_position));
                tracing::debug!(
                    displacement_m = format!("{:.1}", displacement_km * 1000.0),
                    cardinal = %self.direction.cardinal,
                    "Direction updated"
                );
            } else {
                tracing::trace!(
                    displacement_m = format!("{:.1}", displacement_km * 1000.0),
                    "Displacement below threshold, direction unchanged"
                );
            }
        }

        if self.status != LocationStatus::Ready {
            tracing::info!(
                lat = format!("{:.5}", new_position.lat),
                lon = format!("{:.5}", new_position.lon),
                quality = %self.gps_quality,
                "Location ready"
            );
        }

        self.position = Some(new_position);
        self.status = LocationStatus::Ready;
        self.last_error = None;

        PollDecision::PollAfter(config.poll_interval)
    }

    /// Apply a failed sensor request.
    fn apply_error(&mut self, error: LocationError, config: &TrackerConfig) -> PollDecision {
        if error.is_fatal() {
            tracing::error!(error = %error, "Fatal location error, tracking stopped");
            self.status = LocationStatus::Error;
            self.gps_quality = GpsQuality::None;
            self.last_error = Some(error);
            return PollDecision::Stop;
        }

        if self.accuracy == AccuracyMode::High {
            tracing::warn!(
                error = %error,
                "High accuracy GPS failed, switching to fallback mode"
            );
            self.accuracy = AccuracyMode::Low;
            return PollDecision::RetryNow;
        }

        self.retry_delay = next_backoff(self.retry_delay, config.max_backoff);

        if self.position.is_some() {
            tracing::warn!(
                error = %error,
                delay_ms = self.retry_delay.as_millis() as u64,
                "Transient location error, using last known position"
            );
            self.status = LocationStatus::Ready;
            self.gps_quality = GpsQuality::LastKnown;
        } else {
            tracing::warn!(
                error = %error,
                delay_ms = self.retry_delay.as_millis() as u64,
                "Location error with no known position"
            );
            self.status = LocationStatus::Error;
            self.gps_quality = GpsQuality::None;
            self.last_error = Some(error);
        }

        PollDecision::PollAfter(self.retry_delay)
    }
}

/// Grow a retry delay by the backoff factor, capped at `max`.
fn next_backoff(current: Duration, max: Duration) -> Duration {
    current.mul_f64(BACKOFF_FACTOR).min(max)
}

/// Sensor-driven position tracker.
///
/// Cloning is cheap and yields a handle onto the same tracker.
pub struct RealPositionTracker<S: LocationSensor> {
    sensor: Arc<S>,
    state: Arc<Mutex<TrackerState>>,
    poll_task: Arc<Mutex<Option<JoinHandle<()>>>>,
    config: TrackerConfig,
}

impl<S: LocationSensor> Clone for RealPositionTracker<S> {
    fn clone(&self) -> Self {
        Self {
            sensor: Arc::clone(&self.sensor),
            state: Arc::clone(&self.state),
            poll_task: Arc::clone(&self.poll_task),
            config: self.config.clone(),
        }
    }
}

impl<S: LocationSensor + 'static> RealPositionTracker<S> {
    /// Create a tracker with default configuration.
    pub fn new(sensor: Arc<S>) -> Self {
        Self::with_config(sensor, TrackerConfig::default())
    }

    /// Create a tracker with custom configuration.
    pub fn with_config(sensor: Arc<S>, config: TrackerConfig) -> Self {
        Self {
            sensor,
            state: Arc::new(Mutex::new(TrackerState::new(&config))),
            poll_task: Arc::new(Mutex::new(None)),
            config,
        }
    }

    /// Begin polling the device.
    ///
    /// Fails with [`LocationError::NoCapability`] (and enters `Error`) if the
    /// platform has no location support. Calling `start` while already
    /// polling restarts the loop. Must be called within a tokio runtime.
    pub fn start(&self) -> Result<(), LocationError> {
        if !self.sensor.is_available() {
            let mut state = self.lock_state();
            state.generation += 1;
            state.status = LocationStatus::Error;
            state.gps_quality = GpsQuality::None;
            state.last_error = Some(LocationError::NoCapability);
            tracing::error!("Geolocation is not supported on this platform");
            return Err(LocationError::NoCapability);
        }

        let generation = {
            let mut state = self.lock_state();
            state.generation += 1;
            if state.position.is_none() {
                state.status = LocationStatus::Requesting;
            }
            state.last_error = None;
            state.generation
        };

        tracing::info!(generation, "Real position tracking started");

        let handle = tokio::spawn(poll_loop(
            Arc::clone(&self.sensor),
            Arc::clone(&self.state),
            self.config.clone(),
            generation,
        ));

        let previous = self
            .poll_task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(handle);
        if let Some(previous) = previous {
            previous.abort();
        }

        Ok(())
    }

    /// Cancel any pending poll or backoff timer. Idempotent.
    ///
    /// Retained position, direction and status are left as they are.
    pub fn stop(&self) {
        let generation = {
            let mut state = self.lock_state();
            state.generation += 1;
            state.generation
        };

        let handle = self
            .poll_task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = handle {
            handle.abort();
            tracing::debug!(generation, "Real position tracking stopped");
        }
    }

    /// Stop polling and return to `Idle` with no position.
    pub fn reset(&self) {
        self.stop();
        let mut state = self.lock_state();
        let generation = state.generation;
        *state = TrackerState::new(&self.config);
        state.generation = generation;
        tracing::info!("Real position tracker reset");
    }

    /// Whether a poll loop is currently scheduled.
    pub fn is_polling(&self) -> bool {
        self.poll_task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Most recent retained position.
    pub fn position(&self) -> Option<Position> {
        self.lock_state().position
    }

    /// Current direction estimate.
    pub fn direction(&self) -> DirectionEstimate {
        self.lock_state().direction
    }

    /// Acquisition status.
    pub fn status(&self) -> LocationStatus {
        self.lock_state().status
    }

    /// Quality of the served position.
    pub fn gps_quality(&self) -> GpsQuality {
        self.lock_state().gps_quality
    }

    /// Accuracy tier used for the next request.
    pub fn accuracy_mode(&self) -> AccuracyMode {
        self.lock_state().accuracy
    }

    /// Current retry delay.
    pub fn retry_delay(&self) -> Duration {
        self.lock_state().retry_delay
    }

    /// Last surfaced error. Absorbed failures are not reported here.
    pub fn last_error(&self) -> Option<LocationError> {
        self.lock_state().last_error.clone()
    }

    /// Full status snapshot.
    pub fn snapshot(&self) -> PositionStatus {
        let state = self.lock_state();
        PositionStatus {
            mode: TrackingMode::Real,
            position: state.position,
            direction: state.direction,
            status: state.status,
            gps_quality: state.gps_quality,
            error: state.last_error.as_ref().map(|e| e.to_string()),
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, TrackerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// The poll loop for one tracker generation.
async fn poll_loop<S: LocationSensor>(
    sensor: Arc<S>,
    state: Arc<Mutex<TrackerState>>,
    config: TrackerConfig,
    generation: u64,
) {
    loop {
        let request = {
            let state = state.lock().unwrap_or_else(PoisonError::into_inner);
            if state.generation != generation {
                return;
            }
            SensorRequest::for_mode(state.accuracy, config.attempt_timeout)
        };

        let result =
            match tokio::time::timeout(config.attempt_timeout, sensor.request_position(request))
                .await
            {
                Ok(result) => result,
                Err(_) => Err(LocationError::Timeout),
            };

        let decision = {
            let mut state = state.lock().unwrap_or_else(PoisonError::into_inner);
            if state.generation != generation {
                tracing::trace!(generation, "Discarding observation from stale generation");
                return;
            }
            match result {
                Ok(reading) => state.apply_reading(reading, &config),
                Err(error) => state.apply_error(error, &config),
            }
        };

        match decision {
            PollDecision::RetryNow => continue,
            PollDecision::PollAfter(delay) => tokio::time::sleep(delay).await,
            PollDecision::Stop => return,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::state::CardinalDirection;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Sensor answering from a script; pending forever once exhausted.
    struct ScriptedSensor {
        script: Mutex<VecDeque<Result<SensorReading, LocationError>>>,
        requests: AtomicUsize,
        high_accuracy_requests: AtomicUsize,
    }

    impl ScriptedSensor {
        fn new(script: Vec<Result<SensorReading, LocationError>>) -> Arc<Self> {
            Arc::new(Self {
                script: Mutex::new(script.into()),
                requests: AtomicUsize::new(0),
                high_accuracy_requests: AtomicUsize::new(0),
            })
        }

        fn requests(&self) -> usize {
            self.requests.load(Ordering::SeqCst)
        }
    }

    impl LocationSensor for ScriptedSensor {
        async fn request_position(
            &self,
            request: SensorRequest,
        ) -> Result<SensorReading, LocationError> {
            self.requests.fetch_add(1, Ordering::SeqCst);
            if request.high_accuracy {
                self.high_accuracy_requests.fetch_add(1, Ordering::SeqCst);
            }
            let next = self.script.lock().unwrap().pop_front();
            match next {
                Some(result) => result,
                None => std::future::pending().await,
            }
        }
    }

    fn reading(lat: f64, lon: f64) -> SensorReading {
        SensorReading {
            lat,
            lon,
            timestamp_ms: 0,
        }
    }

    fn fresh_state() -> (TrackerState, TrackerConfig) {
        let config = TrackerConfig::default();
        (TrackerState::new(&config), config)
    }

    // ==================== state machine tests ====================

    #[test]
    fn test_first_reading_has_no_direction() {
        let (mut state, config) = fresh_state();

        let decision = state.apply_reading(reading(43.72, -79.42), &config);

        assert_eq!(decision, PollDecision::PollAfter(Duration::from_millis(5000)));
        assert_eq!(state.status, LocationStatus::Ready);
        assert_eq!(state.gps_quality, GpsQuality::High);
        assert_eq!(state.direction, DirectionEstimate::UNKNOWN);
    }

    #[test]
    fn test_small_displacement_keeps_direction() {
        let (mut state, config) = fresh_state();

        state.apply_reading(reading(43.0, -79.0), &config);
        // ~5.6m north
        state.apply_reading(reading(43.00005, -79.0), &config);

        assert_eq!(state.direction.cardinal, CardinalDirection::Unknown);
        // Position is still replaced
        assert_eq!(state.position, Position::new(43.00005, -79.0).ok());
    }

    #[test]
    fn test_large_displacement_updates_direction() {
        let (mut state, config) = fresh_state();

        state.apply_reading(reading(43.0, -79.0), &config);
        // ~16m east
        state.apply_reading(reading(43.0, -78.9998), &config);

        assert_eq!(state.direction.cardinal, CardinalDirection::East);
        let bearing = state.direction.bearing.unwrap();
        assert!((bearing - 90.0).abs() < 0.1);

        // Jitter afterwards does not flip it back
        state.apply_reading(reading(43.00001, -78.99981), &config);
        assert_eq!(state.direction.cardinal, CardinalDirection::East);
    }

    #[test]
    fn test_direction_follows_bearing_classification() {
        let (mut state, config) = fresh_state();
        let a = Position::new(43.72, -79.42).unwrap();
        let b = Position::new(43.70, -79.40).unwrap();

        state.apply_reading(reading(a.lat, a.lon), &config);
        state.apply_reading(reading(b.lat, b.lon), &config);

        assert_eq!(
            state.direction.cardinal,
            geo::classify(geo::bearing_deg(a, b))
        );
    }

    #[test]
    fn test_permission_denied_is_terminal() {
        let (mut state, config) = fresh_state();

        let decision = state.apply_error(LocationError::PermissionDenied, &config);

        assert_eq!(decision, PollDecision::Stop);
        assert_eq!(state.status, LocationStatus::Error);
        assert_eq!(state.gps_quality, GpsQuality::None);
        assert_eq!(state.last_error, Some(LocationError::PermissionDenied));
    }

    #[test]
    fn test_first_timeout_downgrades_and_retries_now() {
        let (mut state, config) = fresh_state();

        let decision = state.apply_error(LocationError::Timeout, &config);

        assert_eq!(decision, PollDecision::RetryNow);
        assert_eq!(state.accuracy, AccuracyMode::Low);
        assert_eq!(state.retry_delay, Duration::from_millis(5000));
    }

    #[test]
    fn test_low_accuracy_failures_back_off_to_cap() {
        let (mut state, config) = fresh_state();
        state.apply_error(LocationError::Timeout, &config);

        let expected_ms = [7500, 11250, 16875, 25312, 30000, 30000];
        for expected in expected_ms {
            let decision = state.apply_error(LocationError::PositionUnavailable, &config);
            let PollDecision::PollAfter(delay) = decision else {
                panic!("expected a delayed retry, got {:?}", decision);
            };
            assert_eq!(delay.as_millis() as u64, expected);
        }
        assert_eq!(state.status, LocationStatus::Error);
        assert_eq!(state.gps_quality, GpsQuality::None);
    }

    #[test]
    fn test_success_resets_backoff_but_keeps_low_accuracy() {
        let (mut state, config) = fresh_state();
        state.apply_error(LocationError::Timeout, &config);
        state.apply_error(LocationError::Timeout, &config);
        assert_eq!(state.retry_delay, Duration::from_millis(7500));

        state.apply_reading(reading(43.0, -79.0), &config);

        assert_eq!(state.retry_delay, Duration::from_millis(5000));
        assert_eq!(state.accuracy, AccuracyMode::Low);
        assert_eq!(state.gps_quality, GpsQuality::Low);
        assert_eq!(state.status, LocationStatus::Ready);
        assert!(state.last_error.is_none());
    }

    #[test]
    fn test_retained_position_absorbs_transient_errors() {
        let (mut state, config) = fresh_state();
        state.apply_reading(reading(43.0, -79.0), &config);
        state.apply_error(LocationError::Timeout, &config);

        let decision = state.apply_error(LocationError::Timeout, &config);

        assert_eq!(decision, PollDecision::PollAfter(Duration::from_millis(7500)));
        assert_eq!(state.status, LocationStatus::Ready);
        assert_eq!(state.gps_quality, GpsQuality::LastKnown);
        assert!(state.last_error.is_none());
        assert_eq!(state.position, Position::new(43.0, -79.0).ok());
    }

    #[test]
    fn test_invalid_reading_is_treated_as_unavailable() {
        let (mut state, config) = fresh_state();

        let decision = state.apply_reading(reading(f64::NAN, -79.0), &config);

        assert_eq!(decision, PollDecision::RetryNow);
        assert!(state.position.is_none());
        assert_eq!(state.accuracy, AccuracyMode::Low);
    }

    // ==================== poll loop tests ====================

    #[tokio::test(start_paused = true)]
    async fn test_permission_denied_stops_polling() {
        let sensor = ScriptedSensor::new(vec![Err(LocationError::PermissionDenied)]);
        let tracker = RealPositionTracker::new(Arc::clone(&sensor));

        tracker.start().unwrap();
        tokio::time::sleep(Duration::from_secs(120)).await;

        assert_eq!(sensor.requests(), 1);
        assert_eq!(tracker.status(), LocationStatus::Error);
        assert_eq!(tracker.last_error(), Some(LocationError::PermissionDenied));
        assert!(!tracker.is_polling());
    }

    #[tokio::test(start_paused = true)]
    async fn test_high_accuracy_timeout_retries_immediately_in_low_mode() {
        let sensor = ScriptedSensor::new(vec![
            Err(LocationError::Timeout),
            Ok(reading(43.72, -79.42)),
        ]);
        let tracker = RealPositionTracker::new(Arc::clone(&sensor));

        tracker.start().unwrap();
        tokio::time::sleep(Duration::from_millis(1)).await;

        assert_eq!(sensor.requests(), 2);
        assert_eq!(sensor.high_accuracy_requests.load(Ordering::SeqCst), 1);
        assert_eq!(tracker.accuracy_mode(), AccuracyMode::Low);
        assert_eq!(tracker.gps_quality(), GpsQuality::Low);
        assert_eq!(tracker.status(), LocationStatus::Ready);
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_timeout_schedules_backoff() {
        let sensor = ScriptedSensor::new(vec![
            Err(LocationError::Timeout),
            Err(LocationError::Timeout),
        ]);
        let tracker = RealPositionTracker::new(Arc::clone(&sensor));

        tracker.start().unwrap();
        tokio::time::sleep(Duration::from_millis(1)).await;

        assert_eq!(sensor.requests(), 2);
        let delay = tracker.retry_delay();
        assert!(delay >= Duration::from_millis(7500) && delay <= Duration::from_millis(30_000));
        assert_eq!(tracker.status(), LocationStatus::Error);
        assert_eq!(tracker.last_error(), Some(LocationError::Timeout));

        tokio::time::sleep(Duration::from_millis(7000)).await;
        assert_eq!(sensor.requests(), 2, "retry must wait for the backoff delay");

        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert_eq!(sensor.requests(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_silent_sensor_hits_attempt_timeout() {
        // Empty script: every request stays pending
        let sensor = ScriptedSensor::new(vec![]);
        let tracker = RealPositionTracker::new(Arc::clone(&sensor));

        tracker.start().unwrap();
        tokio::time::sleep(Duration::from_millis(9900)).await;
        assert_eq!(sensor.requests(), 1);
        assert_eq!(tracker.accuracy_mode(), AccuracyMode::High);

        // 10s timeout in high accuracy retries at once in low accuracy
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(sensor.requests(), 2);
        assert_eq!(sensor.high_accuracy_requests.load(Ordering::SeqCst), 1);
        assert_eq!(tracker.accuracy_mode(), AccuracyMode::Low);

        // Second timeout at 20s, then a 7.5s backoff
        tokio::time::sleep(Duration::from_millis(17_300)).await;
        assert_eq!(sensor.requests(), 2, "retry must wait for timeout plus backoff");
        assert_eq!(tracker.last_error(), Some(LocationError::Timeout));
        assert_eq!(tracker.status(), LocationStatus::Error);

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(sensor.requests(), 3);
        assert_eq!(sensor.high_accuracy_requests.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_polls_every_interval_after_success() {
        let sensor = ScriptedSensor::new(vec![
            Ok(reading(43.0, -79.0)),
            Ok(reading(43.0, -78.999)),
        ]);
        let tracker = RealPositionTracker::new(Arc::clone(&sensor));

        tracker.start().unwrap();
        tokio::time::sleep(Duration::from_millis(1)).await;
        assert_eq!(sensor.requests(), 1);
        assert_eq!(tracker.direction().cardinal, CardinalDirection::Unknown);

        tokio::time::sleep(Duration::from_millis(5000)).await;
        assert_eq!(sensor.requests(), 2);
        assert_eq!(tracker.direction().cardinal, CardinalDirection::East);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_prevents_further_polls() {
        let sensor = ScriptedSensor::new(vec![
            Ok(reading(43.0, -79.0)),
            Ok(reading(44.0, -79.0)),
        ]);
        let tracker = RealPositionTracker::new(Arc::clone(&sensor));

        tracker.start().unwrap();
        tokio::time::sleep(Duration::from_millis(1)).await;
        tracker.stop();
        tracker.stop(); // idempotent
        tokio::time::sleep(Duration::from_secs(60)).await;

        assert_eq!(sensor.requests(), 1);
        assert_eq!(tracker.position(), Position::new(43.0, -79.0).ok());
        assert!(!tracker.is_polling());
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_capability_fails_start() {
        let tracker = RealPositionTracker::new(Arc::new(
            crate::position::sensor::NoLocationCapability,
        ));

        assert_eq!(tracker.start(), Err(LocationError::NoCapability));
        assert_eq!(tracker.status(), LocationStatus::Error);
        assert!(!tracker.is_polling());
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_returns_to_idle() {
        let sensor = ScriptedSensor::new(vec![Ok(reading(43.0, -79.0))]);
        let tracker = RealPositionTracker::new(Arc::clone(&sensor));

        tracker.start().unwrap();
        tokio::time::sleep(Duration::from_millis(1)).await;
        assert!(tracker.position().is_some());

        tracker.reset();

        let snapshot = tracker.snapshot();
        assert_eq!(snapshot.status, LocationStatus::Idle);
        assert_eq!(snapshot.gps_quality, GpsQuality::None);
        assert!(snapshot.position.is_none());
        assert_eq!(tracker.accuracy_mode(), AccuracyMode::High);
    }
}
