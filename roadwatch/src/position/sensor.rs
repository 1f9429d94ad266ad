//! Device location capability.
//!
//! The [`LocationSensor`] trait is the tracker's only view of the hardware.
//! Each call is a one-shot request; the tracker re-issues requests itself so
//! the accuracy fallback and backoff policy stay explicit and testable.
//!
//! Implementations provided here:
//!
//! - [`RouteReplaySensor`] - Replays a fixed list of points (dummy routes)
//! - [`NoLocationCapability`] - A platform without location support

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use thiserror::Error;

use super::state::{AccuracyMode, Position};

/// Per-attempt timeout applied to every request.
pub const DEFAULT_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(10);

/// Maximum cached fix age accepted in high-accuracy mode.
pub const HIGH_ACCURACY_MAX_CACHE_AGE: Duration = Duration::from_secs(5);

/// Maximum cached fix age accepted in low-accuracy mode.
pub const LOW_ACCURACY_MAX_CACHE_AGE: Duration = Duration::from_secs(60);

/// Options for a single location request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorRequest {
    pub high_accuracy: bool,
    pub timeout: Duration,
    pub max_cache_age: Duration,
}

impl SensorRequest {
    /// Request options for the given accuracy mode.
    pub fn for_mode(mode: AccuracyMode, timeout: Duration) -> Self {
        match mode {
            AccuracyMode::High => Self {
                high_accuracy: true,
                timeout,
                max_cache_age: HIGH_ACCURACY_MAX_CACHE_AGE,
            },
            AccuracyMode::Low => Self {
                high_accuracy: false,
                timeout,
                max_cache_age: LOW_ACCURACY_MAX_CACHE_AGE,
            },
        }
    }
}

/// A raw fix as reported by the device.
///
/// Coordinates are not yet validated; the tracker converts them into a
/// [`Position`] and treats invalid values as an unavailable position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorReading {
    pub lat: f64,
    pub lon: f64,
    /// Milliseconds since the Unix epoch.
    pub timestamp_ms: i64,
}

impl SensorReading {
    /// Reading stamped with the current wall-clock time.
    pub fn now(lat: f64, lon: f64) -> Self {
        Self {
            lat,
            lon,
            timestamp_ms: chrono::Utc::now().timestamp_millis(),
        }
    }
}

/// Location acquisition failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocationError {
    /// The user refused location access. Fatal.
    #[error("Location permission denied. Please enable location services.")]
    PermissionDenied,

    /// No fix could be obtained (signal lost, device settings).
    #[error("GPS signal lost or unavailable. Please check your device settings.")]
    PositionUnavailable,

    /// The attempt did not complete in time.
    #[error("Location request timed out.")]
    Timeout,

    /// Any other platform failure.
    #[error("Unknown location error: {0}")]
    Unknown(String),

    /// The platform exposes no location capability at all. Fatal.
    #[error("Geolocation is not supported on this platform")]
    NoCapability,
}

impl LocationError {
    /// Map a platform error code (1 = denied, 2 = unavailable, 3 = timeout).
    pub fn from_code(code: u16, message: impl Into<String>) -> Self {
        match code {
            1 => Self::PermissionDenied,
            2 => Self::PositionUnavailable,
            3 => Self::Timeout,
            _ => Self::Unknown(message.into()),
        }
    }

    /// Fatal errors stop the tracker with no retry.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::PermissionDenied | Self::NoCapability)
    }

    /// Retryable errors go through the downgrade-then-backoff policy.
    pub fn is_retryable(&self) -> bool {
        !self.is_fatal()
    }
}

/// One-shot device location request.
pub trait LocationSensor: Send + Sync {
    /// Whether the platform has any location capability.
    fn is_available(&self) -> bool {
        true
    }

    /// Request a single fix.
    fn request_position(
        &self,
        request: SensorRequest,
    ) -> impl Future<Output = Result<SensorReading, LocationError>> + Send;
}

/// Sensor for platforms without location support.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLocationCapability;

impl LocationSensor for NoLocationCapability {
    fn is_available(&self) -> bool {
        false
    }

    async fn request_position(
        &self,
        _request: SensorRequest,
    ) -> Result<SensorReading, LocationError> {
        Err(LocationError::NoCapability)
    }
}

/// Replays a fixed sequence of points, one per request.
///
/// After the last point the sensor keeps returning it, like a parked device.
#[derive(Debug)]
pub struct RouteReplaySensor {
    points: Vec<Position>,
    next: AtomicUsize,
}

impl RouteReplaySensor {
    /// Create a replay sensor over the given points.
    pub fn new(points: Vec<Position>) -> Self {
        Self {
            points,
            next: AtomicUsize::new(0),
        }
    }

    /// Number of requests answered so far.
    pub fn requests_served(&self) -> usize {
        self.next.load(Ordering::SeqCst)
    }
}

impl LocationSensor for RouteReplaySensor {
    async fn request_position(
        &self,
        _request: SensorRequest,
    ) -> Result<SensorReading, LocationError> {
        let index = self.next.fetch_add(1, Ordering::SeqCst);
        let point = self
            .points
            .get(index)
            .or_else(|| self.points.last())
            .ok_or(LocationError::PositionUnavailable)?;
        Ok(SensorReading::now(point.lat, point.lon))
    }
}
