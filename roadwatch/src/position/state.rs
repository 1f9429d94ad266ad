//! Core state types for position tracking.
//!
//! This module defines the fundamental types shared by the real tracker,
//! the simulator and the unified provider:
//!
//! - [`Position`] - A validated, finite latitude/longitude pair
//! - [`CardinalDirection`] / [`DirectionEstimate`] - Derived direction of travel
//! - [`TrackingMode`] - Real sensors or simulated movement
//! - [`LocationStatus`] - Acquisition lifecycle
//! - [`GpsQuality`] / [`AccuracyMode`] - How trustworthy the served position is
//! - [`PositionStatus`] - Full snapshot for consumers

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Errors raised when constructing a [`Position`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeoError {
    /// One of the coordinates is NaN or infinite.
    #[error("Coordinate is not finite: lat={lat}, lon={lon}")]
    NonFinite { lat: f64, lon: f64 },

    /// Latitude outside [-90, 90].
    #[error("Latitude {0} out of range (-90 to 90)")]
    LatitudeOutOfRange(f64),

    /// Longitude outside [-180, 180].
    #[error("Longitude {0} out of range (-180 to 180)")]
    LongitudeOutOfRange(f64),
}

/// A geographic position in decimal degrees.
///
/// A `Position` is always fully defined and finite. An absent position is
/// modelled as `Option<Position>`, never as a partially filled value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Position {
    /// Latitude in degrees (-90 to 90).
    pub lat: f64,
    /// Longitude in degrees (-180 to 180).
    pub lon: f64,
}

impl Position {
    /// Create a validated position.
    pub fn new(lat: f64, lon: f64) -> Result<Self, GeoError> {
        if !lat.is_finite() || !lon.is_finite() {
            return Err(GeoError::NonFinite { lat, lon });
        }
        if !(-90.0..=90.0).contains(&lat) {
            return Err(GeoError::LatitudeOutOfRange(lat));
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(GeoError::LongitudeOutOfRange(lon));
        }
        Ok(Self { lat, lon })
    }

    /// Linear interpolation between two positions, componentwise.
    ///
    /// Not geodesic; adequate for short corridors. `progress` is clamped to
    /// `[0, 1]` and both endpoints are reproduced exactly.
    pub fn lerp(start: Position, end: Position, progress: f64) -> Position {
        let t = progress.clamp(0.0, 1.0);
        Position {
            lat: start.lat * (1.0 - t) + end.lat * t,
            lon: start.lon * (1.0 - t) + end.lon * t,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.5}, {:.5}", self.lat, self.lon)
    }
}

/// Coarse 90° sector of a bearing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CardinalDirection {
    North,
    South,
    East,
    West,
    /// No direction has been derived yet.
    #[default]
    Unknown,
}

impl CardinalDirection {
    /// Upper-case label as used in incident `directionOfTravel` fields.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::North => "NORTH",
            Self::South => "SOUTH",
            Self::East => "EAST",
            Self::West => "WEST",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Label to filter incidents by, or `None` when the direction is unknown.
    pub fn as_filter(&self) -> Option<&'static str> {
        match self {
            Self::Unknown => None,
            known => Some(known.as_str()),
        }
    }

    /// Returns true unless this is [`CardinalDirection::Unknown`].
    pub fn is_known(&self) -> bool {
        *self != Self::Unknown
    }
}

impl fmt::Display for CardinalDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction-of-travel estimate.
///
/// `bearing` holds the raw azimuth that produced `cardinal` when the estimate
/// came from a bearing calculation. The simulator classifies by longitude
/// delta only and leaves it empty.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DirectionEstimate {
    pub cardinal: CardinalDirection,
    pub bearing: Option<f64>,
}

impl DirectionEstimate {
    /// The "no direction yet" estimate.
    pub const UNKNOWN: Self = Self {
        cardinal: CardinalDirection::Unknown,
        bearing: None,
    };

    /// Estimate derived from a bearing in degrees.
    pub fn from_bearing(bearing: f64) -> Self {
        Self {
            cardinal: crate::geo::classify(bearing),
            bearing: Some(crate::geo::normalize_bearing(bearing)),
        }
    }

    /// Estimate carrying only a cardinal.
    pub fn from_cardinal(cardinal: CardinalDirection) -> Self {
        Self {
            cardinal,
            bearing: None,
        }
    }

    /// Returns true if a direction is known.
    pub fn is_known(&self) -> bool {
        self.cardinal.is_known()
    }
}

/// Which source feeds the unified provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrackingMode {
    /// Device location sensors.
    #[default]
    Real,
    /// Deterministic path simulator.
    Sim,
}

impl fmt::Display for TrackingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Real => write!(f, "real"),
            Self::Sim => write!(f, "sim"),
        }
    }
}

impl std::str::FromStr for TrackingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "real" => Ok(Self::Real),
            "sim" => Ok(Self::Sim),
            other => Err(format!("unknown tracking mode '{}'", other)),
        }
    }
}

/// Location acquisition lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LocationStatus {
    /// Nothing requested yet (or explicitly reset).
    #[default]
    Idle,
    /// First position requested, no answer yet.
    Requesting,
    /// Simulated movement in progress.
    Tracking,
    /// A position is being served.
    Ready,
    /// Acquisition failed and no position can be served.
    Error,
}

impl fmt::Display for LocationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Requesting => write!(f, "requesting"),
            Self::Tracking => write!(f, "tracking"),
            Self::Ready => write!(f, "ready"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Quality of the currently served position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GpsQuality {
    /// No position.
    #[default]
    None,
    /// Fresh fix obtained in high-accuracy mode.
    High,
    /// Fresh fix obtained in low-accuracy (fallback) mode.
    Low,
    /// Live reading failed; a previous position is still served.
    LastKnown,
}

impl fmt::Display for GpsQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::High => write!(f, "high"),
            Self::Low => write!(f, "low"),
            Self::LastKnown => write!(f, "lastKnown"),
        }
    }
}

/// Device location precision tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccuracyMode {
    #[default]
    High,
    Low,
}

impl AccuracyMode {
    /// GPS quality reported for a fresh fix in this mode.
    pub fn quality(&self) -> GpsQuality {
        match self {
            Self::High => GpsQuality::High,
            Self::Low => GpsQuality::Low,
        }
    }
}

/// Complete status snapshot for consumers.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionStatus {
    pub mode: TrackingMode,
    pub position: Option<Position>,
    pub direction: DirectionEstimate,
    pub status: LocationStatus,
    pub gps_quality: GpsQuality,
    /// User-facing message of the last surfaced error, if any.
    pub error: Option<String>,
}
