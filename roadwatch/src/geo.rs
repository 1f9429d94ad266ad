//! Great-circle math for position tracking.
//!
//! Pure functions over [`Position`] values: haversine distance, initial
//! bearing and coarse cardinal classification.
//!
//! # Coordinate System
//!
//! - Latitude: degrees north (-90 to 90)
//! - Longitude: degrees east (-180 to 180)
//! - Bearing: degrees true (0-360, 0=north, 90=east)
//! - Distance: kilometres

use crate::position::{CardinalDirection, Position};

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Positions closer than this (in degrees on both axes) are treated as equal.
const SAME_POINT_EPSILON_DEG: f64 = 1e-12;

/// Calculate the great-circle distance between two positions.
///
/// Uses the haversine formula. The result is symmetric and zero when both
/// positions are the same point.
///
/// # Example
///
/// ```
/// use roadwatch::geo::distance_km;
/// use roadwatch::position::Position;
///
/// let a = Position::new(0.0, 0.0).unwrap();
/// let b = Position::new(1.0, 0.0).unwrap();
/// assert!((distance_km(a, b) - 111.19).abs() < 0.1);
/// ```
pub fn distance_km(from: Position, to: Position) -> f64 {
    let lat1 = from.lat.to_radians();
    let lat2 = to.lat.to_radians();
    let delta_lat = (to.lat - from.lat).to_radians();
    let delta_lon = (to.lon - from.lon).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Calculate the initial forward azimuth from one position to another.
///
/// Returns degrees in `[0, 360)`. Identical positions yield `0.0`.
///
/// # Example
///
/// ```
/// use roadwatch::geo::bearing_deg;
/// use roadwatch::position::Position;
///
/// let origin = Position::new(0.0, 0.0).unwrap();
/// let east = Position::new(0.0, 1.0).unwrap();
/// assert!((bearing_deg(origin, east) - 90.0).abs() < 0.1);
/// ```
pub fn bearing_deg(from: Position, to: Position) -> f64 {
    if (from.lat - to.lat).abs() < SAME_POINT_EPSILON_DEG
        && (from.lon - to.lon).abs() < SAME_POINT_EPSILON_DEG
    {
        return 0.0;
    }

    let lat1 = from.lat.to_radians();
    let lat2 = to.lat.to_radians();
    let delta_lon = (to.lon - from.lon).to_radians();

    let y = delta_lon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * delta_lon.cos();

    normalize_bearing(y.atan2(x).to_degrees())
}

/// Normalize any finite angle into `[0, 360)`.
pub fn normalize_bearing(bearing: f64) -> f64 {
    let normalized = bearing.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if normalized >= 360.0 {
        0.0
    } else {
        normalized
    }
}

/// Classify a bearing into one of the four 90° cardinal sectors.
///
/// - NORTH: `[315, 360) ∪ [0, 45)`
/// - EAST: `[45, 135)`
/// - SOUTH: `[135, 225)`
/// - WEST: `[225, 315)`
///
/// The input is normalized first, so `-90.0` classifies as WEST. A
/// non-finite bearing yields [`CardinalDirection::Unknown`].
pub fn classify(bearing: f64) -> CardinalDirection {
    if !bearing.is_finite() {
        return CardinalDirection::Unknown;
    }

    let b = normalize_bearing(bearing);
    if !(45.0..315.0).contains(&b) {
        CardinalDirection::North
    } else if b < 135.0 {
        CardinalDirection::East
    } else if b < 225.0 {
        CardinalDirection::South
    } else {
        CardinalDirection::West
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(lat: f64, lon: f64) -> Position {
        Position::new(lat, lon).unwrap()
    }

    // ==================== distance_km tests ====================

    #[test]
    fn test_distance_zero() {
        let p = pos(43.72, -79.42);
        assert_eq!(distance_km(p, p), 0.0);
    }

    #[test]
    fn test_distance_symmetry() {
        let a = pos(43.70, -79.40);
        let b = pos(43.90, -78.95);

        let ab = distance_km(a, b);
        let ba = distance_km(b, a);
        assert!((ab - ba).abs() < 1e-9, "Distance should be symmetric");
    }

    #[test]
    fn test_distance_one_degree_latitude() {
        let dist = distance_km(pos(0.0, 0.0), pos(1.0, 0.0));
        assert!(
            (dist - 111.195).abs() < 0.01,
            "1° lat should be ~111.2km, got {}",
            dist
        );
    }

    #[test]
    fn test_distance_toronto_corridor() {
        // Keele/401 to 412/401 is roughly 46km
        let dist = distance_km(pos(43.7265, -79.4687), pos(43.8873, -78.942));
        assert!((dist - 46.0).abs() < 2.0, "Expected ~46km, got {}", dist);
    }

    #[test]
    fn test_distance_ten_metres() {
        // 0.00009° of latitude is ~10m
        let dist = distance_km(pos(43.0, -79.0), pos(43.00009, -79.0));
        assert!((dist - 0.010).abs() < 0.0005, "got {}", dist);
    }

    // ==================== bearing_deg tests ====================

    #[test]
    fn test_bearing_cardinals() {
        let origin = pos(0.0, 0.0);
        assert!(bearing_deg(origin, pos(1.0, 0.0)).abs() < 1e-6);
        assert!((bearing_deg(origin, pos(0.0, 1.0)) - 90.0).abs() < 1e-6);
        assert!((bearing_deg(pos(1.0, 0.0), origin) - 180.0).abs() < 1e-6);
        assert!((bearing_deg(origin, pos(0.0, -1.0)) - 270.0).abs() < 1e-6);
    }

    #[test]
    fn test_bearing_degenerate_is_zero() {
        let p = pos(43.72, -79.42);
        assert_eq!(bearing_deg(p, p), 0.0);
    }

    #[test]
    fn test_bearing_always_in_range() {
        let points = [
            pos(43.70, -79.40),
            pos(43.90, -78.95),
            pos(-33.9, 151.2),
            pos(51.5, -0.1),
            pos(0.0, 179.9),
            pos(0.0, -179.9),
            pos(89.0, 10.0),
            pos(-89.0, -10.0),
        ];
        for a in points {
            for b in points {
                if a == b {
                    continue;
                }
                let bearing = bearing_deg(a, b);
                assert!(
                    (0.0..360.0).contains(&bearing),
                    "bearing {} out of range for {:?} -> {:?}",
                    bearing,
                    a,
                    b
                );
                assert_ne!(classify(bearing), CardinalDirection::Unknown);
            }
        }
    }

    // ==================== classify tests ====================

    #[test]
    fn test_classify_sector_boundaries() {
        assert_eq!(classify(0.0), CardinalDirection::North);
        assert_eq!(classify(44.999), CardinalDirection::North);
        assert_eq!(classify(45.0), CardinalDirection::East);
        assert_eq!(classify(134.999), CardinalDirection::East);
        assert_eq!(classify(135.0), CardinalDirection::South);
        assert_eq!(classify(225.0), CardinalDirection::West);
        assert_eq!(classify(314.999), CardinalDirection::West);
        assert_eq!(classify(315.0), CardinalDirection::North);
    }

    #[test]
    fn test_classify_normalizes_input() {
        assert_eq!(classify(-90.0), CardinalDirection::West);
        assert_eq!(classify(360.0), CardinalDirection::North);
        assert_eq!(classify(450.0), CardinalDirection::East);
        assert_eq!(classify(-1e-15), CardinalDirection::North);
    }

    #[test]
    fn test_classify_non_finite() {
        assert_eq!(classify(f64::NAN), CardinalDirection::Unknown);
        assert_eq!(classify(f64::INFINITY), CardinalDirection::Unknown);
    }
}
