//! Built-in simulation corridors and dummy GPS routes.
//!
//! [`SimPath`]s are straight start/end corridors the simulator interpolates
//! along. [`DummyRoute`]s are short recorded-looking tracks used to drive the
//! real tracker through a [`RouteReplaySensor`](super::RouteReplaySensor).

use std::fmt;

use super::state::{DirectionEstimate, Position};
use crate::geo;

/// A straight simulation corridor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimPath {
    pub id: &'static str,
    pub name: &'static str,
    pub start: Position,
    pub end: Position,
}

impl SimPath {
    /// Interpolated position at `progress` in `[0, 1]`.
    pub fn position_at(&self, progress: f64) -> Position {
        Position::lerp(self.start, self.end, progress)
    }

    /// Great-circle length of the corridor in kilometres.
    pub fn length_km(&self) -> f64 {
        geo::distance_km(self.start, self.end)
    }
}

impl fmt::Display for SimPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

const fn pos(lat: f64, lon: f64) -> Position {
    Position { lat, lon }
}

/// HWY 401 corridors around Toronto.
pub const DEFAULT_SIM_PATHS: [SimPath; 4] = [
    SimPath {
        id: "401_provided_east",
        name: "HWY 401: Provided A → B (Eastbound)",
        start: pos(43.721393, -79.485637),
        end: pos(43.918912, -78.958862),
    },
    SimPath {
        id: "401_provided_west",
        name: "HWY 401: Provided B → A (Westbound)",
        start: pos(43.918912, -78.958862),
        end: pos(43.721393, -79.485637),
    },
    SimPath {
        id: "401_keele_to_412_east",
        name: "HWY 401: Keele → 412 (Eastbound)",
        start: pos(43.7265, -79.4687),
        end: pos(43.8873, -78.942),
    },
    SimPath {
        id: "401_412_to_keele_west",
        name: "HWY 401: 412 → Keele (Westbound)",
        start: pos(43.8873, -78.942),
        end: pos(43.7265, -79.4687),
    },
];

/// Id of the path selected when none is configured.
pub const DEFAULT_SIM_PATH_ID: &str = "401_provided_east";

/// Look up a built-in simulation path by id.
pub fn find_sim_path(id: &str) -> Option<SimPath> {
    DEFAULT_SIM_PATHS.iter().find(|p| p.id == id).copied()
}

/// A fixed sequence of GPS points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DummyRoute {
    pub id: &'static str,
    pub name: &'static str,
    pub points: &'static [Position],
}

impl DummyRoute {
    /// Direction of travel from the first to the last point.
    ///
    /// Unknown when the route has fewer than two points or moves less than
    /// 10 m overall.
    pub fn direction_estimate(&self) -> DirectionEstimate {
        let (Some(first), Some(last)) = (self.points.first(), self.points.last()) else {
            return DirectionEstimate::UNKNOWN;
        };
        if geo::distance_km(*first, *last) < 0.01 {
            return DirectionEstimate::UNKNOWN;
        }
        DirectionEstimate::from_bearing(geo::bearing_deg(*first, *last))
    }

    /// Last point of the route, if any.
    pub fn current_position(&self) -> Option<Position> {
        self.points.last().copied()
    }
}

const HWY_401_EAST: [Position; 6] = [
    pos(43.6415, -79.3802),
    pos(43.6477, -79.3601),
    pos(43.6611, -79.3304),
    pos(43.6698, -79.3003),
    pos(43.6805, -79.2701),
    pos(43.6924, -79.2401),
];

const HWY_400_NORTH: [Position; 5] = [
    pos(43.7902, -79.5201),
    pos(43.8204, -79.5503),
    pos(43.8608, -79.5805),
    pos(43.9001, -79.6004),
    pos(43.9403, -79.6202),
];

const QEW_TORONTO_BOUND: [Position; 5] = [
    pos(43.2001, -79.0601),
    pos(43.2504, -79.1002),
    pos(43.3008, -79.1504),
    pos(43.3509, -79.2003),
    pos(43.4002, -79.2501),
];

/// Sample tracks for driving the real tracker without hardware.
pub const DUMMY_ROUTES: [DummyRoute; 3] = [
    DummyRoute {
        id: "hwy401East",
        name: "HWY 401 Eastbound (Dummy)",
        points: &HWY_401_EAST,
    },
    DummyRoute {
        id: "hwy400North",
        name: "HWY 400 Northbound (Dummy)",
        points: &HWY_400_NORTH,
    },
    DummyRoute {
        id: "qewTorontoBound",
        name: "QEW Toronto Bound (Dummy)",
        points: &QEW_TORONTO_BOUND,
    },
];

/// Look up a dummy route by id (case-insensitive).
pub fn find_dummy_route(id: &str) -> Option<DummyRoute> {
    DUMMY_ROUTES
        .iter()
        .find(|r| r.id.eq_ignore_ascii_case(id))
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::CardinalDirection;

    #[test]
    fn test_sim_paths_have_valid_anchors() {
        for path in DEFAULT_SIM_PATHS {
            assert!(Position::new(path.start.lat, path.start.lon).is_ok());
            assert!(Position::new(path.end.lat, path.end.lon).is_ok());
            assert!(path.length_km() > 1.0, "{} is too short", path.id);
        }
    }

    #[test]
    fn test_sim_path_display_uses_name_and_id() {
        let path = find_sim_path("401_keele_to_412_east").unwrap();
        assert_eq!(path.name, "HWY 401: Keele → 412 (Eastbound)");
        assert_eq!(
            path.to_string(),
            "HWY 401: Keele → 412 (Eastbound) (401_keele_to_412_east)"
        );
    }

    #[test]
    fn test_find_sim_path() {
        let path = find_sim_path("401_keele_to_412_east").unwrap();
        assert_eq!(path.start, pos(43.7265, -79.4687));
        assert!(find_sim_path(DEFAULT_SIM_PATH_ID).is_some());
        assert!(find_sim_path("nope").is_none());
    }

    #[test]
    fn test_reverse_paths_mirror_forward_paths() {
        let east = find_sim_path("401_provided_east").unwrap();
        let west = find_sim_path("401_provided_west").unwrap();
        assert_eq!(east.start, west.end);
        assert_eq!(east.end, west.start);
    }

    #[test]
    fn test_position_at_endpoints() {
        let path = find_sim_path("401_provided_east").unwrap();
        assert_eq!(path.position_at(0.0), path.start);
        assert_eq!(path.position_at(1.0), path.end);
    }

    #[test]
    fn test_dummy_route_directions() {
        let east = find_dummy_route("hwy401east").unwrap();
        assert_eq!(east.direction_estimate().cardinal, CardinalDirection::East);

        let north = find_dummy_route("hwy400North").unwrap();
        assert_eq!(north.direction_estimate().cardinal, CardinalDirection::North);

        // QEW heads north-west, which falls in the north sector
        let qew = find_dummy_route("qewTorontoBound").unwrap();
        assert_eq!(qew.direction_estimate().cardinal, CardinalDirection::North);
    }

    #[test]
    fn test_degenerate_route_has_unknown_direction() {
        static ONE: [Position; 1] = [pos(43.0, -79.0)];
        let route = DummyRoute {
            id: "one",
            name: "One point",
            points: &ONE,
        };
        assert_eq!(route.direction_estimate(), DirectionEstimate::UNKNOWN);
        assert_eq!(route.current_position(), Some(pos(43.0, -79.0)));
    }
}
