//! Proximity correlation between the current position and incidents.
//!
//! The building blocks are plain functions over record slices:
//!
//! - [`nearest_road`] - Closest record with coordinates
//! - [`filter_by_road`] - Case-insensitive roadway substring match
//! - [`filter_by_direction`] - Case-insensitive direction substring match
//! - [`rank_by_distance`] - Stable ascending sort by distance
//!
//! [`what_is_ahead`] chains them into the default pipeline.

use serde::Serialize;

use super::record::IncidentRecord;
use crate::geo;
use crate::position::{CardinalDirection, Position};

/// Default cap on results when no direction is known.
pub const DEFAULT_MAX_RESULTS: usize = 50;

/// Filter value meaning "do not filter".
const FILTER_ALL: &str = "ALL";

/// Road name used when the nearest record has none.
const UNKNOWN_ROAD: &str = "Unknown";

/// The record closest to a position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearestRoad<'a> {
    pub record: &'a IncidentRecord,
    pub distance_km: f64,
}

/// A record with its distance from the current position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedIncident {
    pub record: IncidentRecord,
    /// `f64::INFINITY` when the record has no coordinates.
    pub distance_km: f64,
}

/// Result of the default "what's ahead" pipeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AheadReport {
    /// Roadway of the nearest incident, used as the road filter.
    pub road: Option<String>,
    /// Direction used as the direction filter.
    pub direction: CardinalDirection,
    /// Matching incidents, closest first.
    pub incidents: Vec<RankedIncident>,
}

impl AheadReport {
    pub fn is_empty(&self) -> bool {
        self.incidents.is_empty()
    }

    /// The closest matching incident.
    pub fn closest(&self) -> Option<&RankedIncident> {
        self.incidents.first()
    }
}

/// Find the record with coordinates closest to `position`.
///
/// Ties keep the first record encountered.
pub fn nearest_road<'a, I>(position: Position, records: I) -> Option<NearestRoad<'a>>
where
    I: IntoIterator<Item = &'a IncidentRecord>,
{
    let mut nearest: Option<NearestRoad<'a>> = None;
    for record in records {
        let Some(location) = record.position else {
            continue;
        };
        let distance_km = geo::distance_km(position, location);
        if nearest.map_or(true, |n| distance_km < n.distance_km) {
            nearest = Some(NearestRoad {
                record,
                distance_km,
            });
        }
    }
    nearest
}

/// Keep records whose roadway contains `road`, ignoring case.
///
/// `None` or `"ALL"` passes everything through.
pub fn filter_by_road<'a, I>(records: I, road: Option<&str>) -> Vec<&'a IncidentRecord>
where
    I: IntoIterator<Item = &'a IncidentRecord>,
{
    filter_by_field(records, road, |r| r.roadway_name.as_deref())
}

/// Keep records whose direction of travel contains `direction`, ignoring case.
///
/// `None` or `"ALL"` passes everything through.
pub fn filter_by_direction<'a, I>(records: I, direction: Option<&str>) -> Vec<&'a IncidentRecord>
where
    I: IntoIterator<Item = &'a IncidentRecord>,
{
    filter_by_field(records, direction, |r| r.direction_of_travel.as_deref())
}

fn filter_by_field<'a, I, F>(records: I, needle: Option<&str>, field: F) -> Vec<&'a IncidentRecord>
where
    I: IntoIterator<Item = &'a IncidentRecord>,
    F: Fn(&IncidentRecord) -> Option<&str>,
{
    let needle = match needle.map(str::trim) {
        None => return records.into_iter().collect(),
        Some(n) if n.is_empty() || n.eq_ignore_ascii_case(FILTER_ALL) => {
            return records.into_iter().collect()
        }
        Some(n) => n.to_uppercase(),
    };

    records
        .into_iter()
        .filter(|record| {
            field(*record).is_some_and(|value| value.to_uppercase().contains(&needle))
        })
        .collect()
}

/// Attach distances and sort ascending. Stable on ties; records without
/// coordinates sort last.
pub fn rank_by_distance<'a, I>(position: Position, records: I) -> Vec<RankedIncident>
where
    I: IntoIterator<Item = &'a IncidentRecord>,
{
    let mut ranked: Vec<RankedIncident> = records
        .into_iter()
        .map(|record| RankedIncident {
            distance_km: record
                .position
                .map_or(f64::INFINITY, |p| geo::distance_km(position, p)),
            record: record.clone(),
        })
        .collect();
    ranked.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    ranked
}

/// Default pipeline: nearest road, then road filter, then direction filter,
/// then rank.
///
/// With a known direction only the single closest match is returned;
/// otherwise up to `max_results`. Without a position no road is inferred
/// and records keep their upstream order.
pub fn what_is_ahead(
    position: Option<Position>,
    direction: CardinalDirection,
    records: &[IncidentRecord],
    max_results: usize,
) -> AheadReport {
    let Some(position) = position else {
        let mut incidents: Vec<RankedIncident> =
            filter_by_direction(records, direction.as_filter())
                .into_iter()
                .map(|record| RankedIncident {
                    record: record.clone(),
                    distance_km: f64::INFINITY,
                })
                .collect();
        incidents.truncate(max_results);
        return AheadReport {
            road: None,
            direction,
            incidents,
        };
    };

    let road = nearest_road(position, records)
        .map(|nearest| nearest.record.road_label().to_string());
    let road_filter = road.as_deref().filter(|r| *r != UNKNOWN_ROAD);

    let on_road = filter_by_road(records, road_filter);
    let heading_same_way = filter_by_direction(on_road, direction.as_filter());
    let mut incidents = rank_by_distance(position, heading_same_way);

    let limit = if direction.is_known() { 1 } else { max_results };
    incidents.truncate(limit);

    tracing::debug!(
        road = road.as_deref().unwrap_or("-"),
        direction = %direction,
        matches = incidents.len(),
        "Correlated incidents"
    );

    AheadReport {
        road,
        direction,
        incidents,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(lat: f64, lon: f64, road: &str, dir: &str) -> IncidentRecord {
        IncidentRecord {
            position: Position::new(lat, lon).ok(),
            roadway_name: Some(road.to_string()),
            direction_of_travel: Some(dir.to_string()),
            ..Default::default()
        }
    }

    fn here() -> Position {
        Position::new(43.72, -79.42).unwrap()
    }

    fn pair() -> Vec<IncidentRecord> {
        vec![
            record(43.70, -79.40, "401", "EAST"),
            record(43.90, -78.95, "401", "WEST"),
        ]
    }

    // ==================== nearest_road tests ====================

    #[test]
    fn test_nearest_road_picks_closest() {
        let records = pair();
        let nearest = nearest_road(here(), &records).unwrap();

        assert_eq!(nearest.record, &records[0]);
        assert!(nearest.distance_km < 3.0);
    }

    #[test]
    fn test_nearest_road_ties_keep_first() {
        let records = vec![
            record(43.70, -79.40, "first", "EAST"),
            record(43.70, -79.40, "second", "EAST"),
        ];
        let nearest = nearest_road(here(), &records).unwrap();
        assert_eq!(nearest.record.roadway_name.as_deref(), Some("first"));
    }

    #[test]
    fn test_nearest_road_ignores_records_without_coordinates() {
        let records = vec![IncidentRecord {
            roadway_name: Some("401".to_string()),
            ..Default::default()
        }];
        assert!(nearest_road(here(), &records).is_none());
        assert!(nearest_road(here(), &Vec::<IncidentRecord>::new()).is_none());
    }

    // ==================== filter tests ====================

    #[test]
    fn test_filter_by_direction() {
        let records = pair();

        let east = filter_by_direction(&records, Some("EAST"));
        assert_eq!(east, vec![&records[0]]);

        let lower = filter_by_direction(&records, Some("west"));
        assert_eq!(lower, vec![&records[1]]);
    }

    #[test]
    fn test_filter_substring_match() {
        let records = vec![record(43.7, -79.4, "Highway 401 Collector", "Eastbound")];

        assert_eq!(filter_by_road(&records, Some("401")).len(), 1);
        assert_eq!(filter_by_direction(&records, Some("EAST")).len(), 1);
        assert!(filter_by_road(&records, Some("QEW")).is_empty());
    }

    #[test]
    fn test_filter_pass_through() {
        let records = pair();
        assert_eq!(filter_by_road(&records, None).len(), 2);
        assert_eq!(filter_by_road(&records, Some("all")).len(), 2);
        assert_eq!(filter_by_direction(&records, Some("ALL")).len(), 2);
    }

    #[test]
    fn test_filter_drops_records_without_field() {
        let records = vec![IncidentRecord::default()];
        assert!(filter_by_direction(&records, Some("EAST")).is_empty());
    }

    // ==================== rank_by_distance tests ====================

    #[test]
    fn test_rank_by_distance_orders_ascending() {
        let records = pair();
        let ranked = rank_by_distance(here(), &records);

        assert_eq!(ranked[0].record, records[0]);
        assert_eq!(ranked[1].record, records[1]);
        assert!(ranked[0].distance_km < ranked[1].distance_km);
    }

    #[test]
    fn test_rank_missing_coordinates_last_and_stable() {
        let a = IncidentRecord {
            id: Some("a".to_string()),
            ..Default::default()
        };
        let b = IncidentRecord {
            id: Some("b".to_string()),
            ..Default::default()
        };
        let near = record(43.72, -79.42, "401", "EAST");
        let records = vec![a, near.clone(), b];

        let ranked = rank_by_distance(here(), &records);

        assert_eq!(ranked[0].record, near);
        assert_eq!(ranked[1].record.id.as_deref(), Some("a"));
        assert_eq!(ranked[2].record.id.as_deref(), Some("b"));
        assert!(ranked[2].distance_km.is_infinite());
    }

    // ==================== what_is_ahead tests ====================

    #[test]
    fn test_ahead_with_direction_returns_single_match() {
        let records = pair();
        let report = what_is_ahead(
            Some(here()),
            CardinalDirection::West,
            &records,
            DEFAULT_MAX_RESULTS,
        );

        assert_eq!(report.road.as_deref(), Some("401"));
        assert_eq!(report.incidents.len(), 1);
        assert_eq!(report.closest().unwrap().record, records[1]);
    }

    #[test]
    fn test_ahead_without_direction_caps_results() {
        let records: Vec<IncidentRecord> = (0..60)
            .map(|i| record(43.70 + i as f64 * 0.001, -79.40, "401", "EAST"))
            .collect();

        let report = what_is_ahead(
            Some(here()),
            CardinalDirection::Unknown,
            &records,
            DEFAULT_MAX_RESULTS,
        );

        assert_eq!(report.incidents.len(), 50);
        let distances: Vec<f64> = report.incidents.iter().map(|r| r.distance_km).collect();
        assert!(distances.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_ahead_restricts_to_nearest_road() {
        let records = vec![
            record(43.70, -79.40, "401", "EAST"),
            record(43.80, -79.50, "QEW", "EAST"),
        ];

        let report = what_is_ahead(
            Some(here()),
            CardinalDirection::Unknown,
            &records,
            DEFAULT_MAX_RESULTS,
        );

        assert_eq!(report.incidents.len(), 1);
        assert_eq!(report.incidents[0].record.roadway_name.as_deref(), Some("401"));
    }

    #[test]
    fn test_ahead_unknown_road_skips_road_filter() {
        let mut nearest = record(43.72, -79.42, "", "EAST");
        nearest.roadway_name = None;
        let records = vec![nearest, record(43.80, -79.50, "QEW", "EAST")];

        let report = what_is_ahead(
            Some(here()),
            CardinalDirection::Unknown,
            &records,
            DEFAULT_MAX_RESULTS,
        );

        assert_eq!(report.road.as_deref(), Some("Unknown"));
        assert_eq!(report.incidents.len(), 2);
    }

    #[test]
    fn test_ahead_without_position() {
        let records = pair();
        let report = what_is_ahead(None, CardinalDirection::East, &records, DEFAULT_MAX_RESULTS);

        assert!(report.road.is_none());
        assert_eq!(report.incidents.len(), 1);
        assert!(report.incidents[0].distance_km.is_infinite());
    }
}
