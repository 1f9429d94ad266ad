//! Canonical incident record and boundary normalization.
//!
//! Upstream feeds disagree on key names (`Latitude` vs `latitude`,
//! `RoadwayName` vs `roadway`, ...). Every raw payload is converted into
//! [`IncidentRecord`] here, once, so the correlator only ever sees one shape.

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

use super::error::FetchError;
use crate::position::Position;

const LATITUDE_KEYS: &[&str] = &["Latitude", "latitude"];
const LONGITUDE_KEYS: &[&str] = &["Longitude", "longitude"];
const ROADWAY_KEYS: &[&str] = &["RoadwayName", "roadwayName", "roadway"];
const DIRECTION_KEYS: &[&str] = &[
    "DirectionOfTravel",
    "directionOfTravel",
    "direction",
    "Direction",
    "travel_direction",
];
const DESCRIPTION_KEYS: &[&str] = &[
    "Description",
    "description",
    "Headline",
    "headline",
    "EventDescription",
    "eventDescription",
];
const LANES_KEYS: &[&str] = &[
    "LanesAffected",
    "lanesAffected",
    "lanes_affected",
    "LanesBlocked",
    "lanesBlocked",
];
const ID_KEYS: &[&str] = &["ID", "Id", "id"];
const EVENT_TYPE_KEYS: &[&str] = &["EventType", "eventType", "event_type"];
const FULL_CLOSURE_KEYS: &[&str] = &["IsFullClosure", "isFullClosure"];

/// A traffic incident in canonical form.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct IncidentRecord {
    pub id: Option<String>,
    /// `None` when the upstream record has no usable coordinates.
    pub position: Option<Position>,
    pub roadway_name: Option<String>,
    pub direction_of_travel: Option<String>,
    pub description: Option<String>,
    pub event_type: Option<String>,
    pub lanes_affected: Option<String>,
    pub is_full_closure: bool,
}

impl IncidentRecord {
    /// Convert one raw upstream object. Returns `None` for non-objects.
    pub fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;

        let position = match (
            first_coordinate(object, LATITUDE_KEYS),
            first_coordinate(object, LONGITUDE_KEYS),
        ) {
            (Some(lat), Some(lon)) => Position::new(lat, lon).ok(),
            _ => None,
        };

        Some(Self {
            id: first_string(object, ID_KEYS),
            position,
            roadway_name: first_string(object, ROADWAY_KEYS),
            direction_of_travel: first_string(object, DIRECTION_KEYS),
            description: first_string(object, DESCRIPTION_KEYS),
            event_type: first_string(object, EVENT_TYPE_KEYS),
            lanes_affected: first_string(object, LANES_KEYS),
            is_full_closure: first_bool(object, FULL_CLOSURE_KEYS),
        })
    }

    /// Severity derived from the closure flag, lane text and description.
    pub fn impact(&self) -> IncidentImpact {
        if self.is_full_closure {
            return IncidentImpact::FullClosure;
        }

        let lanes = self.lanes_affected.as_deref().unwrap_or("").to_lowercase();
        if lanes.contains("lane") && (lanes.contains("closed") || lanes.contains("block")) {
            return IncidentImpact::LaneBlocked;
        }

        let description = self.description.as_deref().unwrap_or("").to_lowercase();
        if ["minor", "delay", "slow"]
            .iter()
            .any(|k| description.contains(k))
        {
            return IncidentImpact::MinorDelay;
        }
        if ["planned", "schedule", "mainten"]
            .iter()
            .any(|k| description.contains(k))
        {
            return IncidentImpact::LowImpact;
        }

        IncidentImpact::Active
    }

    /// Roadway name, or `"Unknown"`.
    pub fn road_label(&self) -> &str {
        self.roadway_name.as_deref().unwrap_or("Unknown")
    }
}

impl fmt::Display for IncidentRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.impact(), self.road_label())?;
        if let Some(direction) = &self.direction_of_travel {
            write!(f, " {}", direction)?;
        }
        if let Some(description) = &self.description {
            write!(f, ": {}", description)?;
        }
        Ok(())
    }
}

/// Coarse incident severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IncidentImpact {
    FullClosure,
    LaneBlocked,
    MinorDelay,
    LowImpact,
    Active,
}

impl fmt::Display for IncidentImpact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FullClosure => write!(f, "FULL CLOSURE"),
            Self::LaneBlocked => write!(f, "LANE BLOCKED"),
            Self::MinorDelay => write!(f, "MINOR DELAY"),
            Self::LowImpact => write!(f, "LOW IMPACT"),
            Self::Active => write!(f, "ACTIVE"),
        }
    }
}

/// Convert a raw payload into canonical records.
///
/// Accepts a bare array or an envelope object with a `data` array. Array
/// entries that are not objects are skipped.
pub fn normalize_payload(payload: &Value) -> Result<Vec<IncidentRecord>, FetchError> {
    let items = match payload {
        Value::Array(items) => items,
        Value::Object(envelope) => match envelope.get("data") {
            Some(Value::Array(items)) => items,
            Some(_) => {
                return Err(FetchError::Malformed(
                    "'data' is not an array".to_string(),
                ))
            }
            None => {
                return Err(FetchError::Malformed(
                    "object payload without 'data' array".to_string(),
                ))
            }
        },
        other => {
            return Err(FetchError::Malformed(format!(
                "expected array, got {}",
                json_kind(other)
            )))
        }
    };

    let records: Vec<IncidentRecord> = items.iter().filter_map(IncidentRecord::from_value).collect();
    if records.len() < items.len() {
        tracing::debug!(
            skipped = items.len() - records.len(),
            "Skipped non-object incident entries"
        );
    }
    Ok(records)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// First present, non-empty value under any of `keys`, as a string.
fn first_string(object: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match object.get(*key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// First numeric, non-zero coordinate under any of `keys`.
///
/// Zero is the upstream placeholder for "no coordinates".
fn first_coordinate(object: &Map<String, Value>, keys: &[&str]) -> Option<f64> {
    keys.iter().find_map(|key| {
        let value = match object.get(*key)? {
            Value::Number(n) => n.as_f64()?,
            Value::String(s) => s.trim().parse::<f64>().ok()?,
            _ => return None,
        };
        (value.is_finite() && value != 0.0).then_some(value)
    })
}

fn first_bool(object: &Map<String, Value>, keys: &[&str]) -> bool {
    keys.iter()
        .find_map(|key| match object.get(*key)? {
            Value::Bool(b) => Some(*b),
            Value::String(s) => Some(s.eq_ignore_ascii_case("true")),
            _ => None,
        })
        .unwrap_or(false)
}
