//! Mission input: field outline, restricted zones and launch point
//!
//! Input problems never abort planning. A missing file, broken JSON or a
//! malformed member turns into an empty field, an empty zone set or a
//! missing start point, with a warning.
//!
//! Two document layouts are accepted. The compact one:
//! ```json
//! {
//!   "crs": "projected",
//!   "field": [[0, 0], [1000, 0], [1000, 1000], [0, 1000]],
//!   "restricted_zones": [[[250, 250], [750, 250], [750, 750], [250, 750]]],
//!   "start": [0, 0]
//! }
//! ```
//! With `"crs": "geographic"` every pair is `[lon, lat]` and is projected to
//! meters around the first field vertex.
//!
//! Or a GeoJSON FeatureCollection, read as lon/lat. A feature's
//! `properties.role` (`field`, `restricted`, `start`) says what it is;
//! without a role the first Polygon is the field, later Polygons are zones
//! and the first Point is the start. Field, zones and start may also come
//! from three separate GeoJSON files, see [`load_mission_layers`].

use geo::{Coord, coord};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::path::Path;

use crate::domain::{Field, RestrictedZone};
use crate::geometry::Projector;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoordinateFrame {
    #[default]
    Projected,
    Geographic,
}

type Ring = Vec<(f64, f64)>;

/// Everything the planner needs about where to fly
#[derive(Debug, Clone)]
pub struct Mission {
    pub field: Field,
    pub zones: Vec<RestrictedZone>,
    pub start: Option<Coord<f64>>,
    /// Set for geographic input so results can be mapped back to lon/lat
    pub projector: Option<Projector>,
}

impl Mission {
    pub fn empty() -> Self {
        Self {
            field: Field::empty(),
            zones: Vec::new(),
            start: None,
            projector: None,
        }
    }
}

/// Mission members as read, before projection
#[derive(Debug, Default)]
struct RawMission {
    frame: CoordinateFrame,
    field: Ring,
    zones: Vec<Ring>,
    start: Option<(f64, f64)>,
}

impl RawMission {
    fn into_mission(self) -> Mission {
        let projector = match self.frame {
            CoordinateFrame::Projected => None,
            CoordinateFrame::Geographic => self.field.first().copied().map(Projector::new),
        };
        let to_meters = |ring: Ring| match &projector {
            Some(p) => p.project_points(&ring),
            None => ring,
        };

        let field = to_meters(self.field);
        if field.is_empty() {
            tracing::warn!("Mission has no field outline, treating it as a zero-area field");
        }
        let zones = self
            .zones
            .into_iter()
            .map(|ring| RestrictedZone::new(to_meters(ring)))
            .collect();
        let start = self.start.map(|(x, y)| {
            let (x, y) = match &projector {
                Some(p) => p.project(x, y),
                None => (x, y),
            };
            coord! { x: x, y: y }
        });

        Mission {
            field: Field::new(field),
            zones,
            start,
            projector,
        }
    }
}

/// Read a mission file, degrading any problem to empty input
pub fn load_mission(path: &Path) -> Mission {
    read_document(path)
        .map(|document| raw_mission(&document))
        .unwrap_or_default()
        .into_mission()
}

/// Parse a mission document, member by member
pub fn parse_mission(contents: &str) -> Mission {
    match serde_json::from_str::<Value>(contents) {
        Ok(document) => raw_mission(&document).into_mission(),
        Err(e) => {
            tracing::warn!("Mission document is not valid JSON: {}", e);
            Mission::empty()
        }
    }
}

/// Combine a field file with separate restricted-zone and start-point files
///
/// Every Polygon in the zones file is a zone and the first Point in the start
/// file is the start, whatever their roles say. Members given in a separate
/// file replace those found in the field file.
pub fn load_mission_layers(field: &Path, zones: Option<&Path>, start: Option<&Path>) -> Mission {
    let mut raw = read_document(field)
        .map(|document| raw_mission(&document))
        .unwrap_or_default();

    if let Some(path) = zones {
        raw.zones = read_document(path)
            .map(|document| features(&document).filter_map(polygon_ring).collect())
            .unwrap_or_default();
    }
    if let Some(path) = start {
        raw.start = read_document(path).and_then(|document| features(&document).find_map(point));
    }

    raw.into_mission()
}

fn read_document(path: &Path) -> Option<Value> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) => {
            tracing::warn!("Failed to read mission file {:?}: {}", path, e);
            return None;
        }
    };
    match serde_json::from_str(&contents) {
        Ok(document) => Some(document),
        Err(e) => {
            tracing::warn!("Mission file {:?} is not valid JSON: {}", path, e);
            None
        }
    }
}

fn raw_mission(document: &Value) -> RawMission {
    if document.get("type").and_then(Value::as_str) == Some("FeatureCollection") {
        return raw_feature_collection(document);
    }

    RawMission {
        frame: member(document, "crs").unwrap_or_default(),
        field: member(document, "field").unwrap_or_default(),
        zones: member(document, "restricted_zones").unwrap_or_default(),
        start: member(document, "start"),
    }
}

fn raw_feature_collection(document: &Value) -> RawMission {
    // GeoJSON is lon/lat unless the document explicitly says otherwise
    let frame = match document.get("crs").and_then(Value::as_str) {
        Some("projected") => CoordinateFrame::Projected,
        _ => CoordinateFrame::Geographic,
    };
    let mut raw = RawMission {
        frame,
        ..Default::default()
    };
    let mut field = None;

    for (index, feature) in features(document).enumerate() {
        let role = feature
            .pointer("/properties/role")
            .and_then(Value::as_str);
        match (role, geometry_type(feature)) {
            (Some("start") | None, Some("Point")) => {
                if raw.start.is_none() {
                    raw.start = point(feature);
                }
            }
            (Some("field"), Some("Polygon")) => field = polygon_ring(feature),
            (None, Some("Polygon")) if field.is_none() => field = polygon_ring(feature),
            (Some("restricted") | None, Some("Polygon")) => {
                raw.zones.extend(polygon_ring(feature));
            }
            (role, kind) => {
                tracing::warn!(
                    "Ignoring feature {} (role {:?}, geometry {:?})",
                    index,
                    role,
                    kind
                );
            }
        }
    }

    raw.field = field.unwrap_or_default();
    raw
}

fn features(document: &Value) -> impl Iterator<Item = &Value> {
    document
        .get("features")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
}

fn geometry_type(feature: &Value) -> Option<&str> {
    feature.pointer("/geometry/type").and_then(Value::as_str)
}

/// Exterior ring of a Polygon feature; holes are not used
fn polygon_ring(feature: &Value) -> Option<Ring> {
    if geometry_type(feature) != Some("Polygon") {
        return None;
    }
    let exterior = feature.pointer("/geometry/coordinates/0")?;
    parse_value(exterior, "polygon coordinates")
}

fn point(feature: &Value) -> Option<(f64, f64)> {
    if geometry_type(feature) != Some("Point") {
        return None;
    }
    let coordinates = feature.pointer("/geometry/coordinates")?;
    // GeoJSON positions may carry an altitude
    let position: Vec<f64> = parse_value(coordinates, "point coordinates")?;
    match position.as_slice() {
        [x, y, ..] => Some((*x, *y)),
        _ => {
            tracing::warn!("Ignoring point with {} coordinates", position.len());
            None
        }
    }
}

fn member<T: DeserializeOwned>(document: &Value, key: &str) -> Option<T> {
    parse_value(document.get(key)?, key)
}

fn parse_value<T: DeserializeOwned>(value: &Value, what: &str) -> Option<T> {
    match serde_json::from_value(value.clone()) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            tracing::warn!("Ignoring malformed mission member {:?}: {}", what, e);
            None
        }
    }
}
