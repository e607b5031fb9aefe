use serde_json::{Value, json};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use super::{RouteExporter, output_coords};
use crate::domain::FlightPath;
use crate::error::Result;
use crate::geometry::Projector;

/// Writes a GeoJSON FeatureCollection with one LineString per leg
///
/// Outbound legs carry `{"leg": "to"}`, return legs `{"leg": "back"}`.
/// With a projector the coordinates are written as lon/lat, otherwise in
/// the projected frame.
#[derive(Debug, Clone, Default)]
pub struct GeoJsonExporter {
    projector: Option<Projector>,
}

impl GeoJsonExporter {
    pub fn new(projector: Option<Projector>) -> Self {
        Self { projector }
    }

    fn line_feature(&self, leg: &str, points: &[geo::Coord<f64>; 2]) -> Value {
        let coordinates: Vec<[f64; 2]> = points
            .iter()
            .map(|c| {
                let (x, y) = output_coords(self.projector.as_ref(), c.x, c.y);
                [x, y]
            })
            .collect();

        json!({
            "type": "Feature",
            "geometry": { "type": "LineString", "coordinates": coordinates },
            "properties": { "leg": leg },
        })
    }

    pub fn feature_collection(&self, paths: &[FlightPath]) -> Value {
        let features: Vec<Value> = paths
            .iter()
            .flat_map(|path| {
                [
                    self.line_feature("to", &path.outbound),
                    self.line_feature("back", &path.inbound),
                ]
            })
            .collect();

        json!({ "type": "FeatureCollection", "features": features })
    }
}

impl RouteExporter for GeoJsonExporter {
    fn export(&self, paths: &[FlightPath], path: &Path) -> Result<usize> {
        if paths.is_empty() {
            tracing::warn!("No flight paths to export");
            return Ok(0);
        }

        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, &self.feature_collection(paths))?;
        writer.flush()?;

        tracing::debug!("Wrote {} flight paths to {}", paths.len(), path.display());
        Ok(paths.len())
    }
}
