//! Writing planned flight paths to disk
//!
//! The planner does not depend on what an exporter produces; exporters only
//! read the finished paths.

use std::path::Path;

use crate::domain::FlightPath;
use crate::error::Result;
use crate::geometry::Projector;

pub mod csv;
pub mod geojson;

pub use csv::CsvExporter;
pub use geojson::GeoJsonExporter;

/// Sink for a mission's flight paths
pub trait RouteExporter {
    /// Write `paths` to `path`, returning the number of paths written
    ///
    /// An empty path list writes nothing and returns `Ok(0)`.
    fn export(&self, paths: &[FlightPath], path: &Path) -> Result<usize>;
}

/// Map a projected point back to output coordinates
pub(crate) fn output_coords(projector: Option<&Projector>, x: f64, y: f64) -> (f64, f64) {
    match projector {
        Some(p) => p.unproject(x, y),
        None => (x, y),
    }
}
