/// Equirectangular projection from WGS84 to local meters
///
/// Uses approximation suitable for field-scale areas:
/// - x = (lon - ref_lon) * cos(ref_lat) * 111320
/// - y = (lat - ref_lat) * 111320
///
/// Good to well under a meter per kilometer for parcels a few km across,
/// which is all the planner needs for spacing and distances.
#[derive(Debug, Clone)]
pub struct Projector {
    ref_lon: f64,
    ref_lat: f64,
    cos_lat: f64,
}

/// Meters per degree at equator
const METERS_PER_DEGREE: f64 = 111_320.0;

impl Projector {
    /// Create a projector whose origin is the given (lon, lat) point
    pub fn new(reference: (f64, f64)) -> Self {
        let (lon, lat) = reference;
        Self {
            ref_lon: lon,
            ref_lat: lat,
            cos_lat: lat.to_radians().cos(),
        }
    }

    /// Project a lon/lat point to local meters
    pub fn project(&self, lon: f64, lat: f64) -> (f64, f64) {
        let x = (lon - self.ref_lon) * self.cos_lat * METERS_PER_DEGREE;
        let y = (lat - self.ref_lat) * METERS_PER_DEGREE;
        (x, y)
    }

    /// Inverse of [`Projector::project`], used when exporting back to lon/lat
    pub fn unproject(&self, x: f64, y: f64) -> (f64, f64) {
        let lon = self.ref_lon + x / (self.cos_lat * METERS_PER_DEGREE);
        let lat = self.ref_lat + y / METERS_PER_DEGREE;
        (lon, lat)
    }

    pub fn project_points(&self, points: &[(f64, f64)]) -> Vec<(f64, f64)> {
        points
            .iter()
            .map(|&(lon, lat)| self.project(lon, lat))
            .collect()
    }
}
