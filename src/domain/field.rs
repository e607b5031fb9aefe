use geo::{Area, Centroid, Coord, LineString, MultiPolygon, Polygon};

const SQUARE_METERS_PER_HECTARE: f64 = 10_000.0;

fn polygon_from_points(points: Vec<(f64, f64)>) -> Polygon<f64> {
    let ring: LineString<f64> = points.into_iter().map(Coord::from).collect();
    Polygon::new(ring, vec![])
}

/// The area to be sprayed, in projected meters
///
/// An empty field stands for missing input and behaves as a zero-area mission.
#[derive(Debug, Clone)]
pub struct Field {
    polygon: Polygon<f64>,
}

impl Field {
    /// Build a field from its outline; the ring is closed automatically
    pub fn new(points: Vec<(f64, f64)>) -> Self {
        Self {
            polygon: polygon_from_points(points),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn polygon(&self) -> &Polygon<f64> {
        &self.polygon
    }

    pub fn is_empty(&self) -> bool {
        self.polygon.exterior().0.is_empty()
    }

    pub fn area_m2(&self) -> f64 {
        self.polygon.unsigned_area()
    }

    pub fn area_hectares(&self) -> f64 {
        self.area_m2() / SQUARE_METERS_PER_HECTARE
    }
}

/// A no-fly polygon in the same frame as the field
#[derive(Debug, Clone)]
pub struct RestrictedZone {
    polygon: Polygon<f64>,
}

impl RestrictedZone {
    pub fn new(points: Vec<(f64, f64)>) -> Self {
        Self {
            polygon: polygon_from_points(points),
        }
    }

    pub fn polygon(&self) -> &Polygon<f64> {
        &self.polygon
    }
}

/// One coverage unit: a square tile, or the fragment of it left after
/// clipping to the field outline
#[derive(Debug, Clone)]
pub struct GridCell {
    geometry: MultiPolygon<f64>,
    centroid: Coord<f64>,
}

impl GridCell {
    /// Wrap clipped geometry; `None` when the geometry has no centroid
    pub fn new(geometry: MultiPolygon<f64>) -> Option<Self> {
        let centroid = geometry.centroid()?.0;
        Some(Self { geometry, centroid })
    }

    pub fn from_polygon(polygon: Polygon<f64>) -> Option<Self> {
        Self::new(MultiPolygon::new(vec![polygon]))
    }

    pub fn geometry(&self) -> &MultiPolygon<f64> {
        &self.geometry
    }

    pub fn centroid(&self) -> Coord<f64> {
        self.centroid
    }

    pub fn area_m2(&self) -> f64 {
        self.geometry.unsigned_area()
    }
}
