use geo::{BoundingRect, Polygon};

/// Axis-aligned bounding box in projected coordinates (meters)
#[derive(Debug, Clone, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl Bounds {
    /// Bounds of a polygon's exterior; `None` for an empty polygon
    pub fn from_polygon(polygon: &Polygon<f64>) -> Option<Self> {
        let rect = polygon.bounding_rect()?;
        Some(Self {
            min_x: rect.min().x,
            max_x: rect.max().x,
            min_y: rect.min().y,
            max_y: rect.max().y,
        })
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Number of `step`-sized origins in `[min, max)` along x and y
    ///
    /// Matches half-open range stepping: a trailing partial column or row
    /// still gets an origin as long as it starts strictly inside the bounds.
    pub fn step_counts(&self, step: f64) -> (u64, u64) {
        (steps_in(self.width(), step), steps_in(self.height(), step))
    }
}

fn steps_in(extent: f64, step: f64) -> u64 {
    if extent <= 0.0 {
        return 0;
    }
    (extent / step).ceil() as u64
}
