//! Polygon validity checks
//!
//! Catches the geometry problems that make containment and intersection
//! answers meaningless:
//! - Fewer than three distinct vertices
//! - NaN/Inf coordinates
//! - Zero or near-zero area
//! - Edges crossing each other

use geo::{Area, Coord, LineString, MultiPolygon, Polygon};
use thiserror::Error;

/// Minimum area for a non-degenerate polygon (in square meters)
const MIN_POLYGON_AREA: f64 = 1e-9;

/// Why a polygon was rejected
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryIssue {
    #[error("ring has {count} distinct vertices, need at least 3")]
    TooFewVertices { count: usize },
    #[error("ring contains NaN/Inf coordinates")]
    NonFiniteCoordinates,
    #[error("polygon area {area} is effectively zero")]
    ZeroArea { area: f64 },
    #[error("polygon edges cross each other")]
    SelfIntersecting,
}

/// Check one polygon; `Ok(())` when it is usable for spatial predicates
pub fn check_polygon(polygon: &Polygon<f64>) -> Result<(), GeometryIssue> {
    check_ring(polygon.exterior())?;
    for hole in polygon.interiors() {
        check_ring(hole)?;
    }

    let area = polygon.unsigned_area();
    if area < MIN_POLYGON_AREA {
        return Err(GeometryIssue::ZeroArea { area });
    }

    Ok(())
}

/// Check every part of a multipolygon
pub fn check_multi_polygon(geometry: &MultiPolygon<f64>) -> Result<(), GeometryIssue> {
    if geometry.0.is_empty() {
        return Err(GeometryIssue::TooFewVertices { count: 0 });
    }
    geometry.iter().try_for_each(check_polygon)
}

fn check_ring(ring: &LineString<f64>) -> Result<(), GeometryIssue> {
    if ring.0.iter().any(|c| !c.x.is_finite() || !c.y.is_finite()) {
        return Err(GeometryIssue::NonFiniteCoordinates);
    }

    let vertices = open_ring(ring);
    if vertices.len() < 3 {
        return Err(GeometryIssue::TooFewVertices {
            count: vertices.len(),
        });
    }

    if is_self_intersecting(vertices) {
        return Err(GeometryIssue::SelfIntersecting);
    }

    Ok(())
}

/// Ring vertices without the closing duplicate
fn open_ring(ring: &LineString<f64>) -> &[Coord<f64>] {
    let coords = &ring.0[..];
    match (coords.first(), coords.last()) {
        (Some(first), Some(last)) if coords.len() > 1 && first == last => {
            &coords[..coords.len() - 1]
        }
        _ => coords,
    }
}

/// Check if ring edges properly cross each other (adjacent edges excluded)
fn is_self_intersecting(coords: &[Coord<f64>]) -> bool {
    let n = coords.len();
    if n < 4 {
        return false;
    }

    for i in 0..n {
        let a1 = coords[i];
        let a2 = coords[(i + 1) % n];

        for j in (i + 2)..n {
            if (j + 1) % n == i {
                continue;
            }

            let b1 = coords[j];
            let b2 = coords[(j + 1) % n];

            if segments_cross(a1, a2, b1, b2) {
                return true;
            }
        }
    }
    false
}

/// Proper crossing only; touching endpoints do not count
fn segments_cross(a1: Coord<f64>, a2: Coord<f64>, b1: Coord<f64>, b2: Coord<f64>) -> bool {
    let d1 = cross(b1, b2, a1);
    let d2 = cross(b1, b2, a2);
    let d3 = cross(a1, a2, b1);
    let d4 = cross(a1, a2, b2);

    ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
}

fn cross(a: Coord<f64>, b: Coord<f64>, c: Coord<f64>) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}
