use geo::{Contains, Coord, Intersects, Point, Polygon, Translate, coord};

use crate::config::PlanningPolicy;
use crate::domain::{Field, FlightPath, GridCell, RestrictedZone};
use crate::error::{PlanError, Result, ensure_positive};
use crate::geometry::Bounds;

/// One out-and-back path per cell, in the order the cells arrive
pub fn build_flight_paths(cells: &[GridCell], start: Coord<f64>) -> Vec<FlightPath> {
    cells
        .iter()
        .map(|cell| FlightPath::new(start, cell.centroid()))
        .collect()
}

/// Chain flight paths into one waypoint sequence: start, c1, start, c2, start, ...
pub fn flatten_paths(paths: &[FlightPath]) -> Vec<Coord<f64>> {
    let Some(first) = paths.first() else {
        return Vec::new();
    };

    let mut waypoints = Vec::with_capacity(paths.len() * 2 + 1);
    waypoints.push(first.outbound[0]);
    for path in paths {
        waypoints.push(path.outbound[1]);
        waypoints.push(path.inbound[1]);
    }
    waypoints
}

/// Boustrophedon spray pass over a `width` x `height` extent anchored at the origin
///
/// Rows sit `spray_width` apart. Even rows run left to right starting at
/// x = 0, odd rows run right to left starting at x = width. Points inside a
/// restricted zone are dropped from the pass. A pass with more candidate
/// points than `policy.max_route_legs` is refused before anything is built.
pub fn raster_spray_route(
    width: f64,
    height: f64,
    spray_width: f64,
    zones: &[RestrictedZone],
    policy: &PlanningPolicy,
) -> Result<Vec<Coord<f64>>> {
    let zones: Vec<&Polygon<f64>> = zones.iter().map(RestrictedZone::polygon).collect();
    raster_points(width, height, spray_width, &zones, policy)
}

/// Raster pass over a field's bounding box, in the field's own frame
///
/// Points outside the field outline or inside a restricted zone are dropped.
pub fn raster_field_route(
    field: &Field,
    zones: &[RestrictedZone],
    spray_width: f64,
    policy: &PlanningPolicy,
) -> Result<Vec<Coord<f64>>> {
    ensure_positive("spray_width", spray_width)?;
    let Some(bounds) = Bounds::from_polygon(field.polygon()) else {
        return Ok(Vec::new());
    };

    let local_zones: Vec<Polygon<f64>> = zones
        .iter()
        .map(|zone| zone.polygon().translate(-bounds.min_x, -bounds.min_y))
        .collect();
    let local_zones: Vec<&Polygon<f64>> = local_zones.iter().collect();

    let route = raster_points(
        bounds.width(),
        bounds.height(),
        spray_width,
        &local_zones,
        policy,
    )?
    .into_iter()
    .map(|c| coord! { x: c.x + bounds.min_x, y: c.y + bounds.min_y })
    .filter(|&c| field.polygon().intersects(&Point::from(c)))
    .collect();

    Ok(route)
}

fn raster_points(
    width: f64,
    height: f64,
    spray_width: f64,
    zones: &[&Polygon<f64>],
    policy: &PlanningPolicy,
) -> Result<Vec<Coord<f64>>> {
    let step = ensure_positive("spray_width", spray_width)?;
    if width <= 0.0 || height <= 0.0 {
        return Ok(Vec::new());
    }

    let rows = (height / step).floor() as usize;
    let per_row = (width / step).ceil() as usize;
    let points = rows
        .checked_mul(per_row)
        .filter(|&points| points <= policy.max_route_legs)
        .ok_or(PlanError::RouteTooLong {
            legs: rows.saturating_mul(per_row),
            limit: policy.max_route_legs,
        })?;

    let mut route = Vec::with_capacity(points);
    for row in 0..rows {
        let y = row as f64 * step;
        let xs: Vec<f64> = if row % 2 == 0 {
            (0..per_row).map(|i| i as f64 * step).collect()
        } else {
            (0..per_row).map(|i| width - i as f64 * step).collect()
        };

        route.extend(
            xs.into_iter()
                .map(|x| coord! { x: x, y: y })
                .filter(|&c| !in_restricted_zone(c, zones)),
        );
    }

    Ok(route)
}

fn in_restricted_zone(point: Coord<f64>, zones: &[&Polygon<f64>]) -> bool {
    let point = Point::from(point);
    zones.iter().any(|zone| zone.contains(&point))
}
