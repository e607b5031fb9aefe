use geo::{Area, BooleanOps, Intersects, MultiPolygon, Relate};
use rayon::prelude::*;

use crate::config::ExclusionMode;
use crate::domain::{GridCell, RestrictedZone};
use crate::geometry::{check_multi_polygon, check_polygon};

/// Interior overlap below this share of the smaller shape is boolean-op noise
const OVERLAP_NOISE_FRACTION: f64 = 1e-9;

/// Clipped remainders smaller than this are dropped (square meters)
const MIN_REMAINDER_AREA: f64 = 1e-2;

/// Result of removing restricted areas from a grid
#[derive(Debug, Default)]
pub struct FilterOutcome {
    /// Cells that are safe to fly
    pub cells: Vec<GridCell>,
    /// Cells dropped (or clipped, in clip mode) because of a zone
    pub affected: usize,
    /// Cells skipped for invalid geometry
    pub invalid_cells: usize,
    /// Zones ignored for invalid geometry
    pub invalid_zones: usize,
    /// True when no cell touched any zone and the pass was skipped
    pub untouched: bool,
}

struct ZoneShape {
    index: usize,
    geometry: MultiPolygon<f64>,
    area_m2: f64,
}

/// Drop (or clip) grid cells that overlap restricted zones
///
/// Cells that only share an edge or a corner with a zone stay. Invalid cells
/// and zones are skipped with a warning instead of failing the pass. When no
/// valid cell overlaps any zone the valid cells are returned as they are.
pub fn filter_restricted(
    cells: Vec<GridCell>,
    zones: &[RestrictedZone],
    mode: ExclusionMode,
) -> FilterOutcome {
    let mut outcome = FilterOutcome::default();

    let shapes: Vec<ZoneShape> = zones
        .iter()
        .enumerate()
        .filter_map(|(index, zone)| match check_polygon(zone.polygon()) {
            Ok(()) => {
                let geometry = MultiPolygon::new(vec![zone.polygon().clone()]);
                let area_m2 = geometry.unsigned_area();
                Some(ZoneShape {
                    index,
                    geometry,
                    area_m2,
                })
            }
            Err(issue) => {
                tracing::warn!("Skipping restricted zone {}: {}", index, issue);
                None
            }
        })
        .collect();
    outcome.invalid_zones = zones.len() - shapes.len();

    let total = cells.len();
    let valid: Vec<GridCell> = cells
        .into_iter()
        .filter(|cell| match check_multi_polygon(cell.geometry()) {
            Ok(()) => true,
            Err(issue) => {
                tracing::warn!(
                    "Skipping grid cell at ({:.1}, {:.1}): {}",
                    cell.centroid().x,
                    cell.centroid().y,
                    issue
                );
                false
            }
        })
        .collect();
    outcome.invalid_cells = total - valid.len();

    let any_conflict = valid
        .par_iter()
        .any(|cell| shapes.iter().any(|shape| conflicts(cell, shape)));
    if !any_conflict {
        tracing::debug!("No grid cell overlaps a restricted zone");
        outcome.untouched = true;
        outcome.cells = valid;
        return outcome;
    }

    let before = valid.len();
    let (kept, affected): (Vec<Option<GridCell>>, Vec<bool>) = valid
        .into_par_iter()
        .map(|cell| {
            let hits: Vec<&ZoneShape> = shapes.iter().filter(|s| conflicts(&cell, s)).collect();
            if hits.is_empty() {
                return (Some(cell), false);
            }
            match mode {
                ExclusionMode::Exclude => (None, true),
                ExclusionMode::Clip => (clip_cell(&cell, &hits), true),
            }
        })
        .unzip();

    outcome.affected = affected.into_iter().filter(|&hit| hit).count();
    outcome.cells = kept.into_iter().flatten().collect();

    if outcome.cells.is_empty() {
        tracing::warn!("No flyable cells left after removing restricted zones");
    }
    tracing::debug!(
        mode = ?mode,
        "Restricted zones affected {} of {} cells, {} remain",
        outcome.affected,
        before,
        outcome.cells.len()
    );

    outcome
}

fn conflicts(cell: &GridCell, shape: &ZoneShape) -> bool {
    if !cell.geometry().intersects(&shape.geometry) {
        return false;
    }
    // shared edges and corners are not conflicts, only interior overlap is
    let relation = cell.geometry().relate(&shape.geometry);
    if !relation.is_intersects() || relation.is_touches() {
        return false;
    }

    let overlap = cell.geometry().intersection(&shape.geometry).unsigned_area();
    let noise = OVERLAP_NOISE_FRACTION * shape.area_m2.min(cell.area_m2());
    if overlap > noise {
        tracing::trace!(zone = shape.index, overlap, "Cell overlaps restricted zone");
        true
    } else {
        false
    }
}

fn clip_cell(cell: &GridCell, hits: &[&ZoneShape]) -> Option<GridCell> {
    let remainder = hits
        .iter()
        .fold(cell.geometry().clone(), |geometry, shape| {
            geometry.difference(&shape.geometry)
        });

    if remainder.unsigned_area() <= MIN_REMAINDER_AREA {
        return None;
    }
    GridCell::new(remainder)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlanningPolicy;
    use crate::domain::Field;
    use crate::planning::generate_grid;
    use geo::polygon;

    fn field_grid(spray_width: f64) -> Vec<GridCell> {
        let field = Field::new(vec![(0.0, 0.0), (1000.0, 0.0), (1000.0, 1000.0), (0.0, 1000.0)]);
        generate_grid(&field, spray_width, 2.5, &PlanningPolicy::default()).unwrap()
    }

    fn square_zone(min: f64, max: f64) -> RestrictedZone {
        RestrictedZone::new(vec![(min, min), (max, min), (max, max), (min, max)])
    }

    #[test]
    fn test_no_zones_returns_grid_unchanged() {
        let outcome = filter_restricted(field_grid(10.0), &[], ExclusionMode::Exclude);
        assert!(outcome.untouched);
        assert_eq!(outcome.cells.len(), 9);
    }

    #[test]
    fn test_distant_zone_returns_grid_unchanged() {
        let zones = vec![square_zone(5000.0, 6000.0)];
        let outcome = filter_restricted(field_grid(10.0), &zones, ExclusionMode::Exclude);
        assert!(outcome.untouched);
        assert_eq!(outcome.cells.len(), 9);
        assert_eq!(outcome.affected, 0);
    }

    #[test]
    fn test_center_quarter_zone_removes_center_cells() {
        // 6.25m spray width -> 250m cells, a 4 x 4 grid
        let grid = field_grid(6.25);
        assert_eq!(grid.len(), 16);

        let zones = vec![square_zone(250.0, 750.0)];
        let outcome = filter_restricted(grid, &zones, ExclusionMode::Exclude);

        assert_eq!(outcome.affected, 4);
        assert_eq!(outcome.cells.len(), 12);
        for cell in &outcome.cells {
            let c = cell.centroid();
            assert!(!(250.0..750.0).contains(&c.x) || !(250.0..750.0).contains(&c.y));
        }
    }

    #[test]
    fn test_exclude_drops_whole_cell() {
        // zone clips a corner of the first 400m cell
        let zones = vec![square_zone(-50.0, 50.0)];
        let outcome = filter_restricted(field_grid(10.0), &zones, ExclusionMode::Exclude);
        assert_eq!(outcome.cells.len(), 8);
        assert_eq!(outcome.affected, 1);
    }

    #[test]
    fn test_clip_keeps_remainder() {
        let zones = vec![square_zone(-50.0, 50.0)];
        let outcome = filter_restricted(field_grid(10.0), &zones, ExclusionMode::Clip);
        assert_eq!(outcome.cells.len(), 9);
        assert_eq!(outcome.affected, 1);

        let total: f64 = outcome.cells.iter().map(GridCell::area_m2).sum();
        // 1km^2 minus the 50m x 50m corner inside the field
        assert!((total - (1_000_000.0 - 2_500.0)).abs() < 1.0);
    }

    #[test]
    fn test_tiny_zone_inside_cell_still_excludes_it() {
        // 5cm x 5cm no-fly spot in the middle of the first 400m cell
        let zones = vec![square_zone(100.0, 100.05)];
        let outcome = filter_restricted(field_grid(10.0), &zones, ExclusionMode::Exclude);

        assert!(!outcome.untouched);
        assert_eq!(outcome.affected, 1);
        assert_eq!(outcome.cells.len(), 8);
        for cell in &outcome.cells {
            assert!(cell.centroid().x > 400.0 || cell.centroid().y > 400.0);
        }
    }

    #[test]
    fn test_tiny_zone_is_cut_out_in_clip_mode() {
        let zones = vec![square_zone(100.0, 100.05)];
        let outcome = filter_restricted(field_grid(10.0), &zones, ExclusionMode::Clip);

        assert_eq!(outcome.affected, 1);
        assert_eq!(outcome.cells.len(), 9);
        let holed = outcome
            .cells
            .iter()
            .filter(|cell| cell.geometry().iter().any(|p| !p.interiors().is_empty()))
            .count();
        assert_eq!(holed, 1);
    }

    #[test]
    fn test_zone_sharing_cell_edges_keeps_neighbours() {
        // exactly one 250m cell; the eight cells around it only touch it
        let zones = vec![square_zone(250.0, 500.0)];
        let outcome = filter_restricted(field_grid(6.25), &zones, ExclusionMode::Exclude);
        assert_eq!(outcome.affected, 1);
        assert_eq!(outcome.cells.len(), 15);
    }

    #[test]
    fn test_zone_covering_field_leaves_empty_grid() {
        let zones = vec![square_zone(-10.0, 1010.0)];
        let outcome = filter_restricted(field_grid(10.0), &zones, ExclusionMode::Exclude);
        assert!(outcome.cells.is_empty());
        assert_eq!(outcome.affected, 9);
    }

    #[test]
    fn test_invalid_zone_is_skipped() {
        let bowtie = RestrictedZone::new(vec![(0.0, 0.0), (500.0, 500.0), (500.0, 0.0), (0.0, 500.0)]);
        let outcome = filter_restricted(field_grid(10.0), &[bowtie], ExclusionMode::Exclude);
        assert_eq!(outcome.invalid_zones, 1);
        assert_eq!(outcome.cells.len(), 9);
    }

    #[test]
    fn test_invalid_cell_is_skipped() {
        let mut grid = field_grid(10.0);
        let sliver = GridCell::new(MultiPolygon::new(vec![polygon![
            (x: 0.0, y: 0.0),
            (x: 5.0, y: 5.0),
            (x: 10.0, y: 10.0)
        ]]))
        .unwrap();
        grid.push(sliver);

        let outcome = filter_restricted(grid, &[], ExclusionMode::Exclude);
        assert_eq!(outcome.invalid_cells, 1);
        assert_eq!(outcome.cells.len(), 9);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let zones = vec![square_zone(250.0, 750.0), square_zone(900.0, 1100.0)];
        let first = filter_restricted(field_grid(6.25), &zones, ExclusionMode::Exclude);
        let count = first.cells.len();
        let centroids: Vec<_> = first.cells.iter().map(GridCell::centroid).collect();

        let second = filter_restricted(first.cells, &zones, ExclusionMode::Exclude);
        assert!(second.untouched);
        assert_eq!(second.cells.len(), count);
        let again: Vec<_> = second.cells.iter().map(GridCell::centroid).collect();
        assert_eq!(centroids, again);
    }
}
