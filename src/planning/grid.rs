use geo::{Area, BooleanOps, Rect, coord};
use rayon::prelude::*;

use crate::config::PlanningPolicy;
use crate::domain::{Field, GridCell};
use crate::error::{PlanError, Result, ensure_positive};
use crate::geometry::Bounds;

/// Clipped fragments smaller than this are treated as empty (square meters)
const MIN_CELL_AREA: f64 = 1e-2;

/// Edge length of one grid cell in meters
pub fn cell_step(spray_width_m: f64, policy: &PlanningPolicy) -> Result<f64> {
    let spray_width = ensure_positive("spray_width", spray_width_m)?;
    let scale = ensure_positive("grid_scale", policy.grid_scale)?;
    Ok(spray_width * scale)
}

/// Tile a field into coverage cells
///
/// # Algorithm
/// 1. Take the field's bounding box
/// 2. Lay square candidates of side `spray_width * grid_scale` from the
///    lower-left corner, column by column
/// 3. Clip every candidate against the field outline, keeping the clipped
///    fragment and dropping candidates with nothing left
///
/// `flight_radius_km` does not influence the tiling yet; it is only reported.
/// Clipping runs in parallel; cells come back in column-major scan order.
pub fn generate_grid(
    field: &Field,
    spray_width_m: f64,
    flight_radius_km: f64,
    policy: &PlanningPolicy,
) -> Result<Vec<GridCell>> {
    let step = cell_step(spray_width_m, policy)?;

    let Some(bounds) = Bounds::from_polygon(field.polygon()) else {
        tracing::debug!("Field is empty, grid has no cells");
        return Ok(Vec::new());
    };
    if field.area_m2() <= 0.0 {
        tracing::debug!("Field has zero area, grid has no cells");
        return Ok(Vec::new());
    }

    let (columns, rows) = bounds.step_counts(step);
    let candidates = columns.saturating_mul(rows);
    if candidates > policy.max_cells {
        return Err(PlanError::GridTooLarge {
            cells: candidates,
            limit: policy.max_cells,
        });
    }

    tracing::debug!(
        step,
        columns,
        rows,
        flight_radius_km,
        "Tiling {:.0}m x {:.0}m field bounds",
        bounds.width(),
        bounds.height()
    );

    let field_polygon = field.polygon();
    let cells: Vec<GridCell> = (0..candidates as usize)
        .into_par_iter()
        .filter_map(|index| {
            let column = index / rows as usize;
            let row = index % rows as usize;
            let x = bounds.min_x + column as f64 * step;
            let y = bounds.min_y + row as f64 * step;

            let square = Rect::new(coord! { x: x, y: y }, coord! { x: x + step, y: y + step })
                .to_polygon();
            let clipped = square.intersection(field_polygon);

            if clipped.unsigned_area() <= MIN_CELL_AREA {
                return None;
            }
            GridCell::new(clipped)
        })
        .collect();

    tracing::debug!(
        "Kept {} of {} candidate cells after clipping",
        cells.len(),
        candidates
    );

    Ok(cells)
}
