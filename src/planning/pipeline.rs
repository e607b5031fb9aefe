use crate::config::PlanningPolicy;
use crate::domain::{DroneSpec, FlightPath, GridCell};
use crate::error::Result;
use crate::mission::Mission;

use super::{FilterOutcome, build_flight_paths, filter_restricted, generate_grid};

/// Grid, zone filtering and routes for one mission
#[derive(Debug)]
pub struct CoveragePlan {
    pub candidate_cells: usize,
    pub filter: FilterOutcome,
    pub paths: Vec<FlightPath>,
}

impl CoveragePlan {
    pub fn cells(&self) -> &[GridCell] {
        &self.filter.cells
    }
}

/// Tile the field, drop restricted cells and build out-and-back paths
///
/// An empty field yields an empty plan. Without a start point the filtered
/// cells are still returned, only the paths stay empty.
pub fn plan_coverage(
    mission: &Mission,
    drone: &DroneSpec,
    policy: &PlanningPolicy,
) -> Result<CoveragePlan> {
    policy.validate()?;

    let grid = generate_grid(
        &mission.field,
        drone.spray_width_m,
        drone.flight_radius_km,
        policy,
    )?;
    let candidate_cells = grid.len();

    let filter = filter_restricted(grid, &mission.zones, policy.exclusion_mode);

    let paths = match mission.start {
        Some(start) => build_flight_paths(&filter.cells, start),
        None => {
            if !filter.cells.is_empty() {
                tracing::warn!(
                    "Mission has no start point, {} cells planned without flight paths",
                    filter.cells.len()
                );
            }
            Vec::new()
        }
    };

    Ok(CoveragePlan {
        candidate_cells,
        filter,
        paths,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DEFAULT_DRONE, DroneCatalog};
    use crate::mission::parse_mission;

    fn drone() -> DroneSpec {
        DroneCatalog::builtin().get(DEFAULT_DRONE).unwrap().clone()
    }

    #[test]
    fn test_plan_square_field_with_zone() {
        let mission = parse_mission(
            r#"{
                "field": [[0, 0], [1000, 0], [1000, 1000], [0, 1000]],
                "restricted_zones": [[[-50, -50], [50, -50], [50, 50], [-50, 50]]],
                "start": [0, 0]
            }"#,
        );
        let plan = plan_coverage(&mission, &drone(), &PlanningPolicy::default()).unwrap();

        assert_eq!(plan.candidate_cells, 9);
        assert_eq!(plan.cells().len(), 8);
        assert_eq!(plan.paths.len(), 8);
    }

    #[test]
    fn test_empty_mission_plans_nothing() {
        let mission = parse_mission("{}");
        let plan = plan_coverage(&mission, &drone(), &PlanningPolicy::default()).unwrap();
        assert_eq!(plan.candidate_cells, 0);
        assert!(plan.paths.is_empty());
    }

    #[test]
    fn test_missing_start_point_keeps_cells() {
        let mission = parse_mission(r#"{ "field": [[0, 0], [1000, 0], [1000, 1000], [0, 1000]] }"#);
        let plan = plan_coverage(&mission, &drone(), &PlanningPolicy::default()).unwrap();

        assert_eq!(plan.candidate_cells, 9);
        assert_eq!(plan.cells().len(), 9);
        assert!(plan.paths.is_empty());
    }
}
