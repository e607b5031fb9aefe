pub mod grid;
pub mod pipeline;
pub mod route;
pub mod zones;

pub use grid::{cell_step, generate_grid};
pub use pipeline::{CoveragePlan, plan_coverage};
pub use route::{build_flight_paths, flatten_paths, raster_field_route, raster_spray_route};
pub use zones::{FilterOutcome, filter_restricted};
