pub mod resources;

pub use resources::{LegEvent, ResourceState, SimulationReport, simulate};
