pub mod drone;
pub mod field;
pub mod path;

pub use drone::{DEFAULT_DRONE, DroneCatalog, DroneSpec};
pub use field::{Field, GridCell, RestrictedZone};
pub use path::FlightPath;
