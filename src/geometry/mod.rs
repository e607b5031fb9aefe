pub mod bounds;
pub mod projection;
pub mod validity;

pub use bounds::Bounds;
pub use projection::Projector;
pub use validity::{GeometryIssue, check_multi_polygon, check_polygon};
