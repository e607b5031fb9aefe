use thiserror::Error;

/// Errors surfaced by the planning core.
///
/// Missing or malformed input data never shows up here: the mission source
/// degrades it to empty geometry. Everything in this enum is a caller contract
/// violation or a mission that cannot be flown.
#[derive(Error, Debug)]
pub enum PlanError {
    #[error("invalid parameter {name}: {value} (must be positive and finite)")]
    InvalidParameter { name: &'static str, value: f64 },

    #[error(
        "leg {leg} is infeasible: needs {required_s:.1}s / {required_l:.2}l, \
         a full drone holds {capacity_s:.1}s / {capacity_l:.2}l"
    )]
    InfeasibleLeg {
        leg: usize,
        required_s: f64,
        capacity_s: f64,
        required_l: f64,
        capacity_l: f64,
    },

    #[error("grid would contain {cells} cells, limit is {limit}")]
    GridTooLarge { cells: u64, limit: u64 },

    #[error("route has {legs} legs, limit is {limit}")]
    RouteTooLong { legs: usize, limit: usize },

    #[error("unknown drone model: {0}")]
    UnknownDrone(String),

    #[error("export failed: {0}")]
    Export(#[from] std::io::Error),

    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PlanError>;

/// Reject values that are not strictly positive and finite.
pub(crate) fn ensure_positive(name: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(PlanError::InvalidParameter { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_positive() {
        assert_eq!(ensure_positive("speed", 5.0).unwrap(), 5.0);
        assert!(ensure_positive("speed", 0.0).is_err());
        assert!(ensure_positive("speed", -1.0).is_err());
        assert!(ensure_positive("speed", f64::NAN).is_err());
        assert!(ensure_positive("speed", f64::INFINITY).is_err());
    }

    #[test]
    fn test_error_messages_name_the_parameter() {
        let err = ensure_positive("spray_width", 0.0).unwrap_err();
        assert!(err.to_string().contains("spray_width"));
    }
}
