use serde::Serialize;
use std::fmt;

use crate::config::PlanningPolicy;
use crate::domain::DroneSpec;
use crate::error::{PlanError, Result, ensure_positive};

/// Operator-facing resource estimate for a whole mission
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MissionMetrics {
    pub num_sessions: u64,
    /// Minutes of flight per session
    pub flight_time_per_session: f64,
    pub num_landings: u64,
    /// Liters of spray solution
    pub solution_required: f64,
    pub batteries_required: u64,
    pub labor_hours: f64,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

impl MissionMetrics {
    /// Presentation copy with every real-valued field rounded to 2 decimals
    pub fn rounded(&self) -> Self {
        Self {
            flight_time_per_session: round2(self.flight_time_per_session),
            solution_required: round2(self.solution_required),
            labor_hours: round2(self.labor_hours),
            ..*self
        }
    }
}

impl fmt::Display for MissionMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = self.rounded();
        writeln!(f, "  Sessions:            {}", r.num_sessions)?;
        writeln!(f, "  Flight time/session: {:.2} min", r.flight_time_per_session)?;
        writeln!(f, "  Landings:            {}", r.num_landings)?;
        writeln!(f, "  Solution required:   {:.2} l", r.solution_required)?;
        writeln!(f, "  Batteries required:  {}", r.batteries_required)?;
        write!(f, "  Labor:               {:.2} h", r.labor_hours)
    }
}

/// Closed-form mission estimate from field area alone
///
/// One session covers `efficiency / session_area_divisor` hectares, uses the
/// full rated flight time and empties one full tank. Every session ends in a
/// landing with one battery swap. A zero-area field needs zero sessions.
pub fn estimate(drone: &DroneSpec, area_ha: f64, policy: &PlanningPolicy) -> Result<MissionMetrics> {
    drone.validate()?;
    if !area_ha.is_finite() || area_ha < 0.0 {
        return Err(PlanError::InvalidParameter {
            name: "area_ha",
            value: area_ha,
        });
    }
    let divisor = ensure_positive("session_area_divisor", policy.session_area_divisor)?;

    let max_area_per_flight = drone.efficiency_ha / divisor;
    let num_sessions = (area_ha / max_area_per_flight).ceil() as u64;
    let flight_time_per_session = drone.flight_time_min;

    let metrics = MissionMetrics {
        num_sessions,
        flight_time_per_session,
        num_landings: num_sessions,
        solution_required: drone.tank_capacity_l * num_sessions as f64,
        batteries_required: num_sessions,
        labor_hours: flight_time_per_session * num_sessions as f64 / 60.0,
    };

    tracing::debug!(
        area_ha,
        max_area_per_flight,
        "Estimated {} sessions for {}",
        metrics.num_sessions,
        drone.name
    );

    Ok(metrics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DEFAULT_DRONE, DroneCatalog};

    fn default_drone() -> DroneSpec {
        DroneCatalog::builtin().get(DEFAULT_DRONE).unwrap().clone()
    }

    #[test]
    fn test_thirty_hectares() {
        // 50 l tank, 20 min, 12 ha/session -> 4 ha per flight
        let metrics = estimate(&default_drone(), 30.0, &PlanningPolicy::default()).unwrap();

        assert_eq!(metrics.num_sessions, 8);
        assert_eq!(metrics.num_landings, 8);
        assert_eq!(metrics.batteries_required, 8);
        assert_eq!(metrics.flight_time_per_session, 20.0);
        assert_eq!(metrics.solution_required, 400.0);
        assert!((metrics.labor_hours - 160.0 / 60.0).abs() < 1e-12);
        assert_eq!(metrics.rounded().labor_hours, 2.67);
    }

    #[test]
    fn test_zero_area_needs_no_sessions() {
        let metrics = estimate(&default_drone(), 0.0, &PlanningPolicy::default()).unwrap();
        assert_eq!(metrics.num_sessions, 0);
        assert_eq!(metrics.solution_required, 0.0);
        assert_eq!(metrics.labor_hours, 0.0);
    }

    #[test]
    fn test_tiny_area_needs_one_session() {
        let metrics = estimate(&default_drone(), 0.001, &PlanningPolicy::default()).unwrap();
        assert_eq!(metrics.num_sessions, 1);
    }

    #[test]
    fn test_sessions_scale_with_divisor() {
        let policy = PlanningPolicy {
            session_area_divisor: 1.0,
            ..Default::default()
        };
        let metrics = estimate(&default_drone(), 30.0, &policy).unwrap();
        assert_eq!(metrics.num_sessions, 3);
    }

    #[test]
    fn test_negative_area_rejected() {
        assert!(matches!(
            estimate(&default_drone(), -1.0, &PlanningPolicy::default()),
            Err(PlanError::InvalidParameter { name: "area_ha", .. })
        ));
    }

    #[test]
    fn test_rounded_keeps_counts() {
        let metrics = MissionMetrics {
            num_sessions: 3,
            flight_time_per_session: 11.004,
            num_landings: 3,
            solution_required: 47.996,
            batteries_required: 3,
            labor_hours: 0.5502,
        };
        let r = metrics.rounded();
        assert_eq!(r.num_sessions, 3);
        assert_eq!(r.flight_time_per_session, 11.0);
        assert_eq!(r.solution_required, 48.0);
        assert_eq!(r.labor_hours, 0.55);
    }
}
