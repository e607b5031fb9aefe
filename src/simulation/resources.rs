use geo::{Coord, Distance, Euclidean};

use crate::config::PlanningPolicy;
use crate::domain::DroneSpec;
use crate::error::{PlanError, Result, ensure_positive};

/// Drone state while walking a route
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResourceState {
    pub position: Coord<f64>,
    /// Remaining battery endurance in seconds
    pub battery_remaining_s: f64,
    /// Remaining spray solution in liters
    pub tank_remaining_l: f64,
    /// Distance flown so far in meters, detours included
    pub total_distance_m: f64,
}

impl ResourceState {
    fn full(position: Coord<f64>, battery_s: f64, tank_l: f64, total_distance_m: f64) -> Self {
        Self {
            position,
            battery_remaining_s: battery_s,
            tank_remaining_l: tank_l,
            total_distance_m,
        }
    }
}

/// Something that happened on one leg
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LegEvent {
    /// Flew to the base to recharge and refill before the leg
    ReturnToBase {
        leg: usize,
        from: Coord<f64>,
        detour_m: f64,
    },
    /// Completed the leg; the state is taken right after arrival
    Arrived { leg: usize, state: ResourceState },
}

/// Outcome of walking a whole route
#[derive(Debug, Clone, Default)]
pub struct SimulationReport {
    pub total_distance_m: f64,
    pub returns_to_base: usize,
    pub legs: usize,
    pub events: Vec<LegEvent>,
}

impl SimulationReport {
    /// States after each completed leg, in route order
    pub fn snapshots(&self) -> impl Iterator<Item = &ResourceState> {
        self.events.iter().filter_map(|event| match event {
            LegEvent::Arrived { state, .. } => Some(state),
            LegEvent::ReturnToBase { .. } => None,
        })
    }
}

/// Walk `route` leg by leg, draining battery and tank
///
/// # Algorithm
/// For each consecutive waypoint pair:
/// 1. The leg needs `distance / speed` seconds and
///    `seconds * tank_use_per_second` liters
/// 2. A leg that a fully charged, fully tanked drone cannot fly fails with
///    [`PlanError::InfeasibleLeg`]
/// 3. If the remaining battery or tank cannot cover the leg, the drone
///    returns to base first: resources reset to full and the
///    base-to-waypoint distance is added to the total
/// 4. The leg is flown and its cost subtracted
pub fn simulate(
    drone: &DroneSpec,
    route: &[Coord<f64>],
    start: Coord<f64>,
    policy: &PlanningPolicy,
) -> Result<SimulationReport> {
    drone.validate()?;
    let tank_rate = ensure_positive("tank_use_per_second", policy.tank_use_per_second)?;

    let legs = route.len().saturating_sub(1);
    if legs > policy.max_route_legs {
        return Err(PlanError::RouteTooLong {
            legs,
            limit: policy.max_route_legs,
        });
    }

    let battery_capacity = drone.battery_seconds();
    let tank_capacity = drone.tank_capacity_l;

    let mut state = ResourceState::full(start, battery_capacity, tank_capacity, 0.0);
    let mut report = SimulationReport {
        legs,
        events: Vec::with_capacity(legs),
        ..Default::default()
    };

    for (leg, pair) in route.windows(2).enumerate() {
        let (current, next) = (pair[0], pair[1]);

        let leg_distance = Euclidean::distance(current, next);
        let required_s = leg_distance / drone.speed_mps;
        let required_l = required_s * tank_rate;

        if required_s > battery_capacity || required_l > tank_capacity {
            return Err(PlanError::InfeasibleLeg {
                leg,
                required_s,
                capacity_s: battery_capacity,
                required_l,
                capacity_l: tank_capacity,
            });
        }

        if state.battery_remaining_s < required_s
            || state.tank_remaining_l <= 0.0
            || state.tank_remaining_l < required_l
        {
            let detour_m = Euclidean::distance(start, current);
            tracing::debug!(
                leg,
                battery_s = state.battery_remaining_s,
                tank_l = state.tank_remaining_l,
                "Returning to base from ({:.1}, {:.1}) to recharge and refill",
                current.x,
                current.y
            );
            report.events.push(LegEvent::ReturnToBase {
                leg,
                from: current,
                detour_m,
            });
            report.returns_to_base += 1;
            state = ResourceState::full(
                start,
                battery_capacity,
                tank_capacity,
                state.total_distance_m + detour_m,
            );
        }

        state.position = next;
        state.total_distance_m += leg_distance;
        state.battery_remaining_s -= required_s;
        state.tank_remaining_l -= required_l;

        tracing::trace!(
            leg,
            total_m = state.total_distance_m,
            "Moved to ({:.1}, {:.1})",
            next.x,
            next.y
        );
        report.events.push(LegEvent::Arrived { leg, state });
    }

    report.total_distance_m = state.total_distance_m;
    tracing::debug!(
        "Route covered {:.1}m over {} legs with {} returns to base",
        report.total_distance_m,
        report.legs,
        report.returns_to_base
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::coord;

    /// 1 m/s cruise, 100 s battery
    fn test_drone(tank_l: f64) -> DroneSpec {
        DroneSpec::new("Test Drone", 1.0, 1.0, tank_l, 100.0 / 60.0, 5.0, 4.0).unwrap()
    }

    fn origin() -> Coord<f64> {
        coord! { x: 0.0, y: 0.0 }
    }

    #[test]
    fn test_short_route_no_returns() {
        let route = vec![origin(), coord! { x: 30.0, y: 0.0 }, coord! { x: 30.0, y: 40.0 }];
        let report = simulate(&test_drone(50.0), &route, origin(), &PlanningPolicy::default()).unwrap();

        assert_eq!(report.legs, 2);
        assert_eq!(report.returns_to_base, 0);
        assert!((report.total_distance_m - 70.0).abs() < 1e-9);

        let last = report.snapshots().last().unwrap();
        assert!((last.battery_remaining_s - 30.0).abs() < 1e-9);
        assert!((last.tank_remaining_l - (50.0 - 7.0)).abs() < 1e-9);
        assert_eq!(last.position, coord! { x: 30.0, y: 40.0 });
    }

    #[test]
    fn test_battery_forces_return_to_base() {
        // three 60s legs on a 100s battery
        let route = vec![
            origin(),
            coord! { x: 60.0, y: 0.0 },
            coord! { x: 120.0, y: 0.0 },
            coord! { x: 180.0, y: 0.0 },
        ];
        let report = simulate(&test_drone(50.0), &route, origin(), &PlanningPolicy::default()).unwrap();

        assert_eq!(report.returns_to_base, 2);
        // 180m of legs + detours from base to (60,0) and (120,0)
        assert!((report.total_distance_m - (180.0 + 60.0 + 120.0)).abs() < 1e-9);
        assert!(matches!(
            report.events[1],
            LegEvent::ReturnToBase { leg: 1, detour_m, .. } if (detour_m - 60.0).abs() < 1e-9
        ));
    }

    #[test]
    fn test_tank_forces_return_to_base() {
        // 1 l tank drains after 10 s of flight at 0.1 l/s
        let route = vec![
            origin(),
            coord! { x: 8.0, y: 0.0 },
            coord! { x: 16.0, y: 0.0 },
        ];
        let report = simulate(&test_drone(1.0), &route, origin(), &PlanningPolicy::default()).unwrap();
        assert_eq!(report.returns_to_base, 1);
    }

    #[test]
    fn test_resources_never_negative() {
        let route: Vec<Coord<f64>> = (0..50)
            .map(|i| coord! { x: (i % 7) as f64 * 3.0, y: (i % 5) as f64 * 4.0 })
            .collect();
        let report = simulate(&test_drone(3.0), &route, origin(), &PlanningPolicy::default()).unwrap();

        assert!(report.returns_to_base > 0);
        for state in report.snapshots() {
            assert!(state.battery_remaining_s >= 0.0);
            assert!(state.tank_remaining_l >= 0.0);
        }
    }

    #[test]
    fn test_total_distance_includes_detours() {
        let route: Vec<Coord<f64>> = (0..20)
            .map(|i| coord! { x: (i * 37 % 90) as f64 / 2.0, y: (i * 53 % 70) as f64 / 2.0 })
            .collect();
        let report = simulate(&test_drone(50.0), &route, origin(), &PlanningPolicy::default()).unwrap();

        let legs: f64 = route.windows(2).map(|w| Euclidean::distance(w[0], w[1])).sum();
        let detours: f64 = report
            .events
            .iter()
            .map(|event| match event {
                LegEvent::ReturnToBase { detour_m, .. } => *detour_m,
                LegEvent::Arrived { .. } => 0.0,
            })
            .sum();
        assert!((report.total_distance_m - (legs + detours)).abs() < 1e-6);
    }

    #[test]
    fn test_first_leg_longer_than_full_battery() {
        let route = vec![origin(), coord! { x: 500.0, y: 0.0 }];
        let err = simulate(&test_drone(500.0), &route, origin(), &PlanningPolicy::default()).unwrap_err();
        assert!(matches!(err, PlanError::InfeasibleLeg { leg: 0, .. }));
    }

    #[test]
    fn test_leg_larger_than_full_tank() {
        // 50 s of flight needs 5 l, tank holds 2 l
        let route = vec![origin(), coord! { x: 50.0, y: 0.0 }];
        let err = simulate(&test_drone(2.0), &route, origin(), &PlanningPolicy::default()).unwrap_err();
        assert!(matches!(err, PlanError::InfeasibleLeg { leg: 0, .. }));
    }

    #[test]
    fn test_empty_and_single_point_routes() {
        let policy = PlanningPolicy::default();
        let report = simulate(&test_drone(5.0), &[], origin(), &policy).unwrap();
        assert_eq!(report.legs, 0);
        assert_eq!(report.total_distance_m, 0.0);

        let report = simulate(&test_drone(5.0), &[origin()], origin(), &policy).unwrap();
        assert_eq!(report.legs, 0);
    }

    #[test]
    fn test_route_length_limit() {
        let policy = PlanningPolicy {
            max_route_legs: 2,
            ..Default::default()
        };
        let route = vec![origin(); 5];
        assert!(matches!(
            simulate(&test_drone(5.0), &route, origin(), &policy),
            Err(PlanError::RouteTooLong { legs: 4, limit: 2 })
        ));
    }

    #[test]
    fn test_invalid_drone_rejected() {
        let mut drone = test_drone(5.0);
        drone.speed_mps = 0.0;
        let route = vec![origin(), coord! { x: 1.0, y: 0.0 }];
        assert!(matches!(
            simulate(&drone, &route, origin(), &PlanningPolicy::default()),
            Err(PlanError::InvalidParameter { name: "speed_mps", .. })
        ));
    }
}
