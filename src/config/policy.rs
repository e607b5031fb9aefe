use serde::Deserialize;

use crate::error::{Result, ensure_positive};

/// How restricted zones act on grid cells
///
/// The field outline always clips. Zones exclude by default: a cell touching
/// a zone's interior is dropped as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExclusionMode {
    /// Drop every cell that overlaps a zone
    #[default]
    Exclude,
    /// Cut the zone out of the cell and keep the remainder
    Clip,
}

fn default_grid_scale() -> f64 {
    40.0
}
fn default_tank_use_per_second() -> f64 {
    0.1
}
fn default_session_area_divisor() -> f64 {
    3.0
}
fn default_max_cells() -> u64 {
    1_000_000
}
fn default_max_route_legs() -> usize {
    1_000_000
}

/// Tuning constants of the planning model
///
/// The defaults are empirical values, not physical derivations:
///   grid_scale:           cell edge = spray width * 40
///   tank_use_per_second:  0.1 l of solution per second of flight
///   session_area_divisor: one session covers efficiency / 3 hectares
#[derive(Debug, Clone, Deserialize)]
pub struct PlanningPolicy {
    #[serde(default = "default_grid_scale")]
    pub grid_scale: f64,
    #[serde(default = "default_tank_use_per_second")]
    pub tank_use_per_second: f64,
    #[serde(default = "default_session_area_divisor")]
    pub session_area_divisor: f64,
    #[serde(default)]
    pub exclusion_mode: ExclusionMode,
    /// Upper bound on candidate grid cells before tiling starts
    #[serde(default = "default_max_cells")]
    pub max_cells: u64,
    /// Upper bound on legs accepted by the resource simulation
    #[serde(default = "default_max_route_legs")]
    pub max_route_legs: usize,
}

impl Default for PlanningPolicy {
    fn default() -> Self {
        Self {
            grid_scale: default_grid_scale(),
            tank_use_per_second: default_tank_use_per_second(),
            session_area_divisor: default_session_area_divisor(),
            exclusion_mode: ExclusionMode::default(),
            max_cells: default_max_cells(),
            max_route_legs: default_max_route_legs(),
        }
    }
}

impl PlanningPolicy {
    pub fn validate(&self) -> Result<()> {
        ensure_positive("grid_scale", self.grid_scale)?;
        ensure_positive("tank_use_per_second", self.tank_use_per_second)?;
        ensure_positive("session_area_divisor", self.session_area_divisor)?;
        Ok(())
    }

    pub fn with_exclusion_mode(mut self, mode: ExclusionMode) -> Self {
        self.exclusion_mode = mode;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy_constants() {
        let policy = PlanningPolicy::default();
        assert_eq!(policy.grid_scale, 40.0);
        assert_eq!(policy.tank_use_per_second, 0.1);
        assert_eq!(policy.session_area_divisor, 3.0);
        assert_eq!(policy.exclusion_mode, ExclusionMode::Exclude);
        assert!(policy.validate().is_ok());
    }

    #[test]
    fn test_partial_policy_from_toml() {
        let policy: PlanningPolicy = toml::from_str(
            r#"
            grid_scale = 20.0
            exclusion_mode = "clip"
            "#,
        )
        .unwrap();
        assert_eq!(policy.grid_scale, 20.0);
        assert_eq!(policy.exclusion_mode, ExclusionMode::Clip);
        assert_eq!(policy.tank_use_per_second, 0.1);
    }

    #[test]
    fn test_invalid_policy() {
        let policy = PlanningPolicy {
            session_area_divisor: 0.0,
            ..Default::default()
        };
        assert!(policy.validate().is_err());
    }
}
