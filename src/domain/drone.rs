use serde::Deserialize;
use std::collections::BTreeMap;

use crate::error::{PlanError, Result, ensure_positive};

/// Physical limits of one drone model
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DroneSpec {
    pub name: String,
    /// Maximum distance from the launch point in km
    pub flight_radius_km: f64,
    /// Cruise speed in m/s
    pub speed_mps: f64,
    /// Spray tank volume in liters
    pub tank_capacity_l: f64,
    /// Rated flight time per battery in minutes
    pub flight_time_min: f64,
    /// Spray swath width in meters
    pub spray_width_m: f64,
    /// Rated coverage per session in hectares
    pub efficiency_ha: f64,
}

impl DroneSpec {
    pub fn new(
        name: impl Into<String>,
        flight_radius_km: f64,
        speed_mps: f64,
        tank_capacity_l: f64,
        flight_time_min: f64,
        spray_width_m: f64,
        efficiency_ha: f64,
    ) -> Result<Self> {
        let spec = Self {
            name: name.into(),
            flight_radius_km,
            speed_mps,
            tank_capacity_l,
            flight_time_min,
            spray_width_m,
            efficiency_ha,
        };
        spec.validate()?;
        Ok(spec)
    }

    /// Check every physical quantity is positive and finite
    pub fn validate(&self) -> Result<()> {
        ensure_positive("flight_radius_km", self.flight_radius_km)?;
        ensure_positive("speed_mps", self.speed_mps)?;
        ensure_positive("tank_capacity_l", self.tank_capacity_l)?;
        ensure_positive("flight_time_min", self.flight_time_min)?;
        ensure_positive("spray_width_m", self.spray_width_m)?;
        ensure_positive("efficiency_ha", self.efficiency_ha)?;
        Ok(())
    }

    /// Full battery endurance in seconds
    pub fn battery_seconds(&self) -> f64 {
        self.flight_time_min * 60.0
    }
}

pub const DEFAULT_DRONE: &str = "New Agricultural Drone";

/// Name-indexed set of drone models, built once and passed to whoever needs it
#[derive(Debug, Clone, Default)]
pub struct DroneCatalog {
    drones: BTreeMap<String, DroneSpec>,
}

impl DroneCatalog {
    /// The stock models shipped with the planner
    pub fn builtin() -> Self {
        let stock = [
            ("Agrocopter A16", 10.0, 13.8, 16.0, 11.0, 5.0, 4.0),
            ("DJI Agras T30", 7.0, 10.0, 30.0, 15.0, 7.0, 9.2),
            ("DJI Agras T20", 6.0, 8.5, 20.0, 14.0, 6.0, 6.4),
            (DEFAULT_DRONE, 2.5, 5.0, 50.0, 20.0, 10.0, 12.0),
        ];

        let drones = stock
            .into_iter()
            .map(|(name, radius, speed, tank, time, width, eff)| {
                let spec = DroneSpec {
                    name: name.to_string(),
                    flight_radius_km: radius,
                    speed_mps: speed,
                    tank_capacity_l: tank,
                    flight_time_min: time,
                    spray_width_m: width,
                    efficiency_ha: eff,
                };
                (spec.name.clone(), spec)
            })
            .collect();

        Self { drones }
    }

    /// Add a model, replacing any existing entry with the same name
    pub fn with_drone(mut self, spec: DroneSpec) -> Result<Self> {
        spec.validate()?;
        self.drones.insert(spec.name.clone(), spec);
        Ok(self)
    }

    pub fn get(&self, name: &str) -> Result<&DroneSpec> {
        self.drones
            .get(name)
            .ok_or_else(|| PlanError::UnknownDrone(name.to_string()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.drones.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.drones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drones.is_empty()
    }
}
