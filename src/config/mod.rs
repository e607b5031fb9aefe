use serde::Deserialize;
use std::path::PathBuf;

use crate::domain::{DEFAULT_DRONE, DroneCatalog, DroneSpec};
use crate::error::Result;

pub mod policy;

pub use policy::{ExclusionMode, PlanningPolicy};

fn default_drone() -> String {
    DEFAULT_DRONE.to_string()
}
fn default_verbose() -> bool {
    false
}

/// Settings read from `sprayplan.toml`; command-line flags take precedence
#[derive(Debug, Deserialize, Default)]
pub struct FileConfig {
    #[serde(default)]
    pub mission: Option<PathBuf>,
    #[serde(default = "default_drone")]
    pub drone: String,
    #[serde(default)]
    pub output: Option<PathBuf>,
    #[serde(default)]
    pub csv_output: Option<PathBuf>,
    #[serde(default = "default_verbose")]
    pub verbose: bool,
    #[serde(default)]
    pub policy: Option<PlanningPolicy>,
    /// Extra or replacement catalog entries
    #[serde(default)]
    pub drones: Vec<DroneSpec>,
}

impl FileConfig {
    pub fn load() -> Option<Self> {
        let config_paths = get_config_paths();

        for path in config_paths {
            if !path.exists() {
                continue;
            }
            let Ok(contents) = std::fs::read_to_string(&path) else {
                continue;
            };
            match toml::from_str(&contents) {
                Ok(config) => return Some(config),
                Err(e) => {
                    tracing::warn!("Failed to parse config file {:?}: {}", path, e);
                }
            }
        }
        None
    }

    /// The builtin catalog extended with the `[[drones]]` entries
    pub fn catalog(&self) -> Result<DroneCatalog> {
        self.drones
            .iter()
            .cloned()
            .try_fold(DroneCatalog::builtin(), DroneCatalog::with_drone)
    }
}

fn get_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    paths.push(PathBuf::from("sprayplan.toml"));
    paths.push(PathBuf::from(".sprayplan.toml"));

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("sprayplan").join("config.toml"));
        paths.push(config_dir.join("sprayplan.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".sprayplan.toml"));
        paths.push(home.join(".config").join("sprayplan").join("config.toml"));
    }

    paths
}
