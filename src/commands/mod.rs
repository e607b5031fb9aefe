//! Operator commands issued while a mission is flying
//!
//! A stateless lookup: each command maps to a status message and the
//! position the drone should head for.

use geo::Coord;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorCommand {
    ReturnToBase,
    EmergencyLanding,
    HoldPosition,
}

impl FromStr for OperatorCommand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "return_to_base" => Ok(Self::ReturnToBase),
            "emergency_landing" => Ok(Self::EmergencyLanding),
            "hold_position" => Ok(Self::HoldPosition),
            other => Err(format!("unknown command: {other}")),
        }
    }
}

impl fmt::Display for OperatorCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ReturnToBase => "return_to_base",
            Self::EmergencyLanding => "emergency_landing",
            Self::HoldPosition => "hold_position",
        };
        f.write_str(name)
    }
}

/// Status message plus target position
#[derive(Debug, Clone, PartialEq)]
pub struct CommandResponse {
    pub status: &'static str,
    pub target: Coord<f64>,
}

pub const UNKNOWN_STATUS: &str = "Unknown command";

impl OperatorCommand {
    pub fn respond(self, position: Coord<f64>, base: Coord<f64>) -> CommandResponse {
        let (status, target) = match self {
            Self::ReturnToBase => ("Drone is returning to base", base),
            // lands where it stopped
            Self::EmergencyLanding => ("Drone is performing emergency landing", position),
            Self::HoldPosition => ("Drone is holding position", position),
        };
        tracing::info!(command = %self, "{} -> ({:.1}, {:.1})", status, target.x, target.y);
        CommandResponse { status, target }
    }
}

/// Resolve a symbolic command name; unknown names leave the drone where it is
pub fn dispatch(command: &str, position: Coord<f64>, base: Coord<f64>) -> CommandResponse {
    match command.parse::<OperatorCommand>() {
        Ok(cmd) => cmd.respond(position, base),
        Err(e) => {
            tracing::warn!("{}", e);
            CommandResponse {
                status: UNKNOWN_STATUS,
                target: position,
            }
        }
    }
}
