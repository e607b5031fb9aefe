//! sprayplan - Plan agricultural spraying missions and estimate drone resources

pub mod commands;
pub mod config;
pub mod domain;
pub mod error;
pub mod export;
pub mod geometry;
pub mod metrics;
pub mod mission;
pub mod planning;
pub mod simulation;

pub use error::{PlanError, Result};
