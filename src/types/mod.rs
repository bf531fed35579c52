//! Core types for the fleet telemetry simulator
//!
//! This module contains fundamental types used throughout the simulation:
//!
//! - **Identifiers**: formatted vehicle and driver ids
//! - **Enums**: weather, road, fuel, brake and engine-status enumerations
//! - **Configuration**: the CLI surface, the validated [`SimulationConfig`],
//!   and the named tunable constants

pub mod config;
pub mod enums;
pub mod identifiers;

pub use config::{CliArgs, ConfigValidationError, SimulationConfig};
pub use enums::{BrakeCondition, EngineStatus, FuelType, RoadType, Weather};
pub use identifiers::{DriverId, VehicleId};
