//! Fleet Telemetry Simulator
//!
//! A realistic fleet telemetry simulation engine that streams physically
//! plausible vehicle sensor data on a fixed cadence, classifies each
//! snapshot into health and anomaly signals, and emits the records to a
//! CSV session log and an external AI scoring service.
//!
//! # Overview
//!
//! Each simulated vehicle is an independent actor on its own thread: it
//! owns its mutable state and random stream, advances one tick at a time,
//! and forwards every classified snapshot to the configured sinks. The
//! orchestrator owns the session-wide resources and the shutdown protocol.
//!
//! ## Key Features
//!
//! - **Plausible Physics**: Sensor values drift within clamped ranges and
//!   react to weather, road type, idling, and driver events
//! - **Route Simulation**: Vehicles travel great-circle legs between real
//!   Indian cities and chain onward trips on arrival
//! - **Health Classification**: Per-tick engine status and anomaly flags
//!   derived from fixed thresholds
//! - **Per-Vehicle Actors**: One thread, one RNG, and one emitter per
//!   vehicle; deterministic when seeded
//! - **Dual Sinks**: Append-only CSV session log and best-effort HTTP
//!   push to maintenance, carbon, and driver-score models
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use fleet_telemetry_sim::simulation::FleetOrchestrator;
//! use fleet_telemetry_sim::types::SimulationConfig;
//!
//! let config = SimulationConfig {
//!     vehicle_count: 2,
//!     tick_budget: Some(10),
//!     ..Default::default()
//! };
//! config.validate()?;
//!
//! FleetOrchestrator::new(config).run()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Module Organization
//!
//! - [`types`]: Identifiers, enums, configuration, and tunable constants
//! - [`geo`]: Waypoint registry, routes, and great-circle interpolation
//! - [`vehicle`]: Profiles, per-vehicle state, and the tick transition
//! - [`events`]: Health and anomaly classification
//! - [`emit`]: CSV session log and scoring-service push client
//! - [`simulation`]: Actors, orchestration, logging, and errors
#![warn(missing_docs, missing_debug_implementations, unreachable_pub)]

pub mod emit;
pub mod events;
pub mod geo;
pub mod simulation;
pub mod types;
pub mod vehicle;

// Re-export the surface most callers need
pub use simulation::{FleetOrchestrator, LoggingConfig, SimulationError, SimulationResult};
pub use types::{CliArgs, SimulationConfig};
pub use vehicle::{Telemetry, VehicleState};
