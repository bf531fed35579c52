//! Simulation engine: actors, orchestration, logging, and errors

pub mod actor;
pub mod error;
pub mod logging;
pub mod orchestrator;

pub use actor::{ActorPhase, VehicleActor};
pub use error::{SimulationError, SimulationResult};
pub use logging::LoggingConfig;
pub use orchestrator::{FleetOrchestrator, StopHandle};
