//! Vehicle modeling: profiles, mutable state, and telemetry snapshots

pub mod profile;
pub mod state;
pub mod telemetry;

pub use profile::{sample_fuel_type, VehicleClass, VehicleProfile};
pub use state::VehicleState;
pub use telemetry::Telemetry;
