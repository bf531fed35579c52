//! Telemetry emission: CSV session log and HTTP push to the scoring service

pub mod emitter;
pub mod log_sink;
pub mod push_sink;

pub use emitter::{TelemetryEmitter, DRIVER_SCORE_EVERY_TICKS};
pub use log_sink::SessionLog;
pub use push_sink::{
    CarbonRequest, CarbonResponse, DriverScoreRequest, DriverScoreResponse, MaintenanceRequest,
    MaintenanceResponse, PushError, RiskLevel, ScoringClient, REQUEST_TIMEOUT,
};
