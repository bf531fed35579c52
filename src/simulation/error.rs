//! Error types for the simulation engine
//!
//! Route and configuration problems abort startup; sink problems are
//! handled where they occur (push failures are discarded, log failures
//! downgrade to warnings) and never travel far as errors.

use crate::types::ConfigValidationError;
use thiserror::Error;

/// Errors that can occur while running the simulation
#[derive(Debug, Error)]
pub enum SimulationError {
    /// Configuration loading or validation failed
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigValidationError),

    /// A route could not be resolved from the waypoint registry
    #[error("Route resolution failed: {0}")]
    Route(String),

    /// The session log could not be created or finalized
    #[error("Session log error: {0}")]
    LogSink(String),

    /// I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV encoding error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SimulationError {
    /// Create a route resolution error
    pub fn route_error(msg: impl Into<String>) -> Self {
        Self::Route(msg.into())
    }

    /// Create a session log error
    pub fn log_sink_error(msg: impl Into<String>) -> Self {
        Self::LogSink(msg.into())
    }
}

/// Result type for simulation operations
pub type SimulationResult<T> = Result<T, SimulationError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_route_error_display() {
        let err = SimulationError::route_error("registry is empty");
        assert_eq!(err.to_string(), "Route resolution failed: registry is empty");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "missing");
        let err: SimulationError = io_error.into();
        assert!(matches!(err, SimulationError::Io(_)));
    }

    #[test]
    fn test_config_error_conversion() {
        let err: SimulationError =
            ConfigValidationError::InvalidValue("vehicle_count must be greater than 0".into())
                .into();
        assert!(matches!(err, SimulationError::Configuration(_)));
        assert!(err.to_string().contains("vehicle_count"));
    }
}
