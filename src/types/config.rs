//! Configuration structures for the fleet telemetry simulator
//!
//! This module contains the simulation configuration structure, its CLI
//! surface, validation logic, and the named tunable constants the
//! simulation core and sinks consume.

use clap::Parser;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Per-tick event probabilities for the stochastic state transition
pub mod tick_probabilities {
    /// Chance the weather resamples on a given tick
    pub const WEATHER_SHIFT: f64 = 0.03;

    /// Chance the road type resamples on a given tick
    pub const ROAD_SHIFT: f64 = 0.02;

    /// Chance the vehicle sits idle for the whole tick
    pub const IDLE: f64 = 0.08;

    /// Chance of a harsh braking event
    pub const HARSH_BRAKE: f64 = 0.04;

    /// Chance of a harsh acceleration event
    pub const HARSH_ACCEL: f64 = 0.05;

    /// Chance a completed trip counts as an on-time delivery
    pub const ON_TIME_DELIVERY: f64 = 0.8;

    /// Chance a completed trip also counts as a late delivery
    pub const LATE_DELIVERY: f64 = 0.1;
}

/// Physical clamp ranges for the simulated sensors
pub mod sensor_limits {
    /// Engine temperature floor in degrees Celsius
    pub const ENGINE_TEMP_MIN_C: f64 = 60.0;

    /// Engine temperature ceiling in degrees Celsius
    pub const ENGINE_TEMP_MAX_C: f64 = 130.0;

    /// Tire pressure floor in PSI
    pub const TIRE_PRESSURE_MIN_PSI: f64 = 20.0;

    /// Tire pressure ceiling in PSI
    pub const TIRE_PRESSURE_MAX_PSI: f64 = 40.0;

    /// Battery charge floor in percent
    pub const BATTERY_MIN_PCT: f64 = 20.0;

    /// Battery charge ceiling in percent
    pub const BATTERY_MAX_PCT: f64 = 100.0;

    /// Vibration index ceiling
    pub const VIBRATION_MAX: f64 = 10.0;

    /// Fraction over the road-adjusted limit that counts as speeding
    pub const SPEEDING_TOLERANCE: f64 = 1.05;
}

/// Health classification thresholds for engine status and anomaly flags
pub mod health_thresholds {
    /// Engine temperature that classifies as CRITICAL
    pub const ENGINE_TEMP_CRITICAL_C: f64 = 120.0;

    /// Engine temperature that classifies as WARNING
    pub const ENGINE_TEMP_WARNING_C: f64 = 105.0;

    /// Engine temperature that raises the anomaly flag
    pub const ENGINE_TEMP_ANOMALY_C: f64 = 115.0;

    /// Tire pressure below which the engine status is CRITICAL
    pub const TIRE_PRESSURE_CRITICAL_PSI: f64 = 25.0;

    /// Tire pressure below which the engine status is WARNING
    pub const TIRE_PRESSURE_WARNING_PSI: f64 = 28.0;

    /// Oil quality below which the engine status is CRITICAL
    pub const OIL_QUALITY_CRITICAL: f64 = 20.0;

    /// Battery percentage below which the engine status is WARNING
    pub const BATTERY_WARNING_PCT: f64 = 30.0;

    /// Fraction of tank capacity below which fuel level is anomalous
    pub const FUEL_ANOMALY_FRACTION: f64 = 0.1;

    /// Vibration index at or above which the snapshot is anomalous
    pub const VIBRATION_ANOMALY: f64 = 7.0;
}

/// Empirically chosen scoring-service thresholds, preserved as-is
pub mod risk_thresholds {
    /// Maintenance failure probability at or above which risk is HIGH
    pub const MAINTENANCE_HIGH: f64 = 0.75;

    /// Maintenance failure probability at or above which risk is MEDIUM
    pub const MAINTENANCE_MEDIUM: f64 = 0.45;

    /// Fleet carbon benchmark in kilograms of CO2 per kilometre
    pub const CARBON_BENCHMARK_KG_PER_KM: f64 = 0.2;
}

/// Errors raised while loading or validating the simulation configuration
#[derive(Debug, Error)]
pub enum ConfigValidationError {
    /// A field value is outside its allowed range
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),

    /// The configuration file could not be read
    #[error("Failed to read configuration file '{path}': {source}")]
    FileRead {
        /// Path that was attempted
        path: String,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// The configuration file could not be parsed
    #[error("Failed to parse configuration file '{path}': {source}")]
    FileParse {
        /// Path that was attempted
        path: String,
        /// Underlying JSON error
        source: serde_json::Error,
    },
}

/// Command line arguments structure
#[derive(Debug, Clone, Parser)]
#[command(
    name = "fleet-telemetry-sim",
    version,
    about = "Fleet Telemetry Simulator - streams physically plausible vehicle sensor data",
    long_about = "Simulates a fleet of vehicles producing live sensor readings on a fixed \
cadence, classifies them into health and anomaly signals, and emits the records to a CSV \
session log and/or an external AI scoring service.

EXAMPLES:
    # Three vehicles, console only
    fleet-telemetry-sim

    # Five vehicles, push to the scoring service and keep a CSV log
    fleet-telemetry-sim --vehicles 5 --push-api --export-csv

    # Reproducible bounded run
    fleet-telemetry-sim --vehicles 2 --ticks 100 --seed 42

CONFIGURATION:
    Configuration can be provided via:
    1. Command line arguments (highest priority)
    2. Configuration file (--config flag, JSON)
    3. Default values (lowest priority)"
)]
pub struct CliArgs {
    /// Configuration file path (JSON format)
    #[arg(short, long, help = "Configuration file path (JSON format)")]
    pub config: Option<String>,

    /// Number of vehicles to simulate
    #[arg(
        long,
        help = "Number of vehicles to simulate",
        long_help = "Number of independently simulated vehicles. Each vehicle runs on its own \
thread with its own random stream. Must be greater than 0. Default: 3"
    )]
    pub vehicles: Option<usize>,

    /// Push telemetry to the AI scoring service
    #[arg(long = "push-api", help = "Push telemetry to the AI scoring service")]
    pub push_api: bool,

    /// Export the session to a CSV log
    #[arg(long = "export-csv", help = "Write a CSV session log")]
    pub export_csv: bool,

    /// Stop after this many ticks per vehicle (0 = run until interrupted)
    #[arg(long, help = "Stop after N ticks per vehicle (0 = run forever)")]
    pub ticks: Option<u64>,

    /// Seconds between telemetry ticks
    #[arg(long, help = "Seconds between telemetry ticks")]
    pub tick_interval: Option<f64>,

    /// Scoring service host
    #[arg(long, help = "Scoring service host")]
    pub push_host: Option<String>,

    /// Scoring service port
    #[arg(long, help = "Scoring service port")]
    pub push_port: Option<u16>,

    /// Directory for CSV session logs
    #[arg(long, help = "Directory for CSV session logs")]
    pub log_dir: Option<String>,

    /// Random seed for reproducible per-vehicle streams
    #[arg(long, help = "Random seed for reproducible results")]
    pub seed: Option<u64>,

    /// Enable verbose logging
    #[arg(short, long, help = "Enable verbose logging")]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(short, long, help = "Enable debug logging")]
    pub debug: bool,

    /// Validate configuration without running the simulation
    #[arg(long, help = "Validate configuration without running the simulation")]
    pub dry_run: bool,

    /// Print default configuration in JSON format and exit
    #[arg(long, help = "Print default configuration in JSON format and exit")]
    pub print_config: bool,
}

/// Complete simulation configuration
///
/// Owned by the CLI layer; the simulation core consumes it as plain
/// parameters and never mutates it after startup.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimulationConfig {
    /// Number of vehicles in the fleet
    pub vehicle_count: usize,
    /// Whether telemetry is pushed to the scoring service
    pub push_enabled: bool,
    /// Whether telemetry is appended to the CSV session log
    pub log_enabled: bool,
    /// Optional per-vehicle tick budget; `None` runs until interrupted
    pub tick_budget: Option<u64>,
    /// Seconds between ticks
    pub tick_interval_secs: f64,
    /// Scoring service host
    pub push_host: String,
    /// Scoring service port
    pub push_port: u16,
    /// Directory that receives CSV session logs
    pub log_directory: String,
    /// Optional random seed; `None` seeds from entropy
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            vehicle_count: 3,
            push_enabled: false,
            log_enabled: false,
            tick_budget: None,
            tick_interval_secs: 3.0,
            push_host: "localhost".to_string(),
            push_port: 8001,
            log_directory: "logs".to_string(),
            seed: None,
        }
    }
}

impl SimulationConfig {
    /// Build the effective configuration from CLI arguments, applying an
    /// optional JSON config file underneath CLI overrides
    pub fn from_cli_args(args: CliArgs) -> Result<Self, ConfigValidationError> {
        let mut config = match &args.config {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        if let Some(vehicles) = args.vehicles {
            config.vehicle_count = vehicles;
        }
        if args.push_api {
            config.push_enabled = true;
        }
        if args.export_csv {
            config.log_enabled = true;
        }
        if let Some(ticks) = args.ticks {
            config.tick_budget = if ticks == 0 { None } else { Some(ticks) };
        }
        if let Some(interval) = args.tick_interval {
            config.tick_interval_secs = interval;
        }
        if let Some(host) = args.push_host {
            config.push_host = host;
        }
        if let Some(port) = args.push_port {
            config.push_port = port;
        }
        if let Some(dir) = args.log_dir {
            config.log_directory = dir;
        }
        if let Some(seed) = args.seed {
            config.seed = Some(seed);
        }

        Ok(config)
    }

    /// Load configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigValidationError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| {
            ConfigValidationError::FileRead { path: path.display().to_string(), source }
        })?;
        serde_json::from_str(&contents).map_err(|source| {
            ConfigValidationError::FileParse { path: path.display().to_string(), source }
        })
    }

    /// Validate all configuration values
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.vehicle_count == 0 {
            return Err(ConfigValidationError::InvalidValue(
                "vehicle_count must be greater than 0".to_string(),
            ));
        }
        if !self.tick_interval_secs.is_finite() || self.tick_interval_secs <= 0.0 {
            return Err(ConfigValidationError::InvalidValue(format!(
                "tick_interval_secs must be positive, got {}",
                self.tick_interval_secs
            )));
        }
        if self.push_host.is_empty() {
            return Err(ConfigValidationError::InvalidValue(
                "push_host must not be empty".to_string(),
            ));
        }
        if self.log_enabled && self.log_directory.is_empty() {
            return Err(ConfigValidationError::InvalidValue(
                "log_directory must not be empty when logging is enabled".to_string(),
            ));
        }
        Ok(())
    }

    /// Tick cadence as a [`Duration`]
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs_f64(self.tick_interval_secs)
    }

    /// Base URL of the scoring service
    pub fn push_endpoint(&self) -> String {
        format!("http://{}:{}", self.push_host, self.push_port)
    }

    /// Serialize the configuration as pretty JSON
    pub fn print_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = SimulationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.vehicle_count, 3);
        assert_eq!(config.tick_interval_secs, 3.0);
        assert!(!config.push_enabled);
        assert!(!config.log_enabled);
        assert!(config.tick_budget.is_none());
    }

    #[test]
    fn test_validation_rejects_zero_vehicles() {
        let config = SimulationConfig { vehicle_count: 0, ..Default::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_non_positive_interval() {
        let config = SimulationConfig { tick_interval_secs: 0.0, ..Default::default() };
        assert!(config.validate().is_err());

        let config = SimulationConfig { tick_interval_secs: -1.0, ..Default::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_cli_overrides_defaults() {
        let args = CliArgs::parse_from([
            "fleet-telemetry-sim",
            "--vehicles",
            "5",
            "--push-api",
            "--export-csv",
            "--ticks",
            "100",
            "--seed",
            "42",
        ]);
        let config = SimulationConfig::from_cli_args(args).unwrap();
        assert_eq!(config.vehicle_count, 5);
        assert!(config.push_enabled);
        assert!(config.log_enabled);
        assert_eq!(config.tick_budget, Some(100));
        assert_eq!(config.seed, Some(42));
    }

    #[test]
    fn test_zero_ticks_means_unbounded() {
        let args = CliArgs::parse_from(["fleet-telemetry-sim", "--ticks", "0"]);
        let config = SimulationConfig::from_cli_args(args).unwrap();
        assert!(config.tick_budget.is_none());
    }

    #[test]
    fn test_config_file_under_cli_overrides() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let on_disk = SimulationConfig {
            vehicle_count: 9,
            tick_interval_secs: 0.5,
            ..Default::default()
        };
        write!(file, "{}", serde_json::to_string(&on_disk).unwrap()).unwrap();

        let args = CliArgs::parse_from([
            "fleet-telemetry-sim",
            "--config",
            file.path().to_str().unwrap(),
            "--vehicles",
            "2",
        ]);
        let config = SimulationConfig::from_cli_args(args).unwrap();
        // CLI wins over the file, the file wins over defaults
        assert_eq!(config.vehicle_count, 2);
        assert_eq!(config.tick_interval_secs, 0.5);
    }

    #[test]
    fn test_push_endpoint_formatting() {
        let config = SimulationConfig::default();
        assert_eq!(config.push_endpoint(), "http://localhost:8001");
    }

    #[test]
    fn test_print_json_round_trip() {
        let config = SimulationConfig::default();
        let json = config.print_json().unwrap();
        let back: SimulationConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
