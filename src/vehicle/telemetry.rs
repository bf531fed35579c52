//! The per-tick telemetry snapshot
//!
//! [`Telemetry`] is the complete, immutable record describing one vehicle's
//! state at one tick. It is created fresh each tick, annotated once by the
//! classifier, and then handed to the sinks; nothing mutates it afterwards.
//! Field order is the column order of the CSV session log.

use crate::events::Classification;
use crate::types::{BrakeCondition, DriverId, EngineStatus, FuelType, RoadType, VehicleId, Weather};
use crate::vehicle::profile::VehicleClass;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One vehicle's complete sensor and trip snapshot for a single tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Telemetry {
    /// Wall-clock time the tick was produced
    pub timestamp: DateTime<Utc>,
    /// Vehicle identity
    pub vehicle_id: VehicleId,
    /// Make and model display name
    pub make: String,
    /// Vehicle class tag
    pub vehicle_type: VehicleClass,
    /// Assigned driver identity
    pub driver_id: DriverId,

    // Location
    /// Interpolated latitude, 6 decimal places
    pub lat: f64,
    /// Interpolated longitude, 6 decimal places
    pub lon: f64,
    /// Current leg origin city
    pub origin_city: String,
    /// Current leg destination city
    pub destination_city: String,
    /// Kilometres remaining on the current leg, 1 decimal place
    pub distance_remaining_km: f64,

    // Engine and fuel
    /// Speed this tick in km/h
    pub speed_kmh: f64,
    /// Engine temperature in degrees Celsius
    pub engine_temp_c: f64,
    /// Fuel remaining in litres
    pub fuel_level_l: f64,
    /// Combined consumption rate this tick in L/100km
    pub fuel_consumption_l100km: f64,
    /// Fuel type
    pub fuel_type: FuelType,
    /// Battery charge in percent
    pub battery_pct: f64,

    // Tires and mechanics
    /// Tire pressure in PSI
    pub tire_pressure_psi: f64,
    /// Vibration index, 0-10
    pub vibration: f64,
    /// Oil quality, 0-100
    pub oil_quality: f64,
    /// Inspected brake condition
    pub brake_condition: BrakeCondition,

    // Driver events
    /// Whether the vehicle exceeded the road-adjusted limit this tick
    pub is_speeding: bool,
    /// Whether a harsh braking event occurred this tick
    pub harsh_brake: bool,
    /// Whether a harsh acceleration event occurred this tick
    pub harsh_accel: bool,
    /// Minutes spent in the current idle stretch
    pub idle_since_min: f64,

    // Conditions
    /// Current weather
    pub weather: Weather,
    /// Current road type
    pub road_type: RoadType,

    // Computed
    /// Kilograms of CO2 emitted per kilometre, zero when stationary
    pub co2_per_km: f64,
    /// Derived engine health classification
    pub engine_status: EngineStatus,
    /// Whether this snapshot is anomalous
    pub anomaly_flag: bool,
}

impl Telemetry {
    /// Stamp the classifier's verdict onto the snapshot
    pub fn apply_classification(&mut self, classification: Classification) {
        self.engine_status = classification.engine_status;
        self.anomaly_flag = classification.anomaly;
    }
}

/// Round to a fixed number of decimal places
///
/// Snapshots carry values at the precision they were produced with, so the
/// sinks never re-round.
pub(crate) fn round_dp(value: f64, places: u32) -> f64 {
    let factor = 10_f64.powi(places as i32);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_dp() {
        assert_eq!(round_dp(1.23456, 2), 1.23);
        assert_eq!(round_dp(1.235, 2), 1.24);
        assert_eq!(round_dp(-0.0049, 2), -0.0);
        assert_eq!(round_dp(88.9999, 1), 89.0);
        assert_eq!(round_dp(2.68215, 4), 2.6822);
    }
}
