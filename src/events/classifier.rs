//! Health and anomaly classification
//!
//! Pure functions from one raw telemetry snapshot to its derived labels.
//! CRITICAL conditions are evaluated before WARNING conditions, so a
//! snapshot matching both classifies as CRITICAL.

use crate::types::config::health_thresholds as t;
use crate::types::EngineStatus;
use crate::vehicle::Telemetry;

/// The classifier's verdict for one snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    /// Derived engine health
    pub engine_status: EngineStatus,
    /// Whether the snapshot is anomalous
    pub anomaly: bool,
}

/// Classify one raw snapshot
///
/// `tank_capacity_l` comes from the vehicle's profile; the snapshot itself
/// only carries the absolute fuel level.
pub fn classify(snapshot: &Telemetry, tank_capacity_l: f64) -> Classification {
    Classification {
        engine_status: engine_status(snapshot),
        anomaly: is_anomalous(snapshot, tank_capacity_l),
    }
}

/// Engine health from temperature, tires, oil, and battery
pub fn engine_status(snapshot: &Telemetry) -> EngineStatus {
    if snapshot.engine_temp_c >= t::ENGINE_TEMP_CRITICAL_C
        || snapshot.tire_pressure_psi < t::TIRE_PRESSURE_CRITICAL_PSI
        || snapshot.oil_quality < t::OIL_QUALITY_CRITICAL
    {
        EngineStatus::Critical
    } else if snapshot.engine_temp_c >= t::ENGINE_TEMP_WARNING_C
        || snapshot.tire_pressure_psi < t::TIRE_PRESSURE_WARNING_PSI
        || snapshot.battery_pct < t::BATTERY_WARNING_PCT
    {
        EngineStatus::Warning
    } else {
        EngineStatus::Ok
    }
}

/// Anomaly flag from fuel starvation, overheating, or vibration spikes
pub fn is_anomalous(snapshot: &Telemetry, tank_capacity_l: f64) -> bool {
    snapshot.fuel_level_l < t::FUEL_ANOMALY_FRACTION * tank_capacity_l
        || snapshot.engine_temp_c >= t::ENGINE_TEMP_ANOMALY_C
        || snapshot.vibration >= t::VIBRATION_ANOMALY
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BrakeCondition, DriverId, FuelType, RoadType, VehicleId, Weather};
    use crate::vehicle::VehicleClass;
    use chrono::Utc;

    /// A healthy baseline snapshot the cases below perturb
    fn healthy_snapshot() -> Telemetry {
        Telemetry {
            timestamp: Utc::now(),
            vehicle_id: VehicleId::from_index(0),
            make: "Tata Signa".to_string(),
            vehicle_type: VehicleClass::Truck,
            driver_id: DriverId::from_index(0),
            lat: 19.0760,
            lon: 72.8777,
            origin_city: "Mumbai".to_string(),
            destination_city: "Delhi".to_string(),
            distance_remaining_km: 500.0,
            speed_kmh: 72.0,
            engine_temp_c: 85.0,
            fuel_level_l: 200.0,
            fuel_consumption_l100km: 14.0,
            fuel_type: FuelType::Diesel,
            battery_pct: 80.0,
            tire_pressure_psi: 33.0,
            vibration: 1.5,
            oil_quality: 70.0,
            brake_condition: BrakeCondition::Good,
            is_speeding: false,
            harsh_brake: false,
            harsh_accel: false,
            idle_since_min: 0.0,
            weather: Weather::Clear,
            road_type: RoadType::Highway,
            co2_per_km: 0.3752,
            engine_status: crate::types::EngineStatus::Ok,
            anomaly_flag: false,
        }
    }

    #[test]
    fn test_healthy_snapshot_is_ok() {
        let c = classify(&healthy_snapshot(), 300.0);
        assert_eq!(c.engine_status, EngineStatus::Ok);
        assert!(!c.anomaly);
    }

    #[test]
    fn test_critical_temperature_fires_alone() {
        let mut snapshot = healthy_snapshot();
        snapshot.engine_temp_c = 121.0;
        snapshot.tire_pressure_psi = 30.0;
        snapshot.oil_quality = 50.0;
        assert_eq!(engine_status(&snapshot), EngineStatus::Critical);
    }

    #[test]
    fn test_critical_dominates_warning() {
        // Meets a WARNING rule (battery) and a CRITICAL rule (tires) at once
        let mut snapshot = healthy_snapshot();
        snapshot.battery_pct = 25.0;
        snapshot.tire_pressure_psi = 24.0;
        assert_eq!(engine_status(&snapshot), EngineStatus::Critical);
    }

    #[test]
    fn test_warning_thresholds() {
        let mut snapshot = healthy_snapshot();
        snapshot.engine_temp_c = 105.0;
        assert_eq!(engine_status(&snapshot), EngineStatus::Warning);

        let mut snapshot = healthy_snapshot();
        snapshot.tire_pressure_psi = 27.9;
        assert_eq!(engine_status(&snapshot), EngineStatus::Warning);

        let mut snapshot = healthy_snapshot();
        snapshot.battery_pct = 29.9;
        assert_eq!(engine_status(&snapshot), EngineStatus::Warning);
    }

    #[test]
    fn test_low_oil_is_critical() {
        let mut snapshot = healthy_snapshot();
        snapshot.oil_quality = 19.9;
        assert_eq!(engine_status(&snapshot), EngineStatus::Critical);
    }

    #[test]
    fn test_low_fuel_anomaly() {
        // 5 L in a 100 L tank is under the 10% floor
        let mut snapshot = healthy_snapshot();
        snapshot.fuel_level_l = 5.0;
        assert!(is_anomalous(&snapshot, 100.0));
        // The same 5 L in a 40 L tank (floor 4 L) is not
        assert!(!is_anomalous(&snapshot, 40.0));
    }

    #[test]
    fn test_overheat_anomaly() {
        let mut snapshot = healthy_snapshot();
        snapshot.engine_temp_c = 115.0;
        assert!(is_anomalous(&snapshot, 300.0));
        snapshot.engine_temp_c = 114.9;
        assert!(!is_anomalous(&snapshot, 300.0));
    }

    #[test]
    fn test_vibration_anomaly() {
        let mut snapshot = healthy_snapshot();
        snapshot.vibration = 7.0;
        assert!(is_anomalous(&snapshot, 300.0));
        snapshot.vibration = 6.99;
        assert!(!is_anomalous(&snapshot, 300.0));
    }
}
