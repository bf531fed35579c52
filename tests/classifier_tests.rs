//! Integration tests for health classification over live telemetry
//!
//! The unit tests pin the individual thresholds; these check that the
//! classifier agrees with its own rules across thousands of generated
//! snapshots and that annotation stamps the snapshot in place.

use chrono::Utc;
use fleet_telemetry_sim::events::{classify, engine_status, is_anomalous};
use fleet_telemetry_sim::geo::WaypointRegistry;
use fleet_telemetry_sim::types::EngineStatus;
use fleet_telemetry_sim::vehicle::VehicleState;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use std::time::Duration;

/// Classification is consistent with the raw sensor values it reads
#[test]
fn test_classification_matches_sensor_rules() {
    let now = Utc::now();
    let registry = Arc::new(WaypointRegistry::india_default());
    for seed in 0..5 {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut state =
            VehicleState::init(0, Arc::clone(&registry), Duration::from_secs(3), &mut rng)
                .unwrap();
        let tank = state.profile.fuel_tank_l;

        for _ in 0..2000 {
            let snapshot = state.tick(&mut rng, now).unwrap();
            let verdict = classify(&snapshot, tank);

            let critical = snapshot.engine_temp_c >= 120.0
                || snapshot.tire_pressure_psi < 25.0
                || snapshot.oil_quality < 20.0;
            let warning = snapshot.engine_temp_c >= 105.0
                || snapshot.tire_pressure_psi < 28.0
                || snapshot.battery_pct < 30.0;

            match verdict.engine_status {
                EngineStatus::Critical => assert!(critical),
                EngineStatus::Warning => assert!(warning && !critical),
                EngineStatus::Ok => assert!(!warning && !critical),
            }

            let anomaly = snapshot.fuel_level_l < 0.1 * tank
                || snapshot.engine_temp_c >= 115.0
                || snapshot.vibration >= 7.0;
            assert_eq!(verdict.anomaly, anomaly);
        }
    }
}

/// `classify` is the conjunction of its two component functions
#[test]
fn test_classify_composes_components() {
    let now = Utc::now();
    let registry = Arc::new(WaypointRegistry::india_default());
    let mut rng = StdRng::seed_from_u64(50);
    let mut state =
        VehicleState::init(0, registry, Duration::from_secs(3), &mut rng).unwrap();
    let tank = state.profile.fuel_tank_l;

    for _ in 0..500 {
        let snapshot = state.tick(&mut rng, now).unwrap();
        let verdict = classify(&snapshot, tank);
        assert_eq!(verdict.engine_status, engine_status(&snapshot));
        assert_eq!(verdict.anomaly, is_anomalous(&snapshot, tank));
    }
}

/// Annotation overwrites the snapshot's default labels
#[test]
fn test_apply_classification_stamps_the_snapshot() {
    let now = Utc::now();
    let registry = Arc::new(WaypointRegistry::india_default());
    let mut rng = StdRng::seed_from_u64(60);
    let mut state =
        VehicleState::init(0, registry, Duration::from_secs(3), &mut rng).unwrap();

    let mut snapshot = state.tick(&mut rng, now).unwrap();
    // Raw snapshots always come out with the defaults
    assert_eq!(snapshot.engine_status, EngineStatus::Ok);
    assert!(!snapshot.anomaly_flag);

    let verdict = classify(&snapshot, state.profile.fuel_tank_l);
    snapshot.apply_classification(verdict);
    assert_eq!(snapshot.engine_status, verdict.engine_status);
    assert_eq!(snapshot.anomaly_flag, verdict.anomaly);
}
