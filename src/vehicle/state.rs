//! Per-vehicle mutable simulation state and the tick transition
//!
//! A [`VehicleState`] is exclusively owned by its actor: no other component
//! reads or writes it, so it needs no synchronization. [`VehicleState::tick`]
//! advances the state by exactly one fixed time step and returns the raw
//! (pre-classification) telemetry snapshot. The transition applies its
//! random draws in a fixed order, so a seeded RNG reproduces identical
//! snapshot sequences.

use crate::geo::{interpolated_position, Route, WaypointRegistry};
use crate::simulation::error::SimulationResult;
use crate::types::config::{sensor_limits, tick_probabilities};
use crate::types::{BrakeCondition, DriverId, EngineStatus, FuelType, RoadType, VehicleId, Weather};
use crate::vehicle::profile::{sample_fuel_type, VehicleProfile};
use crate::vehicle::telemetry::{round_dp, Telemetry};
use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;

/// Mutable state of one simulated vehicle between ticks
#[derive(Debug, Clone)]
pub struct VehicleState {
    /// Vehicle identity
    pub vehicle_id: VehicleId,
    /// Assigned driver identity
    pub driver_id: DriverId,
    /// Immutable performance envelope
    pub profile: VehicleProfile,
    /// Fuel type, fixed at creation
    pub fuel_type: FuelType,

    registry: Arc<WaypointRegistry>,
    /// Current route leg
    pub route: Route,
    /// Fractional progress along the current leg, 0.0-1.0
    pub progress: f64,

    /// Fuel remaining in litres
    pub fuel_level_l: f64,
    /// Engine temperature in degrees Celsius
    pub engine_temp_c: f64,
    /// Tire pressure in PSI
    pub tire_pressure_psi: f64,
    /// Battery charge in percent
    pub battery_pct: f64,
    /// Oil quality, 0-100
    pub oil_quality: f64,
    /// Vibration index, 0-10
    pub vibration: f64,
    /// Inspected brake condition, fixed at creation
    pub brake_condition: BrakeCondition,

    /// Current weather
    pub weather: Weather,
    /// Current road type
    pub road_type: RoadType,

    /// Minutes spent in the current idle stretch
    pub idle_minutes: f64,
    /// Number of recorded past failures, fixed at creation
    pub failure_history: u32,

    /// Cumulative overspeed events
    pub overspeed_events: u64,
    /// Cumulative harsh braking events
    pub harsh_brake_count: u64,
    /// Cumulative harsh acceleration events
    pub harsh_accel_count: u64,
    /// Cumulative late deliveries
    pub late_deliveries: u64,
    /// Cumulative on-time deliveries
    pub on_time_deliveries: u64,

    /// Monotonically increasing tick counter
    pub tick_count: u64,

    tick_interval_secs: f64,
}

impl VehicleState {
    /// Initialize a vehicle within realistic operating ranges
    ///
    /// Samples a profile and route, and seeds every sensor mid-range so the
    /// first ticks look like a vehicle already on the road (including a
    /// journey already partially underway). Fails fast if the registry
    /// cannot supply a route.
    pub fn init(
        fleet_index: u32,
        registry: Arc<WaypointRegistry>,
        tick_interval: Duration,
        rng: &mut impl Rng,
    ) -> SimulationResult<Self> {
        let profile = VehicleProfile::sample(rng);
        let route = registry.random_route(rng)?;

        Ok(Self {
            vehicle_id: VehicleId::from_index(fleet_index),
            driver_id: DriverId::from_index(fleet_index),
            profile,
            fuel_type: sample_fuel_type(rng),
            registry,
            route,
            progress: rng.gen_range(0.0..0.8),
            fuel_level_l: rng.gen_range(0.4..1.0) * profile.fuel_tank_l,
            engine_temp_c: rng.gen_range(75.0..90.0),
            tire_pressure_psi: rng.gen_range(30.0..36.0),
            battery_pct: rng.gen_range(70.0..100.0),
            oil_quality: rng.gen_range(50.0..95.0),
            vibration: rng.gen_range(0.5..2.0),
            brake_condition: *[
                BrakeCondition::Good,
                BrakeCondition::Good,
                BrakeCondition::Fair,
                BrakeCondition::Poor,
            ]
            .choose(rng)
            .expect("brake condition table is non-empty"),
            weather: *Weather::ALL.choose(rng).expect("weather table is non-empty"),
            road_type: *RoadType::ALL.choose(rng).expect("road table is non-empty"),
            idle_minutes: 0.0,
            failure_history: rng.gen_range(0..=3),
            overspeed_events: 0,
            harsh_brake_count: 0,
            harsh_accel_count: 0,
            late_deliveries: rng.gen_range(0..=2),
            on_time_deliveries: rng.gen_range(5..=20),
            tick_count: 0,
            tick_interval_secs: tick_interval.as_secs_f64(),
        })
    }

    /// Hours of simulated usage accumulated so far
    pub fn usage_hours(&self) -> f64 {
        self.tick_count as f64 * self.tick_interval_secs / 3600.0
    }

    /// Advance the simulation by exactly one tick
    ///
    /// Returns the raw snapshot; `engine_status` and `anomaly_flag` are left
    /// at their defaults until the classifier annotates them. The only
    /// failure mode is an unresolvable next leg at trip completion.
    pub fn tick(
        &mut self,
        rng: &mut impl Rng,
        now: DateTime<Utc>,
    ) -> SimulationResult<Telemetry> {
        self.tick_count += 1;
        let dt_hours = self.tick_interval_secs / 3600.0;

        // 1. Environment drift
        if rng.gen_bool(tick_probabilities::WEATHER_SHIFT) {
            self.weather = *Weather::ALL.choose(rng).expect("weather table is non-empty");
        }
        if rng.gen_bool(tick_probabilities::ROAD_SHIFT) {
            self.road_type = *RoadType::ALL.choose(rng).expect("road table is non-empty");
        }

        // 2. Speed, respecting the road-type cap
        let cap = self.road_type.speed_cap();
        let speed = if rng.gen_bool(tick_probabilities::IDLE) {
            self.idle_minutes += self.tick_interval_secs / 60.0;
            0.0
        } else {
            self.idle_minutes = 0.0;
            let target = self.profile.max_speed_kmh * cap * rng.gen_range(0.6..1.0);
            round_dp(target.min(self.profile.max_speed_kmh), 1)
        };

        // 3. Speeding classification against the road-adjusted limit
        let speed_limit = self.profile.max_speed_kmh * cap;
        let is_speeding = speed > speed_limit * sensor_limits::SPEEDING_TOLERANCE;
        if is_speeding {
            self.overspeed_events += 1;
        }

        // 4. Harsh events
        let harsh_brake = rng.gen_bool(tick_probabilities::HARSH_BRAKE);
        let harsh_accel = rng.gen_bool(tick_probabilities::HARSH_ACCEL);
        if harsh_brake {
            self.harsh_brake_count += 1;
        }
        if harsh_accel {
            self.harsh_accel_count += 1;
        }

        // 5. Engine temperature drifts up while moving, cools at idle
        if speed > 0.0 {
            self.engine_temp_c += rng.gen_range(-1.0..2.5);
        } else {
            self.engine_temp_c -= rng.gen_range(0.5..1.5);
        }
        self.engine_temp_c = round_dp(
            self.engine_temp_c
                .clamp(sensor_limits::ENGINE_TEMP_MIN_C, sensor_limits::ENGINE_TEMP_MAX_C),
            1,
        );

        // 6. Fuel burn from load, weather, and distance covered
        let load_factor = rng.gen_range(0.7..1.3);
        let consumption_l100km = round_dp(
            self.profile.base_consumption_l100km
                * load_factor
                * self.weather.consumption_penalty(),
            2,
        );
        let distance_km = speed * dt_hours;
        let fuel_used = consumption_l100km / 100.0 * distance_km;
        self.fuel_level_l = round_dp((self.fuel_level_l - fuel_used).max(0.0), 2);

        // 7. Tire pressure random walk, slightly leaky
        self.tire_pressure_psi += rng.gen_range(-0.05..0.02);
        self.tire_pressure_psi = round_dp(
            self.tire_pressure_psi
                .clamp(sensor_limits::TIRE_PRESSURE_MIN_PSI, sensor_limits::TIRE_PRESSURE_MAX_PSI),
            1,
        );

        // 8. Battery drains slowly while running
        self.battery_pct += rng.gen_range(-0.3..0.1);
        self.battery_pct = round_dp(
            self.battery_pct.clamp(sensor_limits::BATTERY_MIN_PCT, sensor_limits::BATTERY_MAX_PCT),
            1,
        );

        // 9. Oil quality only degrades
        self.oil_quality -= rng.gen_range(0.0..0.05);
        self.oil_quality = round_dp(self.oil_quality.max(0.0), 1);

        // 10. Vibration spikes on harsh events, decays otherwise
        if harsh_brake || harsh_accel {
            self.vibration += rng.gen_range(0.5..1.5);
        } else {
            self.vibration -= rng.gen_range(0.0..0.1);
        }
        self.vibration = round_dp(self.vibration.clamp(0.0, sensor_limits::VIBRATION_MAX), 2);

        // 11. Route progress and atomic trip completion
        if speed > 0.0 && self.route.total_km > 0.0 {
            self.progress += distance_km / self.route.total_km;
        }
        if self.progress >= 1.0 {
            self.complete_trip(rng)?;
        }

        let (lat, lon) = interpolated_position(&self.route, self.progress, rng);
        let distance_remaining_km = round_dp(self.route.total_km * (1.0 - self.progress), 1);

        // 12. CO2 per km, zero when stationary
        let co2_per_km = if speed > 0.0 {
            round_dp(
                consumption_l100km / 100.0 * self.fuel_type.emission_factor_kg_per_l(),
                4,
            )
        } else {
            0.0
        };

        Ok(Telemetry {
            timestamp: now,
            vehicle_id: self.vehicle_id,
            make: self.profile.make.to_string(),
            vehicle_type: self.profile.class,
            driver_id: self.driver_id,
            lat,
            lon,
            origin_city: self.route.origin.name.clone(),
            destination_city: self.route.destination.name.clone(),
            distance_remaining_km,
            speed_kmh: speed,
            engine_temp_c: self.engine_temp_c,
            fuel_level_l: self.fuel_level_l,
            fuel_consumption_l100km: consumption_l100km,
            fuel_type: self.fuel_type,
            battery_pct: self.battery_pct,
            tire_pressure_psi: self.tire_pressure_psi,
            vibration: self.vibration,
            oil_quality: self.oil_quality,
            brake_condition: self.brake_condition,
            is_speeding,
            harsh_brake,
            harsh_accel,
            idle_since_min: round_dp(self.idle_minutes, 1),
            weather: self.weather,
            road_type: self.road_type,
            co2_per_km,
            engine_status: EngineStatus::Ok,
            anomaly_flag: false,
        })
    }

    /// Atomic trip completion: swap the leg and credit delivery outcomes
    ///
    /// The leg swap, the progress reset, and the delivery accounting happen
    /// together; no snapshot can observe a half-completed transition.
    fn complete_trip(&mut self, rng: &mut impl Rng) -> SimulationResult<()> {
        self.route = self.registry.next_leg(&self.route.destination, rng)?;
        self.progress = 0.0;
        if rng.gen_bool(tick_probabilities::ON_TIME_DELIVERY) {
            self.on_time_deliveries += 1;
        }
        if rng.gen_bool(tick_probabilities::LATE_DELIVERY) {
            self.late_deliveries += 1;
        }
        Ok(())
    }
}
