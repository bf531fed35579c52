//! HTTP push sink for the external AI scoring service
//!
//! Thin blocking client with a short timeout and one typed request/response
//! pair per endpoint. Field names match the schema the scoring models were
//! trained on, hence the snake/Pascal mix. Delivery is best-effort by
//! design: the caller logs and discards every [`PushError`].

use crate::types::config::risk_thresholds;
use crate::types::{BrakeCondition, DriverId, FuelType, RoadType, VehicleId, Weather};
use crate::vehicle::telemetry::round_dp;
use crate::vehicle::{Telemetry, VehicleState};
use rand::Rng;
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Ceiling on time spent talking to the scoring service
///
/// Callers pass each request the time they can still afford; the
/// emitter shares this single budget across all of one tick's pushes so
/// a hung service costs at most one tick interval, never one per call.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(3);

/// Fixed window the carbon query is normalized to, in kilometres
const CARBON_WINDOW_KM: f64 = 10.0;

/// Errors from one push attempt; always logged and discarded by the caller
#[derive(Debug, Error)]
pub enum PushError {
    /// Connection failure, timeout, or malformed response body
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with a non-2xx status
    #[error("scoring service returned {status} for {endpoint}")]
    Status {
        /// Endpoint path that was called
        endpoint: &'static str,
        /// HTTP status received
        status: StatusCode,
    },
}

/// Maintenance-risk query body
#[derive(Debug, Clone, Serialize)]
pub struct MaintenanceRequest {
    /// Vehicle identity
    #[serde(rename = "Vehicle_ID")]
    pub vehicle_id: VehicleId,
    /// Simulated usage hours accumulated this session
    #[serde(rename = "Usage_Hours")]
    pub usage_hours: f64,
    /// Cargo load estimate in tonnes
    #[serde(rename = "Actual_Load")]
    pub actual_load: f64,
    /// Engine temperature in degrees Celsius
    #[serde(rename = "Engine_Temperature")]
    pub engine_temperature: f64,
    /// Tire pressure in PSI
    #[serde(rename = "Tire_Pressure")]
    pub tire_pressure: f64,
    /// Consumption rate in L/100km
    #[serde(rename = "Fuel_Consumption")]
    pub fuel_consumption: f64,
    /// Battery charge in percent
    #[serde(rename = "Battery_Status")]
    pub battery_status: f64,
    /// Vibration index, 0-10
    #[serde(rename = "Vibration_Levels")]
    pub vibration_levels: f64,
    /// Oil quality, 0-100
    #[serde(rename = "Oil_Quality")]
    pub oil_quality: f64,
    /// Recorded past failures
    #[serde(rename = "Failure_History")]
    pub failure_history: u32,
    /// 1 when the current snapshot is anomalous
    #[serde(rename = "Anomalies_Detected")]
    pub anomalies_detected: u8,
    /// The model's documented prior, 0.0-1.0
    #[serde(rename = "Predictive_Score")]
    pub predictive_score: f64,
    /// Downtime hours; the simulator does not model downtime
    #[serde(rename = "Downtime_Maintenance")]
    pub downtime_maintenance: f64,
    /// Efficiency impact estimate; fixed placeholder
    #[serde(rename = "Impact_on_Efficiency")]
    pub impact_on_efficiency: f64,
    /// Inspected brake condition
    #[serde(rename = "Brake_Condition")]
    pub brake_condition: BrakeCondition,
    /// Current weather
    #[serde(rename = "Weather_Conditions")]
    pub weather_conditions: Weather,
    /// Current road type
    #[serde(rename = "Road_Conditions")]
    pub road_conditions: RoadType,
}

impl MaintenanceRequest {
    /// Build the query from one snapshot plus per-vehicle history
    ///
    /// `Actual_Load` is sampled fresh per request (the simulator does not
    /// model cargo), and the predictive score is the service's documented
    /// prior: `min(1.0, vibration/10 + (engine_temp - 80)/100)`.
    pub fn from_snapshot(
        snapshot: &Telemetry,
        state: &VehicleState,
        rng: &mut impl Rng,
    ) -> Self {
        let predictive_score =
            (snapshot.vibration / 10.0 + (snapshot.engine_temp_c - 80.0) / 100.0).min(1.0);
        Self {
            vehicle_id: snapshot.vehicle_id,
            usage_hours: state.usage_hours(),
            actual_load: rng.gen_range(3.0..8.0),
            engine_temperature: snapshot.engine_temp_c,
            tire_pressure: snapshot.tire_pressure_psi,
            fuel_consumption: snapshot.fuel_consumption_l100km,
            battery_status: snapshot.battery_pct,
            vibration_levels: snapshot.vibration,
            oil_quality: snapshot.oil_quality,
            failure_history: state.failure_history,
            anomalies_detected: u8::from(snapshot.anomaly_flag),
            predictive_score,
            downtime_maintenance: 0.0,
            impact_on_efficiency: 0.1,
            brake_condition: snapshot.brake_condition,
            weather_conditions: snapshot.weather,
            road_conditions: snapshot.road_type,
        }
    }
}

/// Risk label attached to a maintenance or driver-score response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskLevel {
    /// No action needed
    Low,
    /// Worth surfacing to the operator
    Medium,
    /// Needs attention
    High,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "LOW"),
            RiskLevel::Medium => write!(f, "MEDIUM"),
            RiskLevel::High => write!(f, "HIGH"),
        }
    }
}

/// Maintenance-risk response
#[derive(Debug, Clone, Deserialize)]
pub struct MaintenanceResponse {
    /// Risk label, when the service provides one
    #[serde(default)]
    pub risk_level: Option<String>,
    /// Raw failure probability, when the service provides one
    #[serde(default)]
    pub failure_probability: Option<f64>,
    /// Human-readable recommendation
    #[serde(default)]
    pub recommendation: Option<String>,
}

impl MaintenanceResponse {
    /// Resolve the risk label, deriving one from the probability with the
    /// preserved 0.75/0.45 cut-points when the label is absent
    pub fn resolved_risk(&self) -> Option<RiskLevel> {
        if let Some(label) = &self.risk_level {
            return match label.to_uppercase().as_str() {
                "HIGH" => Some(RiskLevel::High),
                "MEDIUM" => Some(RiskLevel::Medium),
                "LOW" => Some(RiskLevel::Low),
                _ => None,
            };
        }
        self.failure_probability.map(|p| {
            if p >= risk_thresholds::MAINTENANCE_HIGH {
                RiskLevel::High
            } else if p >= risk_thresholds::MAINTENANCE_MEDIUM {
                RiskLevel::Medium
            } else {
                RiskLevel::Low
            }
        })
    }
}

/// Carbon-tracking query body
#[derive(Debug, Clone, Serialize)]
pub struct CarbonRequest {
    /// Vehicle identity
    #[serde(rename = "Vehicle_ID")]
    pub vehicle_id: VehicleId,
    /// Fuel type string the model expects
    pub fuel_type: FuelType,
    /// Litres consumed over the normalized window
    pub fuel_litres: f64,
    /// Window length in kilometres
    pub distance_km: f64,
}

impl CarbonRequest {
    /// Normalize the snapshot's consumption rate to the fixed 10 km window
    pub fn from_snapshot(snapshot: &Telemetry) -> Self {
        Self {
            vehicle_id: snapshot.vehicle_id,
            fuel_type: snapshot.fuel_type,
            fuel_litres: round_dp(
                snapshot.fuel_consumption_l100km / 100.0 * CARBON_WINDOW_KM,
                3,
            ),
            distance_km: CARBON_WINDOW_KM,
        }
    }
}

/// Carbon-tracking response
#[derive(Debug, Clone, Deserialize)]
pub struct CarbonResponse {
    /// Estimated emissions for the window in kilograms
    #[serde(default)]
    pub co2_kg: Option<f64>,
}

impl CarbonResponse {
    /// Whether the estimate exceeds the fleet benchmark of 0.2 kg/km
    pub fn above_benchmark(&self, distance_km: f64) -> bool {
        match self.co2_kg {
            Some(kg) if distance_km > 0.0 => {
                kg / distance_km > risk_thresholds::CARBON_BENCHMARK_KG_PER_KM
            }
            _ => false,
        }
    }
}

/// Driver-score query body, sent once every 20 ticks per vehicle
#[derive(Debug, Clone, Serialize)]
pub struct DriverScoreRequest {
    /// Driver identity
    #[serde(rename = "Driver_ID")]
    pub driver_id: DriverId,
    /// Cumulative overspeed events
    pub overspeed_events: u64,
    /// Cumulative harsh braking events
    pub harsh_brake_events: u64,
    /// Cumulative harsh acceleration events
    pub harsh_accel_events: u64,
    /// Minutes of the current idle stretch
    pub idle_minutes: f64,
    /// Cumulative late deliveries
    pub late_deliveries: u64,
    /// Cumulative on-time deliveries
    pub on_time_deliveries: u64,
}

impl DriverScoreRequest {
    /// Build the query from cumulative per-vehicle counters
    pub fn from_state(snapshot: &Telemetry, state: &VehicleState) -> Self {
        Self {
            driver_id: state.driver_id,
            overspeed_events: state.overspeed_events,
            harsh_brake_events: state.harsh_brake_count,
            harsh_accel_events: state.harsh_accel_count,
            idle_minutes: snapshot.idle_since_min,
            late_deliveries: state.late_deliveries,
            on_time_deliveries: state.on_time_deliveries,
        }
    }
}

/// Driver-score response
#[derive(Debug, Clone, Deserialize)]
pub struct DriverScoreResponse {
    /// Score out of 100
    #[serde(default)]
    pub score: Option<f64>,
    /// Letter grade
    #[serde(default)]
    pub grade: Option<String>,
    /// Gamified badge label
    #[serde(default)]
    pub badge: Option<String>,
}

/// Blocking HTTP client for the scoring service
#[derive(Debug, Clone)]
pub struct ScoringClient {
    client: Client,
    endpoint: String,
}

impl ScoringClient {
    /// Create a client for the given endpoint (e.g. `http://localhost:8001`)
    pub fn new(endpoint: &str) -> Result<Self, PushError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { client, endpoint: endpoint.trim_end_matches('/').to_string() })
    }

    /// Query the maintenance-risk model
    pub fn predict_maintenance(
        &self,
        request: &MaintenanceRequest,
        timeout: Duration,
    ) -> Result<MaintenanceResponse, PushError> {
        self.post("/predict/maintenance", request, timeout)
    }

    /// Query the carbon-tracking model
    pub fn predict_carbon(
        &self,
        request: &CarbonRequest,
        timeout: Duration,
    ) -> Result<CarbonResponse, PushError> {
        self.post("/predict/carbon", request, timeout)
    }

    /// Query the driver-score model
    pub fn predict_driver_score(
        &self,
        request: &DriverScoreRequest,
        timeout: Duration,
    ) -> Result<DriverScoreResponse, PushError> {
        self.post("/predict/driver-score", request, timeout)
    }

    fn post<Req, Resp>(
        &self,
        path: &'static str,
        body: &Req,
        timeout: Duration,
    ) -> Result<Resp, PushError>
    where
        Req: Serialize,
        Resp: DeserializeOwned,
    {
        let url = format!("{}{}", self.endpoint, path);
        let response = self.client.post(url).timeout(timeout).json(body).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(PushError::Status { endpoint: path, status });
        }
        Ok(response.json()?)
    }
}
