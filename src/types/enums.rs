//! Enumeration types for the fleet telemetry simulator
//!
//! Discrete environment and vehicle attributes shared across the state
//! transition, the classifier, and both emission sinks. Serde renderings
//! match the categorical strings the scoring service was trained on
//! ("Clear", "Highway", "Good", ...).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Weather conditions affecting fuel consumption
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Weather {
    /// Clear skies, no consumption penalty
    Clear,
    /// Rain, wet-road consumption penalty applies
    Rain,
    /// Fog, same penalty as rain
    Fog,
    /// Overcast, no consumption penalty
    Cloudy,
}

impl Weather {
    /// All weather states a vehicle can drift between
    pub const ALL: [Weather; 4] = [Weather::Clear, Weather::Rain, Weather::Fog, Weather::Cloudy];

    /// Multiplier applied to the baseline fuel consumption rate
    pub fn consumption_penalty(self) -> f64 {
        match self {
            Weather::Rain | Weather::Fog => 1.1,
            Weather::Clear | Weather::Cloudy => 1.0,
        }
    }
}

impl fmt::Display for Weather {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Weather::Clear => write!(f, "Clear"),
            Weather::Rain => write!(f, "Rain"),
            Weather::Fog => write!(f, "Fog"),
            Weather::Cloudy => write!(f, "Cloudy"),
        }
    }
}

impl FromStr for Weather {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "clear" => Ok(Weather::Clear),
            "rain" => Ok(Weather::Rain),
            "fog" => Ok(Weather::Fog),
            "cloudy" => Ok(Weather::Cloudy),
            _ => Err(format!("Unknown weather: {}", s)),
        }
    }
}

/// Road type the vehicle is currently travelling on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoadType {
    /// Open highway, full speed envelope
    Highway,
    /// City streets, heavily capped speed
    Urban,
    /// Country roads
    Rural,
}

impl RoadType {
    /// All road types a vehicle can drift between
    pub const ALL: [RoadType; 3] = [RoadType::Highway, RoadType::Urban, RoadType::Rural];

    /// Fraction of the profile's maximum speed attainable on this road type
    pub fn speed_cap(self) -> f64 {
        match self {
            RoadType::Highway => 1.0,
            RoadType::Urban => 0.4,
            RoadType::Rural => 0.7,
        }
    }
}

impl fmt::Display for RoadType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoadType::Highway => write!(f, "Highway"),
            RoadType::Urban => write!(f, "Urban"),
            RoadType::Rural => write!(f, "Rural"),
        }
    }
}

impl FromStr for RoadType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "highway" => Ok(RoadType::Highway),
            "urban" => Ok(RoadType::Urban),
            "rural" => Ok(RoadType::Rural),
            _ => Err(format!("Unknown road type: {}", s)),
        }
    }
}

/// Fuel type, which determines the CO2 emission factor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FuelType {
    /// Diesel engine (the bulk of the fleet)
    Diesel,
    /// Petrol engine
    Petrol,
}

impl FuelType {
    /// Kilograms of CO2 emitted per litre of fuel burned
    pub fn emission_factor_kg_per_l(self) -> f64 {
        match self {
            FuelType::Diesel => 2.68,
            FuelType::Petrol => 2.31,
        }
    }
}

impl fmt::Display for FuelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FuelType::Diesel => write!(f, "diesel"),
            FuelType::Petrol => write!(f, "petrol"),
        }
    }
}

impl FromStr for FuelType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "diesel" => Ok(FuelType::Diesel),
            "petrol" => Ok(FuelType::Petrol),
            _ => Err(format!("Unknown fuel type: {}", s)),
        }
    }
}

/// Inspected brake condition, fixed at vehicle creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BrakeCondition {
    /// Recently serviced
    Good,
    /// Serviceable but worn
    Fair,
    /// Due for replacement
    Poor,
}

impl fmt::Display for BrakeCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BrakeCondition::Good => write!(f, "Good"),
            BrakeCondition::Fair => write!(f, "Fair"),
            BrakeCondition::Poor => write!(f, "Poor"),
        }
    }
}

impl FromStr for BrakeCondition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "good" => Ok(BrakeCondition::Good),
            "fair" => Ok(BrakeCondition::Fair),
            "poor" => Ok(BrakeCondition::Poor),
            _ => Err(format!("Unknown brake condition: {}", s)),
        }
    }
}

/// Derived engine health classification for one telemetry snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EngineStatus {
    /// All readings within normal operating ranges
    Ok,
    /// At least one reading approaching a critical threshold
    Warning,
    /// At least one reading past a critical threshold
    Critical,
}

impl fmt::Display for EngineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineStatus::Ok => write!(f, "OK"),
            EngineStatus::Warning => write!(f, "WARNING"),
            EngineStatus::Critical => write!(f, "CRITICAL"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_road_type_speed_caps() {
        assert_eq!(RoadType::Highway.speed_cap(), 1.0);
        assert_eq!(RoadType::Urban.speed_cap(), 0.4);
        assert_eq!(RoadType::Rural.speed_cap(), 0.7);
    }

    #[test]
    fn test_weather_consumption_penalty() {
        assert_eq!(Weather::Rain.consumption_penalty(), 1.1);
        assert_eq!(Weather::Fog.consumption_penalty(), 1.1);
        assert_eq!(Weather::Clear.consumption_penalty(), 1.0);
        assert_eq!(Weather::Cloudy.consumption_penalty(), 1.0);
    }

    #[test]
    fn test_fuel_emission_factors() {
        assert_eq!(FuelType::Diesel.emission_factor_kg_per_l(), 2.68);
        assert_eq!(FuelType::Petrol.emission_factor_kg_per_l(), 2.31);
    }

    #[test]
    fn test_engine_status_display() {
        assert_eq!(EngineStatus::Ok.to_string(), "OK");
        assert_eq!(EngineStatus::Warning.to_string(), "WARNING");
        assert_eq!(EngineStatus::Critical.to_string(), "CRITICAL");
    }

    #[test]
    fn test_fuel_type_serde_lowercase() {
        assert_eq!(serde_json::to_string(&FuelType::Diesel).unwrap(), "\"diesel\"");
        assert_eq!("petrol".parse::<FuelType>().unwrap(), FuelType::Petrol);
    }

    #[test]
    fn test_from_str_rejects_unknown() {
        assert!("sleet".parse::<Weather>().is_err());
        assert!("gravel".parse::<RoadType>().is_err());
        assert!("hydrogen".parse::<FuelType>().is_err());
    }
}
