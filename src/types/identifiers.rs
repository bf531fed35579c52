//! Identifier types for the fleet telemetry simulator
//!
//! Vehicles and drivers are identified by small fixed fleet indices that
//! render as `V-1003` / `D-203`, matching the identifiers the scoring
//! service and downstream log consumers expect.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Base offset added to a vehicle's fleet index when formatting its id.
const VEHICLE_ID_BASE: u32 = 1000;

/// Base offset added to a driver's fleet index when formatting their id.
const DRIVER_ID_BASE: u32 = 200;

/// Unique identifier for a simulated vehicle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VehicleId(pub u32);

impl VehicleId {
    /// Create a vehicle id from a zero-based fleet index
    pub fn from_index(index: u32) -> Self {
        Self(VEHICLE_ID_BASE + index)
    }
}

impl fmt::Display for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "V-{}", self.0)
    }
}

impl Serialize for VehicleId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for VehicleId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let digits = s.strip_prefix("V-").unwrap_or(&s);
        let value = digits.parse::<u32>().map_err(serde::de::Error::custom)?;
        Ok(VehicleId(value))
    }
}

/// Unique identifier for the driver assigned to a vehicle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DriverId(pub u32);

impl DriverId {
    /// Create a driver id from a zero-based fleet index
    pub fn from_index(index: u32) -> Self {
        Self(DRIVER_ID_BASE + index)
    }
}

impl fmt::Display for DriverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "D-{}", self.0)
    }
}

impl Serialize for DriverId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for DriverId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let digits = s.strip_prefix("D-").unwrap_or(&s);
        let value = digits.parse::<u32>().map_err(serde::de::Error::custom)?;
        Ok(DriverId(value))
    }
}
