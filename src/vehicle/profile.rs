//! Vehicle profiles
//!
//! A profile is the immutable envelope a vehicle is created with: class,
//! speed ceiling, tank size, baseline consumption, and make. Chosen once
//! at actor start and never mutated.

use crate::types::FuelType;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Vehicle class tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VehicleClass {
    /// Heavy goods truck
    Truck,
    /// Passenger/cargo van
    Van,
    /// Light pickup
    Pickup,
    /// Compact delivery vehicle
    Mini,
    /// Liquid-cargo tanker
    Tanker,
}

impl fmt::Display for VehicleClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VehicleClass::Truck => write!(f, "Truck"),
            VehicleClass::Van => write!(f, "Van"),
            VehicleClass::Pickup => write!(f, "Pickup"),
            VehicleClass::Mini => write!(f, "Mini"),
            VehicleClass::Tanker => write!(f, "Tanker"),
        }
    }
}

/// Immutable performance envelope for one vehicle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehicleProfile {
    /// Vehicle class tag
    pub class: VehicleClass,
    /// Maximum attainable speed in km/h
    pub max_speed_kmh: f64,
    /// Fuel tank capacity in litres
    pub fuel_tank_l: f64,
    /// Baseline fuel consumption in litres per 100 km
    pub base_consumption_l100km: f64,
    /// Display name of the make and model
    pub make: &'static str,
}

/// The built-in fleet catalog
const CATALOG: [VehicleProfile; 5] = [
    VehicleProfile {
        class: VehicleClass::Truck,
        max_speed_kmh: 90.0,
        fuel_tank_l: 300.0,
        base_consumption_l100km: 14.0,
        make: "Tata Signa",
    },
    VehicleProfile {
        class: VehicleClass::Van,
        max_speed_kmh: 110.0,
        fuel_tank_l: 80.0,
        base_consumption_l100km: 10.5,
        make: "Force Traveller",
    },
    VehicleProfile {
        class: VehicleClass::Pickup,
        max_speed_kmh: 120.0,
        fuel_tank_l: 60.0,
        base_consumption_l100km: 9.0,
        make: "Mahindra Bolero",
    },
    VehicleProfile {
        class: VehicleClass::Mini,
        max_speed_kmh: 100.0,
        fuel_tank_l: 45.0,
        base_consumption_l100km: 7.5,
        make: "Maruti Eeco",
    },
    VehicleProfile {
        class: VehicleClass::Tanker,
        max_speed_kmh: 80.0,
        fuel_tank_l: 400.0,
        base_consumption_l100km: 18.0,
        make: "Ashok Leyland",
    },
];

impl VehicleProfile {
    /// All profiles vehicles can be created from
    pub fn catalog() -> &'static [VehicleProfile] {
        &CATALOG
    }

    /// Sample a random profile from the catalog
    pub fn sample(rng: &mut impl Rng) -> VehicleProfile {
        *CATALOG.choose(rng).expect("profile catalog is non-empty")
    }
}

/// Diesel share of the simulated fleet
const DIESEL_FLEET_SHARE: f64 = 0.8;

/// Sample a fuel type with the fleet's diesel/petrol mix
pub fn sample_fuel_type(rng: &mut impl Rng) -> FuelType {
    if rng.gen_bool(DIESEL_FLEET_SHARE) {
        FuelType::Diesel
    } else {
        FuelType::Petrol
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_catalog_has_five_profiles() {
        assert_eq!(VehicleProfile::catalog().len(), 5);
    }

    #[test]
    fn test_catalog_values_are_plausible() {
        for profile in VehicleProfile::catalog() {
            assert!(profile.max_speed_kmh >= 80.0 && profile.max_speed_kmh <= 120.0);
            assert!(profile.fuel_tank_l > 0.0);
            assert!(profile.base_consumption_l100km > 0.0);
            assert!(!profile.make.is_empty());
        }
    }

    #[test]
    fn test_sample_draws_from_catalog() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..20 {
            let profile = VehicleProfile::sample(&mut rng);
            assert!(VehicleProfile::catalog().contains(&profile));
        }
    }

    #[test]
    fn test_fleet_fuel_mix_is_mostly_diesel() {
        let mut rng = StdRng::seed_from_u64(2);
        let diesel = (0..1000)
            .filter(|_| sample_fuel_type(&mut rng) == FuelType::Diesel)
            .count();
        // 80% mix with generous slack for the sample size
        assert!(diesel > 700 && diesel < 900, "diesel count {}", diesel);
    }
}
