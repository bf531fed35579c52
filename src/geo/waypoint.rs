//! Waypoints and routes
//!
//! A waypoint is a named geographic location with fixed coordinates. The
//! registry is immutable, process-wide configuration: it is loaded once at
//! startup and only ever read afterwards, so actors share it without
//! synchronization.

use crate::geo::router::haversine_km;
use crate::simulation::error::{SimulationError, SimulationResult};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// A named geographic location usable as a route endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    /// Human-readable city name
    pub name: String,
    /// Latitude in decimal degrees
    pub lat: f64,
    /// Longitude in decimal degrees
    pub lon: f64,
}

impl Waypoint {
    /// Create a waypoint
    pub fn new(name: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self { name: name.into(), lat, lon }
    }
}

/// One leg of a vehicle's journey between two waypoints
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    /// Leg origin
    pub origin: Waypoint,
    /// Leg destination
    pub destination: Waypoint,
    /// Great-circle length of the leg in kilometres
    pub total_km: f64,
}

impl Route {
    /// Build a route between two waypoints, computing its length
    pub fn new(origin: Waypoint, destination: Waypoint) -> Self {
        let total_km = haversine_km(&origin, &destination);
        Self { origin, destination, total_km }
    }
}

/// Immutable registry of all route endpoints known to the simulation
#[derive(Debug, Clone)]
pub struct WaypointRegistry {
    waypoints: Vec<Waypoint>,
}

impl WaypointRegistry {
    /// Create a registry from an explicit waypoint list
    pub fn new(waypoints: Vec<Waypoint>) -> Self {
        Self { waypoints }
    }

    /// The built-in Indian city network the fleet operates on
    pub fn india_default() -> Self {
        Self {
            waypoints: vec![
                Waypoint::new("Mumbai", 19.0760, 72.8777),
                Waypoint::new("Delhi", 28.6139, 77.2090),
                Waypoint::new("Bangalore", 12.9716, 77.5946),
                Waypoint::new("Hyderabad", 17.3850, 78.4867),
                Waypoint::new("Chennai", 13.0827, 80.2707),
                Waypoint::new("Kolkata", 22.5726, 88.3639),
                Waypoint::new("Pune", 18.5204, 73.8567),
                Waypoint::new("Ahmedabad", 23.0225, 72.5714),
                Waypoint::new("Surat", 21.1702, 72.8311),
                Waypoint::new("Jaipur", 26.9124, 75.7873),
                Waypoint::new("Lucknow", 26.8467, 80.9462),
                Waypoint::new("Nagpur", 21.1458, 79.0882),
            ],
        }
    }

    /// Number of registered waypoints
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Look up a waypoint by name
    pub fn get(&self, name: &str) -> Option<&Waypoint> {
        self.waypoints.iter().find(|w| w.name == name)
    }

    /// Pick a fresh route with a random origin and a distinct destination
    pub fn random_route(&self, rng: &mut impl Rng) -> SimulationResult<Route> {
        let origin = self
            .waypoints
            .choose(rng)
            .cloned()
            .ok_or_else(|| SimulationError::route_error("waypoint registry is empty"))?;
        self.next_leg(&origin, rng)
    }

    /// Pick the next leg from the given origin to a distinct destination
    pub fn next_leg(&self, origin: &Waypoint, rng: &mut impl Rng) -> SimulationResult<Route> {
        let candidates: Vec<&Waypoint> =
            self.waypoints.iter().filter(|w| w.name != origin.name).collect();
        let destination = candidates.choose(rng).copied().cloned().ok_or_else(|| {
            SimulationError::route_error(format!(
                "no destination reachable from '{}' in a registry of {} waypoints",
                origin.name,
                self.waypoints.len()
            ))
        })?;
        Ok(Route::new(origin.clone(), destination))
    }
}
