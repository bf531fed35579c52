//! Geography: waypoints, routes, and great-circle math

pub mod router;
pub mod waypoint;

pub use router::{haversine_km, interpolated_position, EARTH_RADIUS_KM, POSITION_JITTER_DEG};
pub use waypoint::{Route, Waypoint, WaypointRegistry};
