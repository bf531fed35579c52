//! Great-circle distance and route position interpolation
//!
//! Pure geometry over the waypoint registry: haversine distance on a
//! spherical Earth, and linear position interpolation along a leg with a
//! small random jitter so repeated ticks do not trace a perfectly straight
//! line.

use crate::geo::waypoint::{Route, Waypoint};
use rand::Rng;

/// Mean Earth radius in kilometres (spherical model)
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Uniform jitter applied independently to each interpolated axis, in degrees
pub const POSITION_JITTER_DEG: f64 = 0.005;

/// Great-circle distance between two waypoints in kilometres
pub fn haversine_km(a: &Waypoint, b: &Waypoint) -> f64 {
    let phi1 = a.lat.to_radians();
    let phi2 = b.lat.to_radians();
    let d_phi = (b.lat - a.lat).to_radians();
    let d_lambda = (b.lon - a.lon).to_radians();

    let h = (d_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    EARTH_RADIUS_KM * 2.0 * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Current GPS coordinate along a route leg
///
/// Blends origin and destination linearly by `progress` (0.0 at the origin,
/// 1.0 at the destination) and adds independent uniform jitter of
/// ±[`POSITION_JITTER_DEG`] to each axis. Returns `(lat, lon)` rounded to
/// six decimal places.
pub fn interpolated_position(route: &Route, progress: f64, rng: &mut impl Rng) -> (f64, f64) {
    let t = progress.clamp(0.0, 1.0);
    let lat = route.origin.lat
        + (route.destination.lat - route.origin.lat) * t
        + rng.gen_range(-POSITION_JITTER_DEG..POSITION_JITTER_DEG);
    let lon = route.origin.lon
        + (route.destination.lon - route.origin.lon) * t
        + rng.gen_range(-POSITION_JITTER_DEG..POSITION_JITTER_DEG);
    (round6(lat), round6(lon))
}

fn round6(value: f64) -> f64 {
    (value * 1_000_000.0).round() / 1_000_000.0
}
