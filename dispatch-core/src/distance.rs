//! Great-circle distance between geographic points.
//!
//! Coordinates are WGS84 decimal degrees with `x = longitude` and
//! `y = latitude`, matching the rest of the crate.

use geo::Coord;

/// Mean Earth radius used by [`haversine_km`], in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Return the haversine distance between two points in kilometres.
///
/// The result is symmetric and `0.0` for identical points.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use dispatch_core::distance::haversine_km;
///
/// let new_york = Coord { x: -74.0060, y: 40.7128 };
/// let london = Coord { x: -0.1278, y: 51.5074 };
/// let km = haversine_km(new_york, london);
/// assert!(km > 5500.0 && km < 5650.0);
/// ```
#[must_use]
pub fn haversine_km(from: Coord<f64>, to: Coord<f64>) -> f64 {
    let from_lat = from.y.to_radians();
    let to_lat = to.y.to_radians();
    let delta_lat = (to.y - from.y).to_radians();
    let delta_lon = (to.x - from.x).to_radians();

    let half_chord = (delta_lat / 2.0).sin().powi(2)
        + from_lat.cos() * to_lat.cos() * (delta_lon / 2.0).sin().powi(2);
    let angle = 2.0 * half_chord.sqrt().atan2((1.0 - half_chord).sqrt());

    EARTH_RADIUS_KM * angle
}
