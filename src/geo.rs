//! Geodesic distance math.
//!
//! Point-to-point great-circle checks only; the engine never does
//! turn-by-turn routing.

use crate::model::Coordinates;

/// Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance between two points in kilometers.
///
/// Pure, no failure mode: invalid input propagates NaN and callers are
/// expected to validate coordinates.
pub fn distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Haversine distance between two coordinate records.
pub fn distance_between(a: &Coordinates, b: &Coordinates) -> f64 {
    distance_km(a.latitude, a.longitude, b.latitude, b.longitude)
}
