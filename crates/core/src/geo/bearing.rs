//! Initial bearing, haversine distance and angle wrapping

use libm::{atan2, cos, sin, sqrt};

use super::point::{Bearing, GeoError, GeoPoint};

/// Mean Earth radius in meters
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Initial great-circle bearing from `origin` to `target`.
///
/// Uses the spherical forward-azimuth formula with Δlon = target − origin.
/// Coincident points have no defined bearing; they return north.
pub fn compute_bearing(origin: &GeoPoint, target: &GeoPoint) -> Result<Bearing, GeoError> {
    origin.validate()?;
    target.validate()?;

    if same_position(origin, target) {
        return Ok(Bearing::NORTH);
    }

    let lat1 = origin.latitude.to_radians();
    let lat2 = target.latitude.to_radians();
    let delta_lon = (target.longitude - origin.longitude).to_radians();

    let y = sin(delta_lon) * cos(lat2);
    let x = cos(lat1) * sin(lat2) - sin(lat1) * cos(lat2) * cos(delta_lon);
    let theta = atan2(y, x).to_degrees();

    Ok(Bearing::new(theta))
}

/// Great-circle distance in meters (haversine).
pub fn compute_distance(origin: &GeoPoint, target: &GeoPoint) -> Result<f64, GeoError> {
    origin.validate()?;
    target.validate()?;

    let lat1 = origin.latitude.to_radians();
    let lat2 = target.latitude.to_radians();
    let delta_lat = (target.latitude - origin.latitude).to_radians();
    let delta_lon = (target.longitude - origin.longitude).to_radians();

    let sin_dlat = sin(delta_lat / 2.0);
    let sin_dlon = sin(delta_lon / 2.0);
    let a = sin_dlat * sin_dlat + cos(lat1) * cos(lat2) * sin_dlon * sin_dlon;
    // Rounding can push `a` a hair past 1.0 for near-antipodal pairs
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * atan2(sqrt(a), sqrt(1.0 - a));

    Ok(EARTH_RADIUS_M * c)
}

/// Wrap an angle into [0, 360).
pub fn wrap_360(degrees: f64) -> f64 {
    let mut a = degrees % 360.0;
    if a < 0.0 {
        a += 360.0;
    }
    // -1e-15 + 360.0 rounds to 360.0
    if a >= 360.0 {
        a -= 360.0;
    }
    a
}

/// Wrap an angle into (-180, 180].
pub fn wrap_180(degrees: f64) -> f64 {
    let a = wrap_360(degrees);
    if a > 180.0 {
        a - 360.0
    } else {
        a
    }
}

/// Same physical location, including the ±180° meridian and the poles.
fn same_position(a: &GeoPoint, b: &GeoPoint) -> bool {
    if a.latitude != b.latitude {
        return false;
    }
    if a.latitude == 90.0 || a.latitude == -90.0 {
        return true;
    }
    wrap_360(a.longitude) == wrap_360(b.longitude)
}
