//! Geodesy: great-circle bearing and distance on a spherical Earth
//!
//! Pure functions, double precision throughout. Inputs are validated so a
//! malformed coordinate fails with [`GeoError::InvalidCoordinate`] instead of
//! leaking NaN into the heading pipeline.

mod bearing;
mod point;

pub use bearing::{compute_bearing, compute_distance, wrap_180, wrap_360, EARTH_RADIUS_M};
pub use point::{Bearing, GeoError, GeoPoint, KAABA};
