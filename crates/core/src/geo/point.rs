//! Geographic point and bearing value types

use core::fmt;

use super::wrap_360;

/// Errors from geodesy calculations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeoError {
    /// Latitude/longitude is NaN, infinite, or outside its valid range
    InvalidCoordinate,
}

impl GeoError {
    /// Return variant name as a static string
    pub fn as_str(&self) -> &'static str {
        match self {
            GeoError::InvalidCoordinate => "InvalidCoordinate",
        }
    }
}

impl fmt::Display for GeoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeoError::InvalidCoordinate => write!(f, "invalid geographic coordinate"),
        }
    }
}

/// Geographic position in degrees (WGS84-style latitude/longitude)
///
/// Fields are public so fixtures can be written as literals; use
/// [`GeoPoint::new`] when the values come from outside and need checking.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeoPoint {
    /// Latitude in degrees (-90 to +90)
    pub latitude: f64,
    /// Longitude in degrees (-180 to +180)
    pub longitude: f64,
}

/// The Kaaba, Mecca (21.4225° N, 39.8262° E)
pub const KAABA: GeoPoint = GeoPoint {
    latitude: 21.4225,
    longitude: 39.8262,
};

impl GeoPoint {
    /// Create a validated point.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, GeoError> {
        let point = Self {
            latitude,
            longitude,
        };
        point.validate()?;
        Ok(point)
    }

    /// Check the latitude/longitude range invariant.
    pub fn validate(&self) -> Result<(), GeoError> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(GeoError::InvalidCoordinate)
        }
    }

    /// True if both components are finite and in range
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// Direction clockwise from true north, always in [0, 360)
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Default)]
pub struct Bearing(f64);

impl Bearing {
    /// Due north
    pub const NORTH: Bearing = Bearing(0.0);

    /// Create a bearing, wrapping any finite angle into [0, 360).
    ///
    /// Non-finite input maps to north; callers that can receive NaN from
    /// the outside reject it before getting here.
    pub fn new(degrees: f64) -> Self {
        if degrees.is_finite() {
            Bearing(wrap_360(degrees))
        } else {
            Bearing::NORTH
        }
    }

    /// Angle in degrees, [0, 360)
    pub fn degrees(self) -> f64 {
        self.0
    }

    /// Angle in radians, [0, 2π)
    pub fn radians(self) -> f64 {
        self.0.to_radians()
    }
}

impl fmt::Display for Bearing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}°", self.0)
    }
}
