//! Session configuration

use crate::alignment::DEFAULT_ALIGNMENT_TOLERANCE_DEG;
use crate::geo::{GeoPoint, KAABA};

/// Configuration injected into a `DirectionSession`
///
/// Usually built from the parameter store via
/// [`CompassParams::to_session_config`](crate::parameters::CompassParams::to_session_config).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SessionConfig {
    /// Destination the bearing points to
    pub target: GeoPoint,
    /// EMA filter alpha (0.0 = max smoothing, 1.0 = no filter)
    pub heading_filter_alpha: f64,
    /// Alignment tolerance in degrees
    pub alignment_tolerance_deg: f64,
    /// Consecutive agreeing evaluations before a published alignment flip
    pub alignment_hold: u32,
    /// Declination added to magnetic samples; `None` leaves them magnetic
    pub declination_deg: Option<f64>,
    /// Location fix timeout in milliseconds (enforced by the host runner)
    pub location_timeout_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            target: KAABA,
            heading_filter_alpha: 0.3,
            alignment_tolerance_deg: DEFAULT_ALIGNMENT_TOLERANCE_DEG,
            alignment_hold: 3,
            declination_deg: None,
            location_timeout_ms: 15_000,
        }
    }
}
