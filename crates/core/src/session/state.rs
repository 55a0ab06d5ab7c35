//! Session phase and error types

use core::fmt;

use crate::geo::GeoError;

/// Direction session lifecycle
///
/// ```text
/// Idle ──start──▶ AwaitingLocation ──fix──▶ Ready ──sample──▶ Tracking
///                        │                    ▲                  │
///                        │ error              └── sensor down ───┘
///                        ▼
///                 LocationUnavailable ──start (restart)──▶ AwaitingLocation
///
/// any ──stop──▶ Stopped (terminal)
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SessionPhase {
    /// Created, not started
    #[default]
    Idle,
    /// Waiting for the one-shot location fix
    AwaitingLocation,
    /// Target bearing known, no heading yet (or sensor down)
    Ready,
    /// Bearing, heading and alignment all live
    Tracking,
    /// Location fix failed; terminal until the caller restarts
    LocationUnavailable,
    /// Deactivated; terminal
    Stopped,
}

impl SessionPhase {
    /// Return variant name as a static string
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionPhase::Idle => "Idle",
            SessionPhase::AwaitingLocation => "AwaitingLocation",
            SessionPhase::Ready => "Ready",
            SessionPhase::Tracking => "Tracking",
            SessionPhase::LocationUnavailable => "LocationUnavailable",
            SessionPhase::Stopped => "Stopped",
        }
    }

    /// Phases in which the heading stream should be subscribed
    pub fn wants_heading(&self) -> bool {
        matches!(self, SessionPhase::Ready | SessionPhase::Tracking)
    }
}

/// Failures reported by the location collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationError {
    /// The user or platform denied location access
    PermissionDenied,
    /// No fix could be produced
    Unavailable,
    /// No fix within the configured timeout
    Timeout,
}

impl LocationError {
    /// Return variant name as a static string
    pub fn as_str(&self) -> &'static str {
        match self {
            LocationError::PermissionDenied => "PermissionDenied",
            LocationError::Unavailable => "Unavailable",
            LocationError::Timeout => "Timeout",
        }
    }
}

impl fmt::Display for LocationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocationError::PermissionDenied => write!(f, "location permission denied"),
            LocationError::Unavailable => write!(f, "location unavailable"),
            LocationError::Timeout => write!(f, "location request timed out"),
        }
    }
}

/// Why a session ended up in `LocationUnavailable`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionFailure {
    /// Location permission was refused
    PermissionDenied,
    /// The fix request failed or timed out
    LocationFailed(LocationError),
    /// The collaborator returned a coordinate outside the valid range
    InvalidFix,
}

impl From<LocationError> for SessionFailure {
    fn from(error: LocationError) -> Self {
        match error {
            LocationError::PermissionDenied => SessionFailure::PermissionDenied,
            other => SessionFailure::LocationFailed(other),
        }
    }
}

impl fmt::Display for SessionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionFailure::PermissionDenied => write!(f, "location permission denied"),
            SessionFailure::LocationFailed(cause) => write!(f, "location failed: {}", cause),
            SessionFailure::InvalidFix => write!(f, "location fix has invalid coordinates"),
        }
    }
}

/// Errors returned by session operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    /// `start` called while a session is already running
    AlreadyStarted,
    /// Operation on a stopped session
    Stopped,
    /// Bearing computation rejected the fix
    Geo(GeoError),
}

impl From<GeoError> for SessionError {
    fn from(error: GeoError) -> Self {
        SessionError::Geo(error)
    }
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::AlreadyStarted => write!(f, "session already started"),
            SessionError::Stopped => write!(f, "session stopped"),
            SessionError::Geo(e) => write!(f, "{}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_phase_default() {
        assert_eq!(SessionPhase::default(), SessionPhase::Idle);
    }

    #[test]
    fn test_wants_heading() {
        assert!(SessionPhase::Ready.wants_heading());
        assert!(SessionPhase::Tracking.wants_heading());
        assert!(!SessionPhase::Idle.wants_heading());
        assert!(!SessionPhase::AwaitingLocation.wants_heading());
        assert!(!SessionPhase::LocationUnavailable.wants_heading());
        assert!(!SessionPhase::Stopped.wants_heading());
    }

    #[test]
    fn test_failure_from_location_error() {
        assert_eq!(
            SessionFailure::from(LocationError::PermissionDenied),
            SessionFailure::PermissionDenied
        );
        assert_eq!(
            SessionFailure::from(LocationError::Timeout),
            SessionFailure::LocationFailed(LocationError::Timeout)
        );
        assert_eq!(
            SessionFailure::from(LocationError::Unavailable),
            SessionFailure::LocationFailed(LocationError::Unavailable)
        );
    }

    #[test]
    fn test_display() {
        extern crate std;
        use std::format;
        assert_eq!(
            format!("{}", SessionFailure::LocationFailed(LocationError::Timeout)),
            "location failed: location request timed out"
        );
        assert_eq!(
            format!("{}", SessionError::Geo(GeoError::InvalidCoordinate)),
            "invalid geographic coordinate"
        );
        assert_eq!(SessionPhase::Tracking.as_str(), "Tracking");
    }
}
