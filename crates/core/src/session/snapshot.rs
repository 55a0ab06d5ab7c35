//! Session snapshot published to the presentation layer

use super::state::{SessionFailure, SessionPhase};
use crate::alignment::{relative_bearing, AlignmentState};
use crate::geo::{Bearing, GeoPoint};
use crate::heading::{SensorError, SmoothedHeading};

/// Everything the caller needs to render the compass, captured at once
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Snapshot {
    /// Lifecycle phase
    pub phase: SessionPhase,
    /// Device location, once the fix arrived
    pub location: Option<GeoPoint>,
    /// Great-circle bearing to the target, once the fix arrived
    pub target_bearing: Option<Bearing>,
    /// Great-circle distance to the target in meters
    pub distance_m: Option<f64>,
    /// Smoothed device heading, once a sample arrived
    pub heading: Option<SmoothedHeading>,
    /// Published (debounced) alignment, when bearing and heading are known.
    /// `offset_deg` is always the latest; `status` may lag it while a flip
    /// is held back.
    pub alignment: Option<AlignmentState>,
    /// Latest non-fatal sensor notice; cleared by the next good sample
    pub notice: Option<SensorError>,
    /// Why the location fix failed, in `LocationUnavailable`
    pub failure: Option<SessionFailure>,
    /// Sequence number of the last sample ingested
    pub sequence: Option<u64>,
}

impl Snapshot {
    /// Target direction relative to the device's nose, [0, 360)
    pub fn relative_bearing(&self) -> Option<Bearing> {
        match (self.target_bearing, self.heading) {
            (Some(target), Some(heading)) => Some(relative_bearing(target, heading.bearing)),
            _ => None,
        }
    }

    /// Sensor failure that left the session without a heading stream.
    ///
    /// `Some` only in `Ready` with an `Unavailable` or `StreamClosed` notice;
    /// a single bad reading does not count.
    pub fn heading_lost(&self) -> Option<SensorError> {
        match (self.phase, self.notice) {
            (
                SessionPhase::Ready,
                Some(error @ (SensorError::Unavailable | SensorError::StreamClosed)),
            ) => Some(error),
            _ => None,
        }
    }

    /// True when the published alignment is `Aligned`
    pub fn is_aligned(&self) -> bool {
        self.alignment.map(|a| a.is_aligned()).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heading::HeadingFrame;

    #[test]
    fn test_snapshot_default_is_idle_and_empty() {
        let s = Snapshot::default();
        assert_eq!(s.phase, SessionPhase::Idle);
        assert!(s.target_bearing.is_none());
        assert!(s.relative_bearing().is_none());
        assert!(!s.is_aligned());
    }

    #[test]
    fn test_heading_lost_only_when_stream_gone() {
        let lost = Snapshot {
            phase: SessionPhase::Ready,
            notice: Some(SensorError::StreamClosed),
            ..Snapshot::default()
        };
        assert_eq!(lost.heading_lost(), Some(SensorError::StreamClosed));

        let unavailable = Snapshot {
            notice: Some(SensorError::Unavailable),
            ..lost
        };
        assert_eq!(unavailable.heading_lost(), Some(SensorError::Unavailable));

        let bad_reading = Snapshot {
            phase: SessionPhase::Tracking,
            notice: Some(SensorError::InvalidReading),
            ..Snapshot::default()
        };
        assert!(bad_reading.heading_lost().is_none());

        let waiting = Snapshot {
            phase: SessionPhase::Ready,
            ..Snapshot::default()
        };
        assert!(waiting.heading_lost().is_none());
    }

    #[test]
    fn test_relative_bearing() {
        let s = Snapshot {
            target_bearing: Some(Bearing::new(58.5)),
            heading: Some(SmoothedHeading {
                bearing: Bearing::new(40.0),
                frame: HeadingFrame::True,
            }),
            ..Snapshot::default()
        };
        let rel = s.relative_bearing().unwrap();
        assert!((rel.degrees() - 18.5).abs() < 1e-9);
    }
}
