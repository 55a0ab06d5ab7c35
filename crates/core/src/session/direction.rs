//! Direction session state machine
//!
//! Owns the location fix, the cached target bearing, the heading filter and
//! the alignment debouncer. Inputs arrive as events (`start`, a location fix,
//! heading samples, sensor errors, `stop`); each honoured event yields exactly
//! one [`Snapshot`]. The session does no I/O: the host asks for the fix and
//! subscribes to the sensor according to [`SessionPhase::wants_heading`].

use super::config::SessionConfig;
use super::debounce::AlignmentDebouncer;
use super::snapshot::Snapshot;
use super::state::{LocationError, SessionError, SessionFailure, SessionPhase};
use crate::alignment::{evaluate_with_tolerance, AlignmentState};
use crate::geo::{compute_bearing, compute_distance, Bearing, GeoPoint};
use crate::heading::{HeadingFilter, HeadingFrame, HeadingSample, SensorError, SmoothedHeading};

/// Qibla direction session
#[derive(Debug, Clone)]
pub struct DirectionSession {
    config: SessionConfig,
    phase: SessionPhase,
    location: Option<GeoPoint>,
    target_bearing: Option<Bearing>,
    distance_m: Option<f64>,
    filter: HeadingFilter,
    heading: Option<SmoothedHeading>,
    alignment: Option<AlignmentState>,
    debouncer: AlignmentDebouncer,
    notice: Option<SensorError>,
    failure: Option<SessionFailure>,
    sequence: Option<u64>,
}

impl DirectionSession {
    /// Create an idle session
    pub fn new(config: SessionConfig) -> Self {
        Self {
            filter: HeadingFilter::new(config.heading_filter_alpha),
            debouncer: AlignmentDebouncer::new(config.alignment_hold),
            config,
            phase: SessionPhase::Idle,
            location: None,
            target_bearing: None,
            distance_m: None,
            heading: None,
            alignment: None,
            notice: None,
            failure: None,
            sequence: None,
        }
    }

    /// Configuration in use
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Current lifecycle phase
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Cached bearing to the target
    pub fn target_bearing(&self) -> Option<Bearing> {
        self.target_bearing
    }

    /// Current smoothed heading
    pub fn heading(&self) -> Option<SmoothedHeading> {
        self.heading
    }

    /// Current published alignment
    pub fn alignment(&self) -> Option<AlignmentState> {
        self.alignment
    }

    /// Capture the full state as one value
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.phase,
            location: self.location,
            target_bearing: self.target_bearing,
            distance_m: self.distance_m,
            heading: self.heading,
            alignment: self.alignment,
            notice: self.notice,
            failure: self.failure,
            sequence: self.sequence,
        }
    }

    /// Begin a session: `Idle → AwaitingLocation`.
    ///
    /// Also restarts a session that ended in `LocationUnavailable`.
    pub fn start(&mut self) -> Result<Snapshot, SessionError> {
        match self.phase {
            SessionPhase::Idle | SessionPhase::LocationUnavailable => {
                self.clear();
                self.phase = SessionPhase::AwaitingLocation;
                Ok(self.snapshot())
            }
            SessionPhase::Stopped => Err(SessionError::Stopped),
            SessionPhase::AwaitingLocation | SessionPhase::Ready | SessionPhase::Tracking => {
                Err(SessionError::AlreadyStarted)
            }
        }
    }

    /// Deliver the one-shot location result.
    ///
    /// Ignored (`Ok(None)`) outside `AwaitingLocation`. A fix with invalid
    /// coordinates moves the session to `LocationUnavailable` and is returned
    /// as an error so the fault is not mistaken for a plain failed fix.
    pub fn on_location_fix(
        &mut self,
        fix: Result<GeoPoint, LocationError>,
    ) -> Result<Option<Snapshot>, SessionError> {
        if self.phase != SessionPhase::AwaitingLocation {
            return Ok(None);
        }

        let point = match fix {
            Ok(point) => point,
            Err(error) => {
                self.phase = SessionPhase::LocationUnavailable;
                self.failure = Some(SessionFailure::from(error));
                return Ok(Some(self.snapshot()));
            }
        };

        let target = self.config.target;
        let bearing = compute_bearing(&point, &target).and_then(|bearing| {
            compute_distance(&point, &target).map(|distance| (bearing, distance))
        });

        match bearing {
            Ok((bearing, distance)) => {
                self.location = Some(point);
                self.target_bearing = Some(bearing);
                self.distance_m = Some(distance);
                self.phase = SessionPhase::Ready;
                Ok(Some(self.snapshot()))
            }
            Err(error) => {
                self.phase = SessionPhase::LocationUnavailable;
                self.failure = Some(SessionFailure::InvalidFix);
                Err(SessionError::Geo(error))
            }
        }
    }

    /// Deliver one heading sample, in arrival order.
    ///
    /// Returns `None` when the session is not tracking heading (including
    /// after `stop`).
    pub fn on_heading_sample(&mut self, sample: &HeadingSample) -> Option<Snapshot> {
        if !self.phase.wants_heading() {
            return None;
        }
        let target = self.target_bearing?;

        if let Err(error) = sample.validate() {
            return self.on_heading_error(error);
        }

        let sample = self.apply_declination(sample);
        let heading = self.filter.ingest(&sample);
        let raw = evaluate_with_tolerance(target, &heading, self.config.alignment_tolerance_deg);

        self.heading = Some(heading);
        self.alignment = Some(self.debouncer.update(raw));
        self.sequence = Some(sample.sequence);
        self.notice = None;
        self.phase = SessionPhase::Tracking;

        Some(self.snapshot())
    }

    /// Deliver a sensor failure. Never fatal: the target bearing stays.
    ///
    /// A bad single reading only raises the notice; a lost sensor also drops
    /// the heading and alignment and falls back to `Ready`.
    pub fn on_heading_error(&mut self, error: SensorError) -> Option<Snapshot> {
        if !self.phase.wants_heading() {
            return None;
        }

        self.notice = Some(error);
        match error {
            SensorError::InvalidReading => {}
            SensorError::Unavailable | SensorError::StreamClosed => {
                self.drop_heading();
                self.phase = SessionPhase::Ready;
            }
        }

        Some(self.snapshot())
    }

    /// Deactivate from any phase.
    ///
    /// Returns true if the heading subscription was live and must be
    /// released by the host.
    pub fn stop(&mut self) -> bool {
        let was_subscribed = self.phase.wants_heading();
        self.phase = SessionPhase::Stopped;
        self.drop_heading();
        self.notice = None;
        was_subscribed
    }

    /// Convert a magnetic sample to true north when a declination is set
    fn apply_declination(&self, sample: &HeadingSample) -> HeadingSample {
        match (sample.frame, self.config.declination_deg) {
            (HeadingFrame::Magnetic, Some(declination)) => HeadingSample {
                heading_deg: sample.heading_deg + declination,
                frame: HeadingFrame::True,
                ..*sample
            },
            _ => *sample,
        }
    }

    fn drop_heading(&mut self) {
        self.filter.reset();
        self.debouncer.reset();
        self.heading = None;
        self.alignment = None;
    }

    fn clear(&mut self) {
        self.drop_heading();
        self.location = None;
        self.target_bearing = None;
        self.distance_m = None;
        self.notice = None;
        self.failure = None;
        self.sequence = None;
    }
}

impl Default for DirectionSession {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}
