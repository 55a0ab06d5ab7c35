//! Alignment evaluator
//!
//! Compares the target bearing with the smoothed device heading. Pure and
//! stateless: identical inputs always give the identical classification.
//! Flicker suppression lives in the session's debouncer, not here.

use libm::fabs;

use crate::geo::{wrap_180, Bearing};
use crate::heading::SmoothedHeading;

/// Default alignment tolerance in degrees
pub const DEFAULT_ALIGNMENT_TOLERANCE_DEG: f64 = 5.0;

/// Whether the device points at the target
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AlignmentStatus {
    /// |offset| below tolerance
    Aligned,
    /// |offset| at or beyond tolerance
    Misaligned,
}

impl AlignmentStatus {
    /// Return variant name as a static string
    pub fn as_str(&self) -> &'static str {
        match self {
            AlignmentStatus::Aligned => "Aligned",
            AlignmentStatus::Misaligned => "Misaligned",
        }
    }
}

/// Classification plus the offset it was computed from.
///
/// Straight from [`evaluate`] the status always matches the offset. After the
/// session's debouncer a held-back flip keeps the previous status while the
/// offset is already the latest one, so a published `Misaligned` can carry an
/// offset inside the tolerance (and vice versa) for up to `hold - 1` samples.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AlignmentState {
    /// Aligned / misaligned
    pub status: AlignmentStatus,
    /// Target minus heading, in (-180, 180]. Positive means turn clockwise.
    pub offset_deg: f64,
}

impl AlignmentState {
    /// True when `status` is `Aligned`
    pub fn is_aligned(&self) -> bool {
        self.status == AlignmentStatus::Aligned
    }
}

/// Evaluate with the default 5° tolerance.
pub fn evaluate(target: Bearing, heading: &SmoothedHeading) -> AlignmentState {
    evaluate_with_tolerance(target, heading, DEFAULT_ALIGNMENT_TOLERANCE_DEG)
}

/// Evaluate against an explicit tolerance (degrees).
pub fn evaluate_with_tolerance(
    target: Bearing,
    heading: &SmoothedHeading,
    tolerance_deg: f64,
) -> AlignmentState {
    let offset_deg = signed_offset(target, heading.bearing);
    let status = if fabs(offset_deg) < tolerance_deg {
        AlignmentStatus::Aligned
    } else {
        AlignmentStatus::Misaligned
    };
    AlignmentState { status, offset_deg }
}

/// Target minus heading, normalized to (-180, 180].
pub fn signed_offset(target: Bearing, heading: Bearing) -> f64 {
    wrap_180(target.degrees() - heading.degrees())
}

/// Where the target sits relative to the device's nose, [0, 360).
pub fn relative_bearing(target: Bearing, heading: Bearing) -> Bearing {
    Bearing::new(target.degrees() - heading.degrees())
}
