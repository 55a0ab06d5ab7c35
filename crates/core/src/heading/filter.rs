//! Heading exponential moving average (EMA) filter
//!
//! Provides angle-aware smoothing to reduce magnetometer jitter in compass
//! readings before they reach the alignment evaluator.

use libm::fabs;

use super::sample::{HeadingSample, SmoothedHeading};
use crate::geo::{wrap_180, wrap_360, Bearing};

/// Residual (degrees) below which the estimate snaps onto the sample.
///
/// Makes a constant input converge in a bounded number of steps and then
/// hold exactly, instead of creeping toward it forever.
pub const SNAP_THRESHOLD_DEG: f64 = 0.01;

/// Exponential moving average filter for heading values.
///
/// Handles angle wrapping correctly (e.g., 350° → 10° transitions)
/// using shortest-path interpolation.
///
/// # Configuration
/// - `alpha = 1.0`: no filtering (pass-through)
/// - `alpha = 0.3`: moderate smoothing (default)
/// - `alpha = 0.0`: maximum smoothing (holds first heading indefinitely)
///
/// The filter never converts between magnetic and true north. A sample in a
/// different frame from the current estimate restarts the filter from that
/// sample, so the two references are never blended.
#[derive(Debug, Clone)]
pub struct HeadingFilter {
    alpha: f64,
    estimate: Option<SmoothedHeading>,
}

impl HeadingFilter {
    /// Create a new HeadingFilter with the given smoothing factor.
    ///
    /// Alpha is clamped to [0.0, 1.0]; NaN falls back to pass-through.
    pub fn new(alpha: f64) -> Self {
        let alpha = if alpha.is_nan() {
            1.0
        } else {
            alpha.clamp(0.0, 1.0)
        };
        Self {
            alpha,
            estimate: None,
        }
    }

    /// Smoothing factor in use
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Current estimate, `None` until the first sample
    pub fn current(&self) -> Option<SmoothedHeading> {
        self.estimate
    }

    /// Feed one sample and return the updated estimate.
    ///
    /// The first sample (and the first after a reset or frame change) is
    /// returned unchanged.
    pub fn ingest(&mut self, sample: &HeadingSample) -> SmoothedHeading {
        let raw = sample.bearing();

        let next = match self.estimate {
            Some(prev) if prev.frame == sample.frame => {
                let prev_deg = prev.degrees();
                // Angle-aware interpolation via shortest path
                let diff = wrap_180(raw.degrees() - prev_deg);
                let step = self.alpha * diff;
                let degrees = if self.alpha > 0.0 && fabs(diff - step) < SNAP_THRESHOLD_DEG {
                    raw.degrees()
                } else {
                    wrap_360(prev_deg + step)
                };
                SmoothedHeading {
                    bearing: Bearing::new(degrees),
                    frame: sample.frame,
                }
            }
            _ => SmoothedHeading {
                bearing: raw,
                frame: sample.frame,
            },
        };

        self.estimate = Some(next);
        next
    }

    /// Reset the filter state, clearing the previous heading.
    pub fn reset(&mut self) {
        self.estimate = None;
    }
}

impl Default for HeadingFilter {
    fn default() -> Self {
        Self::new(0.3)
    }
}
