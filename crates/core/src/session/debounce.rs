//! Alignment debouncing
//!
//! The evaluator is stateless, so a heading hovering on the tolerance edge
//! would flip the indicator on every sample. The debouncer publishes a new
//! status only after it has been seen on `hold` consecutive evaluations.

use crate::alignment::{AlignmentState, AlignmentStatus};

/// Hold-count debouncer for the published alignment status
#[derive(Debug, Clone)]
pub struct AlignmentDebouncer {
    hold: u32,
    published: Option<AlignmentStatus>,
    streak: u32,
}

impl AlignmentDebouncer {
    /// Create a debouncer; `hold` below 1 is treated as 1 (no debouncing).
    pub fn new(hold: u32) -> Self {
        Self {
            hold: hold.max(1),
            published: None,
            streak: 0,
        }
    }

    /// Number of agreeing evaluations required to flip
    pub fn hold(&self) -> u32 {
        self.hold
    }

    /// Status currently published, if any
    pub fn published(&self) -> Option<AlignmentStatus> {
        self.published
    }

    /// Feed a raw evaluation; returns the state to publish.
    ///
    /// The offset is always the latest one; only the status is held back.
    pub fn update(&mut self, raw: AlignmentState) -> AlignmentState {
        let status = match self.published {
            None => {
                self.published = Some(raw.status);
                self.streak = 0;
                raw.status
            }
            Some(current) if current == raw.status => {
                self.streak = 0;
                current
            }
            Some(current) => {
                self.streak += 1;
                if self.streak >= self.hold {
                    self.published = Some(raw.status);
                    self.streak = 0;
                    raw.status
                } else {
                    current
                }
            }
        };

        AlignmentState {
            status,
            offset_deg: raw.offset_deg,
        }
    }

    /// Forget the published status (heading lost or session restarted)
    pub fn reset(&mut self) {
        self.published = None;
        self.streak = 0;
    }
}

impl Default for AlignmentDebouncer {
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aligned(offset: f64) -> AlignmentState {
        AlignmentState {
            status: AlignmentStatus::Aligned,
            offset_deg: offset,
        }
    }

    fn misaligned(offset: f64) -> AlignmentState {
        AlignmentState {
            status: AlignmentStatus::Misaligned,
            offset_deg: offset,
        }
    }

    #[test]
    fn test_first_evaluation_published_immediately() {
        let mut d = AlignmentDebouncer::new(3);
        assert_eq!(d.update(aligned(1.0)).status, AlignmentStatus::Aligned);
        assert_eq!(d.published(), Some(AlignmentStatus::Aligned));
    }

    #[test]
    fn test_flip_requires_hold_consecutive() {
        let mut d = AlignmentDebouncer::new(3);
        d.update(misaligned(20.0));

        let out = d.update(aligned(4.0));
        assert_eq!(out.status, AlignmentStatus::Misaligned);
        assert_eq!(out.offset_deg, 4.0);
        assert_eq!(d.update(aligned(3.0)).status, AlignmentStatus::Misaligned);
        assert_eq!(d.update(aligned(2.0)).status, AlignmentStatus::Aligned);
    }

    #[test]
    fn test_held_flip_keeps_status_with_latest_offset() {
        let mut d = AlignmentDebouncer::new(2);
        d.update(misaligned(20.0));

        // Offset is inside tolerance but the status has not flipped yet
        let held = d.update(aligned(4.0));
        assert_eq!(held.status, AlignmentStatus::Misaligned);
        assert_eq!(held.offset_deg, 4.0);

        let flipped = d.update(aligned(3.5));
        assert_eq!(flipped.status, AlignmentStatus::Aligned);
        assert_eq!(flipped.offset_deg, 3.5);
    }

    #[test]
    fn test_interrupted_streak_starts_over() {
        let mut d = AlignmentDebouncer::new(3);
        d.update(misaligned(20.0));
        d.update(aligned(4.9));
        d.update(aligned(4.9));
        // Back out before the third agreeing sample
        assert_eq!(d.update(misaligned(5.1)).status, AlignmentStatus::Misaligned);
        assert_eq!(d.update(aligned(4.9)).status, AlignmentStatus::Misaligned);
        assert_eq!(d.update(aligned(4.9)).status, AlignmentStatus::Misaligned);
        assert_eq!(d.update(aligned(4.9)).status, AlignmentStatus::Aligned);
    }

    #[test]
    fn test_hold_one_flips_immediately() {
        let mut d = AlignmentDebouncer::new(1);
        d.update(misaligned(20.0));
        assert_eq!(d.update(aligned(1.0)).status, AlignmentStatus::Aligned);
        assert_eq!(d.update(misaligned(9.0)).status, AlignmentStatus::Misaligned);
    }

    #[test]
    fn test_hold_zero_treated_as_one() {
        assert_eq!(AlignmentDebouncer::new(0).hold(), 1);
    }

    #[test]
    fn test_reset() {
        let mut d = AlignmentDebouncer::new(3);
        d.update(misaligned(20.0));
        d.reset();
        assert!(d.published().is_none());
        assert_eq!(d.update(aligned(1.0)).status, AlignmentStatus::Aligned);
    }
}
