//! Heading sample types

use core::fmt;

use crate::geo::Bearing;

/// North reference a heading is measured against
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HeadingFrame {
    /// Magnetic north (raw magnetometer)
    Magnetic,
    /// True (geographic) north
    True,
}

impl HeadingFrame {
    /// Return variant name as a static string
    pub fn as_str(&self) -> &'static str {
        match self {
            HeadingFrame::Magnetic => "magnetic",
            HeadingFrame::True => "true",
        }
    }
}

/// Heading sensor failures, reported to the caller as non-fatal notices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// No heading hardware, or the platform refused the subscription
    Unavailable,
    /// Sample carried a NaN/infinite heading
    InvalidReading,
    /// The sample stream ended
    StreamClosed,
}

impl SensorError {
    /// Return variant name as a static string
    pub fn as_str(&self) -> &'static str {
        match self {
            SensorError::Unavailable => "Unavailable",
            SensorError::InvalidReading => "InvalidReading",
            SensorError::StreamClosed => "StreamClosed",
        }
    }
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SensorError::Unavailable => write!(f, "heading sensor unavailable"),
            SensorError::InvalidReading => write!(f, "invalid heading reading"),
            SensorError::StreamClosed => write!(f, "heading stream closed"),
        }
    }
}

/// One raw reading from the heading sensor
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeadingSample {
    /// Heading in degrees clockwise from the frame's north
    pub heading_deg: f64,
    /// Reference frame of `heading_deg`
    pub frame: HeadingFrame,
    /// Monotonic sequence number assigned by the producer
    pub sequence: u64,
    /// Producer timestamp (microseconds, producer's clock)
    pub timestamp_us: u64,
}

impl HeadingSample {
    /// Create a sample with zero timestamp
    pub fn new(heading_deg: f64, frame: HeadingFrame, sequence: u64) -> Self {
        Self {
            heading_deg,
            frame,
            sequence,
            timestamp_us: 0,
        }
    }

    /// Create a true-north sample
    pub fn true_north(heading_deg: f64, sequence: u64) -> Self {
        Self::new(heading_deg, HeadingFrame::True, sequence)
    }

    /// Create a magnetic-north sample
    pub fn magnetic(heading_deg: f64, sequence: u64) -> Self {
        Self::new(heading_deg, HeadingFrame::Magnetic, sequence)
    }

    /// Attach a producer timestamp
    pub fn at(mut self, timestamp_us: u64) -> Self {
        self.timestamp_us = timestamp_us;
        self
    }

    /// Reject readings the filter cannot use
    pub fn validate(&self) -> Result<(), SensorError> {
        if self.heading_deg.is_finite() {
            Ok(())
        } else {
            Err(SensorError::InvalidReading)
        }
    }

    /// Heading wrapped into [0, 360)
    pub fn bearing(&self) -> Bearing {
        Bearing::new(self.heading_deg)
    }
}

/// Filtered heading estimate
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SmoothedHeading {
    /// Smoothed direction the device points
    pub bearing: Bearing,
    /// North reference of `bearing`
    pub frame: HeadingFrame,
}

impl SmoothedHeading {
    /// Heading in degrees, [0, 360)
    pub fn degrees(&self) -> f64 {
        self.bearing.degrees()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_validate() {
        assert!(HeadingSample::true_north(45.0, 0).validate().is_ok());
        assert_eq!(
            HeadingSample::magnetic(f64::NAN, 0).validate(),
            Err(SensorError::InvalidReading)
        );
        assert_eq!(
            HeadingSample::magnetic(f64::NEG_INFINITY, 0).validate(),
            Err(SensorError::InvalidReading)
        );
    }

    #[test]
    fn test_sample_bearing_wraps() {
        let s = HeadingSample::true_north(-5.0, 3);
        assert!((s.bearing().degrees() - 355.0).abs() < 1e-9);
        let s = HeadingSample::true_north(720.5, 4);
        assert!((s.bearing().degrees() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_sample_timestamp() {
        let s = HeadingSample::magnetic(10.0, 7).at(1_500);
        assert_eq!(s.timestamp_us, 1_500);
        assert_eq!(s.sequence, 7);
        assert_eq!(s.frame, HeadingFrame::Magnetic);
    }

    #[test]
    fn test_frame_and_error_names() {
        assert_eq!(HeadingFrame::Magnetic.as_str(), "magnetic");
        assert_eq!(HeadingFrame::True.as_str(), "true");
        assert_eq!(SensorError::StreamClosed.as_str(), "StreamClosed");
    }
}
