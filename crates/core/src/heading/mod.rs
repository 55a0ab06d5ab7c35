//! Heading samples and smoothing
//!
//! Raw compass readings arrive as [`HeadingSample`]s from the sensor
//! collaborator; [`HeadingFilter`] turns them into a [`SmoothedHeading`]
//! stable enough to drive an alignment indicator.

mod filter;
mod sample;

pub use filter::{HeadingFilter, SNAP_THRESHOLD_DEG};
pub use sample::{HeadingFrame, HeadingSample, SensorError, SmoothedHeading};
