//! qibla_compass - Qibla compass runtime
//!
//! Hosts the `qibla_core` direction session on tokio: location and heading
//! collaborators sit behind async traits, and [`SessionRunner`] turns their
//! events into an ordered stream of snapshots.

pub mod error;
pub mod output;
pub mod providers;
pub mod runner;

pub use error::CompassError;
pub use output::SnapshotRecord;
pub use providers::{
    HeadingReading, HeadingSensor, LocationProvider, ScriptedHeadingSensor, ScriptedLocation,
    SimulatedCompass, SimulatedCompassConfig,
};
pub use runner::SessionRunner;

pub use qibla_core::alignment::{AlignmentState, AlignmentStatus};
pub use qibla_core::geo::{Bearing, GeoPoint, KAABA};
pub use qibla_core::heading::{HeadingFrame, HeadingSample, SensorError, SmoothedHeading};
pub use qibla_core::session::{
    LocationError, SessionConfig, SessionFailure, SessionPhase, Snapshot,
};
