//! Location and heading collaborators
//!
//! The runner talks to the platform only through these traits, so a phone
//! sensor stack, a simulator or a test script can stand behind them.

pub mod scripted;
pub mod simulated;

use async_trait::async_trait;
use tokio::sync::mpsc;

use qibla_core::geo::GeoPoint;
use qibla_core::heading::{HeadingSample, SensorError};
use qibla_core::session::LocationError;

pub use scripted::{ScriptedHeadingSensor, ScriptedLocation};
pub use simulated::{SimulatedCompass, SimulatedCompassConfig};

/// One item on a heading stream: a sample or a sensor fault.
pub type HeadingReading = Result<HeadingSample, SensorError>;

/// Source of a single position fix.
///
/// Implementations must be `Send + Sync` so they can be shared as
/// `Arc<dyn LocationProvider>`. Permission checks happen inside the request;
/// a refusal is reported as [`LocationError::PermissionDenied`].
#[async_trait]
pub trait LocationProvider: Send + Sync {
    /// Request one position fix.
    async fn request_one_shot_fix(&self) -> Result<GeoPoint, LocationError>;
}

/// Source of a continuous heading stream.
#[async_trait]
pub trait HeadingSensor: Send + Sync {
    /// Start streaming. Readings arrive in order on the returned channel;
    /// the channel closing means the stream ended.
    async fn subscribe(&self) -> Result<mpsc::Receiver<HeadingReading>, SensorError>;

    /// Release the subscription. Must be safe to call more than once.
    fn stop(&self);
}
