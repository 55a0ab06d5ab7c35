//! Session runner
//!
//! Drives a [`DirectionSession`] from async collaborators: requests the fix
//! with a timeout, subscribes to the heading stream once the target bearing
//! is known, and publishes every snapshot in order.
//!
//! All session state sits behind one mutex. Snapshots are published while
//! the lock is held, so once `stop()` has taken the lock and stopped the
//! session nothing else can be emitted.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use qibla_core::heading::SensorError;
use qibla_core::session::{
    DirectionSession, LocationError, SessionConfig, SessionPhase, Snapshot,
};

use crate::error::CompassError;
use crate::providers::{HeadingSensor, LocationProvider};

struct Shared {
    session: Mutex<DirectionSession>,
    location: Arc<dyn LocationProvider>,
    sensor: Arc<dyn HeadingSensor>,
    snapshots: mpsc::UnboundedSender<Snapshot>,
    latest: watch::Sender<Snapshot>,
}

impl Shared {
    fn lock_session(&self) -> MutexGuard<'_, DirectionSession> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Publish a snapshot. Callers hold the session lock.
    fn publish(&self, snapshot: Snapshot) {
        debug!(
            phase = snapshot.phase.as_str(),
            sequence = ?snapshot.sequence,
            aligned = snapshot.is_aligned(),
            "snapshot"
        );
        // A dropped receiver only means nobody is listening
        let _ = self.snapshots.send(snapshot);
        self.latest.send_replace(snapshot);
    }
}

/// Runs one direction session against a location provider and a heading
/// sensor.
pub struct SessionRunner {
    shared: Arc<Shared>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl SessionRunner {
    /// Create a runner and the receiver carrying every snapshot.
    pub fn new(
        config: SessionConfig,
        location: Arc<dyn LocationProvider>,
        sensor: Arc<dyn HeadingSensor>,
    ) -> (Self, mpsc::UnboundedReceiver<Snapshot>) {
        let session = DirectionSession::new(config);
        let (snapshots, rx) = mpsc::unbounded_channel();
        let (latest, _) = watch::channel(session.snapshot());

        let runner = Self {
            shared: Arc::new(Shared {
                session: Mutex::new(session),
                location,
                sensor,
                snapshots,
                latest,
            }),
            task: Mutex::new(None),
        };
        (runner, rx)
    }

    /// Latest-value view of the snapshot stream.
    pub fn watch(&self) -> watch::Receiver<Snapshot> {
        self.shared.latest.subscribe()
    }

    /// Current session state.
    pub fn snapshot(&self) -> Snapshot {
        self.shared.lock_session().snapshot()
    }

    /// Current session phase.
    pub fn phase(&self) -> SessionPhase {
        self.shared.lock_session().phase()
    }

    /// Activate the session. Must be called from within a tokio runtime.
    ///
    /// Also restarts a session whose location request failed.
    pub fn start(&self) -> Result<(), CompassError> {
        // The task handle is stored before the session lock is released, so
        // a concurrent `stop()` always finds it.
        let mut session = self.shared.lock_session();
        let snapshot = session.start()?;
        info!(
            target_lat = session.config().target.latitude,
            target_lon = session.config().target.longitude,
            "session started"
        );
        self.shared.publish(snapshot);

        let handle = tokio::spawn(drive(Arc::clone(&self.shared)));
        let previous = self.lock_task().replace(handle);
        drop(session);

        if let Some(previous) = previous {
            previous.abort();
        }
        Ok(())
    }

    /// Deactivate the session and release the heading subscription.
    ///
    /// No snapshot is published once this returns. Safe to call repeatedly.
    pub fn stop(&self) {
        let release = {
            let mut session = self.shared.lock_session();
            if session.phase() == SessionPhase::Stopped {
                return;
            }
            session.stop()
        };

        if let Some(task) = self.lock_task().take() {
            task.abort();
        }
        if release {
            self.shared.sensor.stop();
        }
        info!("session stopped");
    }

    fn lock_task(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.task.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for SessionRunner {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Session task: fix, then heading stream.
async fn drive(shared: Arc<Shared>) {
    let timeout = Duration::from_millis(shared.lock_session().config().location_timeout_ms);

    let fix = match tokio::time::timeout(timeout, shared.location.request_one_shot_fix()).await {
        Ok(fix) => fix,
        Err(_) => {
            warn!(timeout_ms = timeout.as_millis() as u64, "location request timed out");
            Err(LocationError::Timeout)
        }
    };

    let ready = {
        let mut session = shared.lock_session();
        match session.on_location_fix(fix) {
            Ok(Some(snapshot)) => {
                match (snapshot.target_bearing, snapshot.failure) {
                    (Some(bearing), _) => info!(
                        bearing = bearing.degrees(),
                        distance_m = ?snapshot.distance_m,
                        "target bearing computed"
                    ),
                    (None, Some(failure)) => warn!(%failure, "location unavailable"),
                    (None, None) => {}
                }
                shared.publish(snapshot);
                session.phase() == SessionPhase::Ready
            }
            Ok(None) => false,
            Err(error) => {
                warn!(%error, "location fix rejected");
                shared.publish(session.snapshot());
                false
            }
        }
    };
    if !ready {
        return;
    }

    let mut readings = match shared.sensor.subscribe().await {
        Ok(readings) => readings,
        Err(error) => {
            warn!(%error, "heading subscription failed");
            let mut session = shared.lock_session();
            if let Some(snapshot) = session.on_heading_error(error) {
                shared.publish(snapshot);
            }
            return;
        }
    };
    debug!("heading subscription active");

    while let Some(reading) = readings.recv().await {
        let mut session = shared.lock_session();
        let snapshot = match reading {
            Ok(sample) => session.on_heading_sample(&sample),
            Err(error) => {
                warn!(%error, "heading sensor notice");
                session.on_heading_error(error)
            }
        };
        match snapshot {
            Some(snapshot) => shared.publish(snapshot),
            None => return,
        }
    }

    let mut session = shared.lock_session();
    if let Some(snapshot) = session.on_heading_error(SensorError::StreamClosed) {
        warn!("heading stream closed");
        shared.publish(snapshot);
    }
}
