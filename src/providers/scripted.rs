//! Scripted collaborators for tests and demos.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use qibla_core::geo::GeoPoint;
use qibla_core::heading::SensorError;
use qibla_core::session::LocationError;

use super::{HeadingReading, HeadingSensor, LocationProvider};

const CHANNEL_CAPACITY: usize = 64;

/// Location provider answering every request with the same result.
#[derive(Debug)]
pub struct ScriptedLocation {
    result: Result<GeoPoint, LocationError>,
    delay: Option<Duration>,
    requests: AtomicUsize,
}

impl ScriptedLocation {
    /// Always answer with `point`.
    pub fn fix(point: GeoPoint) -> Self {
        Self::with_result(Ok(point))
    }

    /// Always fail with `error`.
    pub fn failing(error: LocationError) -> Self {
        Self::with_result(Err(error))
    }

    /// Always answer with `result`.
    pub fn with_result(result: Result<GeoPoint, LocationError>) -> Self {
        Self {
            result,
            delay: None,
            requests: AtomicUsize::new(0),
        }
    }

    /// Wait `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of fixes requested so far.
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LocationProvider for ScriptedLocation {
    async fn request_one_shot_fix(&self) -> Result<GeoPoint, LocationError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.result
    }
}

/// Heading sensor replaying a fixed list of readings.
///
/// After the script is exhausted the stream stays open until `stop()`,
/// unless built with [`ScriptedHeadingSensor::closing`].
#[derive(Debug)]
pub struct ScriptedHeadingSensor {
    readings: Vec<HeadingReading>,
    interval: Option<Duration>,
    subscribe_error: Option<SensorError>,
    close_when_done: bool,
    subscriptions: AtomicUsize,
    stops: AtomicUsize,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl ScriptedHeadingSensor {
    /// Sensor replaying `readings` in order on each subscription.
    pub fn new(readings: Vec<HeadingReading>) -> Self {
        Self {
            readings,
            interval: None,
            subscribe_error: None,
            close_when_done: false,
            subscriptions: AtomicUsize::new(0),
            stops: AtomicUsize::new(0),
            task: Mutex::new(None),
        }
    }

    /// Sensor whose subscription always fails.
    pub fn unavailable(error: SensorError) -> Self {
        let mut sensor = Self::new(Vec::new());
        sensor.subscribe_error = Some(error);
        sensor
    }

    /// Pause between readings.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = Some(interval);
        self
    }

    /// Close the stream after the last reading.
    pub fn closing(mut self) -> Self {
        self.close_when_done = true;
        self
    }

    /// Number of successful subscriptions so far.
    pub fn subscriptions(&self) -> usize {
        self.subscriptions.load(Ordering::SeqCst)
    }

    /// Number of `stop()` calls received.
    pub fn stops(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HeadingSensor for ScriptedHeadingSensor {
    async fn subscribe(&self) -> Result<mpsc::Receiver<HeadingReading>, SensorError> {
        if let Some(error) = self.subscribe_error {
            return Err(error);
        }
        self.subscriptions.fetch_add(1, Ordering::SeqCst);

        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        let readings = self.readings.clone();
        let interval = self.interval;
        let close_when_done = self.close_when_done;

        let handle = tokio::spawn(async move {
            for reading in readings {
                if let Some(interval) = interval {
                    tokio::time::sleep(interval).await;
                }
                if tx.send(reading).await.is_err() {
                    return;
                }
            }
            if !close_when_done {
                // Hold the sender so the stream stays open
                std::future::pending::<()>().await;
            }
        });

        let previous = self
            .task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(handle);
        if let Some(previous) = previous {
            previous.abort();
        }
        Ok(rx)
    }

    fn stop(&self) {
        self.stops.fetch_add(1, Ordering::SeqCst);
        if let Some(task) = self
            .task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            task.abort();
        }
    }
}
