//! Noisy simulated compass.
//!
//! Emits heading samples around a true heading that sweeps at a constant
//! rate, with Gaussian noise from a seedable RNG.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use qibla_core::geo::wrap_360;
use qibla_core::heading::{HeadingFrame, HeadingSample, SensorError};

use super::{HeadingReading, HeadingSensor};

const CHANNEL_CAPACITY: usize = 64;

/// Simulated compass configuration.
#[derive(Debug, Clone)]
pub struct SimulatedCompassConfig {
    /// Heading at the first sample (degrees).
    pub heading_deg: f64,
    /// Sweep rate (degrees per second, positive clockwise).
    pub sweep_dps: f64,
    /// Heading noise standard deviation (degrees).
    pub noise_deg: f64,
    /// Sample rate in Hz.
    pub rate_hz: f64,
    /// Reference frame reported with each sample.
    pub frame: HeadingFrame,
    /// RNG seed for deterministic mode. None = random.
    pub seed: Option<u64>,
}

impl Default for SimulatedCompassConfig {
    fn default() -> Self {
        Self {
            heading_deg: 0.0,
            sweep_dps: 0.0,
            noise_deg: 1.0,
            rate_hz: 10.0,
            frame: HeadingFrame::True,
            seed: None,
        }
    }
}

/// Simulated heading sensor.
#[derive(Debug)]
pub struct SimulatedCompass {
    config: SimulatedCompassConfig,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl SimulatedCompass {
    /// Compass that starts emitting on `subscribe()`.
    pub fn new(config: SimulatedCompassConfig) -> Self {
        Self {
            config,
            task: Mutex::new(None),
        }
    }

    /// Configuration in use.
    pub fn config(&self) -> &SimulatedCompassConfig {
        &self.config
    }
}

/// Noise-free heading after `sequence` samples.
fn ideal_heading(config: &SimulatedCompassConfig, sequence: u64) -> f64 {
    let elapsed_s = sequence as f64 / config.rate_hz;
    wrap_360(config.heading_deg + config.sweep_dps * elapsed_s)
}

/// Interval between samples, if the rate yields a usable non-zero period.
fn sample_period(rate_hz: f64) -> Option<Duration> {
    if !(rate_hz.is_finite() && rate_hz > 0.0) {
        return None;
    }
    Duration::try_from_secs_f64(1.0 / rate_hz)
        .ok()
        .filter(|period| !period.is_zero())
}

/// Generate Gaussian noise using Box-Muller transform.
fn gaussian_noise(rng: &mut StdRng, stddev: f64) -> f64 {
    if stddev == 0.0 {
        return 0.0;
    }
    let u1: f64 = rng.gen::<f64>().max(f64::EPSILON);
    let u2: f64 = rng.gen();
    let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
    z * stddev
}

#[async_trait]
impl HeadingSensor for SimulatedCompass {
    async fn subscribe(&self) -> Result<mpsc::Receiver<HeadingReading>, SensorError> {
        let period = sample_period(self.config.rate_hz).ok_or(SensorError::Unavailable)?;

        let config = self.config.clone();
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            let mut sequence = 0u64;
            loop {
                ticker.tick().await;
                let heading = ideal_heading(&config, sequence)
                    + gaussian_noise(&mut rng, config.noise_deg);
                let timestamp_us = (sequence as f64 * 1_000_000.0 / config.rate_hz) as u64;
                let sample = HeadingSample::new(wrap_360(heading), config.frame, sequence)
                    .at(timestamp_us);
                if tx.send(Ok(sample)).await.is_err() {
                    break;
                }
                sequence += 1;
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
        if let Some(task) = self
            .task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            tracing::debug!("simulated compass stopped");
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ideal_heading_sweeps() {
        let config = SimulatedCompassConfig {
            heading_deg: 350.0,
            sweep_dps: 20.0,
            rate_hz: 10.0,
            ..SimulatedCompassConfig::default()
        };
        assert!((ideal_heading(&config, 0) - 350.0).abs() < 1e-9);
        assert!((ideal_heading(&config, 5) - 0.0).abs() < 1e-9);
        assert!((ideal_heading(&config, 10) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_gaussian_noise_zero_stddev() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(gaussian_noise(&mut rng, 0.0), 0.0);
    }

    #[test]
    fn test_gaussian_noise_is_seeded() {
        let mut a = StdRng::seed_from_u64(42);
        let mut b = StdRng::seed_from_u64(42);
        for _ in 0..10 {
            assert_eq!(gaussian_noise(&mut a, 2.0), gaussian_noise(&mut b, 2.0));
        }
    }

    #[test]
    fn test_gaussian_noise_spread() {
        let mut rng = StdRng::seed_from_u64(7);
        let n = 5000;
        let samples: Vec<f64> = (0..n).map(|_| gaussian_noise(&mut rng, 3.0)).collect();
        let mean = samples.iter().sum::<f64>() / n as f64;
        let var = samples.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / n as f64;
        assert!(mean.abs() < 0.3, "mean {} too far from 0", mean);
        assert!((var.sqrt() - 3.0).abs() < 0.3, "stddev {} too far from 3", var.sqrt());
    }

    #[tokio::test]
    async fn test_samples_are_ordered_and_tagged() {
        let compass = SimulatedCompass::new(SimulatedCompassConfig {
            heading_deg: 90.0,
            noise_deg: 0.0,
            rate_hz: 1000.0,
            frame: HeadingFrame::Magnetic,
            seed: Some(3),
            ..SimulatedCompassConfig::default()
        });
        let mut rx = compass.subscribe().await.unwrap();
        for expected in 0..5u64 {
            let sample = rx.recv().await.unwrap().unwrap();
            assert_eq!(sample.sequence, expected);
            assert_eq!(sample.frame, HeadingFrame::Magnetic);
            assert!((sample.heading_deg - 90.0).abs() < 1e-9);
        }
        compass.stop();
        compass.stop();
    }

    #[test]
    fn test_sample_period_bounds() {
        assert_eq!(sample_period(10.0), Some(Duration::from_millis(100)));
        assert_eq!(sample_period(0.0), None);
        assert_eq!(sample_period(-5.0), None);
        assert_eq!(sample_period(f64::NAN), None);
        assert_eq!(sample_period(f64::INFINITY), None);
        // Period too long to represent
        assert_eq!(sample_period(1e-300), None);
        // Period rounds to zero
        assert_eq!(sample_period(1e12), None);
    }

    #[tokio::test]
    async fn test_extreme_rates_are_unavailable() {
        for rate_hz in [1e-300, 1e12] {
            let compass = SimulatedCompass::new(SimulatedCompassConfig {
                rate_hz,
                ..SimulatedCompassConfig::default()
            });
            assert_eq!(compass.subscribe().await.err(), Some(SensorError::Unavailable));
        }
    }

    #[tokio::test]
    async fn test_zero_rate_is_unavailable() {
        let compass = SimulatedCompass::new(SimulatedCompassConfig {
            rate_hz: 0.0,
            ..SimulatedCompassConfig::default()
        });
        assert_eq!(compass.subscribe().await.err(), Some(SensorError::Unavailable));
    }
}
