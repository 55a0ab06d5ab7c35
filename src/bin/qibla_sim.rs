//! qibla-sim: run a Qibla direction session against a simulated compass
//!
//! Prints every snapshot as one JSON line on stdout. Logs go to stderr and
//! are controlled with `RUST_LOG`.

use std::io::Write;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::Parser;
use tracing::info;

use qibla_compass::{
    CompassError, GeoPoint, HeadingFrame, ScriptedLocation, SessionPhase, SessionRunner,
    SimulatedCompass, SimulatedCompassConfig, SnapshotRecord,
};
use qibla_core::parameters::{CompassParams, ParamValue, ParameterStore};

#[derive(Parser, Debug)]
#[command(name = "qibla-sim")]
#[command(about = "Simulate a Qibla compass session and print snapshots as JSON lines", long_about = None)]
struct Args {
    /// Device latitude (degrees)
    #[arg(long, allow_hyphen_values = true)]
    lat: f64,

    /// Device longitude (degrees)
    #[arg(long, allow_hyphen_values = true)]
    lon: f64,

    /// Initial true heading of the simulated device (degrees)
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    heading: f64,

    /// Heading sweep rate (degrees per second)
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    sweep_dps: f64,

    /// Heading noise standard deviation (degrees)
    #[arg(long, default_value_t = 1.0)]
    noise_deg: f64,

    /// Heading sample rate (Hz)
    #[arg(long, default_value_t = 10.0)]
    rate_hz: f64,

    /// Stop after this many heading snapshots
    #[arg(long, default_value_t = 50)]
    samples: usize,

    /// RNG seed for reproducible noise
    #[arg(long)]
    seed: Option<u64>,

    /// Report samples as magnetic rather than true headings
    #[arg(long)]
    magnetic: bool,

    /// Magnetic declination, east positive (degrees); enables correction
    #[arg(long, allow_hyphen_values = true)]
    declination: Option<f32>,

    /// Alignment tolerance (degrees)
    #[arg(long)]
    tolerance: Option<f32>,

    /// Heading filter alpha (1 = no smoothing)
    #[arg(long)]
    alpha: Option<f32>,

    /// Consecutive evaluations before the alignment flips
    #[arg(long)]
    hold: Option<i32>,

    /// Print the effective parameters as JSON lines and exit
    #[arg(long)]
    list_params: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    /// Parameter store with CLI overrides applied on top of defaults
    fn parameter_store(&self) -> Result<ParameterStore, CompassError> {
        let mut store = ParameterStore::new();
        CompassParams::register_defaults(&mut store)?;

        if let Some(alpha) = self.alpha {
            store.set("QBL_HDG_FILT", ParamValue::Float(alpha))?;
        }
        if let Some(tolerance) = self.tolerance {
            store.set("QBL_ALIGN_TOL", ParamValue::Float(tolerance))?;
        }
        if let Some(hold) = self.hold {
            store.set("QBL_ALIGN_HOLD", ParamValue::Int(hold))?;
        }
        if let Some(declination) = self.declination {
            store.set("QBL_DECL_EN", ParamValue::Bool(true))?;
            store.set("QBL_DECL", ParamValue::Float(declination))?;
        }
        Ok(store)
    }

    fn compass_config(&self) -> SimulatedCompassConfig {
        SimulatedCompassConfig {
            heading_deg: self.heading,
            sweep_dps: self.sweep_dps,
            noise_deg: self.noise_deg,
            rate_hz: self.rate_hz,
            frame: if self.magnetic {
                HeadingFrame::Magnetic
            } else {
                HeadingFrame::True
            },
            seed: self.seed,
        }
    }
}

/// One JSON line per registered parameter, in registration order
fn list_params(store: &ParameterStore) -> anyhow::Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for (name, value) in store.iter() {
        let type_name = value.type_name();
        let value = match *value {
            ParamValue::Bool(v) => serde_json::Value::from(v),
            ParamValue::Int(v) => serde_json::Value::from(v),
            ParamValue::Float(v) => serde_json::Value::from(v),
        };
        let line = serde_json::json!({
            "name": name,
            "type": type_name,
            "value": value,
        });
        writeln!(out, "{}", line)?;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = if args.verbose { "debug" } else { "info" };
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .try_init();

    let origin = GeoPoint::new(args.lat, args.lon)
        .map_err(CompassError::from)
        .context("invalid --lat/--lon")?;

    let store = args.parameter_store().context("invalid parameter override")?;
    if args.list_params {
        return list_params(&store);
    }
    let params = CompassParams::from_store(&store);
    let config = params.to_session_config();
    info!(
        alpha = config.heading_filter_alpha,
        tolerance = config.alignment_tolerance_deg,
        hold = config.alignment_hold,
        declination = ?config.declination_deg,
        "session parameters"
    );

    let location = Arc::new(ScriptedLocation::fix(origin));
    let compass = Arc::new(SimulatedCompass::new(args.compass_config()));
    let (runner, mut snapshots) = SessionRunner::new(config, location, compass);
    runner.start()?;

    let stdout = std::io::stdout();
    let mut heading_snapshots = 0usize;
    while let Some(snapshot) = snapshots.recv().await {
        let line = serde_json::to_string(&SnapshotRecord::from(&snapshot))?;
        writeln!(stdout.lock(), "{}", line)?;

        if let Some(error) = snapshot.heading_lost() {
            runner.stop();
            bail!("heading unavailable: {}", error);
        }

        match snapshot.phase {
            SessionPhase::LocationUnavailable => {
                runner.stop();
                match snapshot.failure {
                    Some(failure) => bail!("location unavailable: {}", failure),
                    None => bail!("location unavailable"),
                }
            }
            SessionPhase::Tracking => {
                heading_snapshots += 1;
                if heading_snapshots >= args.samples {
                    break;
                }
            }
            _ => {}
        }
    }

    runner.stop();
    Ok(())
}
