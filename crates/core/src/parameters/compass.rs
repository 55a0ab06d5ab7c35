//! Compass Session Parameter Definitions
//!
//! Maps every tunable of the direction session to a parameter store entry so
//! hosts can persist and edit them like any other setting.
//!
//! # Parameters
//!
//! - `QBL_HDG_FILT` - EMA filter alpha for heading smoothing
//! - `QBL_ALIGN_TOL` - Alignment tolerance in degrees
//! - `QBL_ALIGN_HOLD` - Agreeing evaluations required before the published alignment flips
//! - `QBL_DECL_EN` - Apply magnetic declination to magnetic samples
//! - `QBL_DECL` - Magnetic declination in degrees (east positive)
//! - `QBL_LOC_TMO` - Location fix timeout in milliseconds

use super::error::ParameterError;
use super::storage::{ParamValue, ParameterStore};
use crate::session::SessionConfig;

// --- Defaults ---

const DEFAULT_HEADING_FILTER_ALPHA: f32 = 0.3;
const DEFAULT_ALIGNMENT_TOLERANCE: f32 = 5.0;
const DEFAULT_ALIGNMENT_HOLD: i32 = 3;
const DEFAULT_DECLINATION_ENABLED: bool = false;
const DEFAULT_DECLINATION: f32 = 0.0;
const DEFAULT_LOCATION_TIMEOUT_MS: i32 = 15_000;

// --- Ranges ---

const MIN_ALPHA: f32 = 0.0;
const MAX_ALPHA: f32 = 1.0;

const MIN_TOLERANCE: f32 = 0.5;
const MAX_TOLERANCE: f32 = 45.0;

const MIN_HOLD: i32 = 1;
const MAX_HOLD: i32 = 50;

const MIN_DECLINATION: f32 = -180.0;
const MAX_DECLINATION: f32 = 180.0;

const MIN_LOCATION_TIMEOUT_MS: i32 = 1_000;
const MAX_LOCATION_TIMEOUT_MS: i32 = 120_000;

/// Direction session parameters loaded from parameter store
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompassParams {
    /// EMA filter alpha (0.0 = max smoothing, 1.0 = no filter)
    pub heading_filter_alpha: f32,
    /// Alignment tolerance in degrees
    pub alignment_tolerance: f32,
    /// Consecutive agreeing evaluations before a published flip
    pub alignment_hold: i32,
    /// Whether `declination` is applied to magnetic samples
    pub declination_enabled: bool,
    /// Magnetic declination in degrees, east positive
    pub declination: f32,
    /// Location fix timeout in milliseconds
    pub location_timeout_ms: i32,
}

impl Default for CompassParams {
    fn default() -> Self {
        Self {
            heading_filter_alpha: DEFAULT_HEADING_FILTER_ALPHA,
            alignment_tolerance: DEFAULT_ALIGNMENT_TOLERANCE,
            alignment_hold: DEFAULT_ALIGNMENT_HOLD,
            declination_enabled: DEFAULT_DECLINATION_ENABLED,
            declination: DEFAULT_DECLINATION,
            location_timeout_ms: DEFAULT_LOCATION_TIMEOUT_MS,
        }
    }
}

impl CompassParams {
    /// Register compass parameters with default values
    pub fn register_defaults(store: &mut ParameterStore) -> Result<(), ParameterError> {
        store.register("QBL_HDG_FILT", ParamValue::Float(DEFAULT_HEADING_FILTER_ALPHA))?;
        store.register("QBL_ALIGN_TOL", ParamValue::Float(DEFAULT_ALIGNMENT_TOLERANCE))?;
        store.register("QBL_ALIGN_HOLD", ParamValue::Int(DEFAULT_ALIGNMENT_HOLD))?;
        store.register("QBL_DECL_EN", ParamValue::Bool(DEFAULT_DECLINATION_ENABLED))?;
        store.register("QBL_DECL", ParamValue::Float(DEFAULT_DECLINATION))?;
        store.register("QBL_LOC_TMO", ParamValue::Int(DEFAULT_LOCATION_TIMEOUT_MS))?;

        Ok(())
    }

    /// Load compass parameters from parameter store, clamping to valid ranges
    pub fn from_store(store: &ParameterStore) -> Self {
        Self {
            heading_filter_alpha: load_float(
                store,
                "QBL_HDG_FILT",
                DEFAULT_HEADING_FILTER_ALPHA,
                MIN_ALPHA,
                MAX_ALPHA,
            ),
            alignment_tolerance: load_float(
                store,
                "QBL_ALIGN_TOL",
                DEFAULT_ALIGNMENT_TOLERANCE,
                MIN_TOLERANCE,
                MAX_TOLERANCE,
            ),
            alignment_hold: load_int(
                store,
                "QBL_ALIGN_HOLD",
                DEFAULT_ALIGNMENT_HOLD,
                MIN_HOLD,
                MAX_HOLD,
            ),
            declination_enabled: load_bool(store, "QBL_DECL_EN", DEFAULT_DECLINATION_ENABLED),
            declination: load_float(
                store,
                "QBL_DECL",
                DEFAULT_DECLINATION,
                MIN_DECLINATION,
                MAX_DECLINATION,
            ),
            location_timeout_ms: load_int(
                store,
                "QBL_LOC_TMO",
                DEFAULT_LOCATION_TIMEOUT_MS,
                MIN_LOCATION_TIMEOUT_MS,
                MAX_LOCATION_TIMEOUT_MS,
            ),
        }
    }

    /// Convert to the `SessionConfig` injected into `DirectionSession`
    pub fn to_session_config(&self) -> SessionConfig {
        SessionConfig {
            heading_filter_alpha: self.heading_filter_alpha as f64,
            alignment_tolerance_deg: self.alignment_tolerance as f64,
            alignment_hold: self.alignment_hold.max(MIN_HOLD) as u32,
            declination_deg: if self.declination_enabled {
                Some(self.declination as f64)
            } else {
                None
            },
            location_timeout_ms: self.location_timeout_ms.max(MIN_LOCATION_TIMEOUT_MS) as u64,
            ..SessionConfig::default()
        }
    }

    /// Validate compass parameters
    pub fn is_valid(&self) -> bool {
        if !(MIN_ALPHA..=MAX_ALPHA).contains(&self.heading_filter_alpha) {
            return false;
        }
        if !(MIN_TOLERANCE..=MAX_TOLERANCE).contains(&self.alignment_tolerance) {
            return false;
        }
        if !(MIN_HOLD..=MAX_HOLD).contains(&self.alignment_hold) {
            return false;
        }
        if !(MIN_DECLINATION..=MAX_DECLINATION).contains(&self.declination) {
            return false;
        }
        if !(MIN_LOCATION_TIMEOUT_MS..=MAX_LOCATION_TIMEOUT_MS).contains(&self.location_timeout_ms)
        {
            return false;
        }
        true
    }
}

/// Load a float parameter from store with clamping
fn load_float(store: &ParameterStore, name: &str, default: f32, min: f32, max: f32) -> f32 {
    match store.get(name) {
        Some(ParamValue::Float(v)) if !v.is_nan() => v.clamp(min, max),
        Some(ParamValue::Int(v)) => (*v as f32).clamp(min, max),
        _ => default,
    }
}

/// Load an integer parameter from store with clamping
fn load_int(store: &ParameterStore, name: &str, default: i32, min: i32, max: i32) -> i32 {
    match store.get(name) {
        Some(ParamValue::Int(v)) => (*v).clamp(min, max),
        Some(ParamValue::Float(v)) if !v.is_nan() => (*v as i32).clamp(min, max),
        _ => default,
    }
}

/// Load a boolean parameter, accepting integer 0/1 as well
fn load_bool(store: &ParameterStore, name: &str, default: bool) -> bool {
    match store.get(name) {
        Some(ParamValue::Bool(v)) => *v,
        Some(ParamValue::Int(v)) => *v != 0,
        _ => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compass_params_defaults() {
        let params = CompassParams::default();

        assert!((params.heading_filter_alpha - 0.3).abs() < 0.001);
        assert!((params.alignment_tolerance - 5.0).abs() < 0.001);
        assert_eq!(params.alignment_hold, 3);
        assert!(!params.declination_enabled);
        assert!((params.declination - 0.0).abs() < 0.001);
        assert_eq!(params.location_timeout_ms, 15_000);
        assert!(params.is_valid());
    }

    #[test]
    fn test_register_defaults_populates_all_6() {
        let mut store = ParameterStore::new();
        CompassParams::register_defaults(&mut store).unwrap();

        assert!(store.get("QBL_HDG_FILT").is_some());
        assert!(store.get("QBL_ALIGN_TOL").is_some());
        assert!(store.get("QBL_ALIGN_HOLD").is_some());
        assert!(store.get("QBL_DECL_EN").is_some());
        assert!(store.get("QBL_DECL").is_some());
        assert!(store.get("QBL_LOC_TMO").is_some());
        assert_eq!(store.len(), 6);
    }

    #[test]
    fn test_from_store_reads_defaults() {
        let mut store = ParameterStore::new();
        CompassParams::register_defaults(&mut store).unwrap();
        assert_eq!(CompassParams::from_store(&store), CompassParams::default());
    }

    #[test]
    fn test_from_empty_store_uses_defaults() {
        let store = ParameterStore::new();
        assert_eq!(CompassParams::from_store(&store), CompassParams::default());
    }

    #[test]
    fn test_from_store_reads_custom_values() {
        let mut store = ParameterStore::new();
        CompassParams::register_defaults(&mut store).unwrap();
        store.set("QBL_HDG_FILT", ParamValue::Float(0.5)).unwrap();
        store.set("QBL_ALIGN_TOL", ParamValue::Float(3.0)).unwrap();
        store.set("QBL_ALIGN_HOLD", ParamValue::Int(5)).unwrap();
        store.set("QBL_DECL_EN", ParamValue::Bool(true)).unwrap();
        store.set("QBL_DECL", ParamValue::Float(-12.5)).unwrap();
        store.set("QBL_LOC_TMO", ParamValue::Int(5_000)).unwrap();

        let params = CompassParams::from_store(&store);
        assert!((params.heading_filter_alpha - 0.5).abs() < 0.001);
        assert!((params.alignment_tolerance - 3.0).abs() < 0.001);
        assert_eq!(params.alignment_hold, 5);
        assert!(params.declination_enabled);
        assert!((params.declination - (-12.5)).abs() < 0.001);
        assert_eq!(params.location_timeout_ms, 5_000);
    }

    #[test]
    fn test_from_store_clamps_out_of_range() {
        let mut store = ParameterStore::new();
        CompassParams::register_defaults(&mut store).unwrap();
        store.set("QBL_HDG_FILT", ParamValue::Float(3.0)).unwrap();
        store.set("QBL_ALIGN_TOL", ParamValue::Float(0.0)).unwrap();
        store.set("QBL_ALIGN_HOLD", ParamValue::Int(0)).unwrap();
        store.set("QBL_LOC_TMO", ParamValue::Int(999_999)).unwrap();

        let params = CompassParams::from_store(&store);
        assert!((params.heading_filter_alpha - 1.0).abs() < 0.001);
        assert!((params.alignment_tolerance - 0.5).abs() < 0.001);
        assert_eq!(params.alignment_hold, 1);
        assert_eq!(params.location_timeout_ms, 120_000);
        assert!(params.is_valid());
    }

    #[test]
    fn test_to_session_config() {
        let params = CompassParams {
            declination_enabled: true,
            declination: 7.5,
            ..CompassParams::default()
        };
        let config = params.to_session_config();
        assert!((config.heading_filter_alpha - 0.3).abs() < 1e-6);
        assert!((config.alignment_tolerance_deg - 5.0).abs() < 1e-6);
        assert_eq!(config.alignment_hold, 3);
        assert_eq!(config.declination_deg, Some(7.5));
        assert_eq!(config.location_timeout_ms, 15_000);
    }

    #[test]
    fn test_to_session_config_declination_disabled() {
        let params = CompassParams {
            declination: 7.5,
            ..CompassParams::default()
        };
        assert_eq!(params.to_session_config().declination_deg, None);
    }

    #[test]
    fn test_is_valid_rejects_bad_hold() {
        let params = CompassParams {
            alignment_hold: 0,
            ..CompassParams::default()
        };
        assert!(!params.is_valid());
    }
}
