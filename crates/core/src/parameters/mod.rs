//! Parameter management types and utilities
//!
//! Configuration is plain data injected into each session; nothing in this
//! crate reads settings from global state.

pub mod compass;
pub mod error;
pub mod storage;

pub use compass::CompassParams;
pub use error::ParameterError;
pub use storage::{ParamValue, ParameterStore};
pub use storage::{MAX_PARAMS, PARAM_NAME_LEN};
