//! Direction session: state machine tying geodesy, heading filter and
//! alignment together for one activation of the compass.

mod config;
mod debounce;
mod direction;
mod snapshot;
mod state;

pub use config::SessionConfig;
pub use debounce::AlignmentDebouncer;
pub use direction::DirectionSession;
pub use snapshot::Snapshot;
pub use state::{LocationError, SessionError, SessionFailure, SessionPhase};
