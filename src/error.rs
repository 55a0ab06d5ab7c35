use qibla_core::geo::GeoError;
use qibla_core::heading::SensorError;
use qibla_core::parameters::ParameterError;
use qibla_core::session::{LocationError, SessionError};

/// Errors surfaced by the compass runtime.
#[derive(Debug, thiserror::Error)]
pub enum CompassError {
    #[error("Invalid coordinate: {0}")]
    Geo(GeoError),

    #[error("Session error: {0}")]
    Session(SessionError),

    #[error("Location error: {0}")]
    Location(LocationError),

    #[error("Sensor error: {0}")]
    Sensor(SensorError),

    #[error("Parameter error: {0}")]
    Parameter(ParameterError),
}

impl From<GeoError> for CompassError {
    fn from(error: GeoError) -> Self {
        CompassError::Geo(error)
    }
}

impl From<SessionError> for CompassError {
    fn from(error: SessionError) -> Self {
        CompassError::Session(error)
    }
}

impl From<LocationError> for CompassError {
    fn from(error: LocationError) -> Self {
        CompassError::Location(error)
    }
}

impl From<SensorError> for CompassError {
    fn from(error: SensorError) -> Self {
        CompassError::Sensor(error)
    }
}

impl From<ParameterError> for CompassError {
    fn from(error: ParameterError) -> Self {
        CompassError::Parameter(error)
    }
}
