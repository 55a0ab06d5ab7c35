//! Parameter error types

/// Errors from parameter store operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterError {
    /// Name longer than the store allows
    InvalidConfig,
    /// Name was never registered
    UnknownParameter,
    /// Value type differs from the registered one
    TypeMismatch,
    /// Store is full
    StoreFull,
}

impl ParameterError {
    /// Return variant name as a static string
    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterError::InvalidConfig => "InvalidConfig",
            ParameterError::UnknownParameter => "UnknownParameter",
            ParameterError::TypeMismatch => "TypeMismatch",
            ParameterError::StoreFull => "StoreFull",
        }
    }
}

impl core::fmt::Display for ParameterError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ParameterError::InvalidConfig => write!(f, "invalid parameter name"),
            ParameterError::UnknownParameter => write!(f, "unknown parameter"),
            ParameterError::TypeMismatch => write!(f, "parameter type mismatch"),
            ParameterError::StoreFull => write!(f, "parameter store full"),
        }
    }
}
