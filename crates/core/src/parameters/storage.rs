//! Parameter Storage
//!
//! Fixed-capacity map of named, typed settings. A name must be registered
//! with its default before it can be set, and keeps the type it was
//! registered with.

use core::mem::discriminant;

use super::error::ParameterError;
use heapless::index_map::FnvIndexMap;
use heapless::String;

/// Maximum parameter name length
pub const PARAM_NAME_LEN: usize = 16;

/// Maximum number of parameters
pub const MAX_PARAMS: usize = 32;

/// Parameter value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamValue {
    Bool(bool),
    Int(i32),
    Float(f32),
}

impl ParamValue {
    /// Type name used in listings
    pub fn type_name(&self) -> &'static str {
        match self {
            ParamValue::Bool(_) => "bool",
            ParamValue::Int(_) => "int",
            ParamValue::Float(_) => "float",
        }
    }

    fn same_type(&self, other: &ParamValue) -> bool {
        discriminant(self) == discriminant(other)
    }
}

/// Registered settings, in registration order
#[derive(Debug, Clone, Default)]
pub struct ParameterStore {
    values: FnvIndexMap<String<PARAM_NAME_LEN>, ParamValue, MAX_PARAMS>,
}

impl ParameterStore {
    pub fn new() -> Self {
        Self {
            values: FnvIndexMap::new(),
        }
    }

    /// Register `name` with its default. Registering twice keeps the
    /// current value.
    pub fn register(&mut self, name: &str, default: ParamValue) -> Result<(), ParameterError> {
        let key = make_key(name)?;
        if self.values.contains_key(&key) {
            return Ok(());
        }
        self.values
            .insert(key, default)
            .map(|_| ())
            .map_err(|_| ParameterError::StoreFull)
    }

    /// Overwrite a registered value of the same type
    pub fn set(&mut self, name: &str, value: ParamValue) -> Result<(), ParameterError> {
        let key = make_key(name)?;
        match self.values.get_mut(&key) {
            None => Err(ParameterError::UnknownParameter),
            Some(current) if !current.same_type(&value) => Err(ParameterError::TypeMismatch),
            Some(current) => {
                *current = value;
                Ok(())
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        let key = make_key(name).ok()?;
        self.values.get(&key)
    }

    /// Iterate `(name, value)` pairs in registration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

fn make_key(name: &str) -> Result<String<PARAM_NAME_LEN>, ParameterError> {
    let mut key = String::new();
    key.push_str(name)
        .map_err(|_| ParameterError::InvalidConfig)?;
    Ok(key)
}
