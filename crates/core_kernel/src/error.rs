//! Core error types used across the system
//!
//! These are contract errors: a caller handed the engine something it cannot
//! work with. Business and format failures of field values never travel
//! through this type, they are reported as [`crate::ValidationResult`]s.

use thiserror::Error;

/// Core error type for the kernel
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CoreError {
    /// A normalizer could not coerce a raw value into its canonical form
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// A value had a shape the field cannot hold at all
    #[error("Type mismatch on {field}: expected {expected}")]
    TypeMismatch {
        field: String,
        expected: String,
    },

    /// A field selector was neither `*`, a field name nor a list of names
    #[error("Unsupported field selector: {0}")]
    UnsupportedSelector(String),

    /// Two members of one enumeration share a value, name or code
    #[error("Duplicate {key_kind} '{key}' in enumeration {enum_type}")]
    DuplicateEnumKey {
        enum_type: String,
        key_kind: &'static str,
        key: String,
    },

    /// A model schema declaration is inconsistent
    #[error("Invalid schema for {model}: {reason}")]
    InvalidSchema {
        model: String,
        reason: String,
    },

    /// A value does not name any member of an enumeration
    #[error("Invalid {enum_type} value: {value}")]
    InvalidEnumValue {
        enum_type: String,
        value: String,
    },

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl CoreError {
    pub fn invalid_format(message: impl Into<String>) -> Self {
        CoreError::InvalidFormat(message.into())
    }

    pub fn type_mismatch(field: impl Into<String>, expected: impl Into<String>) -> Self {
        CoreError::TypeMismatch {
            field: field.into(),
            expected: expected.into(),
        }
    }

    pub fn invalid_schema(model: impl Into<String>, reason: impl Into<String>) -> Self {
        CoreError::InvalidSchema {
            model: model.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_enum_value(enum_type: impl Into<String>, value: impl Into<String>) -> Self {
        CoreError::InvalidEnumValue {
            enum_type: enum_type.into(),
            value: value.into(),
        }
    }
}

impl From<config::ConfigError> for CoreError {
    fn from(err: config::ConfigError) -> Self {
        CoreError::Configuration(err.to_string())
    }
}

/// Result alias for kernel operations
pub type CoreResult<T> = Result<T, CoreError>;
