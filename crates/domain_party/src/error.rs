//! Party domain errors
//!
//! Contract failures of the person models. Invalid field values are reported
//! as validation results, never through this type.

use core_kernel::CoreError;
use thiserror::Error;

/// Errors that can occur in the party domain
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PartyError {
    /// A credential was changed to a type that is not a known credential type
    #[error("Invalid credential type: {0}")]
    UnknownCredentialType(String),

    /// A model operation was handed a value of the wrong shape
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl PartyError {
    /// Creates an UnknownCredentialType error from the rejected key
    pub fn unknown_credential_type(key: impl Into<String>) -> Self {
        PartyError::UnknownCredentialType(key.into())
    }
}

/// Result alias for party operations
pub type PartyResult<T> = Result<T, PartyError>;
