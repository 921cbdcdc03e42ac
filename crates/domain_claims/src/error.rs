//! Claims domain errors

use core_kernel::CoreError;
use thiserror::Error;

/// Errors that can occur in the claims domain
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClaimError {
    #[error("Invalid treatment date range: expected 2 dates, got {0}")]
    InvalidDateRange(usize),

    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Result alias for claims operations
pub type ClaimResult<T> = Result<T, ClaimError>;
