//! Outcome of a validation call

use serde::{Deserialize, Serialize};

/// Pass/fail outcome of validating one field or an aggregate of fields
///
/// `description` is empty on success and carries the user-facing message on
/// failure. Aggregates keep the first failure only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub success: bool,
    pub description: String,
}

impl ValidationResult {
    pub fn success() -> Self {
        Self {
            success: true,
            description: String::new(),
        }
    }

    pub fn failure(description: impl Into<String>) -> Self {
        Self {
            success: false,
            description: description.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn is_failure(&self) -> bool {
        !self.success
    }

    /// Combines two results, keeping `self` if it already failed
    pub fn merge(self, other: ValidationResult) -> ValidationResult {
        if self.is_failure() {
            self
        } else {
            other
        }
    }

    /// Reduces a sequence of results to its first failure, or a success
    pub fn first_failure<I>(results: I) -> ValidationResult
    where
        I: IntoIterator<Item = ValidationResult>,
    {
        results
            .into_iter()
            .find(ValidationResult::is_failure)
            .unwrap_or_else(ValidationResult::success)
    }
}
