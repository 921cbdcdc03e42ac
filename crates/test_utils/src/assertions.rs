//! Custom Test Assertions
//!
//! Provides assertion helpers for validation results that print the
//! failure message when they do not hold.

use core_kernel::ValidationResult;

/// Asserts that a validation succeeded with an empty description
#[track_caller]
pub fn assert_valid(result: &ValidationResult) {
    assert!(
        result.is_success(),
        "Expected a valid result, got failure: {}",
        result.description
    );
    assert_eq!(result.description, "", "Successful result carries a description");
}

/// Asserts that a validation failed with exactly the expected message
#[track_caller]
pub fn assert_invalid(result: &ValidationResult, expected: &str) {
    assert!(
        result.is_failure(),
        "Expected failure '{}', got a valid result",
        expected
    );
    assert_eq!(result.description, expected);
}

/// Asserts that `owned` is `plain` with `{owner}的` inserted right before
/// the first occurrence of `label`, and nothing else differs
///
/// # Panics
///
/// Panics if `plain` does not contain `label`
#[track_caller]
pub fn assert_owner_prefixed(plain: &str, owned: &str, owner: &str, label: &str) {
    let at = plain
        .find(label)
        .unwrap_or_else(|| panic!("Label '{}' not found in '{}'", label, plain));
    let expected = format!("{}{}的{}", &plain[..at], owner, &plain[at..]);
    assert_eq!(owned, expected, "Owner prefix mismatch for owner '{}'", owner);
}
