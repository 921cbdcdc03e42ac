//! Guardians of minor insurants

use chrono::NaiveDate;
use core_kernel::temporal::{is_adult, parse_birthday};
use core_kernel::{
    define_model, CoreResult, HasBirthday, Model, Schema, ValidationContext, ValidationResult,
};

use crate::messages;
use crate::person::{base_schema, PersonLike};

/// Display name of the "no guardian" choice
pub const NO_GUARDIAN_NAME: &str = "无";
/// Value key of the "no guardian" choice
pub const NO_GUARDIAN_VALUE: &str = "NONE";
/// Identifier of the "no guardian" choice
pub const NO_GUARDIAN_ID: i64 = -1;

/// A guardian must be an adult at the context's reference date
fn validate_adult(model: &dyn Model, ctx: &ValidationContext<'_>) -> ValidationResult {
    if is_adult(model, &ctx.age) {
        ValidationResult::success()
    } else {
        ValidationResult::failure(messages::guardian_must_be_adult())
    }
}

fn guardian_schema() -> CoreResult<Schema> {
    Schema::builder("Guardian")
        .extend(base_schema())
        .rule("adult", validate_adult, true)
        .build()
}

define_model! {
    /// A person acting as guardian; validating all fields also checks adulthood
    pub struct Guardian {
        id,
        name,
        username,
        gender,
        birthday,
        credential,
        mobile,
        email,
        test,
        delete_time,
    }
    schema = guardian_schema;
}

impl PersonLike for Guardian {}

impl HasBirthday for Guardian {
    fn birthday(&self) -> Option<NaiveDate> {
        parse_birthday(&self.birthday)
    }
    fn has_birthday(&self) -> bool {
        !self.birthday.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::{validate, AgeSettings, Value};

    fn ctx() -> ValidationContext<'static> {
        ValidationContext::new()
            .with_age(AgeSettings::default().with_age_from(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()))
    }

    #[test]
    fn test_minor_guardian_rejected() {
        let mut guardian = Guardian::new();
        guardian.birthday = Value::text("2010-01-01");
        assert_eq!(validate(&guardian, "adult", &ctx()).description, "监护人必须是成年人");

        guardian.birthday = Value::text("1980-01-01");
        assert!(validate(&guardian, "adult", &ctx()).is_success());
    }

    #[test]
    fn test_adult_rule_runs_after_fields() {
        let mut guardian = Guardian::new();
        guardian.birthday = Value::text("2010-01-01");
        assert_eq!(validate(&guardian, "*", &ctx()).description, "请填写姓名");
    }

    #[test]
    fn test_missing_birthday_counts_as_adult() {
        assert!(validate(&Guardian::new(), "adult", &ctx()).is_success());
    }

    #[test]
    fn test_malformed_birthday_rejected() {
        let mut guardian = Guardian::new();
        guardian.birthday = Value::text("abc");
        assert_eq!(validate(&guardian, "adult", &ctx()).description, "监护人必须是成年人");
    }
}
