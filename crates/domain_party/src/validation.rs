//! Field validators of the person models
//!
//! Gender and birthday are cross-checked against a valid identity card held
//! in the `credential` field of the instance under validation.

use chrono::NaiveDate;
use core_kernel::format::{IdentityCard, LocalDate, OfficerCard, OtherCredential, Passport};
use core_kernel::messages as core_messages;
use core_kernel::{Enumeration, Model, ValidationContext, ValidationResult, Value};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::trace;

use crate::credential::{Credential, CredentialType};
use crate::messages;
use crate::person::Gender;

static PERSON_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[\p{Han}A-Za-z][\p{Han}A-Za-z·. ]{0,49}$").expect("Invalid person name regex")
});

/// Identity card number held by the instance, if it is a valid one
fn identity_card_of<'a>(instance: Option<&'a dyn Model>) -> Option<&'a str> {
    let credential = instance?.field("credential")?.downcast_ref::<Credential>()?;
    if !credential.is_identity_card() {
        return None;
    }
    credential
        .number()
        .filter(|number| IdentityCard::is_valid(number))
}

/// Checks that a value names a credential type
pub fn validate_credential_type_field(
    value: &Value,
    ctx: &ValidationContext<'_>,
) -> ValidationResult {
    let label = ctx.label_or("证件类型");
    if value.is_empty() {
        return if ctx.is_nullable() {
            ValidationResult::success()
        } else {
            ValidationResult::failure(core_messages::select_required(ctx.owner(), label))
        };
    }
    if CredentialType::resolve(value).is_some() {
        ValidationResult::success()
    } else {
        ValidationResult::failure(core_messages::not_supported(
            ctx.owner(),
            label,
            ctx.extra_message(),
        ))
    }
}

/// Checks a credential number against the format of the instance's credential type
///
/// Messages name the credential type, e.g. `身份证号码格式不正确`; an unknown
/// type is called `证件` and its numbers are checked as other credentials.
pub fn validate_credential_number_field(
    value: &Value,
    ctx: &ValidationContext<'_>,
) -> ValidationResult {
    let label = ctx.label_or("");
    let credential_type = ctx
        .instance
        .and_then(|instance| instance.field("type"))
        .and_then(CredentialType::resolve);
    let credential = credential_type.map_or("证件", |kind| kind.name());

    if value.is_empty() {
        return if ctx.is_nullable() {
            ValidationResult::success()
        } else {
            ValidationResult::failure(messages::credential_number_required(
                ctx.owner(),
                credential,
                label,
            ))
        };
    }

    let number = value.as_text().unwrap_or_default();
    let valid = !number.is_empty()
        && match credential_type {
            Some(CredentialType::IdentityCard) => IdentityCard::is_valid(number),
            Some(CredentialType::Passport) => Passport::is_valid(number),
            Some(CredentialType::OfficerCard) => OfficerCard::is_valid(number),
            _ => OtherCredential::is_valid(number),
        };
    trace!(?credential_type, valid, "Checked credential number");

    if valid {
        ValidationResult::success()
    } else {
        ValidationResult::failure(messages::credential_number_format_incorrect(
            ctx.owner(),
            credential,
            label,
            ctx.extra_message(),
        ))
    }
}

/// Checks a person's name: letters or Han characters, at most 50 of them
pub fn validate_person_name_field(value: &Value, ctx: &ValidationContext<'_>) -> ValidationResult {
    let label = ctx.label_or("姓名");
    if value.is_empty() {
        return if ctx.is_nullable() {
            ValidationResult::success()
        } else {
            ValidationResult::failure(core_messages::required(ctx.owner(), label))
        };
    }
    match value.as_text() {
        Some(name) if PERSON_NAME.is_match(name) => ValidationResult::success(),
        _ => ValidationResult::failure(messages::person_name_format_incorrect(
            ctx.owner(),
            label,
            ctx.extra_message(),
        )),
    }
}

/// Checks a gender, and that it agrees with a valid identity card
pub fn validate_person_gender_field(value: &Value, ctx: &ValidationContext<'_>) -> ValidationResult {
    let label = ctx.label_or("性别");
    if value.is_empty() {
        return if ctx.is_nullable() {
            ValidationResult::success()
        } else {
            ValidationResult::failure(messages::person_field_required(ctx.owner(), label))
        };
    }
    let Some(actual) = Gender::resolve(value) else {
        return ValidationResult::failure(messages::person_gender_unsupported(
            ctx.owner(),
            label,
            ctx.extra_message(),
        ));
    };
    if let Some(number) = identity_card_of(ctx.instance) {
        let expected = IdentityCard::gender(number).and_then(|gender| Gender::of_value(gender.value()));
        if expected != Some(actual) {
            return ValidationResult::failure(messages::person_card_mismatch(ctx.owner(), label));
        }
    }
    ValidationResult::success()
}

/// Checks a `YYYY-MM-DD` birthday, and that it agrees with a valid identity card
pub fn validate_person_birthday_field(
    value: &Value,
    ctx: &ValidationContext<'_>,
) -> ValidationResult {
    let label = ctx.label_or("出生日期");
    if value.is_empty() {
        return if ctx.is_nullable() {
            ValidationResult::success()
        } else {
            ValidationResult::failure(messages::person_field_required(ctx.owner(), label))
        };
    }
    let Some(actual) = value.as_text().and_then(LocalDate::parse) else {
        return ValidationResult::failure(core_messages::format_incorrect(
            ctx.owner(),
            label,
            ctx.extra_message(),
        ));
    };
    if let Some(number) = identity_card_of(ctx.instance) {
        let expected: Option<NaiveDate> = IdentityCard::birthday(number);
        if expected != Some(actual) {
            return ValidationResult::failure(messages::person_card_mismatch(ctx.owner(), label));
        }
    }
    ValidationResult::success()
}
