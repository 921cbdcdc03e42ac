//! Validation dispatcher and built-in validators
//!
//! Validation never fails with an error: every outcome is a
//! [`ValidationResult`]. When several fields are validated the first failure
//! in declaration (or selection) order is reported and the rest dropped.

use tracing::{debug, trace};

use crate::context::ValidationContext;
use crate::enumeration::EnumType;
use crate::format;
use crate::messages;
use crate::result::ValidationResult;
use crate::schema::{FieldDescriptor, FieldType, Model};
use crate::selector::Fields;
use crate::value::Value;

/// Validates the selected fields of an instance
///
/// Names with an attached rule run the rule. Unknown names and fields that
/// are not validatable succeed. With [`Fields::All`], rules flagged to run
/// with all fields follow the stored fields.
pub fn validate(
    model: &dyn Model,
    fields: impl Into<Fields>,
    ctx: &ValidationContext<'_>,
) -> ValidationResult {
    let fields = fields.into();
    let schema = model.schema();
    debug!(model = schema.model(), ?fields, "Validating");

    let results: Vec<ValidationResult> = match &fields {
        Fields::All => {
            let mut results: Vec<_> = schema
                .fields()
                .iter()
                .map(|descriptor| validate_named(model, descriptor.name(), ctx))
                .collect();
            results.extend(
                schema
                    .rules()
                    .iter()
                    .filter(|rule| rule.in_all() && !schema.has_field(rule.name()))
                    .map(|rule| rule.check(model, ctx)),
            );
            results
        }
        Fields::One(name) => vec![validate_named(model, name, ctx)],
        Fields::Many(names) => names
            .iter()
            .map(|name| validate_named(model, name, ctx))
            .collect(),
    };

    ValidationResult::first_failure(results)
}

fn validate_named(model: &dyn Model, name: &str, ctx: &ValidationContext<'_>) -> ValidationResult {
    let schema = model.schema();
    if let Some(rule) = schema.rule(name) {
        trace!(rule = name, "Running rule");
        return rule.check(model, ctx);
    }
    match schema.field(name) {
        Some(descriptor) => validate_field(model, descriptor, ctx),
        None => {
            trace!(field = name, "No such field, vacuously valid");
            ValidationResult::success()
        }
    }
}

/// Context for the fields of a nested instance owned by `parent`
fn child_context<'a>(parent: &dyn Model, ctx: &ValidationContext<'a>) -> ValidationContext<'a> {
    ValidationContext {
        instance: None,
        owner: parent.display_name().or_else(|| ctx.owner.clone()),
        label: None,
        extra_message: None,
        nullable: None,
        age: ctx.age.clone(),
    }
}

fn validate_field(
    model: &dyn Model,
    descriptor: &FieldDescriptor,
    ctx: &ValidationContext<'_>,
) -> ValidationResult {
    if !descriptor.is_validatable() {
        return ValidationResult::success();
    }

    let null = Value::Null;
    let value = model.field(descriptor.name()).unwrap_or(&null);
    let nullable = ctx.nullable.unwrap_or(descriptor.is_nullable());
    if nullable && value.is_empty() {
        return ValidationResult::success();
    }

    let field_ctx = ValidationContext {
        instance: Some(model),
        owner: ctx.owner.clone(),
        label: Some(ctx.label_or(descriptor.label()).to_string()),
        extra_message: ctx.extra_message.clone(),
        nullable: Some(nullable),
        age: ctx.age.clone(),
    };
    trace!(field = descriptor.name(), kind = value.kind(), "Validating field");

    let own = match descriptor.validator() {
        Some(validator) => validator(value, &field_ctx),
        None => match descriptor.field_type() {
            FieldType::Enum(enum_type) => validate_enum_member(value, enum_type(), &field_ctx),
            _ => ValidationResult::success(),
        },
    };
    if own.is_failure() {
        return own;
    }

    match descriptor.field_type() {
        FieldType::Nested(_) => match value {
            Value::Object(nested) => {
                validate(nested.as_ref(), Fields::All, &child_context(model, ctx))
            }
            empty if empty.is_empty() => ValidationResult::failure(messages::nested_required(
                field_ctx.owner(),
                field_ctx.label_or(descriptor.label()),
            )),
            _ => format_failure(&field_ctx),
        },
        FieldType::Elements(_) => match value {
            Value::Null => ValidationResult::success(),
            Value::List(items) => {
                let child_ctx = child_context(model, ctx);
                for item in items {
                    let result = match item {
                        Value::Object(element) => {
                            validate(element.as_ref(), Fields::All, &child_ctx)
                        }
                        _ => format_failure(&field_ctx),
                    };
                    if result.is_failure() {
                        return result;
                    }
                }
                ValidationResult::success()
            }
            _ => format_failure(&field_ctx),
        },
        FieldType::Scalar | FieldType::Enum(_) => own,
    }
}

fn label<'c>(ctx: &'c ValidationContext<'_>) -> &'c str {
    ctx.label_or("")
}

fn format_failure(ctx: &ValidationContext<'_>) -> ValidationResult {
    ValidationResult::failure(messages::format_incorrect(
        ctx.owner(),
        label(ctx),
        ctx.extra_message(),
    ))
}

/// Checks that a value names a member of an enumeration
///
/// Empty values fail with `请选择…` unless the context is nullable; values
/// that resolve to no member fail with `…不受支持`.
pub fn validate_enum_member(
    value: &Value,
    enum_type: &EnumType,
    ctx: &ValidationContext<'_>,
) -> ValidationResult {
    if value.is_empty() {
        return if ctx.is_nullable() {
            ValidationResult::success()
        } else {
            ValidationResult::failure(messages::select_required(ctx.owner(), label(ctx)))
        };
    }
    match enum_type.resolve(value) {
        Some(_) => ValidationResult::success(),
        None => ValidationResult::failure(messages::not_supported(
            ctx.owner(),
            label(ctx),
            ctx.extra_message(),
        )),
    }
}

/// Shared shape of the text format validators
fn validate_text_format(
    value: &Value,
    ctx: &ValidationContext<'_>,
    is_valid: fn(&str) -> bool,
) -> ValidationResult {
    match value {
        empty if empty.is_empty() => {
            if ctx.is_nullable() {
                ValidationResult::success()
            } else {
                ValidationResult::failure(messages::required(ctx.owner(), label(ctx)))
            }
        }
        Value::Text(text) if is_valid(text) => ValidationResult::success(),
        _ => format_failure(ctx),
    }
}

/// Requires a non-empty value
pub fn validate_required_field(value: &Value, ctx: &ValidationContext<'_>) -> ValidationResult {
    if value.is_empty() && !ctx.is_nullable() {
        ValidationResult::failure(messages::required(ctx.owner(), label(ctx)))
    } else {
        ValidationResult::success()
    }
}

pub fn validate_mobile_field(value: &Value, ctx: &ValidationContext<'_>) -> ValidationResult {
    validate_text_format(value, ctx, format::Mobile::is_valid)
}

pub fn validate_email_field(value: &Value, ctx: &ValidationContext<'_>) -> ValidationResult {
    validate_text_format(value, ctx, format::Email::is_valid)
}

pub fn validate_url_field(value: &Value, ctx: &ValidationContext<'_>) -> ValidationResult {
    validate_text_format(value, ctx, format::Url::is_valid)
}

pub fn validate_date_field(value: &Value, ctx: &ValidationContext<'_>) -> ValidationResult {
    validate_text_format(value, ctx, format::LocalDate::is_valid)
}

pub fn validate_timestamp_field(value: &Value, ctx: &ValidationContext<'_>) -> ValidationResult {
    validate_text_format(value, ctx, format::Timestamp::is_valid)
}

pub fn validate_alpha_numeric_field(
    value: &Value,
    ctx: &ValidationContext<'_>,
) -> ValidationResult {
    validate_text_format(value, ctx, format::AlphaNumeric::is_valid)
}

/// Accepts integers and integer text
pub fn validate_integer_field(value: &Value, ctx: &ValidationContext<'_>) -> ValidationResult {
    match value {
        Value::Integer(_) => ValidationResult::success(),
        _ => validate_text_format(value, ctx, format::Integer::is_valid),
    }
}

/// Accepts numbers and numeric text
pub fn validate_float_field(value: &Value, ctx: &ValidationContext<'_>) -> ValidationResult {
    match value {
        Value::Integer(_) | Value::Decimal(_) => ValidationResult::success(),
        _ => validate_text_format(value, ctx, format::Float::is_valid),
    }
}
