//! Normalization dispatcher and built-in normalizers
//!
//! Normalization rewrites the selected fields of an instance in place,
//! coercing raw input into canonical values. Nested instances and lists of
//! instances are normalized recursively. Every built-in normalizer is
//! idempotent: normalizing an already normalized value returns it unchanged.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::{debug, trace};

use crate::error::{CoreError, CoreResult};
use crate::schema::{FieldDescriptor, FieldType, Model};
use crate::selector::Fields;
use crate::value::Value;

/// Normalizes the selected fields of an instance
///
/// Unknown field names and fields that are not normalizable are skipped.
///
/// # Errors
///
/// Returns the first contract error raised by a normalizer, for example
/// `InvalidFormat` for non-numeric text in an integer field.
pub fn normalize(model: &mut dyn Model, fields: impl Into<Fields>) -> CoreResult<()> {
    let schema = model.schema();
    let fields = fields.into();
    debug!(model = schema.model(), ?fields, "Normalizing");

    match &fields {
        Fields::All => {
            for descriptor in schema.fields() {
                normalize_field(model, descriptor)?;
            }
        }
        Fields::One(name) => normalize_named(model, name)?,
        Fields::Many(names) => {
            for name in names {
                normalize_named(model, name)?;
            }
        }
    }
    Ok(())
}

fn normalize_named(model: &mut dyn Model, name: &str) -> CoreResult<()> {
    match model.schema().field(name) {
        Some(descriptor) => normalize_field(model, descriptor),
        None => {
            trace!(field = name, "No such field, skipped");
            Ok(())
        }
    }
}

fn normalize_field(model: &mut dyn Model, descriptor: &FieldDescriptor) -> CoreResult<()> {
    if !descriptor.is_normalizable() {
        return Ok(());
    }
    let Some(slot) = model.field_mut(descriptor.name()) else {
        return Ok(());
    };
    trace!(field = descriptor.name(), kind = slot.kind(), "Normalizing field");

    match descriptor.field_type() {
        FieldType::Nested(model_type) => match slot {
            Value::Object(nested) => normalize(nested.as_mut(), Fields::All),
            Value::Null if descriptor.is_nullable() => Ok(()),
            _ if !descriptor.is_nullable() => {
                let mut nested = model_type.create();
                normalize(nested.as_mut(), Fields::All)?;
                *slot = Value::Object(nested);
                Ok(())
            }
            other => Err(CoreError::type_mismatch(
                descriptor.name(),
                format!("{} instance, got {}", model_type.name(), other.kind()),
            )),
        },
        FieldType::Elements(model_type) => match slot {
            Value::Null => Ok(()),
            Value::List(items) => {
                for item in items.iter_mut() {
                    match item {
                        Value::Object(element) => normalize(element.as_mut(), Fields::All)?,
                        Value::Null => {}
                        other => {
                            return Err(CoreError::type_mismatch(
                                descriptor.name(),
                                format!("{} elements, got {}", model_type.name(), other.kind()),
                            ))
                        }
                    }
                }
                Ok(())
            }
            other => Err(CoreError::type_mismatch(
                descriptor.name(),
                format!("list of {}, got {}", model_type.name(), other.kind()),
            )),
        },
        FieldType::Enum(enum_type) => {
            if let Some(normalizer) = descriptor.normalizer() {
                *slot = normalizer(slot)?;
            }
            if let Value::Text(text) = slot {
                let key = text.trim();
                *slot = match enum_type().of(key) {
                    Some(item) => Value::Enum(item),
                    None => Value::Text(key.to_string()),
                };
            }
            Ok(())
        }
        FieldType::Scalar => {
            let normalizer = descriptor.normalizer().unwrap_or(trim_string);
            match slot {
                Value::Null => Ok(()),
                Value::List(items) => {
                    for item in items.iter_mut() {
                        *item = normalizer(item)?;
                    }
                    Ok(())
                }
                other => {
                    *other = normalizer(other)?;
                    Ok(())
                }
            }
        }
    }
}

/// Trims surrounding whitespace from text; other values pass through
pub fn trim_string(value: &Value) -> CoreResult<Value> {
    Ok(match value {
        Value::Text(text) => Value::Text(text.trim().to_string()),
        other => other.clone(),
    })
}

/// Trims and upper-cases text; other values pass through
pub fn trim_uppercase_string(value: &Value) -> CoreResult<Value> {
    Ok(match value {
        Value::Text(text) => Value::Text(text.trim().to_uppercase()),
        other => other.clone(),
    })
}

/// Coerces a value into an integer
///
/// The empty string becomes `0`; other text must be an optionally signed
/// run of digits. Decimals are accepted only without a fractional part.
pub fn normalize_integer(value: &Value) -> CoreResult<Value> {
    match value {
        Value::Null | Value::Integer(_) => Ok(value.clone()),
        Value::Text(text) if text.is_empty() => Ok(Value::Integer(0)),
        Value::Text(text) => i64::from_str(text.trim())
            .map(Value::Integer)
            .map_err(|_| CoreError::invalid_format(format!("Invalid integer format: {}", text))),
        Value::Decimal(amount) if amount.fract().is_zero() => amount
            .to_i64()
            .map(Value::Integer)
            .ok_or_else(|| CoreError::invalid_format(format!("Integer out of range: {}", amount))),
        other => Err(CoreError::invalid_format(format!(
            "Invalid integer value: {}",
            other
        ))),
    }
}

/// Rounds a monetary amount to cents, half away from zero
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Coerces a value into a decimal amount rounded to two places
///
/// Blank text becomes `Null`.
pub fn normalize_money(value: &Value) -> CoreResult<Value> {
    match value {
        Value::Null => Ok(Value::Null),
        Value::Integer(number) => Ok(Value::Decimal(Decimal::from(*number))),
        Value::Decimal(amount) => Ok(Value::Decimal(round_money(*amount))),
        Value::Text(text) if text.trim().is_empty() => Ok(Value::Null),
        Value::Text(text) => Decimal::from_str(text.trim())
            .map(|amount| Value::Decimal(round_money(amount)))
            .map_err(|_| CoreError::invalid_format(format!("Invalid amount format: {}", text))),
        other => Err(CoreError::invalid_format(format!(
            "Invalid amount value: {}",
            other
        ))),
    }
}

/// Coerces `true`/`false`, `1`/`0` and `yes`/`no` into a boolean
///
/// Blank text becomes `Null`.
pub fn normalize_bool(value: &Value) -> CoreResult<Value> {
    match value {
        Value::Null | Value::Bool(_) => Ok(value.clone()),
        Value::Integer(0) => Ok(Value::Bool(false)),
        Value::Integer(1) => Ok(Value::Bool(true)),
        Value::Text(text) => match text.trim().to_lowercase().as_str() {
            "" => Ok(Value::Null),
            "true" | "1" | "yes" => Ok(Value::Bool(true)),
            "false" | "0" | "no" => Ok(Value::Bool(false)),
            _ => Err(CoreError::invalid_format(format!(
                "Invalid boolean format: {}",
                text
            ))),
        },
        other => Err(CoreError::invalid_format(format!(
            "Invalid boolean value: {}",
            other
        ))),
    }
}

/// Rewrites a date into `YYYY-MM-DD`
///
/// Accepts `-`, `/` or `.` separators, unpadded months and days, and ignores
/// anything after the first whitespace (such as a weekday). Text that is not
/// a date is kept trimmed, for validation to report.
pub fn normalize_date(value: &Value) -> CoreResult<Value> {
    let Value::Text(text) = value else {
        return Ok(value.clone());
    };
    let trimmed = text.trim();
    let candidate = trimmed
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .replace(['/', '.'], "-");
    Ok(match NaiveDate::parse_from_str(&candidate, "%Y-%m-%d") {
        Ok(date) => Value::Text(date.format("%Y-%m-%d").to_string()),
        Err(_) => Value::Text(trimmed.to_string()),
    })
}

/// Rewrites a timestamp into RFC 3339 UTC with second precision
///
/// Timestamps without an offset are read as UTC. Text that is not a
/// timestamp is kept trimmed.
pub fn normalize_timestamp(value: &Value) -> CoreResult<Value> {
    let Value::Text(text) = value else {
        return Ok(value.clone());
    };
    let trimmed = text.trim();
    let parsed = DateTime::parse_from_rfc3339(trimmed)
        .map(|timestamp| timestamp.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"]
                .iter()
                .find_map(|pattern| NaiveDateTime::parse_from_str(trimmed, pattern).ok())
                .map(|naive| naive.and_utc())
        });
    Ok(match parsed {
        Some(timestamp) => Value::Text(timestamp.to_rfc3339_opts(SecondsFormat::Secs, true)),
        None => Value::Text(trimmed.to_string()),
    })
}
