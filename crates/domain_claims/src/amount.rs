//! Reading monetary field values

use std::str::FromStr;

use core_kernel::normalize::round_money;
use core_kernel::{CoreError, CoreResult, Value};
use rust_decimal::Decimal;

/// The amount a field holds, rounded to cents
///
/// Unnormalized numeric text is parsed; anything else counts as zero.
pub fn amount(value: &Value) -> Decimal {
    let raw = match value {
        Value::Text(text) => Decimal::from_str(text.trim()).ok(),
        other => other.as_decimal(),
    };
    round_money(raw.unwrap_or(Decimal::ZERO))
}

/// Coerces a value into an unrounded decimal
///
/// Blank text becomes `Null`.
pub fn normalize_decimal(value: &Value) -> CoreResult<Value> {
    match value {
        Value::Null | Value::Decimal(_) => Ok(value.clone()),
        Value::Integer(number) => Ok(Value::Decimal(Decimal::from(*number))),
        Value::Text(text) if text.trim().is_empty() => Ok(Value::Null),
        Value::Text(text) => Decimal::from_str(text.trim())
            .map(Value::Decimal)
            .map_err(|_| CoreError::invalid_format(format!("Invalid decimal format: {}", text))),
        other => Err(CoreError::invalid_format(format!(
            "Invalid decimal value: {}",
            other
        ))),
    }
}

pub(crate) fn zero() -> Value {
    Value::Decimal(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_amount() {
        assert_eq!(amount(&Value::Decimal(dec!(1.005))), dec!(1.01));
        assert_eq!(amount(&Value::Integer(3)), dec!(3));
        assert_eq!(amount(&Value::text(" 2.5 ")), dec!(2.5));
        assert_eq!(amount(&Value::text("abc")), Decimal::ZERO);
        assert_eq!(amount(&Value::Null), Decimal::ZERO);
    }

    #[test]
    fn test_normalize_decimal_keeps_precision() {
        assert_eq!(
            normalize_decimal(&Value::text("0.125")).unwrap(),
            Value::Decimal(dec!(0.125))
        );
        assert_eq!(normalize_decimal(&Value::text(" ")).unwrap(), Value::Null);
        assert!(normalize_decimal(&Value::Bool(true)).is_err());
    }
}
