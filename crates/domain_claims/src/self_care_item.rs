//! Class B self-care items of an invoice

use core_kernel::normalize::normalize_money;
use core_kernel::validate::validate_float_field;
use core_kernel::{define_model, CoreResult, FieldDescriptor, Schema, ValidationResult, Value};
use rust_decimal::Decimal;

use crate::amount::{amount, normalize_decimal, zero};
use crate::messages::message;

fn self_care_item_schema() -> CoreResult<Schema> {
    Schema::builder("SelfCareItem")
        .field(FieldDescriptor::new("name", "自理项目名称").normalizable())
        .field(
            FieldDescriptor::new("amount", "自理项目金额")
                .normalize_with(normalize_money)
                .validate_with(validate_float_field)
                .default_with(zero),
        )
        .field(
            FieldDescriptor::new("ratio", "自理项目比例")
                .normalize_with(normalize_decimal)
                .validate_with(validate_float_field)
                .default_with(zero),
        )
        .build()
}

define_model! {
    /// An item the insured pays part of, at a fixed ratio
    pub struct SelfCareItem {
        name,
        amount,
        ratio,
    }
    schema = self_care_item_schema;
}

impl SelfCareItem {
    pub fn of(name: &str, amount: Decimal, ratio: Decimal) -> Self {
        Self {
            name: Value::text(name),
            amount: Value::Decimal(amount),
            ratio: Value::Decimal(ratio),
        }
    }

    /// The ratio as stored; unreadable values count as zero
    pub fn ratio(&self) -> Decimal {
        match &self.ratio {
            Value::Text(text) => text.trim().parse().unwrap_or(Decimal::ZERO),
            other => other.as_decimal().unwrap_or(Decimal::ZERO),
        }
    }

    /// Part of the amount the insured pays
    pub fn self_care_amount(&self) -> Decimal {
        amount(&self.amount) * self.ratio()
    }

    /// Checks that an item exists, its amount is not negative and its ratio
    /// lies within `[0, 1]`
    pub fn check(item: Option<&SelfCareItem>) -> ValidationResult {
        let Some(item) = item else {
            return ValidationResult::failure(message("self-care-item-missing"));
        };
        if amount(&item.amount) < Decimal::ZERO {
            return ValidationResult::failure(message("self-care-amount-negative"));
        }
        let ratio = item.ratio();
        if ratio < Decimal::ZERO || ratio > Decimal::ONE {
            return ValidationResult::failure(message("self-care-ratio-out-of-range"));
        }
        ValidationResult::success()
    }
}
