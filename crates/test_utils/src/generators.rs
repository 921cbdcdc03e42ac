//! Property-Based Test Generators
//!
//! Provides proptest strategies for generating random test data
//! that maintains domain invariants.

use chrono::{Days, NaiveDate};
use core_kernel::format::IdentityCard;
use core_kernel::Value;
use proptest::prelude::*;
use rust_decimal::Decimal;

static REGIONS: [&str; 5] = ["110101", "310101", "320219", "440305", "510104"];

/// Strategy for birthdays between 1940 and 2023
pub fn birthday_strategy() -> impl Strategy<Value = NaiveDate> {
    (0u64..30_600).prop_map(|offset| {
        NaiveDate::from_ymd_opt(1940, 1, 1)
            .and_then(|start| start.checked_add_days(Days::new(offset)))
            .unwrap()
    })
}

/// Strategy for checksum-valid 18-digit identity card numbers
pub fn identity_card_strategy() -> impl Strategy<Value = String> {
    (
        proptest::sample::select(&REGIONS[..]),
        birthday_strategy(),
        0u32..1000,
    )
        .prop_map(|(region, birthday, sequence)| {
            let body = format!("{}{}{:03}", region, birthday.format("%Y%m%d"), sequence);
            let check = IdentityCard::check_char(&body).unwrap();
            format!("{}{}", body, check)
        })
}

/// Strategy for owner names of two to four CJK characters
pub fn owner_strategy() -> impl Strategy<Value = String> {
    "[\u{4e00}-\u{9fa5}]{2,4}"
}

/// Strategy for valid mobile numbers
pub fn mobile_strategy() -> impl Strategy<Value = String> {
    "1[3-9][0-9]{9}"
}

/// Strategy for text that is never a mobile number
pub fn non_mobile_strategy() -> impl Strategy<Value = String> {
    "[a-z]{1,10}"
}

/// Strategy for the values a nullable field treats as absent
pub fn blank_value_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![Just(Value::Null), Just(Value::text(""))]
}

/// Strategy for surrounding whitespace
pub fn padding_strategy() -> impl Strategy<Value = String> {
    "[ \t]{0,3}"
}

/// Strategy for non-negative amounts with cent precision
pub fn amount_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..100_000_000).prop_map(|cents| Decimal::new(cents, 2))
}
