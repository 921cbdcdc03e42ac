//! Dates, timezones and age arithmetic
//!
//! Ages follow calendar-month arithmetic: the distance between two dates in
//! months is the whole number of months between them plus the fraction of the
//! month in which they fall apart, and years are months divided by twelve.
//! Non-precise ages truncate toward zero.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Months, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::config::AgeSettings;
use crate::schema::Model;
use crate::value::Value;

/// Timezone wrapper used to determine "today"
///
/// Wraps chrono_tz::Tz with custom serialization support.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timezone(pub Tz);

impl Serialize for Timezone {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.0.name())
    }
}

impl<'de> Deserialize<'de> for Timezone {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Tz::from_str(&s)
            .map(Timezone)
            .map_err(|_| serde::de::Error::custom(format!("Invalid timezone: {}", s)))
    }
}

impl Timezone {
    pub fn new(tz: Tz) -> Self {
        Self(tz)
    }

    /// Converts a UTC datetime to the local timezone
    pub fn to_local(&self, utc: DateTime<Utc>) -> DateTime<Tz> {
        utc.with_timezone(&self.0)
    }

    /// Today's date in this timezone
    pub fn today(&self) -> NaiveDate {
        self.to_local(Utc::now()).date_naive()
    }
}

impl Default for Timezone {
    fn default() -> Self {
        Self(chrono_tz::Asia::Shanghai)
    }
}

impl fmt::Display for Timezone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.name())
    }
}

/// Unit an age is measured in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgeUnit {
    Day,
    Month,
    Year,
}

fn add_months(date: NaiveDate, months: i32) -> NaiveDate {
    let shifted = if months >= 0 {
        date.checked_add_months(Months::new(months.unsigned_abs()))
    } else {
        date.checked_sub_months(Months::new(months.unsigned_abs()))
    };
    shifted.unwrap_or(date)
}

/// Signed distance in months from `b` to `a`, with the partial month as a fraction
fn month_diff(a: NaiveDate, b: NaiveDate) -> f64 {
    if a.day() < b.day() {
        return -month_diff(b, a);
    }
    let whole = (b.year() - a.year()) * 12 + (b.month() as i32 - a.month() as i32);
    let anchor = add_months(a, whole);
    let before = b < anchor;
    let other = add_months(a, whole + if before { -1 } else { 1 });
    let offset = (b - anchor).num_days() as f64;
    let span = if before {
        (anchor - other).num_days()
    } else {
        (other - anchor).num_days()
    } as f64;

    let months = -(f64::from(whole) + offset / span);
    if months == 0.0 {
        0.0
    } else {
        months
    }
}

/// Age at `reference` of someone born on `birthday`
///
/// # Arguments
///
/// * `birthday` - Date of birth
/// * `reference` - Date the age is measured at
/// * `unit` - Days, months or years
/// * `precise` - Keep the fractional part instead of truncating
pub fn age_between(birthday: NaiveDate, reference: NaiveDate, unit: AgeUnit, precise: bool) -> f64 {
    let age = match unit {
        AgeUnit::Day => (reference - birthday).num_days() as f64,
        AgeUnit::Month => month_diff(reference, birthday),
        AgeUnit::Year => month_diff(reference, birthday) / 12.0,
    };
    if precise {
        age
    } else {
        age.trunc()
    }
}

/// An entity that records a date of birth
pub trait HasBirthday {
    /// The parsed birthday; `None` when empty or malformed
    fn birthday(&self) -> Option<NaiveDate>;

    /// Returns true if any birthday is recorded, parsable or not
    fn has_birthday(&self) -> bool {
        self.birthday().is_some()
    }
}

/// Any model with a stored `birthday` field
impl HasBirthday for dyn Model {
    fn birthday(&self) -> Option<NaiveDate> {
        self.field("birthday").and_then(parse_birthday)
    }

    fn has_birthday(&self) -> bool {
        self.field("birthday").is_some_and(|value| !value.is_empty())
    }
}

/// Parses a stored `YYYY-M-D` birthday value; months and days may be unpadded
pub fn parse_birthday(value: &Value) -> Option<NaiveDate> {
    let text = value.as_text()?.trim();
    NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()
}

/// Age of an entity at the settings' reference date, `None` without a birthday
pub fn age_of<E>(entity: &E, settings: &AgeSettings, unit: AgeUnit, precise: bool) -> Option<f64>
where
    E: HasBirthday + ?Sized,
{
    entity
        .birthday()
        .map(|birthday| age_between(birthday, settings.reference_date(), unit, precise))
}

/// Returns true if the entity is an adult
///
/// An entity without a birthday counts as an adult, one whose birthday
/// cannot be parsed does not.
pub fn is_adult<E>(entity: &E, settings: &AgeSettings) -> bool
where
    E: HasBirthday + ?Sized,
{
    match age_of(entity, settings, AgeUnit::Year, true) {
        Some(age) => age >= f64::from(settings.adult_min_age),
        None => !entity.has_birthday(),
    }
}
