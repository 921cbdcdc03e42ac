//! Age settings used by validation
//!
//! The reference date and the adult threshold are plain values carried by
//! every [`crate::ValidationContext`]. They can be loaded from the
//! environment (`MODEL_AGE_FROM`, `MODEL_ADULT_MIN_AGE`, `MODEL_TIMEZONE`).

use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::CoreResult;
use crate::temporal::Timezone;

/// Age in years from which a person counts as an adult
pub const DEFAULT_ADULT_MIN_AGE: u32 = 18;

/// Settings for age and adulthood checks
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AgeSettings {
    /// Fixed reference date; `None` means today in `timezone`
    pub age_from: Option<NaiveDate>,
    /// Minimum age in full years of an adult
    pub adult_min_age: u32,
    /// Timezone used to determine today's date
    pub timezone: Timezone,
}

impl Default for AgeSettings {
    fn default() -> Self {
        Self {
            age_from: None,
            adult_min_age: DEFAULT_ADULT_MIN_AGE,
            timezone: Timezone::new(chrono_tz::Asia::Shanghai),
        }
    }
}

impl AgeSettings {
    /// Loads settings from `MODEL_*` environment variables, defaulting the rest
    pub fn from_env() -> CoreResult<Self> {
        Self::from_source(config::Environment::with_prefix("MODEL").try_parsing(true))
    }

    /// Loads settings from any configuration source, defaulting the rest
    pub fn from_source<S>(source: S) -> CoreResult<Self>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let settings = config::Config::builder()
            .add_source(source)
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }

    pub fn with_age_from(mut self, age_from: NaiveDate) -> Self {
        self.age_from = Some(age_from);
        self
    }

    pub fn with_adult_min_age(mut self, adult_min_age: u32) -> Self {
        self.adult_min_age = adult_min_age;
        self
    }

    pub fn with_timezone(mut self, timezone: Timezone) -> Self {
        self.timezone = timezone;
        self
    }

    /// The date ages are measured against
    pub fn reference_date(&self) -> NaiveDate {
        self.age_from.unwrap_or_else(|| self.timezone.today())
    }
}
