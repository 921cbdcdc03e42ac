//! Field selectors for normalization and validation

use serde_json::Value as JsonValue;

use crate::error::{CoreError, CoreResult};

/// Which fields of a model an operation applies to
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Fields {
    /// All declared fields, `"*"`
    #[default]
    All,
    One(String),
    /// Several fields, in the given order
    Many(Vec<String>),
}

impl Fields {
    pub fn one(name: impl Into<String>) -> Self {
        let name = name.into();
        if name == "*" {
            Fields::All
        } else {
            Fields::One(name)
        }
    }

    pub fn many<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Fields::Many(names.into_iter().map(Into::into).collect())
    }

    /// Parses a selector received as JSON: `null`, `"*"`, a name or an array of names
    pub fn from_json(selector: &JsonValue) -> CoreResult<Self> {
        match selector {
            JsonValue::Null => Ok(Fields::All),
            JsonValue::String(name) => Ok(Fields::one(name.as_str())),
            JsonValue::Array(names) => names
                .iter()
                .map(|name| {
                    name.as_str()
                        .map(str::to_string)
                        .ok_or_else(|| CoreError::UnsupportedSelector(selector.to_string()))
                })
                .collect::<CoreResult<Vec<_>>>()
                .map(Fields::Many),
            other => Err(CoreError::UnsupportedSelector(other.to_string())),
        }
    }
}

impl From<&str> for Fields {
    fn from(name: &str) -> Self {
        Fields::one(name)
    }
}

impl From<String> for Fields {
    fn from(name: String) -> Self {
        Fields::one(name)
    }
}

impl From<&[&str]> for Fields {
    fn from(names: &[&str]) -> Self {
        Fields::many(names.iter().copied())
    }
}

impl<const N: usize> From<[&str; N]> for Fields {
    fn from(names: [&str; N]) -> Self {
        Fields::many(names)
    }
}

impl From<Vec<String>> for Fields {
    fn from(names: Vec<String>) -> Self {
        Fields::Many(names)
    }
}
