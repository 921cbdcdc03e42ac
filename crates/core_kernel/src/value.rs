//! Dynamic field values
//!
//! Model fields hold raw, possibly stringly-typed input until they are
//! normalized, so every declared field is stored as a [`Value`]. Nested
//! model instances are owned through [`Value::Object`], arrays of them through
//! [`Value::List`].

use std::fmt;

use rust_decimal::Decimal;
use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};

use crate::enumeration::EnumItem;
use crate::schema::{models_equal, serialize_model, Model};

/// A field value of a model instance
#[derive(Debug, Clone, Default)]
pub enum Value {
    /// Absent value (covers both `null` and `undefined` input)
    #[default]
    Null,
    Bool(bool),
    Integer(i64),
    Decimal(Decimal),
    Text(String),
    /// A resolved member of an enumeration
    Enum(EnumItem),
    /// An exclusively owned nested model instance
    Object(Box<dyn Model>),
    List(Vec<Value>),
}

impl Value {
    /// Creates a text value
    pub fn text(text: impl Into<String>) -> Self {
        Value::Text(text.into())
    }

    /// Wraps a model instance
    pub fn object<M: Model>(model: M) -> Self {
        Value::Object(Box::new(model))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns true for `Null` and the empty string, the values an optional
    /// field is allowed to hold without further checks
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Text(text) => text.is_empty(),
            _ => false,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(flag) => Some(*flag),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(number) => Some(*number),
            _ => None,
        }
    }

    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Value::Decimal(amount) => Some(*amount),
            Value::Integer(number) => Some(Decimal::from(*number)),
            _ => None,
        }
    }

    pub fn as_enum(&self) -> Option<EnumItem> {
        match self {
            Value::Enum(item) => Some(*item),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_model(&self) -> Option<&dyn Model> {
        match self {
            Value::Object(model) => Some(model.as_ref()),
            _ => None,
        }
    }

    pub fn as_model_mut(&mut self) -> Option<&mut dyn Model> {
        match self {
            Value::Object(model) => Some(model.as_mut()),
            _ => None,
        }
    }

    /// Borrows the nested instance as a concrete model type
    pub fn downcast_ref<T: Model>(&self) -> Option<&T> {
        self.as_model()?.as_any().downcast_ref::<T>()
    }

    /// Mutably borrows the nested instance as a concrete model type
    pub fn downcast_mut<T: Model>(&mut self) -> Option<&mut T> {
        self.as_model_mut()?.as_any_mut().downcast_mut::<T>()
    }

    /// Short name of the variant, used in contract error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Integer(_) => "integer",
            Value::Decimal(_) => "decimal",
            Value::Text(_) => "text",
            Value::Enum(_) => "enum",
            Value::Object(_) => "object",
            Value::List(_) => "list",
        }
    }

    /// Converts this value into its JSON representation
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Decimal(a), Value::Decimal(b)) => a == b,
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Enum(a), Value::Enum(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => models_equal(a.as_ref(), b.as_ref()),
            (Value::List(a), Value::List(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(flag) => write!(f, "{}", flag),
            Value::Integer(number) => write!(f, "{}", number),
            Value::Decimal(amount) => write!(f, "{}", amount),
            Value::Text(text) => f.write_str(text),
            Value::Enum(item) => f.write_str(item.value()),
            Value::Object(model) => write!(f, "{}", model.schema().model()),
            Value::List(items) => write!(f, "[{} items]", items.len()),
        }
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Null => serializer.serialize_none(),
            Value::Bool(flag) => serializer.serialize_bool(*flag),
            Value::Integer(number) => serializer.serialize_i64(*number),
            Value::Decimal(amount) => Serialize::serialize(amount, serializer),
            Value::Text(text) => serializer.serialize_str(text),
            Value::Enum(item) => serializer.serialize_str(item.value()),
            Value::Object(model) => serialize_model(model.as_ref(), serializer),
            Value::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
        }
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::Text(text.to_string())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Value::Text(text)
    }
}

impl From<bool> for Value {
    fn from(flag: bool) -> Self {
        Value::Bool(flag)
    }
}

impl From<i64> for Value {
    fn from(number: i64) -> Self {
        Value::Integer(number)
    }
}

impl From<i32> for Value {
    fn from(number: i32) -> Self {
        Value::Integer(i64::from(number))
    }
}

impl From<Decimal> for Value {
    fn from(amount: Decimal) -> Self {
        Value::Decimal(amount)
    }
}

impl From<EnumItem> for Value {
    fn from(item: EnumItem) -> Self {
        Value::Enum(item)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_empty_values() {
        assert!(Value::Null.is_empty());
        assert!(Value::text("").is_empty());
        assert!(!Value::text(" ").is_empty());
        assert!(!Value::Integer(0).is_empty());
        assert!(!Value::List(vec![]).is_empty());
    }

    #[test]
    fn test_decimal_accessor_widens_integers() {
        assert_eq!(Value::Integer(12).as_decimal(), Some(dec!(12)));
        assert_eq!(Value::Decimal(dec!(1.25)).as_decimal(), Some(dec!(1.25)));
        assert_eq!(Value::text("1.25").as_decimal(), None);
    }

    #[test]
    fn test_json_representation() {
        let list = Value::List(vec![Value::Integer(1), Value::text("a"), Value::Null]);
        assert_eq!(list.to_json(), serde_json::json!([1, "a", null]));
    }

    #[test]
    fn test_decimal_json_representation() {
        let amount = Value::Decimal(dec!(12.50));
        assert_eq!(amount.to_json(), serde_json::json!("12.50"));
        assert_eq!(serde_json::to_string(&amount).unwrap(), "\"12.50\"");
    }

    #[test]
    fn test_option_conversion() {
        assert_eq!(Value::from(None::<String>), Value::Null);
        assert_eq!(Value::from(Some("x")), Value::text("x"));
    }
}
