//! Building model instances from JSON and back

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use serde_json::Value as JsonValue;
use tracing::trace;

use crate::error::{CoreError, CoreResult};
use crate::normalize::normalize;
use crate::schema::{serialize_model, FieldDescriptor, FieldType, Model, TypedModel};
use crate::selector::Fields;
use crate::value::Value;

/// Copies the declared fields of a JSON object into an instance
///
/// Keys missing from the object keep their current values, undeclared keys
/// are ignored. Nested objects and arrays of objects are built through the
/// field's model type. `null` in a non-nullable nested field yields a default
/// instance.
///
/// # Arguments
///
/// * `model` - The instance to fill
/// * `json` - A JSON object, or `null` to leave the instance untouched
/// * `normalize_fields` - Normalize all fields after copying
pub fn assign(model: &mut dyn Model, json: &JsonValue, normalize_fields: bool) -> CoreResult<()> {
    let schema = model.schema();
    let map = match json {
        JsonValue::Object(map) => map,
        JsonValue::Null => return Ok(()),
        other => {
            return Err(CoreError::type_mismatch(
                schema.model(),
                format!("JSON object, got {}", other),
            ))
        }
    };

    for descriptor in schema.fields() {
        let Some(raw) = map.get(descriptor.name()) else {
            continue;
        };
        let value = value_from_json(descriptor, raw)?;
        if let Some(slot) = model.field_mut(descriptor.name()) {
            trace!(field = descriptor.name(), kind = value.kind(), "Assigned");
            *slot = value;
        }
    }

    if normalize_fields {
        normalize(model, Fields::All)?;
    }
    Ok(())
}

/// Creates a normalized instance from JSON; `None` for `null`
pub fn create<T: TypedModel>(json: &JsonValue) -> CoreResult<Option<T>> {
    if json.is_null() {
        return Ok(None);
    }
    let mut model = T::default();
    assign(&mut model, json, true)?;
    Ok(Some(model))
}

/// Serializes an instance into a JSON object keyed by its field names
pub fn to_json(model: &dyn Model) -> JsonValue {
    serde_json::to_value(ModelRef(model)).unwrap_or(JsonValue::Null)
}

struct ModelRef<'a>(&'a dyn Model);

impl Serialize for ModelRef<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serialize_model(self.0, serializer)
    }
}

fn value_from_json(descriptor: &FieldDescriptor, raw: &JsonValue) -> CoreResult<Value> {
    match descriptor.field_type() {
        FieldType::Nested(model_type) => match raw {
            JsonValue::Null if descriptor.is_nullable() => Ok(Value::Null),
            JsonValue::Null => Ok(Value::Object(model_type.create())),
            JsonValue::Object(_) => {
                let mut nested = model_type.create();
                assign(nested.as_mut(), raw, false)?;
                Ok(Value::Object(nested))
            }
            other => Err(CoreError::type_mismatch(
                descriptor.name(),
                format!("{} object, got {}", model_type.name(), other),
            )),
        },
        FieldType::Elements(model_type) => match raw {
            JsonValue::Null => Ok(Value::Null),
            JsonValue::Array(items) => items
                .iter()
                .map(|item| match item {
                    JsonValue::Null => Ok(Value::Null),
                    JsonValue::Object(_) => {
                        let mut element = model_type.create();
                        assign(element.as_mut(), item, false)?;
                        Ok(Value::Object(element))
                    }
                    other => Err(CoreError::type_mismatch(
                        descriptor.name(),
                        format!("{} object, got {}", model_type.name(), other),
                    )),
                })
                .collect::<CoreResult<Vec<_>>>()
                .map(Value::List),
            other => Err(CoreError::type_mismatch(
                descriptor.name(),
                format!("array of {}, got {}", model_type.name(), other),
            )),
        },
        FieldType::Scalar | FieldType::Enum(_) => Ok(scalar_from_json(raw)),
    }
}

/// Converts a JSON value into a field value without any schema knowledge
pub fn scalar_from_json(raw: &JsonValue) -> Value {
    match raw {
        JsonValue::Null => Value::Null,
        JsonValue::Bool(flag) => Value::Bool(*flag),
        JsonValue::Number(number) => match number.as_i64() {
            Some(integer) => Value::Integer(integer),
            None => {
                let text = number.to_string();
                Decimal::from_str(&text)
                    .or_else(|_| Decimal::from_scientific(&text))
                    .map(Value::Decimal)
                    .unwrap_or(Value::Text(text))
            }
        },
        JsonValue::String(text) => Value::Text(text.clone()),
        JsonValue::Array(items) => Value::List(items.iter().map(scalar_from_json).collect()),
        JsonValue::Object(_) => Value::Text(raw.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::{normalize_integer, trim_string};
    use crate::schema::Schema;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn item_schema() -> CoreResult<Schema> {
        Schema::builder("Item")
            .field(FieldDescriptor::new("name", "名称").normalize_with(trim_string))
            .field(FieldDescriptor::new("count", "数量").normalize_with(normalize_integer))
            .build()
    }

    crate::define_model! {
        struct Item {
            name,
            count,
        }
        schema = item_schema;
    }

    fn order_schema() -> CoreResult<Schema> {
        Schema::builder("Order")
            .field(FieldDescriptor::new("main", "主项").of_type(Item::model_type()))
            .field(FieldDescriptor::new("extra", "附项").of_type(Item::model_type()).nullable())
            .field(FieldDescriptor::new("items", "明细").elements_of(Item::model_type()))
            .field(FieldDescriptor::new("price", "价格"))
            .build()
    }

    crate::define_model! {
        struct Order {
            main,
            extra,
            items,
            price,
        }
        schema = order_schema;
    }

    #[test]
    fn test_create_builds_nested_instances() {
        let order: Order = create(&json!({
            "main": {"name": " a ", "count": "2"},
            "items": [{"name": "b", "count": ""}, null],
            "price": 12.5,
            "unknown": true
        }))
        .unwrap()
        .unwrap();

        let main = order.main.downcast_ref::<Item>().unwrap();
        assert_eq!(main.name, Value::text("a"));
        assert_eq!(main.count, Value::Integer(2));
        assert_eq!(order.extra, Value::Null);

        let items = order.items.as_list().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].downcast_ref::<Item>().unwrap().count, Value::Integer(0));
        assert_eq!(items[1], Value::Null);
        assert_eq!(order.price, Value::Decimal(dec!(12.5)));
    }

    #[test]
    fn test_create_from_null() {
        assert!(create::<Order>(&JsonValue::Null).unwrap().is_none());
    }

    #[test]
    fn test_null_nested_keeps_default_instance() {
        let order: Order = create(&json!({"main": null})).unwrap().unwrap();
        assert!(order.main.downcast_ref::<Item>().is_some());
    }

    #[test]
    fn test_invalid_shapes_rejected() {
        let mut order = Order::new();
        assert!(matches!(
            assign(&mut order, &json!({"items": "x"}), false),
            Err(CoreError::TypeMismatch { .. })
        ));
        assert!(matches!(
            assign(&mut order, &json!([1]), false),
            Err(CoreError::TypeMismatch { .. })
        ));
        assert!(matches!(
            create::<Order>(&json!({"main": {"count": "x"}})),
            Err(CoreError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_to_json_round_trip() {
        let json = json!({
            "main": {"name": "a", "count": 1},
            "extra": null,
            "items": null,
            "price": null
        });
        let order: Order = create(&json).unwrap().unwrap();
        assert_eq!(to_json(&order), json);
    }
}
