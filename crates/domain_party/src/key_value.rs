//! Free-form string pairs

use core_kernel::normalize::trim_string;
use core_kernel::{define_model, CoreResult, FieldDescriptor, Schema};

fn key_value_schema() -> CoreResult<Schema> {
    Schema::builder("KeyValuePair")
        .field(FieldDescriptor::new("key", "主键").normalize_with(trim_string))
        .field(FieldDescriptor::new("value", "取值"))
        .build()
}

define_model! {
    /// A string key with a string value
    pub struct KeyValuePair {
        key,
        value,
    }
    schema = key_value_schema;
}

impl KeyValuePair {
    pub fn of(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: core_kernel::Value::text(key),
            value: core_kernel::Value::text(value),
        }
    }
}
