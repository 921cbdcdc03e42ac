//! Core Kernel - Declarative validation and normalization engine
//!
//! This crate provides the building blocks every model type is declared with:
//! - Dynamic field values and closed enumerations
//! - The per-type field metadata registry (schemas and models)
//! - Normalization and validation dispatchers with built-in field functions
//! - Format checkers, age arithmetic and localized messages

pub mod assign;
pub mod config;
pub mod context;
pub mod enumeration;
pub mod error;
pub mod format;
pub mod messages;
pub mod normalize;
pub mod result;
pub mod schema;
pub mod selector;
pub mod temporal;
pub mod validate;
pub mod value;

pub use assign::{assign, create, to_json};
pub use config::{AgeSettings, DEFAULT_ADULT_MIN_AGE};
pub use context::ValidationContext;
pub use enumeration::{EnumItem, EnumType, Enumeration};
pub use error::{CoreError, CoreResult};
pub use normalize::normalize;
pub use result::ValidationResult;
pub use schema::{
    FieldDescriptor, FieldType, Model, ModelType, NormalizerFn, RuleFn, Schema, SchemaBuilder,
    TypedModel, ValidatorFn,
};
pub use selector::Fields;
pub use temporal::{AgeUnit, HasBirthday, Timezone};
pub use validate::validate;
pub use value::Value;

#[doc(hidden)]
pub mod __private {
    pub use once_cell::sync::Lazy;
    pub use serde;
}
