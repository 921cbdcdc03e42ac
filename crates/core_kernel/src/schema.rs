//! Field metadata registry
//!
//! Every model type owns one [`Schema`]: the ordered list of its declared
//! fields, each described by an immutable [`FieldDescriptor`], plus the
//! business rules attached to virtual fields. Schemas are built once, the
//! first time a type is used, and shared by all of its instances.
//!
//! # Declaring a model
//!
//! ```rust,ignore
//! fn schema() -> CoreResult<Schema> {
//!     Schema::builder("Credential")
//!         .field(FieldDescriptor::new("type", "证件类型").of_enum::<CredentialType>())
//!         .field(FieldDescriptor::new("number", "证件号码").validate_with(validate_number))
//!         .build()
//! }
//!
//! define_model! {
//!     pub struct Credential {
//!         credential_type: "type",
//!         number,
//!     }
//!     schema = schema;
//! }
//! ```

use std::any::Any;
use std::collections::HashMap;
use std::fmt;

use serde::ser::SerializeMap;
use serde::Serializer;

use crate::context::ValidationContext;
use crate::enumeration::{EnumType, Enumeration};
use crate::error::{CoreError, CoreResult};
use crate::result::ValidationResult;
use crate::value::Value;

/// Validates one field value
pub type ValidatorFn = fn(&Value, &ValidationContext<'_>) -> ValidationResult;

/// Coerces one field value into its canonical form
pub type NormalizerFn = fn(&Value) -> CoreResult<Value>;

/// Validates a whole instance under the name of a virtual field
pub type RuleFn = fn(&dyn Model, &ValidationContext<'_>) -> ValidationResult;

/// An erased reference to a model type, used by nested and element fields
#[derive(Clone, Copy)]
pub struct ModelType {
    create: fn() -> Box<dyn Model>,
    schema: fn() -> &'static Schema,
}

fn create_default<T: TypedModel>() -> Box<dyn Model> {
    Box::new(T::default())
}

impl ModelType {
    pub fn of<T: TypedModel>() -> Self {
        Self {
            create: create_default::<T>,
            schema: T::static_schema,
        }
    }

    /// Name of the model type
    pub fn name(&self) -> &'static str {
        (self.schema)().model()
    }

    /// Creates a default instance
    pub fn create(&self) -> Box<dyn Model> {
        (self.create)()
    }

    pub fn schema(&self) -> &'static Schema {
        (self.schema)()
    }

    /// Returns true if the model is an instance of this type
    pub fn is_type_of(&self, model: &dyn Model) -> bool {
        std::ptr::eq(model.schema(), self.schema())
    }
}

impl fmt::Debug for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ModelType({})", self.name())
    }
}

/// What a field holds
#[derive(Clone, Copy)]
pub enum FieldType {
    /// A plain value handled by the field's own functions
    Scalar,
    /// A member of an enumeration
    Enum(fn() -> &'static EnumType),
    /// A single nested model instance
    Nested(ModelType),
    /// A list of model instances
    Elements(ModelType),
}

impl fmt::Debug for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Scalar => f.write_str("Scalar"),
            FieldType::Enum(enum_type) => write!(f, "Enum({})", enum_type().name()),
            FieldType::Nested(model_type) => write!(f, "Nested({})", model_type.name()),
            FieldType::Elements(model_type) => write!(f, "Elements({})", model_type.name()),
        }
    }
}

fn type_kind(field_type: &FieldType) -> &'static str {
    match field_type {
        FieldType::Scalar => "scalar",
        FieldType::Enum(_) => "enum",
        FieldType::Nested(_) => "nested",
        FieldType::Elements(_) => "elements",
    }
}

/// Static metadata of one declared field
#[derive(Clone)]
pub struct FieldDescriptor {
    name: &'static str,
    label: &'static str,
    validator: Option<ValidatorFn>,
    validatable: bool,
    normalizer: Option<NormalizerFn>,
    normalizable: bool,
    nullable: bool,
    field_type: FieldType,
    conflict: Option<(&'static str, &'static str)>,
    default: Option<fn() -> Value>,
}

impl FieldDescriptor {
    /// Declares a field
    ///
    /// # Arguments
    ///
    /// * `name` - The field's key, as used in JSON and field selectors
    /// * `label` - Human-readable name used in messages
    pub fn new(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            validator: None,
            validatable: false,
            normalizer: None,
            normalizable: false,
            nullable: false,
            field_type: FieldType::Scalar,
            conflict: None,
            default: None,
        }
    }

    /// Attaches a validator
    pub fn validate_with(mut self, validator: ValidatorFn) -> Self {
        self.validator = Some(validator);
        self.validatable = true;
        self
    }

    /// Marks the field as validated by its type alone
    pub fn validatable(mut self) -> Self {
        self.validatable = true;
        self
    }

    /// Attaches a normalizer
    pub fn normalize_with(mut self, normalizer: NormalizerFn) -> Self {
        self.normalizer = Some(normalizer);
        self.normalizable = true;
        self
    }

    /// Marks the field as normalized by its type, or by trimming for scalars
    pub fn normalizable(mut self) -> Self {
        self.normalizable = true;
        self
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Declares a nested model field
    pub fn of_type(self, model_type: ModelType) -> Self {
        self.typed(FieldType::Nested(model_type))
    }

    /// Declares a list of nested models
    pub fn elements_of(self, model_type: ModelType) -> Self {
        self.typed(FieldType::Elements(model_type))
    }

    /// Declares an enumeration field, normalized to and validated against its members
    pub fn of_enum<E: Enumeration>(self) -> Self {
        let mut descriptor = self.typed(FieldType::Enum(E::enum_type));
        descriptor.validatable = true;
        descriptor.normalizable = true;
        descriptor
    }

    /// Sets the value new instances start with
    pub fn default_with(mut self, default: fn() -> Value) -> Self {
        self.default = Some(default);
        self
    }

    fn typed(mut self, field_type: FieldType) -> Self {
        if !matches!(self.field_type, FieldType::Scalar) && self.conflict.is_none() {
            self.conflict = Some((type_kind(&self.field_type), type_kind(&field_type)));
        }
        self.field_type = field_type;
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn validator(&self) -> Option<ValidatorFn> {
        self.validator
    }

    pub fn normalizer(&self) -> Option<NormalizerFn> {
        self.normalizer
    }

    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// Returns true if validating this field can ever fail
    pub fn is_validatable(&self) -> bool {
        self.validatable
            || self.validator.is_some()
            || matches!(self.field_type, FieldType::Nested(_) | FieldType::Elements(_))
    }

    pub fn is_normalizable(&self) -> bool {
        self.normalizable
            || self.normalizer.is_some()
            || matches!(self.field_type, FieldType::Nested(_) | FieldType::Elements(_))
    }

    pub fn nested_type(&self) -> Option<ModelType> {
        match self.field_type {
            FieldType::Nested(model_type) => Some(model_type),
            _ => None,
        }
    }

    pub fn element_type(&self) -> Option<ModelType> {
        match self.field_type {
            FieldType::Elements(model_type) => Some(model_type),
            _ => None,
        }
    }

    pub fn enum_type(&self) -> Option<&'static EnumType> {
        match self.field_type {
            FieldType::Enum(enum_type) => Some(enum_type()),
            _ => None,
        }
    }

    /// The value a new instance holds in this field
    ///
    /// Non-nullable nested fields start with a default instance of their type.
    pub fn default_value(&self) -> Value {
        if let Some(default) = self.default {
            return default();
        }
        match self.field_type {
            FieldType::Nested(model_type) if !self.nullable => Value::Object(model_type.create()),
            _ => Value::Null,
        }
    }
}

impl fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("label", &self.label)
            .field("field_type", &self.field_type)
            .field("nullable", &self.nullable)
            .field("validatable", &self.is_validatable())
            .field("normalizable", &self.is_normalizable())
            .finish()
    }
}

/// A business rule attached to a virtual field
#[derive(Clone, Copy)]
pub struct Rule {
    name: &'static str,
    check: RuleFn,
    in_all: bool,
}

impl Rule {
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns true if the rule runs as part of validating all fields
    pub fn in_all(&self) -> bool {
        self.in_all
    }

    pub fn check(&self, model: &dyn Model, ctx: &ValidationContext<'_>) -> ValidationResult {
        (self.check)(model, ctx)
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("in_all", &self.in_all)
            .finish()
    }
}

/// The field metadata of one model type
#[derive(Debug)]
pub struct Schema {
    model: &'static str,
    fields: Vec<FieldDescriptor>,
    index: HashMap<&'static str, usize>,
    rules: Vec<Rule>,
    name_field: Option<&'static str>,
}

impl Schema {
    pub fn builder(model: &'static str) -> SchemaBuilder {
        SchemaBuilder::new(model)
    }

    /// Name of the model type
    pub fn model(&self) -> &'static str {
        self.model
    }

    /// Declared fields in declaration order
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Looks up the descriptor of a declared field
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.index.get(name).map(|&position| &self.fields[position])
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Looks up the rule attached to a virtual field
    pub fn rule(&self, name: &str) -> Option<&Rule> {
        self.rules.iter().find(|rule| rule.name == name)
    }

    /// Field whose text is the display name of an instance
    pub fn name_field(&self) -> Option<&'static str> {
        self.name_field
    }
}

/// Builder for [`Schema`]
///
/// # Example
///
/// ```rust,ignore
/// let schema = Schema::builder("Guardian")
///     .extend(Person::static_schema())
///     .rule("adult", validate_adult, true)
///     .build()?;
/// ```
#[derive(Debug)]
pub struct SchemaBuilder {
    model: &'static str,
    fields: Vec<FieldDescriptor>,
    rules: Vec<Rule>,
    name_field: Option<&'static str>,
}

impl SchemaBuilder {
    pub fn new(model: &'static str) -> Self {
        Self {
            model,
            fields: Vec::new(),
            rules: Vec::new(),
            name_field: None,
        }
    }

    /// Inherits the fields, rules and name field of a parent model
    pub fn extend(mut self, parent: &Schema) -> Self {
        self.fields.extend(parent.fields.iter().cloned());
        for rule in &parent.rules {
            self = self.rule(rule.name, rule.check, rule.in_all);
        }
        if self.name_field.is_none() {
            self.name_field = parent.name_field;
        }
        self
    }

    /// Declares a field
    pub fn field(mut self, descriptor: FieldDescriptor) -> Self {
        self.fields.push(descriptor);
        self
    }

    /// Attaches a rule to a virtual field, replacing an inherited rule of the same name
    ///
    /// A rule named like a stored field takes that field's place in validation.
    pub fn rule(mut self, name: &'static str, check: RuleFn, in_all: bool) -> Self {
        let rule = Rule { name, check, in_all };
        match self.rules.iter_mut().find(|existing| existing.name == name) {
            Some(existing) => *existing = rule,
            None => self.rules.push(rule),
        }
        self
    }

    /// Uses the text of a field as the display name of instances
    pub fn name_field(mut self, name: &'static str) -> Self {
        self.name_field = Some(name);
        self
    }

    /// Checks the declaration and builds the schema
    pub fn build(self) -> CoreResult<Schema> {
        let mut index = HashMap::with_capacity(self.fields.len());
        for (position, descriptor) in self.fields.iter().enumerate() {
            if let Some((declared, conflicting)) = descriptor.conflict {
                return Err(CoreError::invalid_schema(
                    self.model,
                    format!(
                        "field '{}' declared as both {} and {}",
                        descriptor.name, declared, conflicting
                    ),
                ));
            }
            if index.insert(descriptor.name, position).is_some() {
                return Err(CoreError::invalid_schema(
                    self.model,
                    format!("duplicate field '{}'", descriptor.name),
                ));
            }
        }

        if let Some(name_field) = self.name_field {
            if !index.contains_key(name_field) {
                return Err(CoreError::invalid_schema(
                    self.model,
                    format!("unknown name field '{}'", name_field),
                ));
            }
        }

        Ok(Schema {
            model: self.model,
            fields: self.fields,
            index,
            rules: self.rules,
            name_field: self.name_field,
        })
    }
}

/// A model instance with declared, dynamically typed fields
pub trait Model: Any + fmt::Debug + Send + Sync {
    fn schema(&self) -> &'static Schema;

    /// Stored value of a declared field; `None` for virtual or unknown names
    fn field(&self, name: &str) -> Option<&Value>;

    fn field_mut(&mut self, name: &str) -> Option<&mut Value>;

    fn box_clone(&self) -> Box<dyn Model>;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Display name used as the owner of nested messages
    fn display_name(&self) -> Option<String> {
        let name_field = self.schema().name_field()?;
        match self.field(name_field)? {
            Value::Text(name) if !name.is_empty() => Some(name.clone()),
            _ => None,
        }
    }
}

impl Clone for Box<dyn Model> {
    fn clone(&self) -> Self {
        self.box_clone()
    }
}

/// A concrete model type with a static schema
pub trait TypedModel: Model + Default + Clone {
    fn static_schema() -> &'static Schema;

    fn model_type() -> ModelType {
        ModelType::of::<Self>()
    }
}

/// Field-wise equality of two instances of the same model type
pub fn models_equal(a: &dyn Model, b: &dyn Model) -> bool {
    let schema = a.schema();
    std::ptr::eq(schema, b.schema())
        && schema
            .fields()
            .iter()
            .all(|descriptor| a.field(descriptor.name()) == b.field(descriptor.name()))
}

/// Serializes an instance as a map of its declared fields in declaration order
pub fn serialize_model<S>(model: &dyn Model, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let fields = model.schema().fields();
    let mut map = serializer.serialize_map(Some(fields.len()))?;
    for descriptor in fields {
        let value = model.field(descriptor.name()).unwrap_or(&Value::Null);
        map.serialize_entry(descriptor.name(), value)?;
    }
    map.end()
}

/// Declares a model struct backed by a schema
///
/// Every listed field becomes a `pub` [`Value`]; a string literal after the
/// field gives its key when it differs from the Rust identifier. The schema
/// function runs once, on first use of the type.
#[macro_export]
macro_rules! define_model {
    (@key $field:ident $key:literal) => {
        $key
    };
    (@key $field:ident) => {
        stringify!($field)
    };
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field:ident $(: $key:literal)?
            ),* $(,)?
        }
        schema = $schema:path;
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        $vis struct $name {
            $(
                $(#[$field_meta])*
                pub $field: $crate::Value,
            )*
        }

        impl $name {
            /// Creates an instance holding the declared defaults
            pub fn new() -> Self {
                <Self as Default>::default()
            }
        }

        impl Default for $name {
            fn default() -> Self {
                let schema = <$name as $crate::TypedModel>::static_schema();
                Self {
                    $(
                        $field: schema
                            .field($crate::define_model!(@key $field $($key)?))
                            .map($crate::FieldDescriptor::default_value)
                            .unwrap_or_default(),
                    )*
                }
            }
        }

        impl $crate::Model for $name {
            fn schema(&self) -> &'static $crate::Schema {
                <$name as $crate::TypedModel>::static_schema()
            }

            fn field(&self, name: &str) -> Option<&$crate::Value> {
                $(
                    if name == $crate::define_model!(@key $field $($key)?) {
                        return Some(&self.$field);
                    }
                )*
                None
            }

            fn field_mut(&mut self, name: &str) -> Option<&mut $crate::Value> {
                $(
                    if name == $crate::define_model!(@key $field $($key)?) {
                        return Some(&mut self.$field);
                    }
                )*
                None
            }

            fn box_clone(&self) -> Box<dyn $crate::Model> {
                Box::new(self.clone())
            }

            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }

            fn as_any_mut(&mut self) -> &mut dyn ::std::any::Any {
                self
            }
        }

        impl $crate::TypedModel for $name {
            fn static_schema() -> &'static $crate::Schema {
                static SCHEMA: $crate::__private::Lazy<$crate::Schema> =
                    $crate::__private::Lazy::new(|| {
                        $schema().unwrap_or_else(|err| panic!("{}", err))
                    });
                &SCHEMA
            }
        }

        impl $crate::__private::serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: $crate::__private::serde::Serializer,
            {
                $crate::schema::serialize_model(self, serializer)
            }
        }

        impl From<$name> for $crate::Value {
            fn from(model: $name) -> Self {
                $crate::Value::Object(Box::new(model))
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reject(_: &Value, _: &ValidationContext<'_>) -> ValidationResult {
        ValidationResult::failure("rejected")
    }

    fn always_fails(_: &dyn Model, _: &ValidationContext<'_>) -> ValidationResult {
        ValidationResult::failure("rule")
    }

    fn leaf_schema() -> CoreResult<Schema> {
        Schema::builder("Leaf")
            .field(FieldDescriptor::new("title", "标题").validate_with(reject))
            .field(FieldDescriptor::new("memo", "备注"))
            .name_field("title")
            .build()
    }

    crate::define_model! {
        struct Leaf {
            title,
            note: "memo",
        }
        schema = leaf_schema;
    }

    fn holder_schema() -> CoreResult<Schema> {
        Schema::builder("Holder")
            .field(FieldDescriptor::new("leaf", "叶子").of_type(Leaf::model_type()))
            .field(FieldDescriptor::new("spare", "备用").of_type(Leaf::model_type()).nullable())
            .field(FieldDescriptor::new("count", "数量").default_with(|| Value::Integer(1)))
            .build()
    }

    crate::define_model! {
        struct Holder {
            leaf,
            spare,
            count,
        }
        schema = holder_schema;
    }

    #[test]
    fn test_field_lookup() {
        let schema = Leaf::static_schema();
        assert_eq!(schema.model(), "Leaf");
        assert!(schema.field("title").is_some());
        assert!(schema.field("missing").is_none());
        assert!(schema.field("title").unwrap().is_validatable());
        assert!(!schema.field("memo").unwrap().is_validatable());
    }

    #[test]
    fn test_explicit_field_key() {
        let mut leaf = Leaf::new();
        leaf.note = Value::text("n");
        assert_eq!(leaf.field("memo"), Some(&Value::text("n")));
        assert_eq!(leaf.field("note"), None);
    }

    #[test]
    fn test_defaults_from_descriptors() {
        let holder = Holder::new();
        assert!(holder.leaf.downcast_ref::<Leaf>().is_some());
        assert_eq!(holder.spare, Value::Null);
        assert_eq!(holder.count, Value::Integer(1));
    }

    #[test]
    fn test_display_name() {
        let mut leaf = Leaf::new();
        assert_eq!(leaf.display_name(), None);
        leaf.title = Value::text("张三");
        assert_eq!(leaf.display_name(), Some("张三".to_string()));
    }

    #[test]
    fn test_duplicate_field_rejected() {
        let result = Schema::builder("Dup")
            .field(FieldDescriptor::new("a", "甲"))
            .field(FieldDescriptor::new("a", "乙"))
            .build();
        assert!(matches!(result, Err(CoreError::InvalidSchema { .. })));
    }

    #[test]
    fn test_nested_and_elements_rejected() {
        let result = Schema::builder("Both")
            .field(
                FieldDescriptor::new("a", "甲")
                    .of_type(Leaf::model_type())
                    .elements_of(Leaf::model_type()),
            )
            .build();
        assert!(matches!(result, Err(CoreError::InvalidSchema { .. })));
    }

    #[test]
    fn test_unknown_name_field_rejected() {
        let result = Schema::builder("Named").name_field("name").build();
        assert!(matches!(result, Err(CoreError::InvalidSchema { .. })));
    }

    #[test]
    fn test_extend_inherits_and_overrides_rules() {
        let parent = Schema::builder("Parent")
            .field(FieldDescriptor::new("name", "姓名"))
            .rule("check", always_fails, false)
            .name_field("name")
            .build()
            .unwrap();
        let child = Schema::builder("Child")
            .extend(&parent)
            .field(FieldDescriptor::new("age", "年龄"))
            .rule("check", always_fails, true)
            .build()
            .unwrap();

        assert_eq!(child.fields().len(), 2);
        assert_eq!(child.name_field(), Some("name"));
        assert_eq!(child.rules().len(), 1);
        assert!(child.rule("check").unwrap().in_all());
    }

    #[test]
    fn test_deep_clone_and_equality() {
        let mut holder = Holder::new();
        let copy = holder.clone();
        assert_eq!(holder, copy);

        if let Some(leaf) = holder.leaf.downcast_mut::<Leaf>() {
            leaf.title = Value::text("changed");
        }
        assert_ne!(holder, copy);
    }

    #[test]
    fn test_serializes_in_declaration_order() {
        let mut leaf = Leaf::new();
        leaf.title = Value::text("t");
        let json = serde_json::to_string(&leaf).unwrap();
        assert_eq!(json, r#"{"title":"t","memo":null}"#);
    }
}
