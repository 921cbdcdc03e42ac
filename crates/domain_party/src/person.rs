//! Persons
//!
//! [`Person`] is the base record shared by guardians and insurants. The
//! behaviour common to all three lives in the [`PersonLike`] trait, whose
//! provided methods only touch the declared fields through [`Model`].

use chrono::NaiveDate;
use core_kernel::format::IdentityCard;
use core_kernel::normalize::{
    normalize_bool, normalize_date, normalize_timestamp, trim_string, trim_uppercase_string,
};
use core_kernel::temporal::parse_birthday;
use core_kernel::validate::{
    validate_email_field, validate_integer_field, validate_mobile_field, validate_timestamp_field,
};
use core_kernel::{
    define_enum, define_model, CoreResult, Enumeration, FieldDescriptor, HasBirthday,
    Model, Schema, TypedModel, Value,
};
use serde_json::{Map, Value as JsonValue};
use tracing::debug;

use crate::credential::Credential;
use crate::validation::{
    validate_person_birthday_field, validate_person_gender_field, validate_person_name_field,
};

define_enum! {
    /// Sex of a person
    pub enum Gender: "Gender" {
        Male => ("MALE", "男", "1"),
        Female => ("FEMALE", "女", "2"),
    }
}

/// Field changes made by a setter, keyed by field name
pub type Changes = Map<String, JsonValue>;

fn default_test_flag() -> Value {
    Value::Bool(false)
}

fn person_schema() -> CoreResult<Schema> {
    Schema::builder("Person")
        .field(
            FieldDescriptor::new("id", "ID")
                .normalizable()
                .validate_with(validate_integer_field)
                .nullable(),
        )
        .field(
            FieldDescriptor::new("name", "姓名")
                .normalize_with(trim_uppercase_string)
                .validate_with(validate_person_name_field),
        )
        .field(
            FieldDescriptor::new("username", "用户名")
                .normalize_with(trim_string)
                .nullable(),
        )
        .field(
            FieldDescriptor::new("gender", "性别")
                .of_enum::<Gender>()
                .validate_with(validate_person_gender_field),
        )
        .field(
            FieldDescriptor::new("birthday", "出生日期")
                .normalize_with(normalize_date)
                .validate_with(validate_person_birthday_field),
        )
        .field(FieldDescriptor::new("credential", "证件").of_type(Credential::model_type()))
        .field(
            FieldDescriptor::new("mobile", "手机号码")
                .normalize_with(trim_uppercase_string)
                .validate_with(validate_mobile_field),
        )
        .field(
            FieldDescriptor::new("email", "电子邮件地址")
                .normalizable()
                .validate_with(validate_email_field)
                .nullable(),
        )
        .field(
            FieldDescriptor::new("test", "是否测试数据")
                .normalize_with(normalize_bool)
                .default_with(default_test_flag),
        )
        .field(
            FieldDescriptor::new("delete_time", "标记删除时间")
                .normalize_with(normalize_timestamp)
                .validate_with(validate_timestamp_field)
                .nullable(),
        )
        .name_field("name")
        .build()
}

/// The schema persons, guardians and insurants all start from
pub fn base_schema() -> &'static Schema {
    Person::static_schema()
}

define_model! {
    /// Personal information
    pub struct Person {
        id,
        name,
        username,
        gender,
        birthday,
        credential,
        mobile,
        email,
        test,
        delete_time,
    }
    schema = person_schema;
}

/// Behaviour shared by every person model
pub trait PersonLike: Model {
    /// The credential, if the field holds one
    fn credential(&self) -> Option<&Credential> {
        self.field("credential")?.downcast_ref::<Credential>()
    }

    /// Returns true if both the credential type and number are filled in
    fn has_credential(&self) -> bool {
        Credential::empty_to_null(self.credential()).is_some()
    }

    fn has_mobile(&self) -> bool {
        self.field("mobile").is_some_and(|mobile| !mobile.is_empty())
    }

    /// Replaces the credential
    ///
    /// A valid identity card also sets the gender and birthday it encodes.
    ///
    /// # Arguments
    ///
    /// * `credential` - The new credential, or `None` to clear it
    ///
    /// # Returns
    ///
    /// The changed fields with their new values
    fn set_credential(&mut self, credential: Option<Credential>) -> Changes
    where
        Self: Sized,
    {
        apply_credential(self, credential)
    }

    /// Re-derives gender and birthday from a valid identity card
    fn refresh_gender_birthday(&mut self) -> Changes
    where
        Self: Sized,
    {
        refresh_gender_birthday(self)
    }

    /// Returns true if both persons hold the same complete credential
    fn same_person(&self, other: &dyn Model) -> bool
    where
        Self: Sized,
    {
        same_person(self, other)
    }
}

/// Stores a credential and derives gender and birthday from it
pub fn apply_credential<M>(model: &mut M, credential: Option<Credential>) -> Changes
where
    M: Model + ?Sized,
{
    let value = credential.map(Value::from).unwrap_or_default();
    let mut changes = Changes::new();
    changes.insert("credential".to_string(), value.to_json());
    if let Some(slot) = model.field_mut("credential") {
        *slot = value;
    }
    changes.extend(refresh_gender_birthday(model));
    changes
}

/// Sets gender and birthday from the identity card held by a person model
///
/// Does nothing unless the model holds a valid identity card.
pub fn refresh_gender_birthday<M>(model: &mut M) -> Changes
where
    M: Model + ?Sized,
{
    let mut changes = Changes::new();
    let Some(number) = model
        .field("credential")
        .and_then(|value| value.downcast_ref::<Credential>())
        .filter(|credential| credential.is_identity_card())
        .and_then(Credential::number)
        .map(str::to_string)
    else {
        return changes;
    };

    let gender = IdentityCard::gender(&number).and_then(|gender| Gender::of_value(gender.value()));
    let birthday = IdentityCard::birthday(&number);
    if let (Some(gender), Some(birthday)) = (gender, birthday) {
        let birthday = Value::text(birthday.format("%Y-%m-%d").to_string());
        debug!(%gender, birthday = %birthday, "Derived from identity card");
        for (name, value) in [("gender", Value::from(gender)), ("birthday", birthday)] {
            changes.insert(name.to_string(), value.to_json());
            if let Some(slot) = model.field_mut(name) {
                *slot = value;
            }
        }
    }
    changes
}

/// Returns true if two person models hold the same complete credential
///
/// Persons without a complete credential cannot be compared and are never
/// the same person.
pub fn same_person<M>(model: &M, other: &dyn Model) -> bool
where
    M: Model + ?Sized,
{
    match (complete_credential(model), complete_credential(other)) {
        (Some(mine), Some(theirs)) => mine.kind() == theirs.kind() && mine.number == theirs.number,
        _ => false,
    }
}

fn complete_credential<M>(model: &M) -> Option<Credential>
where
    M: Model + ?Sized,
{
    let credential = model.field("credential")?.downcast_ref::<Credential>();
    Credential::empty_to_null(credential)
}

impl PersonLike for Person {}

impl HasBirthday for Person {
    fn birthday(&self) -> Option<NaiveDate> {
        parse_birthday(&self.birthday)
    }
    fn has_birthday(&self) -> bool {
        !self.birthday.is_empty()
    }
}
