//! Insured persons
//!
//! An insurant under the adult age must have a guardian, and an adult must
//! not. The `guardian` field is checked by a rule instead of its nested
//! schema, so a minor without one fails with a message naming the insurant.

use chrono::NaiveDate;
use core_kernel::temporal::{is_adult, parse_birthday};
use core_kernel::{
    define_enum, define_model, validate, AgeSettings, CoreResult, Enumeration, FieldDescriptor,
    Fields, HasBirthday, Model, Schema, TypedModel, ValidationContext, ValidationResult, Value,
};
use tracing::{debug, instrument};

use crate::credential::Credential;
use crate::guardian::Guardian;
use crate::key_value::KeyValuePair;
use crate::messages;
use crate::person::{apply_credential, base_schema, same_person, Changes, PersonLike};

define_enum! {
    /// Relation between an insurant and the policy holder
    pub enum Kinship: "Kinship" {
        Myself => ("SELF", "本人"),
        Parent => ("PARENT", "父母"),
        Child => ("CHILD", "子女"),
        Spouse => ("SPOUSE", "配偶"),
        Other => ("OTHER", "其他"),
    }
}

impl Kinship {
    /// The direct relations: self, parents, children and spouse
    pub fn directs() -> &'static [Kinship] {
        &[Kinship::Myself, Kinship::Parent, Kinship::Child, Kinship::Spouse]
    }
}

/// Returns true if the model records a birthday that does not make it an adult
fn needs_guardian(model: &dyn Model, settings: &AgeSettings) -> bool {
    model.has_birthday() && !is_adult(model, settings)
}

#[instrument(skip_all, fields(insurant = ?model.display_name()))]
fn validate_insurant_guardian(model: &dyn Model, ctx: &ValidationContext<'_>) -> ValidationResult {
    let who = model.display_name().unwrap_or_default();
    let guardian = model.field("guardian").and_then(Value::as_model);

    if needs_guardian(model, &ctx.age) {
        let Some(guardian) = guardian else {
            return ValidationResult::failure(messages::minor_needs_guardian(&who));
        };
        let guardian_ctx = ValidationContext::new().with_age(ctx.age.clone());
        let result = validate(guardian, Fields::All, &guardian_ctx);
        if result.is_failure() {
            debug!(reason = %result.description, "Guardian rejected");
            return result;
        }
        if same_person(model, guardian) {
            let that = guardian.display_name().unwrap_or_default();
            return ValidationResult::failure(messages::minor_shares_guardian_credential(
                &who, &that,
            ));
        }
    } else if guardian.is_some() {
        return ValidationResult::failure(messages::adult_needs_no_guardian(&who));
    }
    ValidationResult::success()
}

fn insurant_schema() -> CoreResult<Schema> {
    Schema::builder("Insurant")
        .extend(base_schema())
        .field(
            FieldDescriptor::new("guardian", "监护人")
                .of_type(Guardian::model_type())
                .nullable(),
        )
        .field(
            FieldDescriptor::new("kinship", "与监护人关系")
                .of_enum::<Kinship>()
                .nullable(),
        )
        .field(FieldDescriptor::new("payload", "额外参数").elements_of(KeyValuePair::model_type()))
        .rule("guardian", validate_insurant_guardian, true)
        .build()
}

define_model! {
    /// A person covered by a policy
    pub struct Insurant {
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
        guardian,
        kinship,
        payload,
    }
    schema = insurant_schema;
}

impl Insurant {
    /// Returns true if the insurant has a birthday and is not an adult
    pub fn need_guardian(&self, settings: &AgeSettings) -> bool {
        needs_guardian(self, settings)
    }

    pub fn guardian(&self) -> Option<&Guardian> {
        self.guardian.downcast_ref::<Guardian>()
    }

    /// Replaces the guardian and fills in missing contact details from it
    pub fn set_guardian(&mut self, guardian: Option<Guardian>) -> Changes {
        let mut changes = Changes::new();
        match guardian {
            None => {
                self.guardian = Value::Null;
                changes.insert("guardian".to_string(), Value::Null.to_json());
            }
            Some(guardian) => {
                let value = Value::from(guardian);
                changes.insert("guardian".to_string(), value.to_json());
                self.guardian = value;
                changes.extend(self.copy_guardian_contact());
            }
        }
        changes
    }

    /// Sets the birthday; an insurant who is now an adult loses the guardian
    pub fn set_birthday(&mut self, birthday: Option<&str>, settings: &AgeSettings) -> Changes {
        let mut changes = Changes::new();
        self.birthday = Value::text(birthday.unwrap_or_default());
        changes.insert("birthday".to_string(), self.birthday.to_json());
        if birthday.is_some() {
            changes.extend(self.drop_guardian_if_adult(settings));
        }
        changes
    }

    pub fn has_kinship(&self) -> bool {
        !self.kinship.is_empty()
    }

    /// Returns true if the insurant's medicare account may pay, which
    /// requires a direct relation to the policy holder
    pub fn can_paid_by_medicare(&self) -> bool {
        Kinship::resolve(&self.kinship).is_some_and(|kinship| Kinship::directs().contains(&kinship))
    }

    /// Copies the guardian's mobile and email into empty contact fields
    pub fn copy_guardian_contact(&mut self) -> Changes {
        let mut changes = Changes::new();
        let Some(guardian) = self.guardian() else {
            return changes;
        };
        let mobile = guardian.mobile.clone();
        let email = guardian.email.clone();
        if self.mobile.is_empty() && !mobile.is_empty() {
            changes.insert("mobile".to_string(), mobile.to_json());
            self.mobile = mobile;
        }
        if self.email.is_empty() && !email.is_empty() {
            changes.insert("email".to_string(), email.to_json());
            self.email = email;
        }
        changes
    }

    /// Replaces the credential like [`PersonLike::set_credential`], then drops
    /// the guardian when the derived birthday makes the insurant an adult
    pub fn update_credential(
        &mut self,
        credential: Option<Credential>,
        settings: &AgeSettings,
    ) -> Changes {
        let mut changes = apply_credential(self, credential);
        changes.extend(self.drop_guardian_if_adult(settings));
        changes
    }

    fn drop_guardian_if_adult(&mut self, settings: &AgeSettings) -> Changes {
        let mut changes = Changes::new();
        if is_adult(&*self, settings) {
            self.guardian = Value::Null;
            changes.insert("guardian".to_string(), Value::Null.to_json());
        }
        changes
    }
}

impl PersonLike for Insurant {}

impl HasBirthday for Insurant {
    fn birthday(&self) -> Option<NaiveDate> {
        parse_birthday(&self.birthday)
    }
    fn has_birthday(&self) -> bool {
        !self.birthday.is_empty()
    }
}
