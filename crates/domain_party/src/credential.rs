//! Identity credentials

use core_kernel::normalize::trim_uppercase_string;
use core_kernel::{define_enum, define_model, CoreResult, Enumeration, FieldDescriptor, Schema, Value};

use crate::error::{PartyError, PartyResult};
use crate::validation::{validate_credential_number_field, validate_credential_type_field};

define_enum! {
    /// Kind of identity document
    pub enum CredentialType: "CredentialType" {
        IdentityCard => ("IDENTITY_CARD", "身份证"),
        Passport => ("PASSPORT", "护照"),
        OfficerCard => ("OFFICER_CARD", "中国人民解放军军官证"),
        PoliceCard => ("POLICE_CARD", "中国人民武装警察警官证"),
        TaiwanReturnPermit => ("TAIWAN_RETURN_PERMIT", "台湾居民来往大陆通行证"),
        ForeignerPermanentResidencePermit => ("FOREIGNER_PERMANENT_RESIDENCE_PERMIT", "外国人永久居住证"),
        Other => ("OTHER", "其他证件"),
    }
}

impl Default for CredentialType {
    fn default() -> Self {
        CredentialType::IdentityCard
    }
}

fn default_credential_type() -> Value {
    CredentialType::default().into()
}

fn credential_schema() -> CoreResult<Schema> {
    Schema::builder("Credential")
        .field(
            FieldDescriptor::new("type", "证件类型")
                .of_enum::<CredentialType>()
                .validate_with(validate_credential_type_field)
                .default_with(default_credential_type),
        )
        .field(
            FieldDescriptor::new("number", "号码")
                .normalize_with(trim_uppercase_string)
                .validate_with(validate_credential_number_field),
        )
        .build()
}

define_model! {
    /// An identity document: its type and number
    pub struct Credential {
        credential_type: "type",
        number,
    }
    schema = credential_schema;
}

impl Credential {
    /// Creates a credential of the given type and number
    pub fn of(credential_type: CredentialType, number: impl Into<String>) -> Self {
        Self {
            credential_type: credential_type.into(),
            number: Value::text(number),
        }
    }

    /// The resolved credential type, if the stored value names one
    pub fn kind(&self) -> Option<CredentialType> {
        CredentialType::resolve(&self.credential_type)
    }

    pub fn number(&self) -> Option<&str> {
        self.number.as_text().filter(|number| !number.is_empty())
    }

    pub fn is_identity_card(&self) -> bool {
        self.kind() == Some(CredentialType::IdentityCard)
    }

    /// Switches to another credential type and clears the number
    ///
    /// # Arguments
    ///
    /// * `key` - Value, name or code of a credential type
    ///
    /// # Returns
    ///
    /// `UnknownCredentialType` if `key` names no credential type; the
    /// credential is left untouched in that case
    pub fn change_type(&mut self, key: &str) -> PartyResult<()> {
        let credential_type =
            CredentialType::of(key).ok_or_else(|| PartyError::unknown_credential_type(key))?;
        self.credential_type = credential_type.into();
        self.number = Value::text("");
        Ok(())
    }

    /// Keeps only complete credentials
    ///
    /// Returns `None` when the type or the number is empty.
    pub fn empty_to_null(credential: Option<&Credential>) -> Option<Credential> {
        let credential = credential?;
        if credential.credential_type.is_empty() || credential.number.is_empty() {
            return None;
        }
        Some(Credential {
            credential_type: credential.credential_type.clone(),
            number: credential.number.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::{normalize, validate, Fields, ValidationContext};

    #[test]
    fn test_defaults_to_identity_card() {
        let credential = Credential::new();
        assert!(credential.is_identity_card());
        assert_eq!(credential.number, Value::text(""));
        assert_eq!(CredentialType::default().name(), "身份证");
    }

    #[test]
    fn test_change_type_clears_number() {
        let mut credential = Credential::of(CredentialType::IdentityCard, "110101199003078515");
        credential.change_type("护照").unwrap();
        assert_eq!(credential.kind(), Some(CredentialType::Passport));
        assert_eq!(credential.number(), None);

        let err = credential.change_type("DRIVER").unwrap_err();
        assert_eq!(err, PartyError::unknown_credential_type("DRIVER"));
        assert_eq!(credential.kind(), Some(CredentialType::Passport));
    }

    #[test]
    fn test_empty_to_null() {
        assert_eq!(Credential::empty_to_null(None), None);
        assert_eq!(Credential::empty_to_null(Some(&Credential::new())), None);
        let passport = Credential::of(CredentialType::Passport, "E12345678");
        assert_eq!(Credential::empty_to_null(Some(&passport)), Some(passport.clone()));
    }

    #[test]
    fn test_normalize_then_validate() {
        let mut credential = Credential::new();
        credential.credential_type = Value::text(" 身份证 ");
        credential.number = Value::text(" 11010119900307851x ");
        normalize(&mut credential, Fields::All).unwrap();
        assert_eq!(credential.number, Value::text("11010119900307851X"));
        assert!(credential.is_identity_card());
        assert_eq!(
            validate(&credential, Fields::All, &ValidationContext::new()).description,
            "身份证号码格式不正确"
        );
    }

    #[test]
    fn test_serializes_with_type_key() {
        let credential = Credential::of(CredentialType::Passport, "E12345678");
        assert_eq!(
            serde_json::to_value(&credential).unwrap(),
            serde_json::json!({"type": "PASSPORT", "number": "E12345678"})
        );
    }
}
