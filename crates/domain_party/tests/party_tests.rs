//! Integration tests for domain_party

use chrono::NaiveDate;
use proptest::prelude::*;
use serde_json::json;

use core_kernel::format::IdentityCard;
use core_kernel::{assign, create, to_json, validate, AgeSettings, Enumeration, Fields, ValidationContext, Value};

use domain_party::{
    Credential, CredentialType, Gender, Guardian, Insurant, KeyValuePair, Kinship, PersonLike,
};

fn settings() -> AgeSettings {
    AgeSettings::default().with_age_from(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap())
}

fn ctx<'a>() -> ValidationContext<'a> {
    ValidationContext::new().with_age(settings())
}

// ============================================================================
// Credential Tests
// ============================================================================

mod credential_tests {
    use super::*;

    #[test]
    fn test_empty_identity_card_number() {
        let credential = Credential::of(CredentialType::IdentityCard, "");
        let result = validate(&credential, Fields::All, &ctx());
        assert!(result.is_failure());
        assert_eq!(result.description, "请填写身份证号码");
    }

    #[test]
    fn test_identity_card_checksum() {
        let valid = Credential::of(CredentialType::IdentityCard, "110101199003078515");
        let result = validate(&valid, Fields::All, &ctx());
        assert!(result.is_success());
        assert_eq!(result.description, "");

        let invalid = Credential::of(CredentialType::IdentityCard, "110101199003078516");
        assert_eq!(
            validate(&invalid, Fields::All, &ctx()).description,
            "身份证号码格式不正确"
        );
    }

    #[test]
    fn test_credential_type_lookup_misses() {
        for key in ["", "x?", "DRIVER_LICENSE"] {
            assert_eq!(CredentialType::of(key), None);
            assert!(!CredentialType::has(key));
        }
        assert_eq!(CredentialType::resolve(&Value::Null), None);
    }

    #[test]
    fn test_credential_from_json() {
        let credential: Credential = create(&json!({"type": "护照", "number": " e1234567 "}))
            .unwrap()
            .unwrap();
        assert_eq!(credential.kind(), Some(CredentialType::Passport));
        assert_eq!(credential.number, Value::text("E1234567"));
        assert_eq!(to_json(&credential), json!({"type": "PASSPORT", "number": "E1234567"}));
    }
}

// ============================================================================
// Insurant Tests
// ============================================================================

mod insurant_tests {
    use super::*;

    fn guardian() -> Guardian {
        let mut guardian = Guardian::new();
        guardian.name = Value::text("张三");
        guardian.mobile = Value::text("13800138000");
        guardian.set_credential(Some(Credential::of(
            CredentialType::IdentityCard,
            "110101199003078515",
        )));
        guardian
    }

    fn minor() -> Insurant {
        let mut insurant = Insurant::new();
        insurant.name = Value::text("小明");
        insurant.gender = Gender::Male.into();
        insurant.birthday = Value::text("2015-05-01");
        insurant.mobile = Value::text("13900139000");
        insurant.credential = Credential::of(CredentialType::Passport, "E7654321").into();
        insurant
    }

    #[test]
    fn test_minor_without_guardian() {
        let result = validate(&minor(), "guardian", &ctx());
        assert_eq!(result.description, "未成年人小明必须指定监护人");
        let result = validate(&minor(), Fields::All, &ctx());
        assert_eq!(result.description, "未成年人小明必须指定监护人");
    }

    #[test]
    fn test_minor_with_valid_guardian() {
        let mut insurant = minor();
        insurant.set_guardian(Some(guardian()));
        assert!(validate(&insurant, Fields::All, &ctx()).is_success());
    }

    #[test]
    fn test_guardian_must_validate() {
        let mut insurant = minor();
        let mut guardian = guardian();
        guardian.mobile = Value::text("12");
        insurant.set_guardian(Some(guardian));
        assert_eq!(
            validate(&insurant, "guardian", &ctx()).description,
            "手机号码格式不正确"
        );
    }

    #[test]
    fn test_minor_guardian_is_rejected() {
        let mut insurant = minor();
        let mut guardian = guardian();
        guardian.set_credential(Some(Credential::of(CredentialType::Passport, "E1234567")));
        guardian.birthday = Value::text("2012-01-01");
        insurant.set_guardian(Some(guardian));
        assert_eq!(
            validate(&insurant, "guardian", &ctx()).description,
            "监护人必须是成年人"
        );
    }

    #[test]
    fn test_guardian_sharing_credential() {
        let mut insurant = minor();
        let guardian = guardian();
        insurant.credential = guardian.credential.clone();
        insurant.gender = Gender::Male.into();
        insurant.set_guardian(Some(guardian));
        assert_eq!(
            validate(&insurant, "guardian", &ctx()).description,
            "未成年人小明与其监护人张三不应有相同证件"
        );
    }

    #[test]
    fn test_adult_with_guardian() {
        let mut insurant = minor();
        insurant.set_guardian(Some(guardian()));
        insurant.birthday = Value::text("1995-05-01");
        assert_eq!(
            validate(&insurant, "guardian", &ctx()).description,
            "成年人小明不需要指定监护人"
        );
    }

    #[test]
    fn test_unpadded_birthday_minor_needs_guardian() {
        let mut insurant = minor();
        insurant.birthday = Value::text("2015-5-1");
        assert!(insurant.need_guardian(&settings()));
        assert_eq!(
            validate(&insurant, "guardian", &ctx()).description,
            "未成年人小明必须指定监护人"
        );

        insurant.set_guardian(Some(guardian()));
        assert!(validate(&insurant, "guardian", &ctx()).is_success());
    }

    #[test]
    fn test_malformed_birthday_needs_guardian() {
        let mut insurant = minor();
        insurant.birthday = Value::text("abc");
        assert!(insurant.need_guardian(&settings()));
        assert_eq!(
            validate(&insurant, "guardian", &ctx()).description,
            "未成年人小明必须指定监护人"
        );

        insurant.set_guardian(Some(guardian()));
        insurant.set_birthday(Some("abc"), &settings());
        assert!(insurant.guardian().is_some());
    }

    #[test]
    fn test_missing_birthday_needs_no_guardian() {
        let mut insurant = minor();
        insurant.birthday = Value::Null;
        assert!(!insurant.need_guardian(&settings()));
        assert!(validate(&insurant, "guardian", &ctx()).is_success());
    }

    #[test]
    fn test_adult_min_age_comes_from_context() {
        let insurant = minor();
        let lenient = ValidationContext::new().with_age(settings().with_adult_min_age(8));
        assert!(validate(&insurant, "guardian", &lenient).is_success());
    }

    #[test]
    fn test_insurant_from_json() {
        let insurant: Insurant = create(&json!({
            "name": " 小明 ",
            "birthday": "2015/5/1",
            "gender": "男",
            "kinship": "CHILD",
            "guardian": {"name": "张三", "mobile": "13800138000"},
            "payload": [{"key": " channel ", "value": "web"}]
        }))
        .unwrap()
        .unwrap();

        assert_eq!(insurant.name, Value::text("小明"));
        assert_eq!(insurant.birthday, Value::text("2015-05-01"));
        assert_eq!(Kinship::resolve(&insurant.kinship), Some(Kinship::Child));
        assert!(insurant.can_paid_by_medicare());
        assert_eq!(insurant.guardian().unwrap().name, Value::text("张三"));
        let payload = insurant.payload.as_list().unwrap();
        assert_eq!(
            payload[0].downcast_ref::<KeyValuePair>().unwrap(),
            &KeyValuePair::of("channel", "web")
        );
    }

    #[test]
    fn test_assign_keeps_missing_fields() {
        let mut insurant = minor();
        assign(&mut insurant, &json!({"mobile": "13700137000"}), true).unwrap();
        assert_eq!(insurant.name, Value::text("小明"));
        assert_eq!(insurant.mobile, Value::text("13700137000"));
    }
}

// ============================================================================
// Identity Card Property Tests
// ============================================================================

mod identity_card_properties {
    use super::*;

    fn birthday_strategy() -> impl Strategy<Value = NaiveDate> {
        (1950i32..2020, 1u32..=12, 1u32..=28)
            .prop_map(|(year, month, day)| NaiveDate::from_ymd_opt(year, month, day).unwrap())
    }

    fn identity_card_strategy() -> impl Strategy<Value = (String, NaiveDate, u32)> {
        (birthday_strategy(), 0u32..1000).prop_map(|(birthday, sequence)| {
            let body = format!("110101{}{:03}", birthday.format("%Y%m%d"), sequence);
            let check = IdentityCard::check_char(&body).unwrap();
            (format!("{}{}", body, check), birthday, sequence)
        })
    }

    proptest! {
        #[test]
        fn prop_set_credential_derives_gender_and_birthday(
            (number, birthday, sequence) in identity_card_strategy()
        ) {
            let mut guardian = Guardian::new();
            guardian.set_credential(Some(Credential::of(CredentialType::IdentityCard, &number)));

            let gender = if sequence % 2 == 1 { Gender::Male } else { Gender::Female };
            prop_assert_eq!(Gender::resolve(&guardian.gender), Some(gender));
            prop_assert_eq!(
                guardian.birthday.clone(),
                Value::text(birthday.format("%Y-%m-%d").to_string())
            );
            prop_assert!(guardian.has_credential());
            prop_assert!(validate(guardian.credential().unwrap(), Fields::All, &ctx()).is_success());
        }

        #[test]
        fn prop_insurant_guardian_follows_derived_age(
            (number, birthday, _sequence) in identity_card_strategy()
        ) {
            let mut insurant = Insurant::new();
            insurant.name = Value::text("小明");
            let mut guardian = Guardian::new();
            guardian.name = Value::text("张三");
            insurant.set_guardian(Some(guardian));
            insurant.update_credential(
                Some(Credential::of(CredentialType::IdentityCard, &number)),
                &settings(),
            );

            let adult = birthday <= NaiveDate::from_ymd_opt(2006, 6, 1).unwrap();
            prop_assert_eq!(insurant.guardian().is_none(), adult);
            prop_assert_eq!(insurant.need_guardian(&settings()), !adult);
        }
    }
}
