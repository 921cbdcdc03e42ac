//! Tests for the normalization and validation dispatchers
//!
//! A small model graph exercises every field kind: scalar, enum, nested,
//! nullable nested, element list, a virtual rule and a rule override.

use core_kernel::normalize::{normalize_integer, trim_string};
use core_kernel::validate::{
    validate_email_field, validate_integer_field, validate_mobile_field, validate_required_field,
};
use core_kernel::{
    define_enum, define_model, normalize, validate, CoreError, CoreResult, Enumeration,
    FieldDescriptor, Fields, Model, Schema, TypedModel, ValidationContext, ValidationResult,
    Value,
};

define_enum! {
    pub enum Level: "Level" {
        High => ("HIGH", "高", "H"),
        Low => ("LOW", "低"),
    }
}

fn contact_schema() -> CoreResult<Schema> {
    Schema::builder("Contact")
        .field(
            FieldDescriptor::new("mobile", "手机号")
                .normalizable()
                .validate_with(validate_mobile_field),
        )
        .field(
            FieldDescriptor::new("email", "邮箱")
                .normalize_with(trim_string)
                .nullable()
                .validate_with(validate_email_field),
        )
        .build()
}

define_model! {
    pub struct Contact {
        mobile,
        email,
    }
    schema = contact_schema;
}

fn low_level_needs_backup(model: &dyn Model, _ctx: &ValidationContext<'_>) -> ValidationResult {
    let level = model.field("level").and_then(Level::resolve);
    let backup = model.field("backup").cloned().unwrap_or_default();
    if level == Some(Level::Low) && backup.is_null() {
        ValidationResult::failure("低级别必须设置备用联系方式")
    } else {
        ValidationResult::success()
    }
}

fn profile_schema() -> CoreResult<Schema> {
    Schema::builder("Profile")
        .field(
            FieldDescriptor::new("name", "姓名")
                .normalizable()
                .validate_with(validate_required_field),
        )
        .field(FieldDescriptor::new("level", "级别").of_enum::<Level>())
        .field(
            FieldDescriptor::new("age", "年龄")
                .normalize_with(normalize_integer)
                .nullable()
                .validate_with(validate_integer_field),
        )
        .field(FieldDescriptor::new("contact", "联系方式").of_type(Contact::model_type()))
        .field(
            FieldDescriptor::new("backup", "备用联系方式")
                .of_type(Contact::model_type())
                .nullable(),
        )
        .field(FieldDescriptor::new("history", "历史联系方式").elements_of(Contact::model_type()))
        .rule("consistency", low_level_needs_backup, true)
        .name_field("name")
        .build()
}

define_model! {
    pub struct Profile {
        name,
        level,
        age,
        contact,
        backup,
        history,
    }
    schema = profile_schema;
}

fn reject_name(_model: &dyn Model, _ctx: &ValidationContext<'_>) -> ValidationResult {
    ValidationResult::failure("规则优先")
}

fn strict_schema() -> CoreResult<Schema> {
    Schema::builder("Strict")
        .extend(Profile::static_schema())
        .rule("name", reject_name, false)
        .build()
}

define_model! {
    pub struct Strict {
        name,
        level,
        age,
        contact,
        backup,
        history,
    }
    schema = strict_schema;
}

fn contact(mobile: &str) -> Contact {
    let mut contact = Contact::new();
    contact.mobile = Value::text(mobile);
    contact
}

fn valid_profile() -> Profile {
    let mut profile = Profile::new();
    profile.name = Value::text("张三");
    profile.level = Level::High.into();
    profile.contact = contact("13800138000").into();
    profile
}

fn ctx() -> ValidationContext<'static> {
    ValidationContext::new()
}

mod validation {
    use super::*;

    #[test]
    fn test_valid_profile_passes() {
        let result = validate(&valid_profile(), Fields::All, &ctx());
        assert_eq!(result, ValidationResult::success());
    }

    #[test]
    fn test_first_failure_in_declaration_order() {
        let profile = Profile::new();
        let result = validate(&profile, "*", &ctx());
        assert_eq!(result.description, "请填写姓名");

        let mut profile = valid_profile();
        profile.level = Value::Null;
        profile.age = Value::text("abc");
        let result = validate(&profile, "*", &ctx());
        assert_eq!(result.description, "请选择级别");
    }

    #[test]
    fn test_selection_order_decides_first_failure() {
        let mut profile = Profile::new();
        profile.age = Value::text("abc");
        let result = validate(&profile, ["age", "name"], &ctx());
        assert_eq!(result.description, "年龄格式不正确");
        let result = validate(&profile, ["name", "age"], &ctx());
        assert_eq!(result.description, "请填写姓名");
    }

    #[test]
    fn test_unknown_field_is_vacuously_valid() {
        assert!(validate(&Profile::new(), "nope", &ctx()).is_success());
    }

    #[test]
    fn test_nullable_short_circuit() {
        let mut profile = valid_profile();
        profile.age = Value::text("");
        assert!(validate(&profile, "age", &ctx()).is_success());

        let profile = Profile::new();
        let nullable = ctx().with_nullable(true);
        assert!(validate(&profile, "name", &nullable).is_success());
    }

    #[test]
    fn test_context_owner_and_label() {
        let profile = Profile::new();
        let result = validate(&profile, "name", &ctx().with_owner("李四"));
        assert_eq!(result.description, "请填写李四的姓名");
        let result = validate(&profile, "name", &ctx().with_label("昵称"));
        assert_eq!(result.description, "请填写昵称");
    }

    #[test]
    fn test_unsupported_enum_text() {
        let mut profile = valid_profile();
        profile.level = Value::text("MID");
        let result = validate(&profile, "level", &ctx());
        assert_eq!(result.description, "级别不受支持");
    }

    #[test]
    fn test_nested_messages_use_parent_display_name() {
        let mut profile = valid_profile();
        profile.contact = Contact::new().into();
        let result = validate(&profile, "contact", &ctx());
        assert_eq!(result.description, "请填写张三的手机号");

        profile.name = Value::Null;
        let result = validate(&profile, "contact", &ctx().with_owner("李四"));
        assert_eq!(result.description, "请填写李四的手机号");
    }

    #[test]
    fn test_nested_null_and_wrong_shape() {
        let mut profile = valid_profile();
        profile.contact = Value::Null;
        let result = validate(&profile, "contact", &ctx());
        assert_eq!(result.description, "必须设置联系方式的值");

        profile.backup = Value::text("x");
        let result = validate(&profile, "backup", &ctx());
        assert_eq!(result.description, "备用联系方式格式不正确");

        profile.backup = Value::Null;
        assert!(validate(&profile, "backup", &ctx()).is_success());
    }

    #[test]
    fn test_elements_stop_at_first_failure() {
        let mut profile = valid_profile();
        let mut bad_email = contact("13800138000");
        bad_email.email = Value::text("bad");
        profile.history = Value::List(vec![
            contact("13800138000").into(),
            contact("1").into(),
            bad_email.into(),
        ]);
        let result = validate(&profile, "history", &ctx());
        assert_eq!(result.description, "张三的手机号格式不正确");

        profile.history = Value::Null;
        assert!(validate(&profile, "history", &ctx()).is_success());
    }

    #[test]
    fn test_virtual_rule_runs_with_all_fields() {
        let mut profile = valid_profile();
        profile.level = Level::Low.into();
        let result = validate(&profile, "consistency", &ctx());
        assert_eq!(result.description, "低级别必须设置备用联系方式");
        let result = validate(&profile, Fields::All, &ctx());
        assert_eq!(result.description, "低级别必须设置备用联系方式");

        profile.backup = contact("13800138000").into();
        assert!(validate(&profile, Fields::All, &ctx()).is_success());
    }

    #[test]
    fn test_rule_overrides_stored_field() {
        let mut strict = Strict::new();
        strict.name = Value::text("张三");
        assert_eq!(validate(&strict, "name", &ctx()).description, "规则优先");
        assert_eq!(validate(&strict, "*", &ctx()).description, "规则优先");
    }
}

mod normalization {
    use super::*;

    #[test]
    fn test_scalars_and_enums() {
        let mut profile = Profile::new();
        profile.name = Value::text("  张三 ");
        profile.level = Value::text(" 高 ");
        profile.age = Value::text("");
        normalize(&mut profile, Fields::All).unwrap();

        assert_eq!(profile.name, Value::text("张三"));
        assert_eq!(profile.level, Level::High.into());
        assert_eq!(profile.age, Value::Integer(0));
    }

    #[test]
    fn test_unresolvable_enum_text_is_kept() {
        let mut profile = Profile::new();
        profile.level = Value::text("  MID ");
        normalize(&mut profile, "level").unwrap();
        assert_eq!(profile.level, Value::text("MID"));
    }

    #[test]
    fn test_nested_default_and_recursion() {
        let mut profile = Profile::new();
        profile.contact = Value::Null;
        let mut history = contact(" 13800138000 ");
        history.email = Value::text(" a@b.com ");
        profile.history = Value::List(vec![history.into()]);
        normalize(&mut profile, Fields::All).unwrap();

        assert!(profile.contact.downcast_ref::<Contact>().is_some());
        assert_eq!(profile.backup, Value::Null);
        let first = profile.history.as_list().unwrap()[0]
            .downcast_ref::<Contact>()
            .unwrap();
        assert_eq!(first.mobile, Value::text("13800138000"));
        assert_eq!(first.email, Value::text("a@b.com"));
    }

    #[test]
    fn test_contract_errors() {
        let mut profile = Profile::new();
        profile.age = Value::text("abc");
        assert!(matches!(
            normalize(&mut profile, "age"),
            Err(CoreError::InvalidFormat(_))
        ));

        let mut profile = Profile::new();
        profile.backup = Value::text("x");
        assert!(matches!(
            normalize(&mut profile, "backup"),
            Err(CoreError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_unknown_fields_skipped() {
        let mut profile = Profile::new();
        let before = profile.clone();
        normalize(&mut profile, ["nope", "consistency"]).unwrap();
        assert_eq!(profile, before);
    }

    #[test]
    fn test_idempotent() {
        let mut profile = valid_profile();
        profile.name = Value::text(" 张三  ");
        profile.age = Value::text("42");
        profile.level = Value::text("H");
        normalize(&mut profile, Fields::All).unwrap();
        let once = profile.clone();
        normalize(&mut profile, Fields::All).unwrap();
        assert_eq!(profile, once);
    }
}
