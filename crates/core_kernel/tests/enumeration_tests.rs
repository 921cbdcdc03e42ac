//! Property tests for enumeration lookups and message rendering

use core_kernel::messages;
use core_kernel::{define_enum, Enumeration, Value};
use proptest::prelude::*;

define_enum! {
    pub enum Relation: "Relation" {
        Myself => ("SELF", "本人", "00"),
        Spouse => ("SPOUSE", "配偶", "01"),
        Child => ("CHILD", "子女", "02"),
        Parent => ("PARENT", "父母"),
    }
}

fn member() -> impl Strategy<Value = Relation> {
    prop::sample::select(Relation::values().to_vec())
}

proptest! {
    #[test]
    fn every_member_resolves_by_each_key(relation in member()) {
        prop_assert_eq!(Relation::of_value(relation.value()), Some(relation));
        prop_assert_eq!(Relation::of_name(relation.name()), Some(relation));
        if let Some(code) = relation.code() {
            prop_assert_eq!(Relation::of_code(code), Some(relation));
        }
        prop_assert_eq!(Relation::resolve(&Value::from(relation)), Some(relation));
        prop_assert_eq!(Relation::from_item(relation.item()), Some(relation));
    }

    #[test]
    fn unknown_keys_resolve_to_nothing(key in "[a-z]{1,8}") {
        prop_assert!(Relation::of(&key).is_none());
        prop_assert!(!Relation::has(&key));
        prop_assert!(Relation::resolve(&Value::text(key)).is_none());
    }

    #[test]
    fn serde_round_trips_through_value(relation in member()) {
        let json = serde_json::to_string(&relation).unwrap();
        prop_assert_eq!(&json, &format!("\"{}\"", relation.value()));
        let parsed: Relation = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(parsed, relation);
    }

    #[test]
    fn owner_prefix_appears_exactly_when_owner_given(
        owner in "[\u{4e00}-\u{9fa5}]{2,4}",
        label in "[\u{4e00}-\u{9fa5}]{2,4}",
    ) {
        prop_assert_eq!(messages::required(None, &label), format!("请填写{}", label));
        prop_assert_eq!(
            messages::required(Some(&owner), &label),
            format!("请填写{}的{}", owner, label)
        );
        prop_assert_eq!(
            messages::format_incorrect(Some(&owner), &label, None),
            format!("{}的{}格式不正确", owner, label)
        );
    }
}

#[test]
fn test_empty_key_is_never_a_member() {
    assert!(Relation::of("").is_none());
    assert!(Relation::resolve(&Value::Null).is_none());
    assert!(Relation::resolve(&Value::text("")).is_none());
}

#[test]
fn test_from_str_reports_enum_type() {
    let err = "COUSIN".parse::<Relation>().unwrap_err();
    assert_eq!(err.to_string(), "Invalid Relation value: COUSIN");
    assert_eq!("配偶".parse::<Relation>().unwrap(), Relation::Spouse);
}
