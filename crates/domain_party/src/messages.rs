//! Messages of the person models

use core_kernel::messages::{detail, whose, Catalog};

thread_local! {
    static PARTY: Catalog = Catalog::new(include_str!("../locales/zh-CN/party.ftl"));
}

fn message(id: &str, args: &[(&str, &str)]) -> String {
    PARTY.with(|catalog| catalog.format(id, args))
}

/// `请填写{whose}{credential}{label}`
pub fn credential_number_required(owner: Option<&str>, credential: &str, label: &str) -> String {
    message(
        "credential-number-required",
        &[
            ("whose", &whose(owner)),
            ("credential", credential),
            ("label", label),
        ],
    )
}

pub fn credential_number_format_incorrect(
    owner: Option<&str>,
    credential: &str,
    label: &str,
    extra: Option<&str>,
) -> String {
    message(
        "credential-number-format-incorrect",
        &[
            ("whose", &whose(owner)),
            ("credential", credential),
            ("label", label),
            ("detail", &detail(extra)),
        ],
    )
}

/// `请填写或选择{whose}{label}`
pub fn person_field_required(owner: Option<&str>, label: &str) -> String {
    message(
        "person-field-required",
        &[("whose", &whose(owner)), ("label", label)],
    )
}

pub fn person_name_format_incorrect(owner: Option<&str>, label: &str, extra: Option<&str>) -> String {
    message(
        "person-name-format-incorrect",
        &[
            ("whose", &whose(owner)),
            ("label", label),
            ("detail", &detail(extra)),
        ],
    )
}

pub fn person_gender_unsupported(owner: Option<&str>, label: &str, extra: Option<&str>) -> String {
    message(
        "person-gender-unsupported",
        &[
            ("whose", &whose(owner)),
            ("label", label),
            ("detail", &detail(extra)),
        ],
    )
}

/// `{whose}{label}和身份证号码不匹配`
pub fn person_card_mismatch(owner: Option<&str>, label: &str) -> String {
    message(
        "person-card-mismatch",
        &[("whose", &whose(owner)), ("label", label)],
    )
}

pub fn guardian_must_be_adult() -> String {
    message("guardian-must-be-adult", &[])
}

pub fn minor_needs_guardian(who: &str) -> String {
    message("minor-needs-guardian", &[("who", who)])
}

pub fn minor_shares_guardian_credential(who: &str, that: &str) -> String {
    message(
        "minor-shares-guardian-credential",
        &[("who", who), ("that", that)],
    )
}

pub fn adult_needs_no_guardian(who: &str) -> String {
    message("adult-needs-no-guardian", &[("who", who)])
}
