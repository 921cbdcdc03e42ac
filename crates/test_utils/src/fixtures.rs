//! Pre-built Test Fixtures
//!
//! Provides ready-to-use, valid model instances. Ages are measured at a
//! fixed reference date so fixtures never turn into adults over time.

use chrono::NaiveDate;
use core_kernel::{AgeSettings, ValidationContext, Value};
use domain_claims::{Invoice, MedicalCategory, MedicalRecord};
use domain_party::{Credential, CredentialType, Gender, Guardian, Insurant, Person, PersonLike};
use rust_decimal_macros::dec;

/// A valid identity card number of a man born 1990-03-07
pub const IDENTITY_CARD: &str = "110101199003078515";

/// The same number with a broken check character
pub const BROKEN_IDENTITY_CARD: &str = "110101199003078516";

/// Fixture for age settings and validation contexts
pub struct ContextFixtures;

impl ContextFixtures {
    /// The date ages are measured at (June 1, 2024)
    pub fn reference_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    pub fn settings() -> AgeSettings {
        AgeSettings::default().with_age_from(Self::reference_date())
    }

    /// A context carrying the fixed age settings
    pub fn context<'a>() -> ValidationContext<'a> {
        ValidationContext::new().with_age(Self::settings())
    }
}

/// Fixture for person models
pub struct PartyFixtures;

impl PartyFixtures {
    pub fn identity_card() -> Credential {
        Credential::of(CredentialType::IdentityCard, IDENTITY_CARD)
    }

    /// An adult whose gender and birthday come from the identity card
    pub fn person() -> Person {
        let mut person = Person::new();
        person.name = Value::text("张三");
        person.mobile = Value::text("13800138000");
        person.set_credential(Some(Self::identity_card()));
        person
    }

    pub fn guardian() -> Guardian {
        let mut guardian = Guardian::new();
        guardian.name = Value::text("张三");
        guardian.mobile = Value::text("13800138000");
        guardian.set_credential(Some(Self::identity_card()));
        guardian
    }

    /// A nine-year-old with a passport and no guardian yet
    pub fn minor_insurant() -> Insurant {
        let mut insurant = Insurant::new();
        insurant.name = Value::text("小明");
        insurant.gender = Gender::Male.into();
        insurant.birthday = Value::text("2015-05-01");
        insurant.mobile = Value::text("13900139000");
        insurant.credential = Credential::of(CredentialType::Passport, "E7654321").into();
        insurant
    }
}

/// Fixture for claim models
pub struct ClaimFixtures;

impl ClaimFixtures {
    /// A consistent clinic invoice: 1000 total, 100 self-paid, 600 from the
    /// fund and 300 paid by the insured
    pub fn clinic_invoice() -> Invoice {
        let mut invoice = Invoice::new();
        invoice.attachment_id = Value::Integer(1);
        invoice.number = Value::text("NO20240601");
        invoice.amount = Value::Decimal(dec!(1000));
        invoice.self_paid_amount = Value::Decimal(dec!(100));
        invoice.fund_paid_amount = Value::Decimal(dec!(600));
        invoice.calculate_self_amount();
        invoice
    }

    /// A clinic record holding the given invoices
    pub fn clinic_record(invoices: Vec<Invoice>) -> MedicalRecord {
        let mut record = MedicalRecord::new();
        record.medical_category = MedicalCategory::of("11", "普通门诊(Z)").into();
        for invoice in invoices {
            record.add_invoice(invoice);
        }
        record
    }
}
