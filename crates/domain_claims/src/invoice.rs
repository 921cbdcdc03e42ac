//! Medical invoices and their amount checks
//!
//! Amounts are stored as values rounded to cents. The self-paid amount is
//! derived from the others:
//!
//! ```text
//! self = amount - self_paid - self_care - fund_paid - serious_illness
//!        - serious_illness_insurance - civil_affair_subsidy
//! ```

use core_kernel::normalize::{normalize_money, normalize_timestamp, round_money};
use core_kernel::validate::{
    validate_alpha_numeric_field, validate_float_field, validate_integer_field,
    validate_timestamp_field,
};
use core_kernel::{
    define_enum, define_model, CoreResult, FieldDescriptor, Schema, TypedModel, ValidationResult,
    Value,
};
use rust_decimal::Decimal;
use tracing::{debug, instrument};

use crate::amount::{amount, zero};
use crate::medical::{MedicalCategory, MedicalRecord};
use crate::messages::message;
use crate::self_care_item::SelfCareItem;

define_enum! {
    /// Printing status of an invoice
    pub enum InvoiceStatus: "InvoiceStatus" {
        NoInvoice => ("NO_INVOICE", "无发票"),
        NotRequired => ("NOT_REQUIRED", "不需要"),
        NotPrinted => ("NOT_PRINTED", "尚未开具"),
        Printed => ("PRINTED", "已开具"),
        Reprinted => ("REPRINTED", "已重开"),
        Invalid => ("INVALID", "已作废"),
    }
}

define_enum! {
    /// Where the invoice data was entered from
    pub enum InvoiceSource: "InvoiceSource" {
        Manual => ("ENTERPRISE_CLAIM_INVOICE_MANUAL", "人工录入"),
        Yangzi => ("ENTERPRISE_CLAIM_INVOICE_YANGZI", "扬子数据"),
        Sbpt => ("ENTERPRISE_CLAIM_INVOICE_SBPT", "快赔数据"),
    }
}

fn manual_source() -> Value {
    InvoiceSource::Manual.into()
}

fn money(name: &'static str, label: &'static str) -> FieldDescriptor {
    FieldDescriptor::new(name, label)
        .normalize_with(normalize_money)
        .validate_with(validate_float_field)
        .default_with(zero)
}

fn id(name: &'static str, label: &'static str) -> FieldDescriptor {
    FieldDescriptor::new(name, label)
        .normalizable()
        .validate_with(validate_integer_field)
        .nullable()
}

fn invoice_schema() -> CoreResult<Schema> {
    Schema::builder("Invoice")
        .field(id("id", "发票ID"))
        .field(id("claim_id", "理赔ID"))
        .field(id("claim_medical_id", "就诊记录ID"))
        .field(
            FieldDescriptor::new("attachment_id", "关联附件ID")
                .normalizable()
                .validate_with(validate_integer_field),
        )
        .field(
            FieldDescriptor::new("number", "发票号码")
                .normalizable()
                .validate_with(validate_alpha_numeric_field),
        )
        .field(money("deductible", "起付线金额"))
        .field(money("amount", "总金额"))
        .field(money("self_paid_amount", "个人自付金额"))
        .field(money("self_care_amount", "个人自理金额"))
        .field(money("fund_paid_amount", "统筹基金金额"))
        .field(money("serious_illness_amount", "大病救助金额"))
        .field(money("serious_illness_insurance_amount", "大病保险金额"))
        .field(money("no_reimbursement_amount", "不予报销费用"))
        .field(money("invalid_amount", "无效费用金额"))
        .field(money("class_b_self_care_amount", "乙类自理金额"))
        .field(money("self_amount", "自费金额"))
        .field(money("civil_affair_subsidy_amount", "民政补助金额"))
        .field(money("medicare_amount", "医保范围内费用").nullable())
        .field(money("claim_base", "赔付基数金额").nullable())
        .field(money("claim_amount", "赔付金额").nullable())
        .field(
            FieldDescriptor::new("source", "发票来源")
                .of_enum::<InvoiceSource>()
                .default_with(manual_source),
        )
        .field(
            FieldDescriptor::new("self_care_items", "乙类自理项目列表")
                .elements_of(SelfCareItem::model_type()),
        )
        .field(
            FieldDescriptor::new("operator_name", "上一位操作者姓名")
                .normalizable()
                .nullable(),
        )
        .field(
            FieldDescriptor::new("status", "发票状态")
                .of_enum::<InvoiceStatus>()
                .nullable(),
        )
        .field(
            FieldDescriptor::new("create_time", "创建时间")
                .normalize_with(normalize_timestamp)
                .validate_with(validate_timestamp_field)
                .nullable(),
        )
        .build()
}

define_model! {
    /// A medical invoice with its breakdown of who pays what
    pub struct Invoice {
        id,
        claim_id,
        claim_medical_id,
        attachment_id,
        number,
        deductible,
        amount,
        self_paid_amount,
        self_care_amount,
        fund_paid_amount,
        serious_illness_amount,
        serious_illness_insurance_amount,
        no_reimbursement_amount,
        invalid_amount,
        class_b_self_care_amount,
        self_amount,
        civil_affair_subsidy_amount,
        medicare_amount,
        claim_base,
        claim_amount,
        source,
        self_care_items,
        operator_name,
        status,
        create_time,
    }
    schema = invoice_schema;
}

impl Invoice {
    /// The self-paid amount the other amounts imply
    pub fn expected_self_amount(&self) -> Decimal {
        let total = amount(&self.amount);
        let self_paid = amount(&self.self_paid_amount);
        let self_care = amount(&self.self_care_amount);
        let fund_paid = amount(&self.fund_paid_amount);
        let serious_illness = amount(&self.serious_illness_amount);
        let serious_illness_insurance = amount(&self.serious_illness_insurance_amount);
        let civil_affair_subsidy = amount(&self.civil_affair_subsidy_amount);
        debug!(
            %total,
            %self_paid,
            %self_care,
            %fund_paid,
            %serious_illness,
            %serious_illness_insurance,
            %civil_affair_subsidy,
            "Computing self amount"
        );
        round_money(
            total
                - self_paid
                - self_care
                - fund_paid
                - serious_illness
                - serious_illness_insurance
                - civil_affair_subsidy,
        )
    }

    /// Derives and stores the self-paid amount
    pub fn calculate_self_amount(&mut self) -> Decimal {
        let self_amount = self.expected_self_amount();
        self.self_amount = Value::Decimal(self_amount);
        self_amount
    }

    /// Sums the class B part of the self-care items and stores it
    ///
    /// Empty items and items paid entirely by or entirely outside the fund
    /// (ratio 0 or 1) do not count.
    pub fn calculate_class_b_self_care_amount(&mut self) -> Decimal {
        let sum: Decimal = self
            .self_care_items
            .as_list()
            .unwrap_or_default()
            .iter()
            .filter_map(|item| item.downcast_ref::<SelfCareItem>())
            .filter(|item| {
                let ratio = item.ratio();
                ratio != Decimal::ZERO && ratio != Decimal::ONE
            })
            .map(SelfCareItem::self_care_amount)
            .sum();
        let class_b = round_money(sum);
        debug!(%class_b, "Computed class B self-care amount");
        self.class_b_self_care_amount = Value::Decimal(class_b);
        class_b
    }

    pub fn self_care_items(&self) -> impl Iterator<Item = &SelfCareItem> {
        self.self_care_items
            .as_list()
            .unwrap_or_default()
            .iter()
            .filter_map(|item| item.downcast_ref::<SelfCareItem>())
    }

    /// Cross-checks the amounts of an invoice within its medical record
    ///
    /// Clinic and in-hospital invoices follow different rules for self-care
    /// amounts; every invoice must then match its derived self-paid amount
    /// and not be exceeded by the sum of the other payers.
    #[instrument(skip_all, fields(number = ?invoice.and_then(|i| i.number.as_text())))]
    pub fn check(invoice: Option<&Invoice>, record: &MedicalRecord) -> ValidationResult {
        let Some(invoice) = invoice else {
            return ValidationResult::failure(message("invoice-missing"));
        };
        let default_category = MedicalCategory::new();
        let category = record.medical_category().unwrap_or(&default_category);

        let self_paid = amount(&invoice.self_paid_amount);
        let self_care = amount(&invoice.self_care_amount);
        let class_b = amount(&invoice.class_b_self_care_amount);

        if category.is_clinic() {
            if self_paid < class_b {
                return ValidationResult::failure(message("clinic-self-paid-below-class-b"));
            }
        } else if category.is_in_hospital() {
            if self_care <= amount(&invoice.invalid_amount) {
                return ValidationResult::failure(message("hospital-self-care-not-above-invalid"));
            }
            if class_b != Decimal::ZERO {
                return ValidationResult::failure(message("hospital-class-b-not-zero"));
            }
            if amount(&invoice.no_reimbursement_amount) < self_care {
                return ValidationResult::failure(message(
                    "hospital-no-reimbursement-below-self-care",
                ));
            }
        }

        let self_amount = amount(&invoice.self_amount);
        let expected = invoice.expected_self_amount();
        if self_amount != expected {
            debug!(%self_amount, %expected, "Self amount mismatch");
            return ValidationResult::failure(message("self-amount-mismatch"));
        }
        if self_amount < Decimal::ZERO {
            return ValidationResult::failure(message("self-amount-negative"));
        }

        let others = amount(&invoice.fund_paid_amount)
            + amount(&invoice.serious_illness_amount)
            + amount(&invoice.serious_illness_insurance_amount)
            + amount(&invoice.civil_affair_subsidy_amount)
            + self_care
            + self_paid;
        if others > amount(&invoice.amount) {
            return ValidationResult::failure(message("total-exceeds-amount"));
        }
        ValidationResult::success()
    }
}
