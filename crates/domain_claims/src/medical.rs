//! Medical records, their categories and dictionary entries
//!
//! A medical record owns the invoices of one treatment. Validating a record
//! with all fields also runs the invoice amount checks under the `check`
//! rule, reporting the first invoice that fails.

use chrono::NaiveDate;
use core_kernel::format::LocalDate;
use core_kernel::normalize::{normalize_date, normalize_integer, normalize_timestamp};
use core_kernel::validate::{validate_date_field, validate_integer_field, validate_timestamp_field};
use core_kernel::{
    define_model, CoreResult, FieldDescriptor, Model, Schema, TypedModel, ValidationContext,
    ValidationResult, Value,
};
use tracing::{debug, instrument};

use crate::error::{ClaimError, ClaimResult};
use crate::invoice::Invoice;

fn timestamp(name: &'static str, label: &'static str) -> FieldDescriptor {
    FieldDescriptor::new(name, label)
        .normalize_with(normalize_timestamp)
        .validate_with(validate_timestamp_field)
        .nullable()
}

fn dict_entry_schema() -> CoreResult<Schema> {
    Schema::builder("DictEntry")
        .field(
            FieldDescriptor::new("id", "ID")
                .normalizable()
                .validate_with(validate_integer_field)
                .nullable(),
        )
        .field(FieldDescriptor::new("code", "编码").normalizable())
        .field(FieldDescriptor::new("name", "名称").normalizable().nullable())
        .field(FieldDescriptor::new("description", "描述").normalizable().nullable())
        .field(FieldDescriptor::new("comment", "备注").normalizable().nullable())
        .field(timestamp("create_time", "创建时间"))
        .field(timestamp("modify_time", "修改时间"))
        .field(timestamp("delete_time", "删除时间"))
        .name_field("name")
        .build()
}

define_model! {
    /// An entry of a code table, such as a hospital or a disease
    pub struct DictEntry {
        id,
        code,
        name,
        description,
        comment,
        create_time,
        modify_time,
        delete_time,
    }
    schema = dict_entry_schema;
}

impl DictEntry {
    pub fn of(code: &str, name: &str) -> Self {
        let mut entry = Self::new();
        entry.code = Value::text(code);
        entry.name = Value::text(name);
        entry
    }
}

fn medical_category_schema() -> CoreResult<Schema> {
    Schema::builder("MedicalCategory")
        .extend(DictEntry::static_schema())
        .build()
}

define_model! {
    /// Medical insurance category of a treatment, e.g. `普通门诊(Z)`
    pub struct MedicalCategory {
        id,
        code,
        name,
        description,
        comment,
        create_time,
        modify_time,
        delete_time,
    }
    schema = medical_category_schema;
}

impl MedicalCategory {
    pub fn of(code: &str, name: &str) -> Self {
        let mut category = Self::new();
        category.code = Value::text(code);
        category.name = Value::text(name);
        category
    }

    fn name(&self) -> &str {
        self.name.as_text().unwrap_or_default()
    }

    /// Anything not marked as in-hospital counts as a clinic visit
    pub fn is_clinic(&self) -> bool {
        !self.is_in_hospital()
    }

    pub fn is_in_hospital(&self) -> bool {
        self.name().contains("住院")
    }

    /// Returns true if the category applies to an insured type
    ///
    /// Categories carry the scheme they belong to as a suffix: `(Z)` for
    /// employees and retirees, `(G)` for donor families, `(D)` for only
    /// children.
    pub fn applicable(&self, insured_type: &str) -> bool {
        let suffix = match insured_type {
            "IN_SERVICE" | "RETIRED" | "RESIGNED" | "OVER_SEVENTY" => "(Z)",
            "CHILD_DONOR_GENUS" | "DONOR_GENUS" => "(G)",
            "ONLY_CHILD" => "(D)",
            _ => return false,
        };
        self.name().ends_with(suffix)
    }
}

#[instrument(skip_all)]
fn check_invoices(model: &dyn Model, _ctx: &ValidationContext<'_>) -> ValidationResult {
    let Some(record) = model.as_any().downcast_ref::<MedicalRecord>() else {
        return ValidationResult::success();
    };
    let invoices = record.invoices.as_list().unwrap_or_default();
    debug!(count = invoices.len(), "Checking invoices");
    ValidationResult::first_failure(
        invoices
            .iter()
            .map(|invoice| Invoice::check(invoice.downcast_ref::<Invoice>(), record)),
    )
}

fn empty_invoices() -> Value {
    Value::List(Vec::new())
}

fn medical_record_schema() -> CoreResult<Schema> {
    Schema::builder("MedicalRecord")
        .field(
            FieldDescriptor::new("id", "就诊记录ID")
                .normalizable()
                .validate_with(validate_integer_field)
                .nullable(),
        )
        .field(
            FieldDescriptor::new("claim_id", "理赔ID")
                .normalizable()
                .validate_with(validate_integer_field)
                .nullable(),
        )
        .field(
            FieldDescriptor::new("treatment_start_date", "就诊开始日期")
                .normalize_with(normalize_date)
                .validate_with(validate_date_field)
                .nullable(),
        )
        .field(
            FieldDescriptor::new("treatment_end_date", "就诊结束日期")
                .normalize_with(normalize_date)
                .validate_with(validate_date_field)
                .nullable(),
        )
        .field(
            FieldDescriptor::new("medical_category", "医疗类别")
                .of_type(MedicalCategory::model_type()),
        )
        .field(FieldDescriptor::new("hospital", "就诊医院").of_type(DictEntry::model_type()))
        .field(FieldDescriptor::new("disease", "主要疾病").of_type(DictEntry::model_type()))
        .field(
            FieldDescriptor::new("hospital_level", "医院级别")
                .normalize_with(normalize_integer)
                .validate_with(validate_integer_field)
                .default_with(|| Value::Integer(0)),
        )
        .field(
            FieldDescriptor::new("operator_name", "上一位操作者姓名")
                .normalizable()
                .nullable(),
        )
        .field(FieldDescriptor::new("status", "状态").normalizable().nullable())
        .field(
            FieldDescriptor::new("invoices", "发票")
                .elements_of(Invoice::model_type())
                .default_with(empty_invoices),
        )
        .field(timestamp("create_time", "创建时间"))
        .rule("check", check_invoices, true)
        .build()
}

define_model! {
    /// One treatment of the insured person and the invoices it produced
    pub struct MedicalRecord {
        id,
        claim_id,
        treatment_start_date,
        treatment_end_date,
        medical_category,
        hospital,
        disease,
        hospital_level,
        operator_name,
        status,
        invoices,
        create_time,
    }
    schema = medical_record_schema;
}

impl MedicalRecord {
    pub fn medical_category(&self) -> Option<&MedicalCategory> {
        self.medical_category.downcast_ref::<MedicalCategory>()
    }

    pub fn invoices(&self) -> impl Iterator<Item = &Invoice> {
        self.invoices
            .as_list()
            .unwrap_or_default()
            .iter()
            .filter_map(|invoice| invoice.downcast_ref::<Invoice>())
    }

    /// Appends an invoice, starting the list if there is none
    pub fn add_invoice(&mut self, invoice: Invoice) {
        match &mut self.invoices {
            Value::List(invoices) => invoices.push(invoice.into()),
            other => *other = Value::List(vec![invoice.into()]),
        }
    }

    /// Sets both treatment dates from a `[start, end]` pair
    ///
    /// `None` clears them. Dates are normalized like the fields themselves.
    pub fn set_treatment_date_range(&mut self, range: Option<&[&str]>) -> ClaimResult<()> {
        let Some(range) = range else {
            self.treatment_start_date = Value::Null;
            self.treatment_end_date = Value::Null;
            return Ok(());
        };
        let [start, end] = range else {
            return Err(ClaimError::InvalidDateRange(range.len()));
        };
        self.treatment_start_date = normalize_date(&Value::text(*start))?;
        self.treatment_end_date = normalize_date(&Value::text(*end))?;
        Ok(())
    }

    /// The `[start, end]` treatment dates; unset or malformed dates are `None`
    pub fn treatment_date_range(&self) -> [Option<NaiveDate>; 2] {
        [&self.treatment_start_date, &self.treatment_end_date]
            .map(|date| date.as_text().and_then(LocalDate::parse))
    }
}
