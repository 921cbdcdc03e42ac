//! Claims Domain
//!
//! Model types for medical claims, declared on the core_kernel engine:
//!
//! - [`MedicalRecord`]: one treatment with its category, hospital and invoices
//! - [`Invoice`]: the amounts of an invoice and who pays them
//! - [`SelfCareItem`]: items partly paid by the insured person
//!
//! Validating a medical record with all fields runs the invoice amount
//! checks after the field validators.
//!
//! ```text
//! self = amount - self_paid - self_care - fund_paid - serious_illness
//!        - serious_illness_insurance - civil_affair_subsidy
//! ```

pub mod amount;
pub mod claim;
pub mod error;
pub mod invoice;
pub mod medical;
pub mod messages;
pub mod self_care_item;

pub use claim::{ClaimStatus, InsuredStatus, MedicareType};
pub use error::{ClaimError, ClaimResult};
pub use invoice::{Invoice, InvoiceSource, InvoiceStatus};
pub use medical::{DictEntry, MedicalCategory, MedicalRecord};
pub use self_care_item::SelfCareItem;
