//! Person Domain
//!
//! Model types for the people on a policy, declared on the core_kernel
//! engine:
//!
//! - [`Credential`]: identity document with type-dependent number formats
//! - [`Person`]: the base record, cross-checked against its identity card
//! - [`Guardian`]: a person who must be an adult
//! - [`Insurant`]: a covered person; minors need a valid guardian
//!
//! # Examples
//!
//! ```rust
//! use core_kernel::{validate, Fields, ValidationContext};
//! use domain_party::{Credential, CredentialType};
//!
//! let credential = Credential::of(CredentialType::IdentityCard, "");
//! let result = validate(&credential, Fields::All, &ValidationContext::new());
//! assert_eq!(result.description, "请填写身份证号码");
//!
//! let credential = Credential::of(CredentialType::IdentityCard, "110101199003078515");
//! assert!(validate(&credential, Fields::All, &ValidationContext::new()).is_success());
//! ```

pub mod credential;
pub mod error;
pub mod guardian;
pub mod insurant;
pub mod key_value;
pub mod messages;
pub mod person;
pub mod validation;

pub use credential::{Credential, CredentialType};
pub use error::{PartyError, PartyResult};
pub use guardian::{Guardian, NO_GUARDIAN_ID, NO_GUARDIAN_NAME, NO_GUARDIAN_VALUE};
pub use insurant::{Insurant, Kinship};
pub use key_value::KeyValuePair;
pub use person::{Changes, Gender, Person, PersonLike};
