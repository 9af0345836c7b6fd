//! # assay-validator
//!
//! A constraint validation engine for JSON-shaped values and typed records.
//!
//! ## Quick Start
//!
//! ```rust
//! use assay_validator::prelude::*;
//! use serde_json::json;
//!
//! let validator = Validator::new();
//! let age = [Constraint::from(GreaterThanOrEqual::new(18))];
//!
//! let violations = validator.validate_value(&json!(15), &age).unwrap();
//! assert_eq!(violations.len(), 1);
//! assert_eq!(
//!     violations.to_string(),
//!     "15: This value should be greater than or equal to 18. (code ea4e51d1-3342-48bd-87f1-9e672cd90cad)\n"
//! );
//! ```
//!
//! ## Records
//!
//! Records declare their constraints once per type, through
//! [`Record::load_validator_metadata`], `#[derive(Record)]` attributes or
//! YAML mapping files. A [`Validator`] built with those sources resolves
//! and caches the merged metadata:
//!
//! ```rust
//! use assay_validator::prelude::*;
//! use serde::Serialize;
//!
//! #[derive(Serialize, Record)]
//! #[serde(rename_all = "camelCase")]
//! struct User {
//!     #[validate(NotBlank, Length(min = 3))]
//!     first_name: String,
//!     #[validate(GreaterThanOrEqual(18))]
//!     age: u32,
//! }
//!
//! let validator = Validator::builder().enable_attribute_mapping().build().unwrap();
//! let user = User { first_name: "Al".into(), age: 21 };
//! let violations = validator.validate_record(&user).unwrap();
//! assert_eq!(violations.by_path("firstName").count(), 1);
//! ```
//!
//! ## Groups
//!
//! Constraints belong to `Default` unless given groups; a run validates the
//! requested groups only. See [`foundation::groups`].
//!
//! ## Built-in constraints
//!
//! - **Absence**: [`NotBlank`](validators::NotBlank), [`NotNull`](validators::NotNull)
//! - **String**: [`Length`](validators::Length), [`Email`](validators::Email),
//!   [`GmailAddress`](validators::GmailAddress)
//! - **Comparison**: [`GreaterThanOrEqual`](validators::GreaterThanOrEqual),
//!   [`LessThanOrEqual`](validators::LessThanOrEqual)
//! - **Choice**: [`Choice`](validators::Choice)
//! - **Composite**: [`Collection`](validators::Collection), [`All`](validators::All)
//!
//! Custom kinds are registered with
//! [`ValidatorBuilder::register_constraint`].

// ValidatorError carries a serde_json error and a MappingError; boxing them
// would only move the allocation.
#![allow(clippy::result_large_err)]

extern crate self as assay_validator;

pub mod builder;
pub mod config;
pub mod constraint;
pub mod engine;
pub mod foundation;
pub mod mapping;
pub mod prelude;
pub mod registry;
pub mod validators;

pub use builder::ValidatorBuilder;
pub use config::{MissingFieldPolicy, ValidatorSettings};
pub use constraint::{Constraint, ConstraintKind, ConstraintSpec};
pub use engine::{Subject, Validator};
pub use foundation::{
    ConfigurationError, ConstraintValidator, ExecutionContext, Groups, MappingError,
    SettingsError, UsageError, ValidatorError, Violation, ViolationList,
};
pub use mapping::{ClassMetadata, PropertyAttribute, Record, Shape};
pub use registry::{ConstraintRegistry, OptionSchema};

#[cfg(feature = "derive")]
pub use assay_validator_macros::Record;

#[doc(hidden)]
pub mod __private {
    pub use serde_json;
}

#[cfg(test)]
mod tests {
    #[test]
    fn package_metadata() {
        assert_eq!(env!("CARGO_PKG_NAME"), "assay-validator");
        assert_eq!(env!("CARGO_PKG_AUTHORS"), "The assay developers");
    }
}
