//! Prelude module for convenient imports.
//!
//! `use assay_validator::prelude::*;` brings in the engine, the built-in
//! constraint kinds and the traits needed to write custom validators or
//! declare record metadata.

// ============================================================================
// ENGINE
// ============================================================================

pub use crate::builder::ValidatorBuilder;
pub use crate::config::{MissingFieldPolicy, ValidatorSettings};
pub use crate::engine::{Subject, Validator};
pub use crate::registry::{ConstraintRegistry, OptionSchema};

// ============================================================================
// FOUNDATION
// ============================================================================

pub use crate::constraint::{Constraint, ConstraintKind, ConstraintSpec};
pub use crate::foundation::{
    ConfigurationError, ConstraintValidator, ExecutionContext, Groups, MappingError,
    PropertyPath, UsageError, ValidatorError, Violation, ViolationList,
};

// ============================================================================
// RECORDS
// ============================================================================

pub use crate::mapping::{ClassMetadata, MetadataLoader, PropertyAttribute, Record, Shape};

#[cfg(feature = "derive")]
pub use assay_validator_macros::Record;

// ============================================================================
// BUILT-IN CONSTRAINTS
// ============================================================================

pub use crate::validators::{
    All, Choice, Collection, CollectionField, Custom, Email, EmailMode, GmailAddress,
    GreaterThanOrEqual, Length, LessThanOrEqual, Normalizer, NotBlank, NotNull,
};
