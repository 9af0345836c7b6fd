//! Foundation types shared by every part of the engine
//!
//! - [`ConstraintValidator`] - the evaluator contract
//! - [`ExecutionContext`] / [`ViolationBuilder`] - per-call state and reporting
//! - [`Violation`] / [`ViolationList`] - results
//! - [`Groups`] - validation group sets and selection
//! - [`PropertyPath`] - dotted locations inside nested values
//! - the error types of [`error`]

pub mod context;
pub mod error;
pub mod groups;
pub mod message;
pub mod path;
pub mod traits;
pub mod violation;

pub use context::{ExecutionContext, ViolationBuilder};
pub use error::{
    ConfigurationError, MappingError, SettingsError, UsageError, ValidatorError,
};
pub use groups::{DEFAULT_GROUP, Groups};
pub use message::{Parameters, format_value, format_values, type_name};
pub use path::{PathSegment, PropertyPath};
pub use traits::ConstraintValidator;
pub use violation::{Violation, ViolationList};
