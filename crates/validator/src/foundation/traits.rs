//! Core traits for the validation system

use serde_json::Value;

use crate::constraint::Constraint;
use crate::foundation::context::ExecutionContext;

/// Evaluates one constraint kind.
///
/// Implementations never return errors; a failed rule is reported through
/// [`ExecutionContext::build_violation`]. The built-in kinds each have one
/// validator; custom kinds register theirs with
/// [`ValidatorBuilder::register_constraint`](crate::ValidatorBuilder::register_constraint).
///
/// # Examples
///
/// ```rust
/// use assay_validator::prelude::*;
/// use serde_json::Value;
///
/// struct Lowercase;
///
/// impl ConstraintValidator for Lowercase {
///     fn validate(&self, value: &Value, constraint: &Constraint, context: &mut ExecutionContext<'_>) {
///         let Some(text) = value.as_str() else { return };
///         if text.chars().any(char::is_uppercase) {
///             context
///                 .build_violation("This value should be lowercase.")
///                 .set_code(constraint.name())
///                 .set_invalid_value(value)
///                 .add_violation();
///         }
///     }
/// }
/// ```
pub trait ConstraintValidator: Send + Sync {
    /// Checks `value` against `constraint`, adding violations to `context`.
    fn validate(&self, value: &Value, constraint: &Constraint, context: &mut ExecutionContext<'_>);
}
