//! Ordered comparisons against a fixed bound
//!
//! Numbers compare numerically, strings compare lexically. Comparing a
//! number with a string (or anything with a container) is a type mismatch.

use std::cmp::Ordering;

use serde_json::{Number, Value};

use crate::constraint::options::OptionReader;
use crate::constraint::{Constraint, ConstraintKind};
use crate::foundation::{
    ConfigurationError, ConstraintValidator, ExecutionContext, format_value, type_name,
};

/// Reads and checks the compared value.
fn parse_bound(kind: &str, options: &mut OptionReader<'_>) -> Result<Value, ConfigurationError> {
    match options.required("value")? {
        bound @ (Value::Number(_) | Value::String(_)) => Ok(bound),
        other => Err(ConfigurationError::invalid(
            kind,
            "value",
            format!("expected a number or a string, found {}", type_name(&other)),
        )),
    }
}

/// Integers compare exactly; a float on either side compares as `f64`.
fn compare_numbers(a: &Number, b: &Number) -> Option<Ordering> {
    fn integer(n: &Number) -> Option<i128> {
        n.as_i64().map(i128::from).or_else(|| n.as_u64().map(i128::from))
    }

    match (integer(a), integer(b)) {
        (Some(a), Some(b)) => Some(a.cmp(&b)),
        _ => a.as_f64()?.partial_cmp(&b.as_f64()?),
    }
}

fn compare(value: &Value, bound: &Value) -> Option<Ordering> {
    match (value, bound) {
        (Value::Number(a), Value::Number(b)) => compare_numbers(a, b),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

// ============================================================================
// GREATER THAN OR EQUAL
// ============================================================================

/// Options of the `GreaterThanOrEqual` kind.
#[derive(Debug, Clone, PartialEq)]
pub struct GreaterThanOrEqual {
    value: Value,
    message: String,
}

impl GreaterThanOrEqual {
    /// Kind name.
    pub const NAME: &'static str = "GreaterThanOrEqual";
    /// Violation code.
    pub const TOO_LOW_ERROR: &'static str = "ea4e51d1-3342-48bd-87f1-9e672cd90cad";
    /// Default message.
    pub const MESSAGE: &'static str =
        "This value should be greater than or equal to {{ compared_value }}.";

    pub(crate) const OPTIONS: &'static [&'static str] = &["value", "message"];

    /// Values must be `>= bound`.
    pub fn new(bound: impl Into<Value>) -> Self {
        Self {
            value: bound.into(),
            message: Self::MESSAGE.to_owned(),
        }
    }

    /// Replaces the message template.
    #[must_use]
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// The bound.
    #[must_use]
    pub fn value(&self) -> &Value {
        &self.value
    }

    pub(crate) fn parse(options: &mut OptionReader<'_>) -> Result<Self, ConfigurationError> {
        Ok(Self {
            value: parse_bound(Self::NAME, options)?,
            message: super::message(options, "message", Self::MESSAGE)?,
        })
    }
}

// ============================================================================
// LESS THAN OR EQUAL
// ============================================================================

/// Options of the `LessThanOrEqual` kind.
#[derive(Debug, Clone, PartialEq)]
pub struct LessThanOrEqual {
    value: Value,
    message: String,
}

impl LessThanOrEqual {
    /// Kind name.
    pub const NAME: &'static str = "LessThanOrEqual";
    /// Violation code.
    pub const TOO_HIGH_ERROR: &'static str = "30fbb013-d015-4232-8b3b-8f3be97a7e14";
    /// Default message.
    pub const MESSAGE: &'static str =
        "This value should be less than or equal to {{ compared_value }}.";

    pub(crate) const OPTIONS: &'static [&'static str] = &["value", "message"];

    /// Values must be `<= bound`.
    pub fn new(bound: impl Into<Value>) -> Self {
        Self {
            value: bound.into(),
            message: Self::MESSAGE.to_owned(),
        }
    }

    /// Replaces the message template.
    #[must_use]
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// The bound.
    #[must_use]
    pub fn value(&self) -> &Value {
        &self.value
    }

    pub(crate) fn parse(options: &mut OptionReader<'_>) -> Result<Self, ConfigurationError> {
        Ok(Self {
            value: parse_bound(Self::NAME, options)?,
            message: super::message(options, "message", Self::MESSAGE)?,
        })
    }
}

// ============================================================================
// VALIDATOR
// ============================================================================

pub(crate) struct ComparisonValidator;

impl ConstraintValidator for ComparisonValidator {
    fn validate(&self, value: &Value, constraint: &Constraint, context: &mut ExecutionContext<'_>) {
        let (bound, message, code, accept): (_, _, _, fn(Ordering) -> bool) =
            match constraint.kind() {
                ConstraintKind::GreaterThanOrEqual(options) => (
                    &options.value,
                    &options.message,
                    GreaterThanOrEqual::TOO_LOW_ERROR,
                    Ordering::is_ge,
                ),
                ConstraintKind::LessThanOrEqual(options) => (
                    &options.value,
                    &options.message,
                    LessThanOrEqual::TOO_HIGH_ERROR,
                    Ordering::is_le,
                ),
                _ => return,
            };

        if super::is_absent(value) {
            return;
        }

        let Some(ordering) = compare(value, bound) else {
            super::type_violation(context, value, type_name(bound));
            return;
        };

        if !accept(ordering) {
            context
                .build_violation(message.as_str())
                .set_parameter("value", format_value(value))
                .set_parameter("compared_value", format_value(bound))
                .set_parameter("compared_value_type", type_name(bound))
                .set_code(code)
                .set_invalid_value(value)
                .add_violation();
        }
    }
}
