//! NotNull: value must not be null.

use serde_json::Value;

use crate::constraint::options::OptionReader;
use crate::constraint::{Constraint, ConstraintKind};
use crate::foundation::{ConfigurationError, ConstraintValidator, ExecutionContext};

/// Options of the `NotNull` kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotNull {
    message: String,
}

impl NotNull {
    /// Kind name.
    pub const NAME: &'static str = "NotNull";
    /// Violation code.
    pub const IS_NULL_ERROR: &'static str = "ad32d13f-c3d4-423b-909a-857b961eb720";
    /// Default message.
    pub const MESSAGE: &'static str = "This value should not be null.";

    pub(crate) const OPTIONS: &'static [&'static str] = &["message"];

    #[must_use]
    pub fn new() -> Self {
        Self {
            message: Self::MESSAGE.to_owned(),
        }
    }

    /// Replaces the message template.
    #[must_use]
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub(crate) fn parse(options: &mut OptionReader<'_>) -> Result<Self, ConfigurationError> {
        Ok(Self {
            message: super::message(options, "message", Self::MESSAGE)?,
        })
    }
}

impl Default for NotNull {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) struct NotNullValidator;

impl ConstraintValidator for NotNullValidator {
    fn validate(&self, value: &Value, constraint: &Constraint, context: &mut ExecutionContext<'_>) {
        let ConstraintKind::NotNull(options) = constraint.kind() else {
            return;
        };
        if value.is_null() {
            context
                .build_violation(options.message.as_str())
                .set_parameter("value", "null")
                .set_code(NotNull::IS_NULL_ERROR)
                .add_violation();
        }
    }
}
