//! NotBlank: value must not be null, false, an empty string or an empty
//! container.

use serde_json::Value;

use crate::constraint::options::OptionReader;
use crate::constraint::{Constraint, ConstraintKind};
use crate::foundation::{ConfigurationError, ConstraintValidator, ExecutionContext, format_value};

/// Transformation applied to strings before the blank check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Normalizer {
    /// Compare the string as given.
    #[default]
    None,
    /// Strip leading and trailing whitespace first.
    Trim,
}

/// Options of the `NotBlank` kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotBlank {
    message: String,
    allow_null: bool,
    normalizer: Normalizer,
}

impl NotBlank {
    /// Kind name.
    pub const NAME: &'static str = "NotBlank";
    /// Violation code.
    pub const IS_BLANK_ERROR: &'static str = "c1051bb4-d103-4f74-8988-acbcafc7fdc3";
    /// Default message.
    pub const MESSAGE: &'static str = "This value should not be blank.";

    pub(crate) const OPTIONS: &'static [&'static str] = &["message", "allowNull", "normalizer"];

    /// Blank values fail; `null` included.
    #[must_use]
    pub fn new() -> Self {
        Self {
            message: Self::MESSAGE.to_owned(),
            allow_null: false,
            normalizer: Normalizer::None,
        }
    }

    /// Replaces the message template.
    #[must_use]
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Lets `null` through.
    #[must_use]
    pub fn allow_null(mut self) -> Self {
        self.allow_null = true;
        self
    }

    /// Trims strings before checking.
    #[must_use]
    pub fn trimmed(mut self) -> Self {
        self.normalizer = Normalizer::Trim;
        self
    }

    pub(crate) fn parse(options: &mut OptionReader<'_>) -> Result<Self, ConfigurationError> {
        let normalizer = match options.string("normalizer")?.as_deref() {
            None => Normalizer::None,
            Some("trim") => Normalizer::Trim,
            Some(other) => {
                return Err(ConfigurationError::invalid(
                    Self::NAME,
                    "normalizer",
                    format!("unsupported normalizer `{other}`, expected `trim`"),
                ));
            }
        };
        Ok(Self {
            message: super::message(options, "message", Self::MESSAGE)?,
            allow_null: options.bool("allowNull")?.unwrap_or(false),
            normalizer,
        })
    }

    fn is_blank(&self, value: &Value) -> bool {
        match value {
            Value::Null => !self.allow_null,
            Value::Bool(b) => !b,
            Value::String(s) => match self.normalizer {
                Normalizer::None => s.is_empty(),
                Normalizer::Trim => s.trim().is_empty(),
            },
            Value::Array(items) => items.is_empty(),
            Value::Object(map) => map.is_empty(),
            Value::Number(_) => false,
        }
    }
}

impl Default for NotBlank {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) struct NotBlankValidator;

impl ConstraintValidator for NotBlankValidator {
    fn validate(&self, value: &Value, constraint: &Constraint, context: &mut ExecutionContext<'_>) {
        let ConstraintKind::NotBlank(options) = constraint.kind() else {
            return;
        };
        if options.is_blank(value) {
            context
                .build_violation(options.message.as_str())
                .set_parameter("value", format_value(value))
                .set_code(NotBlank::IS_BLANK_ERROR)
                .set_invalid_value(value)
                .add_violation();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validators::testing::check;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case::null(json!(null))]
    #[case::empty_string(json!(""))]
    #[case::false_value(json!(false))]
    #[case::empty_list(json!([]))]
    #[case::empty_map(json!({}))]
    fn blank_values_fail(#[case] value: Value) {
        let violations = check(value, NotBlank::new());
        assert_eq!(violations.len(), 1);
        assert_eq!(violations.get(0).map(|v| v.code()), Some(NotBlank::IS_BLANK_ERROR));
    }

    #[rstest]
    #[case::text(json!("lior"))]
    #[case::zero(json!(0))]
    #[case::zero_string(json!("0"))]
    #[case::spaces(json!("  "))]
    #[case::list(json!([1]))]
    fn present_values_pass(#[case] value: Value) {
        assert!(check(value, NotBlank::new()).is_empty());
    }

    #[test]
    fn allow_null_and_trim() {
        assert!(check(json!(null), NotBlank::new().allow_null()).is_empty());
        assert_eq!(check(json!("   "), NotBlank::new().trimmed()).len(), 1);
    }

    #[test]
    fn custom_message() {
        let violations = check(json!(""), NotBlank::new().message("Name {{ value }} is blank"));
        assert_eq!(violations.get(0).map(|v| v.message()), Some("Name \"\" is blank"));
    }

    #[test]
    fn parses_options() {
        let constraint =
            Constraint::from_options("NotBlank", json!({"allowNull": true, "normalizer": "trim"}));
        assert_eq!(constraint, Ok(Constraint::from(NotBlank::new().allow_null().trimmed())));

        assert!(Constraint::from_options("NotBlank", json!({"normalizer": "upper"})).is_err());
    }
}
