//! String length bounds
//!
//! Length is measured in Unicode scalar values (chars). The empty string is
//! measured like any other string (length 0); `null` is skipped.

use serde_json::Value;

use crate::constraint::options::OptionReader;
use crate::constraint::{Constraint, ConstraintKind};
use crate::foundation::{ConfigurationError, ConstraintValidator, ExecutionContext, format_value};

// ============================================================================
// OPTIONS
// ============================================================================

/// Options of the `Length` kind. At least one bound is always set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Length {
    min: Option<usize>,
    max: Option<usize>,
    min_message: String,
    max_message: String,
    exact_message: String,
}

impl Length {
    /// Kind name.
    pub const NAME: &'static str = "Length";
    /// Code for strings shorter than `min`.
    pub const TOO_SHORT_ERROR: &'static str = "9ff3fdc4-b214-49db-8718-39c315e33d45";
    /// Code for strings longer than `max`.
    pub const TOO_LONG_ERROR: &'static str = "d94b19cc-114f-4f44-9cc4-4138e80a87b9";
    /// Code for strings whose length differs from an exact bound.
    pub const NOT_EQUAL_LENGTH_ERROR: &'static str = "4b6f5c76-22b4-409d-af16-fbe823ba9332";

    /// Default message when the string is too short.
    pub const MIN_MESSAGE: &'static str = "This value is too short. It should have {{ limit }} character or more.|This value is too short. It should have {{ limit }} characters or more.";
    /// Default message when the string is too long.
    pub const MAX_MESSAGE: &'static str = "This value is too long. It should have {{ limit }} character or less.|This value is too long. It should have {{ limit }} characters or less.";
    /// Default message when `min == max` and the length differs.
    pub const EXACT_MESSAGE: &'static str = "This value should have exactly {{ limit }} character.|This value should have exactly {{ limit }} characters.";

    pub(crate) const OPTIONS: &'static [&'static str] = &[
        "min",
        "max",
        "exactly",
        "minMessage",
        "maxMessage",
        "exactMessage",
        "charset",
    ];

    fn bounded(min: Option<usize>, max: Option<usize>) -> Self {
        Self {
            min,
            max,
            min_message: Self::MIN_MESSAGE.to_owned(),
            max_message: Self::MAX_MESSAGE.to_owned(),
            exact_message: Self::EXACT_MESSAGE.to_owned(),
        }
    }

    /// At least `min` chars.
    #[must_use]
    pub fn min(min: usize) -> Self {
        Self::bounded(Some(min), None)
    }

    /// At most `max` chars.
    #[must_use]
    pub fn max(max: usize) -> Self {
        Self::bounded(None, Some(max))
    }

    /// Between `min` and `max` chars, inclusive. Bounds are swapped if given
    /// in the wrong order.
    #[must_use]
    pub fn between(min: usize, max: usize) -> Self {
        Self::bounded(Some(min.min(max)), Some(min.max(max)))
    }

    /// Exactly `len` chars.
    #[must_use]
    pub fn exactly(len: usize) -> Self {
        Self::bounded(Some(len), Some(len))
    }

    /// Replaces the too-short template.
    #[must_use]
    pub fn min_message(mut self, message: impl Into<String>) -> Self {
        self.min_message = message.into();
        self
    }

    /// Replaces the too-long template.
    #[must_use]
    pub fn max_message(mut self, message: impl Into<String>) -> Self {
        self.max_message = message.into();
        self
    }

    /// Replaces the exact-length template.
    #[must_use]
    pub fn exact_message(mut self, message: impl Into<String>) -> Self {
        self.exact_message = message.into();
        self
    }

    /// Lower bound.
    #[must_use]
    pub fn min_len(&self) -> Option<usize> {
        self.min
    }

    /// Upper bound.
    #[must_use]
    pub fn max_len(&self) -> Option<usize> {
        self.max
    }

    pub(crate) fn parse(options: &mut OptionReader<'_>) -> Result<Self, ConfigurationError> {
        if let Some(charset) = options.string("charset")? {
            if !charset.eq_ignore_ascii_case("UTF-8") {
                return Err(ConfigurationError::invalid(
                    Self::NAME,
                    "charset",
                    format!("unsupported charset `{charset}`, only UTF-8 is measured"),
                ));
            }
        }

        let exactly = options.usize("exactly")?;
        let min = options.usize("min")?;
        let max = options.usize("max")?;

        let (min, max) = match (exactly, min, max) {
            (Some(len), None, None) => (Some(len), Some(len)),
            (Some(_), _, _) => {
                return Err(ConfigurationError::invalid(
                    Self::NAME,
                    "exactly",
                    "cannot be combined with min or max",
                ));
            }
            (None, None, None) => {
                return Err(ConfigurationError::missing(Self::NAME, "min or max"));
            }
            (None, Some(min), Some(max)) if min > max => {
                return Err(ConfigurationError::invalid(
                    Self::NAME,
                    "min",
                    format!("min ({min}) is greater than max ({max})"),
                ));
            }
            (None, min, max) => (min, max),
        };

        let mut length = Self::bounded(min, max);
        if let Some(message) = options.string("minMessage")? {
            length.min_message = message;
        }
        if let Some(message) = options.string("maxMessage")? {
            length.max_message = message;
        }
        if let Some(message) = options.string("exactMessage")? {
            length.exact_message = message;
        }
        Ok(length)
    }
}

// ============================================================================
// VALIDATOR
// ============================================================================

pub(crate) struct LengthValidator;

impl ConstraintValidator for LengthValidator {
    fn validate(&self, value: &Value, constraint: &Constraint, context: &mut ExecutionContext<'_>) {
        let ConstraintKind::Length(options) = constraint.kind() else {
            return;
        };
        let text = match value {
            Value::Null => return,
            Value::String(text) => text,
            other => {
                super::type_violation(context, other, "string");
                return;
            }
        };

        let length = text.chars().count();
        let exact = options.min.is_some() && options.min == options.max;

        let failure = match (options.min, options.max) {
            (_, Some(max)) if length > max => Some((
                max,
                if exact { &options.exact_message } else { &options.max_message },
                if exact { Length::NOT_EQUAL_LENGTH_ERROR } else { Length::TOO_LONG_ERROR },
            )),
            (Some(min), _) if length < min => Some((
                min,
                if exact { &options.exact_message } else { &options.min_message },
                if exact { Length::NOT_EQUAL_LENGTH_ERROR } else { Length::TOO_SHORT_ERROR },
            )),
            _ => None,
        };

        if let Some((limit, template, code)) = failure {
            context
                .build_violation(template.as_str())
                .set_parameter("value", format_value(value))
                .set_parameter("limit", limit.to_string())
                .set_parameter("value_length", length.to_string())
                .set_plural(limit as u64)
                .set_code(code)
                .set_invalid_value(value)
                .add_violation();
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validators::testing::{check, codes};
    use crate::validators::TYPE_ERROR;
    use serde_json::json;

    #[test]
    fn too_short_uses_plural_form() {
        let violations = check(json!("ab"), Length::min(3));
        assert_eq!(codes(&violations), [Length::TOO_SHORT_ERROR]);
        assert_eq!(
            violations.get(0).map(|v| v.message()),
            Some("This value is too short. It should have 3 characters or more.")
        );
    }

    #[test]
    fn singular_form_for_limit_one() {
        let violations = check(json!(""), Length::min(1));
        assert_eq!(
            violations.get(0).map(|v| v.message()),
            Some("This value is too short. It should have 1 character or more.")
        );
    }

    #[test]
    fn empty_string_is_measured() {
        assert_eq!(check(json!(""), Length::min(3)).len(), 1);
        assert!(check(json!(null), Length::min(3)).is_empty());
    }

    #[test]
    fn too_long_and_exact() {
        assert_eq!(codes(&check(json!("abcdef"), Length::max(5))), [Length::TOO_LONG_ERROR]);
        assert_eq!(
            codes(&check(json!("abc"), Length::exactly(5))),
            [Length::NOT_EQUAL_LENGTH_ERROR]
        );
        assert!(check(json!("abcde"), Length::between(5, 3)).is_empty());
    }

    #[test]
    fn counts_chars_not_bytes() {
        assert!(check(json!("héé"), Length::max(3)).is_empty());
    }

    #[test]
    fn numbers_are_a_type_mismatch() {
        assert_eq!(codes(&check(json!(12345), Length::min(3))), [TYPE_ERROR]);
    }

    #[test]
    fn option_errors() {
        assert!(matches!(
            Constraint::from_options("Length", json!({})),
            Err(ConfigurationError::MissingOption { .. })
        ));
        assert!(matches!(
            Constraint::from_options("Length", json!({"min": 5, "max": 2})),
            Err(ConfigurationError::InvalidOption { .. })
        ));
        assert!(matches!(
            Constraint::from_options("Length", json!({"min": 1, "charset": "latin1"})),
            Err(ConfigurationError::InvalidOption { .. })
        ));
        assert_eq!(
            Constraint::from_options("Length", json!({"exactly": 4})),
            Ok(Constraint::from(Length::exactly(4)))
        );
    }
}
