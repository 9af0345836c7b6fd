//! Choice: value must be one of a fixed set

use serde_json::Value;

use crate::constraint::options::OptionReader;
use crate::constraint::{Constraint, ConstraintKind};
use crate::foundation::{
    ConfigurationError, ConstraintValidator, ExecutionContext, format_value, format_values,
};

/// Options of the `Choice` kind.
#[derive(Debug, Clone, PartialEq)]
pub struct Choice {
    choices: Vec<Value>,
    multiple: bool,
    min: Option<usize>,
    max: Option<usize>,
    message: String,
    multiple_message: String,
    min_message: String,
    max_message: String,
}

impl Choice {
    /// Kind name.
    pub const NAME: &'static str = "Choice";
    /// Code for a value outside the set.
    pub const NO_SUCH_CHOICE_ERROR: &'static str = "8e179f1b-97aa-4560-a02f-2a8b42e49df7";
    /// Code for too few selections.
    pub const TOO_FEW_ERROR: &'static str = "11edd7eb-5872-4b6e-9f12-89923999fd0e";
    /// Code for too many selections.
    pub const TOO_MANY_ERROR: &'static str = "9bd98e49-211c-433f-8630-fd1c2d0f08b3";

    /// Default message for a single value.
    pub const MESSAGE: &'static str = "The value you selected is not a valid choice.";
    /// Default message for a list with an unknown member.
    pub const MULTIPLE_MESSAGE: &'static str = "One or more of the given values is invalid.";
    /// Default message for too few selections.
    pub const MIN_MESSAGE: &'static str = "You must select at least {{ limit }} choice.|You must select at least {{ limit }} choices.";
    /// Default message for too many selections.
    pub const MAX_MESSAGE: &'static str = "You must select at most {{ limit }} choice.|You must select at most {{ limit }} choices.";

    pub(crate) const OPTIONS: &'static [&'static str] = &[
        "choices",
        "multiple",
        "min",
        "max",
        "message",
        "multipleMessage",
        "minMessage",
        "maxMessage",
    ];

    /// Value must equal one of `choices`.
    pub fn new<I, V>(choices: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self {
            choices: choices.into_iter().map(Into::into).collect(),
            multiple: false,
            min: None,
            max: None,
            message: Self::MESSAGE.to_owned(),
            multiple_message: Self::MULTIPLE_MESSAGE.to_owned(),
            min_message: Self::MIN_MESSAGE.to_owned(),
            max_message: Self::MAX_MESSAGE.to_owned(),
        }
    }

    /// Expects a list whose members all belong to the set.
    #[must_use]
    pub fn multiple(mut self) -> Self {
        self.multiple = true;
        self
    }

    /// Minimum number of selections (multiple mode).
    #[must_use]
    pub fn min(mut self, min: usize) -> Self {
        self.min = Some(min);
        self
    }

    /// Maximum number of selections (multiple mode).
    #[must_use]
    pub fn max(mut self, max: usize) -> Self {
        self.max = Some(max);
        self
    }

    /// Replaces the single-value message template.
    #[must_use]
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// The allowed values.
    #[must_use]
    pub fn choices(&self) -> &[Value] {
        &self.choices
    }

    pub(crate) fn parse(options: &mut OptionReader<'_>) -> Result<Self, ConfigurationError> {
        let choices = match options.required("choices")? {
            Value::Array(choices) => choices,
            other => vec![other],
        };
        let mut choice = Self::new(choices);
        choice.multiple = options.bool("multiple")?.unwrap_or(false);
        choice.min = options.usize("min")?;
        choice.max = options.usize("max")?;
        choice.message = super::message(options, "message", Self::MESSAGE)?;
        choice.multiple_message = super::message(options, "multipleMessage", Self::MULTIPLE_MESSAGE)?;
        choice.min_message = super::message(options, "minMessage", Self::MIN_MESSAGE)?;
        choice.max_message = super::message(options, "maxMessage", Self::MAX_MESSAGE)?;
        Ok(choice)
    }

    fn contains(&self, value: &Value) -> bool {
        self.choices.contains(value)
    }
}

pub(crate) struct ChoiceValidator;

impl ConstraintValidator for ChoiceValidator {
    fn validate(&self, value: &Value, constraint: &Constraint, context: &mut ExecutionContext<'_>) {
        let ConstraintKind::Choice(options) = constraint.kind() else {
            return;
        };
        if super::is_absent(value) {
            return;
        }

        if !options.multiple {
            if !options.contains(value) {
                context
                    .build_violation(options.message.as_str())
                    .set_parameter("value", format_value(value))
                    .set_parameter("choices", format_values(&options.choices))
                    .set_code(Choice::NO_SUCH_CHOICE_ERROR)
                    .set_invalid_value(value)
                    .add_violation();
            }
            return;
        }

        let Some(selected) = value.as_array() else {
            super::type_violation(context, value, "array");
            return;
        };

        if let Some(unknown) = selected.iter().find(|item| !options.contains(item)) {
            context
                .build_violation(options.multiple_message.as_str())
                .set_parameter("value", format_value(unknown))
                .set_parameter("choices", format_values(&options.choices))
                .set_code(Choice::NO_SUCH_CHOICE_ERROR)
                .set_invalid_value(unknown)
                .add_violation();
            return;
        }

        let count = selected.len();
        if let Some(min) = options.min.filter(|&min| count < min) {
            context
                .build_violation(options.min_message.as_str())
                .set_parameter("limit", min.to_string())
                .set_parameter("choices", format_values(&options.choices))
                .set_plural(min as u64)
                .set_code(Choice::TOO_FEW_ERROR)
                .set_invalid_value(value)
                .add_violation();
            return;
        }
        if let Some(max) = options.max.filter(|&max| count > max) {
            context
                .build_violation(options.max_message.as_str())
                .set_parameter("limit", max.to_string())
                .set_parameter("choices", format_values(&options.choices))
                .set_plural(max as u64)
                .set_code(Choice::TOO_MANY_ERROR)
                .set_invalid_value(value)
                .add_violation();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validators::TYPE_ERROR;
    use crate::validators::testing::{check, codes};
    use serde_json::json;

    #[test]
    fn single_value() {
        let choice = Choice::new(["admin", "editor"]);
        assert!(check(json!("admin"), choice.clone()).is_empty());
        let violations = check(json!("guest"), choice);
        assert_eq!(codes(&violations), [Choice::NO_SUCH_CHOICE_ERROR]);
        assert_eq!(
            violations.get(0).and_then(|v| v.parameters().get("choices").cloned()),
            Some("\"admin\", \"editor\"".to_owned())
        );
    }

    #[test]
    fn multiple_values() {
        let choice = Choice::new([1, 2, 3]).multiple().min(2).max(2);
        assert!(check(json!([1, 3]), choice.clone()).is_empty());
        assert_eq!(codes(&check(json!([1, 9]), choice.clone())), [Choice::NO_SUCH_CHOICE_ERROR]);
        assert_eq!(codes(&check(json!([1]), choice.clone())), [Choice::TOO_FEW_ERROR]);
        assert_eq!(codes(&check(json!([1, 2, 3]), choice.clone())), [Choice::TOO_MANY_ERROR]);
        assert_eq!(codes(&check(json!(1), choice)), [TYPE_ERROR]);
    }

    #[test]
    fn too_few_message_is_pluralized() {
        let violations = check(json!([1]), Choice::new([1, 2, 3]).multiple().min(2));
        assert_eq!(
            violations.get(0).map(|v| v.message()),
            Some("You must select at least 2 choices.")
        );
    }

    #[test]
    fn choices_are_the_default_option() {
        assert_eq!(
            Constraint::from_options("Choice", json!(["a", "b"])),
            Ok(Constraint::from(Choice::new(["a", "b"])))
        );
    }
}
