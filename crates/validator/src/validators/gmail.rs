//! GmailAddress: the address must belong to Gmail
//!
//! Without `capitals` the value is lower-cased and must end with
//! `@gmail.com`. With `capitals` it must end with `@GMAIL.COM` exactly.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::constraint::options::OptionReader;
use crate::constraint::{Constraint, ConstraintKind};
use crate::foundation::{ConfigurationError, ConstraintValidator, ExecutionContext};

static GMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@gmail\.com$").expect("gmail pattern compiles"));

static GMAIL_CAPITALS_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@GMAIL\.COM$").expect("gmail pattern compiles"));

/// Options of the `GmailAddress` kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GmailAddress {
    message: String,
    capitals: bool,
}

impl GmailAddress {
    /// Kind name.
    pub const NAME: &'static str = "GmailAddress";
    /// Violation code.
    pub const NOT_GMAIL_ERROR: &'static str = "6d1f4a0e-3c2b-4e8f-9a7d-5b0c8e2f1a93";
    /// Default message.
    pub const MESSAGE: &'static str = "The string \"{{ value }}\" is not a Gmail address !";

    pub(crate) const OPTIONS: &'static [&'static str] = &["message", "capitals"];

    #[must_use]
    pub fn new() -> Self {
        Self {
            message: Self::MESSAGE.to_owned(),
            capitals: false,
        }
    }

    /// Requires the upper-case domain `@GMAIL.COM`.
    #[must_use]
    pub fn capitals(mut self) -> Self {
        self.capitals = true;
        self
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
            capitals: options.bool("capitals")?.unwrap_or(false),
        })
    }
}

impl Default for GmailAddress {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) struct GmailAddressValidator;

impl ConstraintValidator for GmailAddressValidator {
    fn validate(&self, value: &Value, constraint: &Constraint, context: &mut ExecutionContext<'_>) {
        let ConstraintKind::GmailAddress(options) = constraint.kind() else {
            return;
        };
        if super::is_absent(value) {
            return;
        }
        let Some(address) = value.as_str() else {
            super::type_violation(context, value, "string");
            return;
        };

        let (tested, pattern): (Cow<'_, str>, &Regex) = if options.capitals {
            (Cow::Borrowed(address), &*GMAIL_CAPITALS_REGEX)
        } else {
            (Cow::Owned(address.to_lowercase()), &*GMAIL_REGEX)
        };

        if !pattern.is_match(&tested) {
            context
                .build_violation(options.message.as_str())
                .set_parameter("value", tested)
                .set_code(GmailAddress::NOT_GMAIL_ERROR)
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
    #[case("lior@hotmail.com", false, 1)]
    #[case("lior@gmail.com", false, 0)]
    #[case("Lior@GMail.com", false, 0)]
    #[case("lior@GMAIL.COM", true, 0)]
    #[case("lior@gmail.com", true, 1)]
    fn gmail_cases(#[case] address: &str, #[case] capitals: bool, #[case] expected: usize) {
        let constraint = if capitals { GmailAddress::new().capitals() } else { GmailAddress::new() };
        assert_eq!(check(json!(address), constraint).len(), expected);
    }

    #[test]
    fn message_shows_tested_value() {
        let violations = check(json!("Lior@Hotmail.com"), GmailAddress::new());
        assert_eq!(
            violations.get(0).map(|v| v.message()),
            Some("The string \"lior@hotmail.com\" is not a Gmail address !")
        );
    }

    #[test]
    fn parses_capitals_option() {
        assert_eq!(
            Constraint::from_options("GmailAddress", json!({"capitals": true})),
            Ok(Constraint::from(GmailAddress::new().capitals()))
        );
    }
}
