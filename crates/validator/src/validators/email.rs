//! Email address format

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::constraint::options::OptionReader;
use crate::constraint::{Constraint, ConstraintKind};
use crate::foundation::{ConfigurationError, ConstraintValidator, ExecutionContext, format_value};

static LOOSE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^.+@\S+\.\S+$").expect("loose email pattern compiles"));

static HTML5_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)+$",
    )
    .expect("html5 email pattern compiles")
});

static HTML5_ALLOW_NO_TLD_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("html5 email pattern compiles")
});

/// Which address grammar to accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EmailMode {
    /// Anything shaped like `local@domain.tld`.
    #[default]
    Loose,
    /// The WHATWG `input[type=email]` grammar, top-level domain required.
    Html5,
    /// The WHATWG grammar, bare hosts allowed (`user@localhost`).
    Html5AllowNoTld,
}

impl EmailMode {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "loose" => Some(Self::Loose),
            "html5" => Some(Self::Html5),
            "html5-allow-no-tld" => Some(Self::Html5AllowNoTld),
            _ => None,
        }
    }

    fn regex(self) -> &'static Regex {
        match self {
            Self::Loose => &LOOSE_REGEX,
            Self::Html5 => &HTML5_REGEX,
            Self::Html5AllowNoTld => &HTML5_ALLOW_NO_TLD_REGEX,
        }
    }
}

/// Options of the `Email` kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email {
    message: String,
    mode: EmailMode,
}

impl Email {
    /// Kind name.
    pub const NAME: &'static str = "Email";
    /// Violation code.
    pub const INVALID_FORMAT_ERROR: &'static str = "bd79c0ab-ddba-46cc-a703-a7a4b08de310";
    /// Default message.
    pub const MESSAGE: &'static str = "This value is not a valid email address.";

    pub(crate) const OPTIONS: &'static [&'static str] = &["message", "mode"];

    /// Loose mode with the default message.
    #[must_use]
    pub fn new() -> Self {
        Self {
            message: Self::MESSAGE.to_owned(),
            mode: EmailMode::Loose,
        }
    }

    /// Switches grammar.
    #[must_use]
    pub fn mode(mut self, mode: EmailMode) -> Self {
        self.mode = mode;
        self
    }

    /// Replaces the message template.
    #[must_use]
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub(crate) fn parse(options: &mut OptionReader<'_>) -> Result<Self, ConfigurationError> {
        let mode = match options.string("mode")? {
            None => EmailMode::Loose,
            Some(name) => EmailMode::parse(&name).ok_or_else(|| {
                ConfigurationError::invalid(
                    Self::NAME,
                    "mode",
                    format!("unknown mode `{name}`, expected loose, html5 or html5-allow-no-tld"),
                )
            })?,
        };
        Ok(Self {
            message: super::message(options, "message", Self::MESSAGE)?,
            mode,
        })
    }
}

impl Default for Email {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) struct EmailValidator;

impl ConstraintValidator for EmailValidator {
    fn validate(&self, value: &Value, constraint: &Constraint, context: &mut ExecutionContext<'_>) {
        let ConstraintKind::Email(options) = constraint.kind() else {
            return;
        };
        if super::is_absent(value) {
            return;
        }
        let Some(address) = value.as_str() else {
            super::type_violation(context, value, "string");
            return;
        };
        if !options.mode.regex().is_match(address) {
            context
                .build_violation(options.message.as_str())
                .set_parameter("value", format_value(value))
                .set_code(Email::INVALID_FORMAT_ERROR)
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
    #[case("lior@gmail.com", EmailMode::Loose, true)]
    #[case("not-an-email", EmailMode::Loose, false)]
    #[case("a b@example.com", EmailMode::Loose, true)]
    #[case("a b@example.com", EmailMode::Html5, false)]
    #[case("user@localhost", EmailMode::Html5, false)]
    #[case("user@localhost", EmailMode::Html5AllowNoTld, true)]
    #[case("first.last+tag@sub.example.org", EmailMode::Html5, true)]
    fn modes(#[case] address: &str, #[case] mode: EmailMode, #[case] valid: bool) {
        let violations = check(json!(address), Email::new().mode(mode));
        assert_eq!(violations.is_empty(), valid, "{address} in {mode:?}");
    }

    #[test]
    fn absent_values_pass() {
        assert!(check(json!(""), Email::new()).is_empty());
        assert!(check(json!(null), Email::new()).is_empty());
    }

    #[test]
    fn unknown_mode_is_rejected() {
        assert!(Constraint::from_options("Email", json!({"mode": "strict"})).is_err());
        assert_eq!(
            Constraint::from_options("Email", json!({"mode": "html5"})),
            Ok(Constraint::from(Email::new().mode(EmailMode::Html5)))
        );
    }
}
