//! Built-in constraint kinds and their validators
//!
//! Each module holds one kind's option struct (with typed constructors and
//! option parsing) next to the [`ConstraintValidator`] that evaluates it.
//!
//! # Categories
//!
//! - **Absence**: [`NotBlank`], [`NotNull`]
//! - **String**: [`Length`], [`Email`], [`GmailAddress`]
//! - **Comparison**: [`GreaterThanOrEqual`], [`LessThanOrEqual`]
//! - **Choice**: [`Choice`]
//! - **Composite**: [`Collection`], [`All`]
//! - **Runtime**: [`Custom`]
//!
//! # Absence
//!
//! Every validator except `NotBlank` and `NotNull` accepts `null`. Every
//! validator except those two and `Length` accepts `""`.

pub mod all;
pub mod choice;
pub mod collection;
pub mod comparison;
pub mod custom;
pub mod email;
pub mod gmail;
pub mod length;
pub mod not_blank;
pub mod not_null;

pub use all::All;
pub use choice::Choice;
pub use collection::{Collection, CollectionField};
pub use comparison::{GreaterThanOrEqual, LessThanOrEqual};
pub use custom::Custom;
pub use email::{Email, EmailMode};
pub use gmail::GmailAddress;
pub use length::Length;
pub use not_blank::{NotBlank, Normalizer};
pub use not_null::NotNull;

use serde_json::Value;

use crate::constraint::ConstraintKind;
use crate::constraint::options::OptionReader;
use crate::foundation::{ConfigurationError, ConstraintValidator, ExecutionContext, format_value};
use crate::registry::ConstraintRegistry;

/// Code of the violation raised when a value has the wrong JSON type.
pub const TYPE_ERROR: &str = "ba785a8c-82cb-4283-967c-3cf342181b40";

const TYPE_MESSAGE: &str = "This value should be of type {{ type }}.";

// ============================================================================
// BUILT-IN TABLE
// ============================================================================

type ParseFn =
    fn(&mut OptionReader<'_>, &ConstraintRegistry) -> Result<ConstraintKind, ConfigurationError>;

/// Static description of a built-in kind.
pub(crate) struct BuiltinKind {
    pub(crate) name: &'static str,
    pub(crate) options: &'static [&'static str],
    pub(crate) default_option: Option<&'static str>,
    pub(crate) parse: ParseFn,
}

pub(crate) static BUILTIN_KINDS: &[BuiltinKind] = &[
    BuiltinKind {
        name: NotBlank::NAME,
        options: NotBlank::OPTIONS,
        default_option: None,
        parse: |options, _| NotBlank::parse(options).map(ConstraintKind::from),
    },
    BuiltinKind {
        name: NotNull::NAME,
        options: NotNull::OPTIONS,
        default_option: None,
        parse: |options, _| NotNull::parse(options).map(ConstraintKind::from),
    },
    BuiltinKind {
        name: Length::NAME,
        options: Length::OPTIONS,
        default_option: None,
        parse: |options, _| Length::parse(options).map(ConstraintKind::from),
    },
    BuiltinKind {
        name: Email::NAME,
        options: Email::OPTIONS,
        default_option: None,
        parse: |options, _| Email::parse(options).map(ConstraintKind::from),
    },
    BuiltinKind {
        name: GreaterThanOrEqual::NAME,
        options: GreaterThanOrEqual::OPTIONS,
        default_option: Some("value"),
        parse: |options, _| GreaterThanOrEqual::parse(options).map(ConstraintKind::from),
    },
    BuiltinKind {
        name: LessThanOrEqual::NAME,
        options: LessThanOrEqual::OPTIONS,
        default_option: Some("value"),
        parse: |options, _| LessThanOrEqual::parse(options).map(ConstraintKind::from),
    },
    BuiltinKind {
        name: Choice::NAME,
        options: Choice::OPTIONS,
        default_option: Some("choices"),
        parse: |options, _| Choice::parse(options).map(ConstraintKind::from),
    },
    BuiltinKind {
        name: Collection::NAME,
        options: Collection::OPTIONS,
        default_option: Some("fields"),
        parse: |options, registry| Collection::parse(options, registry).map(ConstraintKind::from),
    },
    BuiltinKind {
        name: All::NAME,
        options: All::OPTIONS,
        default_option: Some("constraints"),
        parse: |options, registry| All::parse(options, registry).map(ConstraintKind::from),
    },
    BuiltinKind {
        name: GmailAddress::NAME,
        options: GmailAddress::OPTIONS,
        default_option: None,
        parse: |options, _| GmailAddress::parse(options).map(ConstraintKind::from),
    },
];

pub(crate) fn builtin_kind(name: &str) -> Option<&'static BuiltinKind> {
    BUILTIN_KINDS.iter().find(|kind| kind.name == name)
}

/// Validator for a built-in kind; `None` for custom kinds.
pub(crate) fn builtin_validator(kind: &ConstraintKind) -> Option<&'static dyn ConstraintValidator> {
    let validator: &'static dyn ConstraintValidator = match kind {
        ConstraintKind::NotBlank(_) => &not_blank::NotBlankValidator,
        ConstraintKind::NotNull(_) => &not_null::NotNullValidator,
        ConstraintKind::Length(_) => &length::LengthValidator,
        ConstraintKind::Email(_) => &email::EmailValidator,
        ConstraintKind::GreaterThanOrEqual(_) | ConstraintKind::LessThanOrEqual(_) => {
            &comparison::ComparisonValidator
        }
        ConstraintKind::Choice(_) => &choice::ChoiceValidator,
        ConstraintKind::Collection(_) => &collection::CollectionValidator,
        ConstraintKind::All(_) => &all::AllValidator,
        ConstraintKind::GmailAddress(_) => &gmail::GmailAddressValidator,
        ConstraintKind::Custom(_) => return None,
    };
    Some(validator)
}

// ============================================================================
// SHARED HELPERS
// ============================================================================

/// `null` and `""` are absent values.
pub(crate) fn is_absent(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

/// Reports a value of the wrong JSON type.
pub(crate) fn type_violation(context: &mut ExecutionContext<'_>, value: &Value, expected: &str) {
    context
        .build_violation(TYPE_MESSAGE)
        .set_parameter("value", format_value(value))
        .set_parameter("type", expected)
        .set_code(TYPE_ERROR)
        .set_invalid_value(value)
        .add_violation();
}

/// Reads a message option, falling back to `default`.
pub(crate) fn message(
    options: &mut OptionReader<'_>,
    key: &str,
    default: &str,
) -> Result<String, ConfigurationError> {
    Ok(options.string(key)?.unwrap_or_else(|| default.to_owned()))
}
