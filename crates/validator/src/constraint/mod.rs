//! Constraint descriptors
//!
//! A [`Constraint`] is an immutable rule: a [`ConstraintKind`] carrying the
//! kind's options, plus the groups it belongs to. Constraints are cheap to
//! clone and compare structurally.
//!
//! Constraints are built either with the typed constructors of each kind
//! ([`Length::min`](crate::validators::Length::min),
//! [`GreaterThanOrEqual::new`](crate::validators::GreaterThanOrEqual::new), ...)
//! or from a kind name and an option map through a
//! [`ConstraintRegistry`](crate::registry::ConstraintRegistry).

pub(crate) mod options;

use std::sync::Arc;

use serde_json::Value;

use crate::foundation::{ConfigurationError, Groups, groups};
use crate::registry::ConstraintRegistry;
use crate::validators::{
    All, Choice, Collection, Custom, Email, GmailAddress, GreaterThanOrEqual, Length,
    LessThanOrEqual, NotBlank, NotNull,
};

// ============================================================================
// CONSTRAINT KIND
// ============================================================================

/// Every rule the engine knows how to evaluate.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstraintKind {
    /// Value must not be blank.
    NotBlank(NotBlank),
    /// Value must not be null.
    NotNull(NotNull),
    /// String length bounds.
    Length(Length),
    /// Email address format.
    Email(Email),
    /// Value must be `>=` a bound.
    GreaterThanOrEqual(GreaterThanOrEqual),
    /// Value must be `<=` a bound.
    LessThanOrEqual(LessThanOrEqual),
    /// Value must be one of a fixed set.
    Choice(Choice),
    /// Per-key constraints on a map or list.
    Collection(Collection),
    /// Constraints applied to every element.
    All(All),
    /// Address must belong to Gmail.
    GmailAddress(GmailAddress),
    /// A kind registered at runtime.
    Custom(Custom),
}

impl ConstraintKind {
    /// Kind name as used in mapping files and attribute declarations.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::NotBlank(_) => NotBlank::NAME,
            Self::NotNull(_) => NotNull::NAME,
            Self::Length(_) => Length::NAME,
            Self::Email(_) => Email::NAME,
            Self::GreaterThanOrEqual(_) => GreaterThanOrEqual::NAME,
            Self::LessThanOrEqual(_) => LessThanOrEqual::NAME,
            Self::Choice(_) => Choice::NAME,
            Self::Collection(_) => Collection::NAME,
            Self::All(_) => All::NAME,
            Self::GmailAddress(_) => GmailAddress::NAME,
            Self::Custom(custom) => custom.name(),
        }
    }

    /// Constraints nested inside a composite kind, in declaration order.
    pub fn nested(&self) -> Box<dyn Iterator<Item = &Constraint> + '_> {
        match self {
            Self::All(all) => Box::new(all.constraints().iter()),
            Self::Collection(collection) => Box::new(
                collection
                    .fields()
                    .values()
                    .flat_map(|field| field.constraints().iter()),
            ),
            _ => Box::new(std::iter::empty()),
        }
    }

    /// Returns true for kinds that hold nested constraints.
    #[must_use]
    pub fn is_composite(&self) -> bool {
        matches!(self, Self::All(_) | Self::Collection(_))
    }
}

macro_rules! constraint_kinds {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for ConstraintKind {
                fn from(kind: $variant) -> Self {
                    Self::$variant(kind)
                }
            }

            impl From<$variant> for Constraint {
                fn from(kind: $variant) -> Self {
                    Self::new(kind)
                }
            }
        )*
    };
}

constraint_kinds!(
    NotBlank,
    NotNull,
    Length,
    Email,
    GreaterThanOrEqual,
    LessThanOrEqual,
    Choice,
    Collection,
    All,
    GmailAddress,
    Custom,
);

// ============================================================================
// CONSTRAINT
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
struct Inner {
    kind: ConstraintKind,
    groups: Option<Groups>,
}

/// An immutable rule descriptor.
///
/// Without explicit groups a constraint belongs to `{"Default"}`.
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    inner: Arc<Inner>,
}

impl Constraint {
    /// Wraps a kind with implicit groups.
    pub fn new(kind: impl Into<ConstraintKind>) -> Self {
        Self {
            inner: Arc::new(Inner {
                kind: kind.into(),
                groups: None,
            }),
        }
    }

    /// Builds a built-in constraint from a kind name and options.
    ///
    /// `options` is either an option map or a bare value for the kind's
    /// default option (`GreaterThanOrEqual: 18`). Custom kinds need a
    /// [`ConstraintRegistry`] that knows them.
    pub fn from_options(kind: &str, options: Value) -> Result<Self, ConfigurationError> {
        ConstraintRegistry::new().build(kind, options)
    }

    /// Returns a copy assigned to `groups`.
    #[must_use]
    pub fn in_groups(mut self, groups: impl Into<Groups>) -> Self {
        Arc::make_mut(&mut self.inner).groups = Some(groups.into());
        self
    }

    pub(crate) fn with_groups(kind: ConstraintKind, groups: Option<Groups>) -> Self {
        Self {
            inner: Arc::new(Inner { kind, groups }),
        }
    }

    /// The kind and its options.
    #[must_use]
    pub fn kind(&self) -> &ConstraintKind {
        &self.inner.kind
    }

    /// Kind name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.inner.kind.name()
    }

    /// Groups this constraint belongs to; `{"Default"}` unless set.
    #[must_use]
    pub fn groups(&self) -> &Groups {
        self.inner.groups.as_ref().unwrap_or(Groups::default_ref())
    }

    /// Groups as declared, `None` when implicit.
    #[must_use]
    pub fn explicit_groups(&self) -> Option<&Groups> {
        self.inner.groups.as_ref()
    }

    /// Returns true if groups were declared.
    #[must_use]
    pub fn has_explicit_groups(&self) -> bool {
        self.inner.groups.is_some()
    }

    /// Decides whether this constraint runs for `requested`.
    ///
    /// `inherited` carries the explicit groups of an enclosing composite.
    /// A composite without any groups of its own is selected as soon as one
    /// of its nested constraints is.
    #[must_use]
    pub fn is_selected(&self, requested: &Groups, inherited: Option<&Groups>) -> bool {
        match self.explicit_groups().or(inherited) {
            Some(own) => groups::is_selected(requested, own),
            None if self.kind().is_composite() => {
                self.kind().nested().any(|c| c.is_selected(requested, None))
            }
            None => groups::is_selected(requested, Groups::default_ref()),
        }
    }
}

// ============================================================================
// CONSTRAINT SPEC
// ============================================================================

/// An unbuilt constraint declaration: kind name plus raw options.
///
/// Attribute tables and mapping files carry specs; they are turned into
/// [`Constraint`]s against the validator's registry when metadata loads.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintSpec {
    kind: String,
    options: Value,
}

impl ConstraintSpec {
    /// Declares `kind` with `options` (map, bare default value, or null).
    pub fn new(kind: impl Into<String>, options: Value) -> Self {
        Self {
            kind: kind.into(),
            options,
        }
    }

    /// Declares `kind` without options.
    pub fn bare(kind: impl Into<String>) -> Self {
        Self::new(kind, Value::Null)
    }

    /// Reads a declaration of the form `"Kind"` or `{"Kind": options}`.
    pub fn from_declaration(declaration: &Value) -> Result<Self, ConfigurationError> {
        match declaration {
            Value::String(kind) => Ok(Self::bare(kind.clone())),
            Value::Object(map) if map.len() == 1 => {
                let Some((kind, options)) = map.iter().next() else {
                    return Err(ConfigurationError::malformed("empty constraint map"));
                };
                Ok(Self::new(kind.clone(), options.clone()))
            }
            Value::Object(map) => Err(ConfigurationError::malformed(format!(
                "a constraint map needs exactly one kind, found {} keys",
                map.len()
            ))),
            other => Err(ConfigurationError::malformed(format!(
                "expected a kind name or a single-key map, found {}",
                crate::foundation::type_name(other)
            ))),
        }
    }

    /// Kind name.
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Raw options.
    #[must_use]
    pub fn options(&self) -> &Value {
        &self.options
    }

    /// Builds the constraint against `registry`.
    pub fn build(&self, registry: &ConstraintRegistry) -> Result<Constraint, ConfigurationError> {
        registry.build(&self.kind, self.options.clone())
    }
}

/// Builds every declaration of a list (or a single declaration).
pub(crate) fn build_declarations(
    declarations: &Value,
    registry: &ConstraintRegistry,
) -> Result<Vec<Constraint>, ConfigurationError> {
    match declarations {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => items
            .iter()
            .map(|item| ConstraintSpec::from_declaration(item)?.build(registry))
            .collect(),
        single => Ok(vec![ConstraintSpec::from_declaration(single)?.build(registry)?]),
    }
}

// ============================================================================
// TESTS
// ============================================================================
