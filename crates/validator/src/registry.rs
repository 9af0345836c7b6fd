//! Constraint registry
//!
//! Turns a kind name plus raw options into a [`Constraint`]. Built-in kinds
//! are always known; custom kinds are registered together with an
//! [`OptionSchema`] and the [`ConstraintValidator`] that evaluates them.
//!
//! # Option forms
//!
//! - `null`: no options.
//! - a map that names at least one known option (`groups` included): read
//!   as options.
//! - any other non-empty map, or a scalar or list: the value of the kind's
//!   default option (`GreaterThanOrEqual: 18`, `Choice: [a, b]`).

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::constraint::options::{OptionReader, parse_groups};
use crate::constraint::{Constraint, ConstraintKind};
use crate::foundation::{ConfigurationError, ConstraintValidator};
use crate::validators::{self, Custom};

// ============================================================================
// OPTION SCHEMA
// ============================================================================

/// Accepted options of a custom kind.
///
/// `groups` and `message` are always accepted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionSchema {
    required: Vec<String>,
    optional: Vec<String>,
    default_option: Option<String>,
}

impl OptionSchema {
    /// A schema accepting only the common options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a required option.
    #[must_use]
    pub fn required(mut self, name: impl Into<String>) -> Self {
        self.required.push(name.into());
        self
    }

    /// Adds an optional option.
    #[must_use]
    pub fn optional(mut self, name: impl Into<String>) -> Self {
        self.optional.push(name.into());
        self
    }

    /// Names the option a bare value is assigned to. The option is added
    /// as required if not declared yet.
    #[must_use]
    pub fn default_option(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !self.accepts(&name) {
            self.required.push(name.clone());
        }
        self.default_option = Some(name);
        self
    }

    fn accepts(&self, key: &str) -> bool {
        key == "message"
            || self.required.iter().any(|r| r == key)
            || self.optional.iter().any(|o| o == key)
    }
}

// ============================================================================
// REGISTRY
// ============================================================================

#[derive(Clone)]
struct CustomKind {
    schema: OptionSchema,
    validator: Arc<dyn ConstraintValidator>,
}

/// Known constraint kinds.
#[derive(Clone, Default)]
pub struct ConstraintRegistry {
    custom: IndexMap<String, CustomKind>,
}

impl ConstraintRegistry {
    /// A registry with the built-in kinds only.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a custom kind.
    ///
    /// Built-in names cannot be replaced; such registrations are ignored
    /// with a warning. Registering the same custom name twice keeps the
    /// latest registration.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        schema: OptionSchema,
        validator: impl ConstraintValidator + 'static,
    ) -> &mut Self {
        let name = name.into();
        if validators::builtin_kind(&name).is_some() {
            tracing::warn!(kind = %name, "ignoring custom registration that shadows a built-in kind");
            return self;
        }
        tracing::debug!(kind = %name, "registered custom constraint kind");
        self.custom.insert(
            name,
            CustomKind {
                schema,
                validator: Arc::new(validator),
            },
        );
        self
    }

    /// Returns true if `kind` is built in or registered.
    #[must_use]
    pub fn contains(&self, kind: &str) -> bool {
        validators::builtin_kind(kind).is_some() || self.custom.contains_key(kind)
    }

    /// Validator of a registered custom kind.
    #[must_use]
    pub fn validator(&self, kind: &str) -> Option<&dyn ConstraintValidator> {
        self.custom.get(kind).map(|custom| custom.validator.as_ref())
    }

    /// Builds a constraint from a kind name and options.
    pub fn build(&self, kind: &str, options: Value) -> Result<Constraint, ConfigurationError> {
        if let Some(builtin) = validators::builtin_kind(kind) {
            let mut map = normalize(kind, options, builtin.options, builtin.default_option)?;
            let groups = take_groups(kind, &mut map)?;
            let mut reader = OptionReader::new(kind, map);
            let parsed = (builtin.parse)(&mut reader, self)?;
            reader.finish()?;
            return Ok(Constraint::with_groups(parsed, groups));
        }

        let Some(custom) = self.custom.get(kind) else {
            return Err(ConfigurationError::UnknownConstraint {
                kind: kind.to_owned(),
            });
        };

        let schema = &custom.schema;
        let known: Vec<&str> = schema
            .required
            .iter()
            .chain(&schema.optional)
            .map(String::as_str)
            .chain(["message"])
            .collect();
        let mut map = normalize(kind, options, &known, schema.default_option.as_deref())?;
        let groups = take_groups(kind, &mut map)?;

        if let Some(missing) = schema
            .required
            .iter()
            .find(|key| map.get(key.as_str()).is_none_or(Value::is_null))
        {
            return Err(ConfigurationError::missing(kind, missing));
        }
        if let Some(unknown) = map.keys().find(|key| !schema.accepts(key)) {
            return Err(ConfigurationError::unknown_option(kind, unknown));
        }

        Ok(Constraint::with_groups(
            ConstraintKind::Custom(Custom::with_options(kind, map)),
            groups,
        ))
    }
}

impl fmt::Debug for ConstraintRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstraintRegistry")
            .field("custom", &self.custom.keys().collect::<Vec<_>>())
            .finish()
    }
}

fn normalize(
    kind: &str,
    options: Value,
    known: &[&str],
    default_option: Option<&str>,
) -> Result<Map<String, Value>, ConfigurationError> {
    match options {
        Value::Null => Ok(Map::new()),
        Value::Object(map)
            if map.is_empty()
                || default_option.is_none()
                || map.keys().any(|key| key == "groups" || known.contains(&key.as_str())) =>
        {
            Ok(map)
        }
        value => match default_option {
            Some(option) => {
                let mut map = Map::new();
                map.insert(option.to_owned(), value);
                Ok(map)
            }
            None => Err(ConfigurationError::NoDefaultOption {
                kind: kind.to_owned(),
            }),
        },
    }
}

fn take_groups(
    kind: &str,
    map: &mut Map<String, Value>,
) -> Result<Option<crate::foundation::Groups>, ConfigurationError> {
    match map.remove("groups") {
        Some(groups) => parse_groups(kind, groups),
        None => Ok(None),
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::{ExecutionContext, Groups};
    use crate::validators::{GreaterThanOrEqual, NotBlank};
    use serde_json::json;

    struct Noop;

    impl ConstraintValidator for Noop {
        fn validate(&self, _: &Value, _: &Constraint, _: &mut ExecutionContext<'_>) {}
    }

    fn registry() -> ConstraintRegistry {
        let mut registry = ConstraintRegistry::new();
        registry.register(
            "Domain",
            OptionSchema::new().default_option("domain").optional("strict"),
            Noop,
        );
        registry
    }

    #[test]
    fn unknown_kind() {
        assert_eq!(
            ConstraintRegistry::new().build("Colour", Value::Null),
            Err(ConfigurationError::UnknownConstraint {
                kind: "Colour".into()
            })
        );
    }

    #[test]
    fn groups_are_common_to_every_kind() {
        let constraint = registry().build("NotBlank", json!({"groups": ["identity"]}));
        assert_eq!(
            constraint,
            Ok(Constraint::from(NotBlank::new()).in_groups("identity"))
        );
    }

    #[test]
    fn map_with_known_keys_is_read_as_options() {
        assert_eq!(
            registry().build("GreaterThanOrEqual", json!({"value": 18, "groups": "adult"})),
            Ok(Constraint::from(GreaterThanOrEqual::new(18)).in_groups("adult"))
        );
    }

    #[test]
    fn bare_value_without_default_option() {
        assert_eq!(
            registry().build("NotBlank", json!(true)),
            Err(ConfigurationError::NoDefaultOption {
                kind: "NotBlank".into()
            })
        );
    }

    #[test]
    fn unknown_builtin_option() {
        assert!(matches!(
            registry().build("NotBlank", json!({"colour": "red"})),
            Err(ConfigurationError::UnknownOption { .. })
        ));
    }

    #[test]
    fn custom_schema_is_enforced() {
        let registry = registry();
        let constraint = registry
            .build("Domain", json!("example.com"))
            .expect("custom kind should build");
        let ConstraintKind::Custom(custom) = constraint.kind() else {
            panic!("expected a custom kind");
        };
        assert_eq!(custom.get_str("domain"), Some("example.com"));
        assert!(constraint.groups().is_default_only());

        assert!(matches!(
            registry.build("Domain", json!({"strict": true})),
            Err(ConfigurationError::MissingOption { .. })
        ));
        assert!(matches!(
            registry.build("Domain", json!({"domain": "x", "colour": 1})),
            Err(ConfigurationError::UnknownOption { .. })
        ));
        assert_eq!(
            registry
                .build("Domain", json!({"domain": "x", "groups": "b2b"}))
                .map(|c| c.groups().clone()),
            Ok(Groups::from("b2b"))
        );
    }

    #[test]
    fn builtin_names_cannot_be_shadowed() {
        let mut registry = ConstraintRegistry::new();
        registry.register("NotBlank", OptionSchema::new(), Noop);
        assert!(registry.validator("NotBlank").is_none());
        assert!(registry.contains("NotBlank"));
    }
}
