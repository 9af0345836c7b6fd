//! Collection: per-key constraints on a map (or a list addressed by index)
//!
//! Every schema key's sub-value is validated with that key's constraints,
//! one path segment deeper. Keys missing from the input and keys the schema
//! does not know are reported unless allowed.

use indexmap::IndexMap;
use serde_json::Value;

use crate::config::MissingFieldPolicy;
use crate::constraint::options::OptionReader;
use crate::constraint::{Constraint, ConstraintKind, build_declarations};
use crate::foundation::{ConfigurationError, ConstraintValidator, ExecutionContext, format_value};
use crate::registry::ConstraintRegistry;

// ============================================================================
// FIELD
// ============================================================================

/// Constraints of one schema key.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionField {
    constraints: Vec<Constraint>,
    optional: bool,
}

impl CollectionField {
    /// A key that must be present.
    pub fn required(constraints: impl IntoIterator<Item = Constraint>) -> Self {
        Self {
            constraints: constraints.into_iter().collect(),
            optional: false,
        }
    }

    /// A key that may be absent; its constraints run only when present.
    pub fn optional(constraints: impl IntoIterator<Item = Constraint>) -> Self {
        Self {
            constraints: constraints.into_iter().collect(),
            optional: true,
        }
    }

    /// The key's constraints in declaration order.
    #[must_use]
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Returns true if the key may be absent.
    #[must_use]
    pub fn is_optional(&self) -> bool {
        self.optional
    }

    fn parse(
        name: &str,
        declaration: &Value,
        registry: &ConstraintRegistry,
    ) -> Result<Self, ConfigurationError> {
        if let Value::Object(map) = declaration {
            if map.len() == 1 {
                if let Some(inner) = map.get("Optional") {
                    return Ok(Self::optional(build_declarations(inner, registry)?));
                }
                if let Some(inner) = map.get("Required") {
                    return Ok(Self::required(build_declarations(inner, registry)?));
                }
            }
        }
        build_declarations(declaration, registry)
            .map(Self::required)
            .map_err(|error| match error {
                ConfigurationError::MalformedDeclaration { reason } => {
                    ConfigurationError::malformed(format!("field `{name}`: {reason}"))
                }
                other => other,
            })
    }
}

// ============================================================================
// OPTIONS
// ============================================================================

/// Options of the `Collection` kind.
#[derive(Debug, Clone, PartialEq)]
pub struct Collection {
    fields: IndexMap<String, CollectionField>,
    allow_extra_fields: bool,
    allow_missing_fields: Option<bool>,
    extra_fields_message: String,
    missing_fields_message: String,
}

impl Collection {
    /// Kind name.
    pub const NAME: &'static str = "Collection";
    /// Code for a schema key absent from the input.
    pub const MISSING_FIELD_ERROR: &'static str = "2fa2158c-2a7f-484b-98aa-975522539ff8";
    /// Code for an input key absent from the schema.
    pub const NO_SUCH_FIELD_ERROR: &'static str = "7703c766-b5d5-4cef-ace7-ae0dd82304e9";
    /// Default message for a missing key.
    pub const MISSING_FIELDS_MESSAGE: &'static str = "This field is missing.";
    /// Default message for an unexpected key.
    pub const EXTRA_FIELDS_MESSAGE: &'static str = "This field was not expected.";

    pub(crate) const OPTIONS: &'static [&'static str] = &[
        "fields",
        "allowExtraFields",
        "allowMissingFields",
        "extraFieldsMessage",
        "missingFieldsMessage",
    ];

    /// An empty schema.
    #[must_use]
    pub fn new() -> Self {
        Self {
            fields: IndexMap::new(),
            allow_extra_fields: false,
            allow_missing_fields: None,
            extra_fields_message: Self::EXTRA_FIELDS_MESSAGE.to_owned(),
            missing_fields_message: Self::MISSING_FIELDS_MESSAGE.to_owned(),
        }
    }

    /// Adds a required key.
    #[must_use]
    pub fn field(
        mut self,
        name: impl Into<String>,
        constraints: impl IntoIterator<Item = Constraint>,
    ) -> Self {
        self.fields
            .insert(name.into(), CollectionField::required(constraints));
        self
    }

    /// Adds an optional key.
    #[must_use]
    pub fn optional_field(
        mut self,
        name: impl Into<String>,
        constraints: impl IntoIterator<Item = Constraint>,
    ) -> Self {
        self.fields
            .insert(name.into(), CollectionField::optional(constraints));
        self
    }

    /// Accepts keys the schema does not name.
    #[must_use]
    pub fn allow_extra_fields(mut self) -> Self {
        self.allow_extra_fields = true;
        self
    }

    /// Overrides the validator-wide missing-field policy for this schema.
    #[must_use]
    pub fn allow_missing_fields(mut self, allow: bool) -> Self {
        self.allow_missing_fields = Some(allow);
        self
    }

    /// Schema keys in declaration order.
    #[must_use]
    pub fn fields(&self) -> &IndexMap<String, CollectionField> {
        &self.fields
    }

    pub(crate) fn parse(
        options: &mut OptionReader<'_>,
        registry: &ConstraintRegistry,
    ) -> Result<Self, ConfigurationError> {
        let Value::Object(declared) = options.required("fields")? else {
            return Err(ConfigurationError::invalid(
                Self::NAME,
                "fields",
                "expected a map of field names to constraints",
            ));
        };

        let mut collection = Self::new();
        for (name, declaration) in &declared {
            let field = CollectionField::parse(name, declaration, registry)?;
            collection.fields.insert(name.clone(), field);
        }
        collection.allow_extra_fields = options.bool("allowExtraFields")?.unwrap_or(false);
        collection.allow_missing_fields = options.bool("allowMissingFields")?;
        collection.extra_fields_message =
            super::message(options, "extraFieldsMessage", Self::EXTRA_FIELDS_MESSAGE)?;
        collection.missing_fields_message =
            super::message(options, "missingFieldsMessage", Self::MISSING_FIELDS_MESSAGE)?;
        Ok(collection)
    }
}

impl Default for Collection {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// VALIDATOR
// ============================================================================

fn lookup<'v>(value: &'v Value, key: &str) -> Option<&'v Value> {
    match value {
        Value::Object(map) => map.get(key),
        Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    }
}

pub(crate) struct CollectionValidator;

impl ConstraintValidator for CollectionValidator {
    fn validate(&self, value: &Value, constraint: &Constraint, context: &mut ExecutionContext<'_>) {
        let ConstraintKind::Collection(options) = constraint.kind() else {
            return;
        };
        if super::is_absent(value) {
            return;
        }
        if !matches!(value, Value::Object(_) | Value::Array(_)) {
            super::type_violation(context, value, "array");
            return;
        }

        let allow_missing = options
            .allow_missing_fields
            .unwrap_or(context.settings().missing_fields == MissingFieldPolicy::Skip);

        for (name, field) in &options.fields {
            match lookup(value, name) {
                Some(sub_value) => {
                    context.validate_nested(name.as_str(), sub_value, &field.constraints);
                }
                None if field.optional || allow_missing => {}
                None => context
                    .build_violation(options.missing_fields_message.as_str())
                    .set_parameter("field", format_value(&Value::String(name.clone())))
                    .set_code(Collection::MISSING_FIELD_ERROR)
                    .at_path(name.as_str())
                    .add_violation(),
            }
        }

        if options.allow_extra_fields {
            return;
        }

        let extras: Vec<(String, &Value)> = match value {
            Value::Object(map) => map
                .iter()
                .filter(|(key, _)| !options.fields.contains_key(key.as_str()))
                .map(|(key, item)| (key.clone(), item))
                .collect(),
            Value::Array(items) => items
                .iter()
                .enumerate()
                .map(|(index, item)| (index.to_string(), item))
                .filter(|(key, _)| !options.fields.contains_key(key.as_str()))
                .collect(),
            _ => Vec::new(),
        };

        for (key, item) in extras {
            context
                .build_violation(options.extra_fields_message.as_str())
                .set_parameter("field", format_value(&Value::String(key.clone())))
                .set_code(Collection::NO_SUCH_FIELD_ERROR)
                .at_path(key)
                .set_invalid_value(item)
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
    use crate::validators::{GreaterThanOrEqual, Length, NotBlank};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn person() -> Collection {
        Collection::new()
            .field("name", [Constraint::from(NotBlank::new())])
            .field("age", [Constraint::from(GreaterThanOrEqual::new(18))])
    }

    #[test]
    fn validates_each_key_with_prefixed_paths() {
        let violations = check(json!({"name": "", "age": 2}), person());
        let paths: Vec<String> = violations.iter().map(|v| v.path().to_string()).collect();
        assert_eq!(paths, ["name", "age"]);
    }

    #[test]
    fn missing_and_extra_fields() {
        let violations = check(json!({"name": "Lior", "nickname": "li"}), person());
        assert_eq!(
            codes(&violations),
            [Collection::MISSING_FIELD_ERROR, Collection::NO_SUCH_FIELD_ERROR]
        );
        assert_eq!(violations.get(0).map(|v| v.path().to_string()), Some("age".to_owned()));
        assert_eq!(
            violations.get(1).map(|v| v.message()),
            Some("This field was not expected.")
        );
    }

    #[test]
    fn allowances() {
        let relaxed = person().allow_extra_fields().allow_missing_fields(true);
        assert!(check(json!({"nickname": "li"}), relaxed).is_empty());

        let optional = Collection::new().optional_field("bio", [Constraint::from(Length::max(3))]);
        assert!(check(json!({}), optional.clone()).is_empty());
        assert_eq!(check(json!({"bio": "too long"}), optional).len(), 1);
    }

    #[test]
    fn lists_are_addressed_by_index() {
        let schema = Collection::new()
            .field("0", [Constraint::from(NotBlank::new())])
            .field("1", [Constraint::from(NotBlank::new())]);
        let violations = check(json!(["a", "", "c"]), schema);
        let paths: Vec<String> = violations.iter().map(|v| v.path().to_string()).collect();
        assert_eq!(paths, ["1", "2"]);
    }

    #[test]
    fn scalars_are_a_type_mismatch() {
        assert_eq!(check(json!(5), person()).len(), 1);
        assert!(check(json!(null), person()).is_empty());
    }

    #[test]
    fn parses_fields_with_wrappers() {
        let parsed = Constraint::from_options(
            "Collection",
            json!({
                "name": [{"NotBlank": null}],
                "bio": {"Optional": [{"Length": {"max": 3}}]},
            }),
        );
        let expected = Collection::new()
            .field("name", [Constraint::from(NotBlank::new())])
            .optional_field("bio", [Constraint::from(Length::max(3))]);
        assert_eq!(parsed, Ok(Constraint::from(expected)));
    }

    #[test]
    fn explicit_fields_option_with_flags() {
        let parsed = Constraint::from_options(
            "Collection",
            json!({"fields": {"name": "NotBlank"}, "allowExtraFields": true}),
        );
        let expected = Collection::new()
            .field("name", [Constraint::from(NotBlank::new())])
            .allow_extra_fields();
        assert_eq!(parsed, Ok(Constraint::from(expected)));
    }
}
