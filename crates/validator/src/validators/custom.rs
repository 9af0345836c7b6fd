//! Constraint kinds registered at runtime
//!
//! A custom kind is a name plus a free-form option map checked against the
//! kind's [`OptionSchema`](crate::registry::OptionSchema). Its validator
//! lives in the [`ConstraintRegistry`](crate::registry::ConstraintRegistry)
//! of the validator that evaluates it.

use serde_json::{Map, Value};

/// Options of a custom kind.
#[derive(Debug, Clone, PartialEq)]
pub struct Custom {
    name: String,
    options: Map<String, Value>,
}

impl Custom {
    /// A custom kind without options.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            options: Map::new(),
        }
    }

    /// Sets one option. Options are not checked until built through a registry.
    #[must_use]
    pub fn option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    pub(crate) fn with_options(name: impl Into<String>, options: Map<String, Value>) -> Self {
        Self {
            name: name.into(),
            options,
        }
    }

    /// Registered kind name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Option value by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.options.get(key)
    }

    /// String option by key.
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.options.get(key).and_then(Value::as_str)
    }

    /// All options.
    #[must_use]
    pub fn options(&self) -> &Map<String, Value> {
        &self.options
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraint::{Constraint, ConstraintKind};
    use crate::engine::Validator;
    use crate::foundation::{
        ConfigurationError, ConstraintValidator, ExecutionContext, ValidatorError,
    };
    use crate::registry::{ConstraintRegistry, OptionSchema};
    use serde_json::json;

    struct Domain;

    impl ConstraintValidator for Domain {
        fn validate(
            &self,
            value: &Value,
            constraint: &Constraint,
            context: &mut ExecutionContext<'_>,
        ) {
            let ConstraintKind::Custom(custom) = constraint.kind() else {
                return;
            };
            let (Some(address), Some(domain)) = (value.as_str(), custom.get_str("domain")) else {
                return;
            };
            if !address.ends_with(&format!("@{domain}")) {
                context
                    .build_violation("{{ value }} is not on {{ domain }}.")
                    .set_parameter("value", address)
                    .set_parameter("domain", domain)
                    .set_code("DOMAIN")
                    .add_violation();
            }
        }
    }

    fn schema() -> OptionSchema {
        OptionSchema::new().required("domain").default_option("domain")
    }

    #[test]
    fn registered_validator_receives_the_options() {
        let validator = Validator::builder()
            .register_constraint("Domain", schema(), Domain)
            .build()
            .expect("validator builds");
        let constraint = validator
            .registry()
            .build("Domain", json!("example.com"))
            .expect("custom kind builds");
        assert_eq!(constraint.name(), "Domain");

        let violations = validator
            .validate_value(&json!("lior@other.org"), &[constraint.clone()])
            .expect("validation runs");
        assert_eq!(
            violations.get(0).map(|v| v.message()),
            Some("lior@other.org is not on example.com.")
        );
        assert!(
            validator
                .validate_value(&json!("lior@example.com"), &[constraint])
                .expect("validation runs")
                .is_empty()
        );
    }

    #[test]
    fn builder_options_match_registry_options() {
        let mut registry = ConstraintRegistry::new();
        registry.register("Domain", schema(), Domain);

        let built = registry
            .build("Domain", json!({"domain": "example.com"}))
            .expect("custom kind builds");
        let direct = Constraint::from(Custom::new("Domain").option("domain", "example.com"));
        assert_eq!(built, direct);
        assert_eq!(direct.name(), "Domain");

        assert!(matches!(
            registry.build("Domain", json!({})),
            Err(ConfigurationError::MissingOption { .. })
        ));
    }

    #[test]
    fn unregistered_kind_is_a_configuration_error() {
        assert!(matches!(
            ConstraintRegistry::new().build("Domain", json!("example.com")),
            Err(ConfigurationError::UnknownConstraint { ref kind }) if kind == "Domain"
        ));

        let error = Validator::new()
            .validate_value(&json!("lior@example.com"), &[Custom::new("Domain").into()])
            .expect_err("no validator for the kind");
        assert!(matches!(
            error,
            ValidatorError::Configuration(ConfigurationError::UnknownConstraint { .. })
        ));
    }
}
