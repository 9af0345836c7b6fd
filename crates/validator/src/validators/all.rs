//! All: apply nested constraints to every element

use serde_json::Value;

use crate::constraint::options::OptionReader;
use crate::constraint::{Constraint, ConstraintKind, build_declarations};
use crate::foundation::{ConfigurationError, ConstraintValidator, ExecutionContext};
use crate::registry::ConstraintRegistry;

/// Options of the `All` kind.
#[derive(Debug, Clone, PartialEq)]
pub struct All {
    constraints: Vec<Constraint>,
}

impl All {
    /// Kind name.
    pub const NAME: &'static str = "All";

    pub(crate) const OPTIONS: &'static [&'static str] = &["constraints"];

    /// Every element must satisfy every constraint.
    pub fn new(constraints: impl IntoIterator<Item = Constraint>) -> Self {
        Self {
            constraints: constraints.into_iter().collect(),
        }
    }

    /// Nested constraints in declaration order.
    #[must_use]
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub(crate) fn parse(
        options: &mut OptionReader<'_>,
        registry: &ConstraintRegistry,
    ) -> Result<Self, ConfigurationError> {
        let declarations = options.required("constraints")?;
        Ok(Self::new(build_declarations(&declarations, registry)?))
    }
}

pub(crate) struct AllValidator;

impl ConstraintValidator for AllValidator {
    fn validate(&self, value: &Value, constraint: &Constraint, context: &mut ExecutionContext<'_>) {
        let ConstraintKind::All(options) = constraint.kind() else {
            return;
        };
        match value {
            Value::Array(items) => {
                for (index, item) in items.iter().enumerate() {
                    context.validate_nested(index, item, &options.constraints);
                }
            }
            Value::Object(map) => {
                for (key, item) in map {
                    context.validate_nested(key.as_str(), item, &options.constraints);
                }
            }
            absent if super::is_absent(absent) => {}
            other => super::type_violation(context, other, "iterable"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validators::testing::check;
    use crate::validators::{GreaterThanOrEqual, LessThanOrEqual};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn working_age() -> All {
        All::new([
            Constraint::from(GreaterThanOrEqual::new(18)),
            Constraint::from(LessThanOrEqual::new(70)),
        ])
    }

    #[test]
    fn reports_failing_elements_by_index() {
        let violations = check(json!([19, 23, 20, 33, 7, 22, 85]), working_age());
        let paths: Vec<String> = violations.iter().map(|v| v.path().to_string()).collect();
        assert_eq!(paths, ["4", "6"]);
    }

    #[test]
    fn maps_are_addressed_by_key() {
        let violations = check(json!({"alice": 30, "bob": 12}), working_age());
        assert_eq!(violations.get(0).map(|v| v.path().to_string()), Some("bob".to_owned()));
    }

    #[test]
    fn strings_are_a_type_mismatch() {
        assert_eq!(check(json!("19"), working_age()).len(), 1);
        assert!(check(json!(""), working_age()).is_empty());
    }

    #[test]
    fn parses_nested_declarations() {
        let parsed = Constraint::from_options(
            "All",
            json!([{"GreaterThanOrEqual": 18}, {"LessThanOrEqual": {"value": 70}}]),
        );
        assert_eq!(parsed, Ok(Constraint::from(working_age())));
    }
}
