//! Execution context
//!
//! One [`ExecutionContext`] lives for the duration of a single
//! [`Validator::validate`](crate::Validator::validate) call. It tracks the
//! current property path, the requested groups and the constraint being
//! evaluated, and collects the violations validators report.

use serde_json::Value;

use crate::config::ValidatorSettings;
use crate::constraint::{Constraint, ConstraintKind};
use crate::engine::Validator;
use crate::foundation::error::{ConfigurationError, ValidatorError};
use crate::foundation::groups::Groups;
use crate::foundation::message::{self, Parameters};
use crate::foundation::path::{PathSegment, PropertyPath};
use crate::foundation::violation::{Violation, ViolationList};
use crate::mapping::Shape;
use crate::validators;

/// Per-call validation state handed to every [`ConstraintValidator`](crate::ConstraintValidator).
pub struct ExecutionContext<'a> {
    validator: &'a Validator,
    groups: &'a Groups,
    root: String,
    path: PropertyPath,
    constraint: Option<Constraint>,
    inherited: Option<Groups>,
    violations: ViolationList,
    error: Option<ValidatorError>,
}

impl<'a> ExecutionContext<'a> {
    pub(crate) fn new(validator: &'a Validator, groups: &'a Groups, root: String) -> Self {
        Self {
            validator,
            groups,
            root,
            path: PropertyPath::root(),
            constraint: None,
            inherited: None,
            violations: ViolationList::new(),
            error: None,
        }
    }

    /// Groups requested for this run.
    #[must_use]
    pub fn groups(&self) -> &Groups {
        self.groups
    }

    /// Path of the value currently being validated.
    #[must_use]
    pub fn path(&self) -> &PropertyPath {
        &self.path
    }

    /// Constraint currently being evaluated.
    #[must_use]
    pub fn constraint(&self) -> Option<&Constraint> {
        self.constraint.as_ref()
    }

    /// Settings of the running validator.
    #[must_use]
    pub fn settings(&self) -> &ValidatorSettings {
        self.validator.settings()
    }

    /// Violations collected so far.
    #[must_use]
    pub fn violations(&self) -> &ViolationList {
        &self.violations
    }

    /// Starts a violation for the current path and constraint.
    pub fn build_violation(&mut self, template: impl Into<String>) -> ViolationBuilder<'_, 'a> {
        ViolationBuilder {
            context: self,
            template: template.into(),
            parameters: Parameters::new(),
            plural: None,
            code: None,
            segment: None,
            invalid_value: Value::Null,
        }
    }

    /// Validates `value` below `segment` against `constraints`.
    ///
    /// Group selection applies to every nested constraint; those without
    /// groups of their own inherit the current composite's groups. Nested
    /// evaluation never short-circuits.
    pub fn validate_nested(
        &mut self,
        segment: impl Into<PathSegment>,
        value: &Value,
        constraints: &[Constraint],
    ) {
        self.path.push(segment);
        let inherited = self.inherited.clone();
        for constraint in constraints {
            if constraint.is_selected(self.groups, inherited.as_ref()) {
                self.dispatch(value, constraint, inherited.as_ref());
            }
        }
        self.path.pop();
    }

    /// Runs the validator for `constraint` on `value`.
    pub(crate) fn dispatch(
        &mut self,
        value: &Value,
        constraint: &Constraint,
        inherited: Option<&Groups>,
    ) {
        if self.error.is_some() {
            return;
        }

        let previous_constraint = self.constraint.replace(constraint.clone());
        let previous_inherited = std::mem::replace(
            &mut self.inherited,
            constraint.explicit_groups().or(inherited).cloned(),
        );

        tracing::trace!(
            constraint = constraint.name(),
            path = %self.path,
            "evaluating constraint"
        );

        if let Some(builtin) = validators::builtin_validator(constraint.kind()) {
            builtin.validate(value, constraint, self);
        } else if let ConstraintKind::Custom(custom) = constraint.kind() {
            let validator = self.validator;
            match validator.registry().validator(custom.name()) {
                Some(custom_validator) => custom_validator.validate(value, constraint, self),
                None => {
                    self.error = Some(
                        ConfigurationError::UnknownConstraint {
                            kind: custom.name().to_owned(),
                        }
                        .into(),
                    );
                }
            }
        }

        self.constraint = previous_constraint;
        self.inherited = previous_inherited;
    }

    /// Validates a serialized record against its resolved metadata.
    pub(crate) fn validate_record(
        &mut self,
        value: &Value,
        shape: &Shape,
    ) -> Result<(), ValidatorError> {
        let metadata = self.validator.metadata_for(shape)?;

        for constraint in metadata.constraints() {
            if constraint.is_selected(self.groups, None) {
                self.dispatch(value, constraint, None);
            }
        }

        for (name, property) in metadata.properties() {
            let property_value = value.get(name.as_str()).unwrap_or(&Value::Null);
            self.path.push(name.as_str());
            for constraint in property.constraints() {
                if constraint.is_selected(self.groups, None) {
                    self.dispatch(property_value, constraint, None);
                }
            }
            if let Some(nested) = property.cascade() {
                self.cascade(property_value, nested)?;
            }
            self.path.pop();
        }

        self.error.take().map_or(Ok(()), Err)
    }

    fn cascade(&mut self, value: &Value, shape: &Shape) -> Result<(), ValidatorError> {
        match value {
            Value::Object(_) => self.validate_record(value, shape),
            Value::Array(items) => {
                for (index, item) in items.iter().enumerate() {
                    self.path.push(index);
                    self.cascade(item, shape)?;
                    self.path.pop();
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    pub(crate) fn violation_count(&self) -> usize {
        self.violations.len()
    }

    pub(crate) fn finish(mut self) -> Result<ViolationList, ValidatorError> {
        match self.error.take() {
            Some(error) => Err(error),
            None => Ok(self.violations),
        }
    }
}

// ============================================================================
// VIOLATION BUILDER
// ============================================================================

/// Fluent builder returned by [`ExecutionContext::build_violation`].
///
/// Nothing is recorded until [`add_violation`](Self::add_violation) is called.
#[must_use = "call add_violation() to record the violation"]
pub struct ViolationBuilder<'c, 'a> {
    context: &'c mut ExecutionContext<'a>,
    template: String,
    parameters: Parameters,
    plural: Option<u64>,
    code: Option<String>,
    segment: Option<PathSegment>,
    invalid_value: Value,
}

impl ViolationBuilder<'_, '_> {
    /// Sets a `{{ name }}` placeholder value.
    pub fn set_parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(name.into(), value.into());
        self
    }

    /// Sets the stable violation code. Defaults to the constraint kind name.
    pub fn set_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Sets the number used to pick between singular and plural forms.
    pub fn set_plural(mut self, plural: u64) -> Self {
        self.plural = Some(plural);
        self
    }

    /// Places the violation one segment below the current path.
    pub fn at_path(mut self, segment: impl Into<PathSegment>) -> Self {
        self.segment = Some(segment.into());
        self
    }

    /// Records the offending value.
    pub fn set_invalid_value(mut self, value: &Value) -> Self {
        self.invalid_value = value.clone();
        self
    }

    /// Renders the message and appends the violation.
    pub fn add_violation(self) {
        let Self {
            context,
            template,
            parameters,
            plural,
            code,
            segment,
            invalid_value,
        } = self;

        let path = match segment {
            Some(segment) => context.path.child(segment),
            None => context.path.clone(),
        };
        let code = code
            .or_else(|| context.constraint.as_ref().map(|c| c.name().to_owned()))
            .unwrap_or_default();

        context.violations.add(Violation {
            path,
            root: context.root.clone(),
            message: message::render(&template, &parameters, plural),
            template,
            parameters,
            plural,
            code,
            constraint: context.constraint.clone(),
            invalid_value,
        });
    }
}
