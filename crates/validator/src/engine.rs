//! Validation engine
//!
//! [`Validator`] ties together the constraint registry, the metadata
//! factory and the settings. A call validates one [`Subject`]: a plain
//! value checked against an explicit constraint list, or a record checked
//! against its resolved metadata.

use std::borrow::Cow;
use std::sync::Arc;

use serde_json::Value;

use crate::builder::ValidatorBuilder;
use crate::config::ValidatorSettings;
use crate::constraint::Constraint;
use crate::foundation::{
    ExecutionContext, Groups, MappingError, UsageError, ValidatorError, ViolationList, type_name,
};
use crate::mapping::{ClassMetadata, MetadataFactory, MetadataLoader, Record, Shape};
use crate::registry::ConstraintRegistry;

// ============================================================================
// SUBJECT
// ============================================================================

/// What a validation call looks at.
#[derive(Debug, Clone)]
pub struct Subject<'a> {
    value: Cow<'a, Value>,
    shape: Option<Shape>,
}

impl<'a> Subject<'a> {
    /// A borrowed plain value.
    #[must_use]
    pub fn value(value: &'a Value) -> Self {
        Self {
            value: Cow::Borrowed(value),
            shape: None,
        }
    }

    /// An owned plain value.
    #[must_use]
    pub fn owned(value: Value) -> Self {
        Self {
            value: Cow::Owned(value),
            shape: None,
        }
    }

    /// A record, serialized into its value tree.
    pub fn record<R: Record>(record: &R) -> Result<Self, ValidatorError> {
        let value = serde_json::to_value(record).map_err(|source| ValidatorError::Serialization {
            shape: R::NAME,
            source,
        })?;
        Ok(Self {
            value: Cow::Owned(value),
            shape: Some(Shape::of::<R>()),
        })
    }

    /// The value tree.
    #[must_use]
    pub fn as_value(&self) -> &Value {
        &self.value
    }

    /// Record shape, `None` for plain values.
    #[must_use]
    pub fn shape(&self) -> Option<&Shape> {
        self.shape.as_ref()
    }

    /// Label shown for violations at the root path.
    fn root_label(&self) -> String {
        if let Some(shape) = &self.shape {
            return format!("Object({})", shape.name());
        }
        match self.value.as_ref() {
            Value::Null => String::new(),
            Value::String(s) => s.clone(),
            Value::Array(_) | Value::Object(_) => "Array".to_owned(),
            other => other.to_string(),
        }
    }
}

impl<'a> From<&'a Value> for Subject<'a> {
    fn from(value: &'a Value) -> Self {
        Self::value(value)
    }
}

impl From<Value> for Subject<'static> {
    fn from(value: Value) -> Self {
        Self::owned(value)
    }
}

// ============================================================================
// VALIDATOR
// ============================================================================

/// The validation engine.
///
/// `Validator` is `Send + Sync`; share one behind an [`Arc`] and call it
/// from any thread. Record metadata is resolved on first use and cached.
///
/// # Examples
///
/// ```rust
/// use assay_validator::prelude::*;
/// use serde_json::json;
///
/// let validator = Validator::new();
/// let violations = validator
///     .validate_value(&json!(""), &[NotBlank::new().into(), Email::new().into()])
///     .unwrap();
/// assert_eq!(violations.len(), 1);
/// ```
#[derive(Debug)]
pub struct Validator {
    registry: ConstraintRegistry,
    factory: MetadataFactory,
    settings: ValidatorSettings,
}

impl Validator {
    /// A validator with built-in kinds, default settings and no metadata
    /// sources.
    #[must_use]
    pub fn new() -> Self {
        Self::from_parts(ConstraintRegistry::new(), Vec::new(), ValidatorSettings::default())
    }

    /// Starts a [`ValidatorBuilder`].
    #[must_use]
    pub fn builder() -> ValidatorBuilder {
        ValidatorBuilder::new()
    }

    pub(crate) fn from_parts(
        registry: ConstraintRegistry,
        loaders: Vec<Box<dyn MetadataLoader>>,
        settings: ValidatorSettings,
    ) -> Self {
        let factory = MetadataFactory::new(loaders, settings.cache_metadata);
        Self {
            registry,
            factory,
            settings,
        }
    }

    /// Validates `subject`.
    ///
    /// With `constraints` the subject is checked against that list; an empty
    /// list counts as none. Without, a record subject is checked against its
    /// metadata and a plain value is a [`UsageError`]. `groups` defaults to
    /// `{"Default"}`.
    pub fn validate(
        &self,
        subject: &Subject<'_>,
        constraints: Option<&[Constraint]>,
        groups: Option<&Groups>,
    ) -> Result<ViolationList, ValidatorError> {
        let requested = groups.unwrap_or(Groups::default_ref());
        let value = subject.as_value();
        let mut context = ExecutionContext::new(self, requested, subject.root_label());

        match (constraints.filter(|list| !list.is_empty()), subject.shape()) {
            (Some(constraints), _) => {
                for constraint in constraints {
                    if !constraint.is_selected(requested, None) {
                        continue;
                    }
                    let before = context.violation_count();
                    context.dispatch(value, constraint, None);
                    if self.settings.stop_on_first_violation && context.violation_count() > before {
                        tracing::trace!(constraint = constraint.name(), "stopping after first failing constraint");
                        break;
                    }
                }
            }
            (None, Some(shape)) => context.validate_record(value, shape)?,
            (None, None) => {
                return Err(UsageError::NoConstraints {
                    shape: type_name(value),
                }
                .into());
            }
        }

        let violations = context.finish()?;
        tracing::debug!(
            shape = subject.shape().map_or("value", Shape::name),
            groups = %requested,
            violations = violations.len(),
            "validation finished"
        );
        Ok(violations)
    }

    /// Checks a plain value against `constraints` in the default group.
    pub fn validate_value(
        &self,
        value: &Value,
        constraints: &[Constraint],
    ) -> Result<ViolationList, ValidatorError> {
        self.validate(&Subject::value(value), Some(constraints), None)
    }

    /// Checks a plain value against `constraints` in `groups`.
    pub fn validate_value_in_groups(
        &self,
        value: &Value,
        constraints: &[Constraint],
        groups: impl Into<Groups>,
    ) -> Result<ViolationList, ValidatorError> {
        self.validate(&Subject::value(value), Some(constraints), Some(&groups.into()))
    }

    /// Checks a record against its metadata in the default group.
    pub fn validate_record<R: Record>(&self, record: &R) -> Result<ViolationList, ValidatorError> {
        self.validate(&Subject::record(record)?, None, None)
    }

    /// Checks a record against its metadata in `groups`.
    pub fn validate_record_in_groups<R: Record>(
        &self,
        record: &R,
        groups: impl Into<Groups>,
    ) -> Result<ViolationList, ValidatorError> {
        self.validate(&Subject::record(record)?, None, Some(&groups.into()))
    }

    /// Resolved metadata of `shape`.
    pub fn metadata_for(&self, shape: &Shape) -> Result<Arc<ClassMetadata>, MappingError> {
        self.factory.metadata_for(shape, &self.registry)
    }

    /// Known constraint kinds.
    #[must_use]
    pub fn registry(&self) -> &ConstraintRegistry {
        &self.registry
    }

    /// Metadata sources and cache.
    #[must_use]
    pub fn factory(&self) -> &MetadataFactory {
        &self.factory
    }

    #[must_use]
    pub fn settings(&self) -> &ValidatorSettings {
        &self.settings
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::ConfigurationError;
    use crate::validators::{Custom, Email, GreaterThanOrEqual, Length, NotBlank};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn validator_is_shareable() {
        assert_send_sync::<Validator>();
    }

    #[test]
    fn plain_value_needs_constraints() {
        let error = Validator::new()
            .validate(&Subject::owned(json!("x")), None, None)
            .expect_err("no constraints");
        assert!(matches!(
            error,
            ValidatorError::Usage(UsageError::NoConstraints { shape: "string" })
        ));
    }

    #[test]
    fn stops_after_first_failing_constraint() {
        let constraints = [Constraint::from(Length::min(5)), Constraint::from(Email::new())];
        let value = json!("abc");

        let stopping = Validator::new().validate_value(&value, &constraints);
        assert_eq!(stopping.map(|v| v.len()).ok(), Some(1));

        let exhaustive = Validator::builder()
            .with_settings(ValidatorSettings::default().with_stop_on_first_violation(false))
            .build()
            .expect("builder without sources")
            .validate_value(&value, &constraints);
        assert_eq!(exhaustive.map(|v| v.len()).ok(), Some(2));
    }

    #[test]
    fn groups_filter_the_explicit_list() {
        let constraints = [
            Constraint::from(NotBlank::new()).in_groups("identity"),
            Constraint::from(GreaterThanOrEqual::new(18)),
        ];
        let validator = Validator::new();

        let default = validator.validate_value(&json!(""), &constraints);
        assert_eq!(default.map(|v| v.len()).ok(), Some(0));

        let identity = validator.validate_value_in_groups(&json!(""), &constraints, "identity");
        assert_eq!(identity.map(|v| v.len()).ok(), Some(1));
    }

    #[test]
    fn unregistered_custom_kind_is_an_error() {
        let error = Validator::new()
            .validate_value(&json!("x"), &[Constraint::from(Custom::new("Domain"))])
            .expect_err("custom kind is unknown");
        assert!(matches!(
            error,
            ValidatorError::Configuration(ConfigurationError::UnknownConstraint { .. })
        ));
    }

    #[test]
    fn root_labels() {
        assert_eq!(Subject::owned(json!("abc")).root_label(), "abc");
        assert_eq!(Subject::owned(json!(42)).root_label(), "42");
        assert_eq!(Subject::owned(json!([1])).root_label(), "Array");
        assert_eq!(Subject::owned(Value::Null).root_label(), "");
    }
}
