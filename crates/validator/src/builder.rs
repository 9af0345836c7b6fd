//! Validator builder.

use std::path::PathBuf;

use crate::config::ValidatorSettings;
use crate::engine::Validator;
use crate::foundation::{ConstraintValidator, MappingError};
use crate::mapping::{AttributeLoader, MetadataLoader, StaticMethodLoader, YamlFileLoader};
use crate::registry::{ConstraintRegistry, OptionSchema};

enum PendingLoader {
    Ready(Box<dyn MetadataLoader>),
    YamlFile(PathBuf),
    YamlText { origin: String, text: String },
}

impl PendingLoader {
    fn resolve(self) -> Result<Box<dyn MetadataLoader>, MappingError> {
        match self {
            Self::Ready(loader) => Ok(loader),
            Self::YamlFile(path) => Ok(Box::new(YamlFileLoader::from_path(path)?)),
            Self::YamlText { origin, text } => Ok(Box::new(YamlFileLoader::parse(origin, &text)?)),
        }
    }
}

/// Assembles a [`Validator`].
///
/// Metadata sources are consulted in the order they are added; a later
/// source replaces an earlier one's declarations per property. Files listed
/// in [`ValidatorSettings::mapping_files`] come after the sources added here.
///
/// # Examples
///
/// ```rust
/// use assay_validator::prelude::*;
///
/// let validator = Validator::builder()
///     .add_method_mapping()
///     .enable_attribute_mapping()
///     .add_yaml_mapping_str("inline", "User:\n  properties:\n    age:\n      - GreaterThanOrEqual: 18\n")
///     .build()
///     .unwrap();
/// assert_eq!(validator.factory().sources().count(), 3);
/// ```
#[must_use = "call build() to obtain a Validator"]
pub struct ValidatorBuilder {
    loaders: Vec<PendingLoader>,
    registry: ConstraintRegistry,
    settings: ValidatorSettings,
}

impl ValidatorBuilder {
    pub fn new() -> Self {
        Self {
            loaders: Vec::new(),
            registry: ConstraintRegistry::new(),
            settings: ValidatorSettings::default(),
        }
    }

    /// Reads [`Record::load_validator_metadata`](crate::Record::load_validator_metadata).
    pub fn add_method_mapping(mut self) -> Self {
        self.loaders.push(PendingLoader::Ready(Box::new(StaticMethodLoader)));
        self
    }

    /// Reads the attribute tables generated by `#[derive(Record)]`.
    pub fn enable_attribute_mapping(mut self) -> Self {
        self.loaders.push(PendingLoader::Ready(Box::new(AttributeLoader)));
        self
    }

    /// Reads a YAML mapping file when the validator is built.
    pub fn add_yaml_mapping(mut self, path: impl Into<PathBuf>) -> Self {
        self.loaders.push(PendingLoader::YamlFile(path.into()));
        self
    }

    /// Reads a YAML mapping document given as text.
    pub fn add_yaml_mapping_str(mut self, origin: impl Into<String>, text: impl Into<String>) -> Self {
        self.loaders.push(PendingLoader::YamlText {
            origin: origin.into(),
            text: text.into(),
        });
        self
    }

    /// Adds any other metadata source.
    pub fn add_loader(mut self, loader: impl MetadataLoader + 'static) -> Self {
        self.loaders.push(PendingLoader::Ready(Box::new(loader)));
        self
    }

    /// Registers a custom constraint kind.
    pub fn register_constraint(
        mut self,
        name: impl Into<String>,
        schema: OptionSchema,
        validator: impl ConstraintValidator + 'static,
    ) -> Self {
        self.registry.register(name, schema, validator);
        self
    }

    pub fn with_settings(mut self, settings: ValidatorSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Loads the mapping files and builds the validator.
    pub fn build(self) -> Result<Validator, MappingError> {
        let Self {
            loaders,
            registry,
            settings,
        } = self;

        let loaders = loaders
            .into_iter()
            .chain(settings.mapping_files.iter().cloned().map(PendingLoader::YamlFile))
            .map(PendingLoader::resolve)
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(
            sources = loaders.len(),
            cache = settings.cache_metadata,
            "built validator"
        );
        Ok(Validator::from_parts(registry, loaders, settings))
    }
}

impl Default for ValidatorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraint::Constraint;
    use crate::foundation::ExecutionContext;
    use serde_json::{Value, json};

    struct Even;

    impl ConstraintValidator for Even {
        fn validate(&self, value: &Value, _: &Constraint, context: &mut ExecutionContext<'_>) {
            if value.as_i64().is_some_and(|n| n % 2 != 0) {
                context
                    .build_violation("This value should be even.")
                    .add_violation();
            }
        }
    }

    #[test]
    fn missing_mapping_file_fails_the_build() {
        let result = Validator::builder()
            .add_yaml_mapping("/nonexistent/mapping.yml")
            .build();
        assert!(matches!(result, Err(MappingError::Io { .. })));
    }

    #[test]
    fn settings_files_come_after_explicit_sources() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        std::io::Write::write_all(&mut file, b"User: {}\n").expect("write mapping");

        let validator = Validator::builder()
            .add_method_mapping()
            .with_settings(ValidatorSettings::default().with_mapping_file(file.path()))
            .build()
            .expect("validator builds");
        assert_eq!(
            validator.factory().sources().collect::<Vec<_>>(),
            ["static method", "yaml"]
        );
    }

    #[test]
    fn registered_kinds_are_evaluated() {
        let validator = Validator::builder()
            .register_constraint("Even", OptionSchema::new(), Even)
            .build()
            .expect("validator builds");
        let even = validator
            .registry()
            .build("Even", Value::Null)
            .expect("custom kind builds");

        let violations = validator
            .validate_value(&json!(3), &[even])
            .expect("validation runs");
        assert_eq!(violations.len(), 1);
        assert_eq!(violations.iter().next().map(|v| v.code()), Some("Even"));
    }
}
