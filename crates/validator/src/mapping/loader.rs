//! Metadata sources.

use crate::foundation::MappingError;
use crate::mapping::{ClassMetadata, Shape};
use crate::registry::ConstraintRegistry;

/// One source of record metadata.
///
/// `load` adds whatever the source declares for `shape` to `metadata`
/// (which starts empty) and reports whether it declared anything.
pub trait MetadataLoader: Send + Sync {
    /// Short source name used in logs and errors.
    fn source(&self) -> &'static str;

    /// Loads declarations for `shape`.
    fn load(
        &self,
        shape: &Shape,
        registry: &ConstraintRegistry,
        metadata: &mut ClassMetadata,
    ) -> Result<bool, MappingError>;
}

// ============================================================================
// STATIC METHOD
// ============================================================================

/// Reads [`Record::load_validator_metadata`](crate::mapping::Record::load_validator_metadata).
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticMethodLoader;

impl MetadataLoader for StaticMethodLoader {
    fn source(&self) -> &'static str {
        "static method"
    }

    fn load(
        &self,
        shape: &Shape,
        _registry: &ConstraintRegistry,
        metadata: &mut ClassMetadata,
    ) -> Result<bool, MappingError> {
        shape
            .load_static(metadata)
            .map_err(|error| MappingError::StaticMethod {
                shape: shape.name().to_owned(),
                error,
            })?;
        Ok(!metadata.is_empty())
    }
}

// ============================================================================
// ATTRIBUTES
// ============================================================================

/// Reads the attribute table of [`Record::property_attributes`](crate::mapping::Record::property_attributes).
#[derive(Debug, Clone, Copy, Default)]
pub struct AttributeLoader;

impl MetadataLoader for AttributeLoader {
    fn source(&self) -> &'static str {
        "attribute"
    }

    fn load(
        &self,
        shape: &Shape,
        registry: &ConstraintRegistry,
        metadata: &mut ClassMetadata,
    ) -> Result<bool, MappingError> {
        let attributes = shape.attributes();
        for attribute in &attributes {
            let constraints = attribute
                .constraints()
                .iter()
                .map(|spec| spec.build(registry))
                .collect::<Result<Vec<_>, _>>()
                .map_err(|error| MappingError::Constraint {
                    source_name: self.source(),
                    shape: shape.name().to_owned(),
                    property: attribute.property().to_owned(),
                    error,
                })?;
            metadata.add_property_constraints(attribute.property(), constraints);
            if let Some(nested) = attribute.cascade_shape() {
                metadata.set_property_cascade(attribute.property(), nested);
            }
        }
        Ok(!attributes.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraint::{Constraint, ConstraintSpec};
    use crate::foundation::ConfigurationError;
    use crate::mapping::{PropertyAttribute, Record};
    use crate::validators::NotBlank;
    use serde::Serialize;
    use serde_json::json;

    #[derive(Serialize)]
    struct Tagged;

    impl Record for Tagged {
        const NAME: &'static str = "Tagged";

        fn load_validator_metadata(metadata: &mut ClassMetadata) -> Result<(), ConfigurationError> {
            metadata.add_property_constraint("name", NotBlank::new());
            Ok(())
        }

        fn property_attributes() -> Vec<PropertyAttribute> {
            vec![
                PropertyAttribute::new("name")
                    .constraint(ConstraintSpec::new("Length", json!({"min": 3}))),
            ]
        }
    }

    #[derive(Serialize)]
    struct Broken;

    impl Record for Broken {
        const NAME: &'static str = "Broken";

        fn property_attributes() -> Vec<PropertyAttribute> {
            vec![PropertyAttribute::new("age").constraint(ConstraintSpec::bare("GreaterThanOrEqual"))]
        }
    }

    #[test]
    fn static_method_source() {
        let mut metadata = ClassMetadata::new("Tagged");
        let loaded = StaticMethodLoader.load(
            &Shape::of::<Tagged>(),
            &ConstraintRegistry::new(),
            &mut metadata,
        );
        assert!(matches!(loaded, Ok(true)));
        assert_eq!(
            metadata.property("name").map(|p| p.constraints().to_vec()),
            Some(vec![Constraint::from(NotBlank::new())])
        );
    }

    #[test]
    fn attribute_source_builds_specs() {
        let mut metadata = ClassMetadata::new("Tagged");
        let loaded = AttributeLoader.load(
            &Shape::of::<Tagged>(),
            &ConstraintRegistry::new(),
            &mut metadata,
        );
        assert!(matches!(loaded, Ok(true)));
        assert_eq!(metadata.property("name").map(|p| p.constraints().len()), Some(1));
    }

    #[test]
    fn attribute_errors_name_the_property() {
        let mut metadata = ClassMetadata::new("Broken");
        let error = AttributeLoader
            .load(&Shape::of::<Broken>(), &ConstraintRegistry::new(), &mut metadata)
            .expect_err("missing option must fail");
        assert!(matches!(
            error,
            MappingError::Constraint { ref property, .. } if property == "age"
        ));
    }
}
