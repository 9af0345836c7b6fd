//! YAML mapping documents
//!
//! ```yaml
//! User:
//!   constraints:
//!     - NotNull
//!   properties:
//!     firstName:
//!       - NotBlank: { groups: identity }
//!       - Length: { min: 3, groups: [identity] }
//!     age:
//!       - GreaterThanOrEqual: 18
//! ```
//!
//! Top-level keys are record names. A property maps to a list of
//! declarations (or a single one); each declaration is a kind name or a
//! single-key map from kind name to options.

use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

use crate::constraint::build_declarations;
use crate::foundation::MappingError;
use crate::mapping::loader::MetadataLoader;
use crate::mapping::{ClassMetadata, Shape};
use crate::registry::ConstraintRegistry;

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ClassMapping {
    constraints: Value,
    properties: IndexMap<String, Value>,
}

/// Metadata source backed by one YAML document.
#[derive(Debug)]
pub struct YamlFileLoader {
    origin: String,
    classes: IndexMap<String, ClassMapping>,
}

impl YamlFileLoader {
    /// Reads and parses the document at `path`.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, MappingError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| MappingError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(path.display().to_string(), &text)
    }

    /// Parses `text`; `origin` labels the document in errors.
    pub fn parse(origin: impl Into<String>, text: &str) -> Result<Self, MappingError> {
        let origin = origin.into();
        let classes: Option<IndexMap<String, ClassMapping>> =
            serde_yaml::from_str(text).map_err(|source| MappingError::Yaml {
                origin: origin.clone(),
                source,
            })?;
        let classes = classes.unwrap_or_default();
        tracing::debug!(origin = %origin, records = classes.len(), "parsed yaml mapping");
        Ok(Self { origin, classes })
    }

    /// Label of the document.
    #[must_use]
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Record names the document declares.
    pub fn records(&self) -> impl Iterator<Item = &str> {
        self.classes.keys().map(String::as_str)
    }
}

impl MetadataLoader for YamlFileLoader {
    fn source(&self) -> &'static str {
        "yaml"
    }

    fn load(
        &self,
        shape: &Shape,
        registry: &ConstraintRegistry,
        metadata: &mut ClassMetadata,
    ) -> Result<bool, MappingError> {
        let Some(mapping) = self.classes.get(shape.name()) else {
            return Ok(false);
        };

        let constraint_error = |property: &str, error| MappingError::Constraint {
            source_name: "yaml",
            shape: shape.name().to_owned(),
            property: property.to_owned(),
            error,
        };

        for constraint in build_declarations(&mapping.constraints, registry)
            .map_err(|error| constraint_error("", error))?
        {
            metadata.add_constraint(constraint);
        }

        for (property, declarations) in &mapping.properties {
            let constraints = build_declarations(declarations, registry)
                .map_err(|error| constraint_error(property, error))?;
            metadata.add_property_constraints(property, constraints);
        }

        Ok(true)
    }
}
