//! Resolved constraint metadata of one record type.

use indexmap::IndexMap;

use crate::constraint::Constraint;
use crate::foundation::PropertyPath;
use crate::mapping::{Record, Shape};

/// Constraints and cascade target of one property.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyMetadata {
    constraints: Vec<Constraint>,
    cascade: Option<Shape>,
}

impl PropertyMetadata {
    /// Constraints in declaration order.
    #[must_use]
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Nested record validated below this property.
    #[must_use]
    pub fn cascade(&self) -> Option<&Shape> {
        self.cascade.as_ref()
    }
}

/// One `(path, constraints)` pair of a flattened [`ClassMetadata`].
#[derive(Debug, Clone, PartialEq)]
pub struct MetadataEntry {
    /// Property path; the root for record-level constraints.
    pub path: PropertyPath,
    /// Constraints in declaration order.
    pub constraints: Vec<Constraint>,
}

/// Constraint declarations for a record type.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassMetadata {
    name: String,
    constraints: Vec<Constraint>,
    properties: IndexMap<String, PropertyMetadata>,
}

impl ClassMetadata {
    /// Empty metadata for the record called `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            constraints: Vec::new(),
            properties: IndexMap::new(),
        }
    }

    /// Record name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Adds a constraint on the whole record.
    pub fn add_constraint(&mut self, constraint: impl Into<Constraint>) -> &mut Self {
        self.constraints.push(constraint.into());
        self
    }

    /// Adds a constraint on `property`.
    pub fn add_property_constraint(
        &mut self,
        property: &str,
        constraint: impl Into<Constraint>,
    ) -> &mut Self {
        self.property_mut(property).constraints.push(constraint.into());
        self
    }

    /// Adds several constraints on `property`, keeping their order.
    pub fn add_property_constraints(
        &mut self,
        property: &str,
        constraints: impl IntoIterator<Item = Constraint>,
    ) -> &mut Self {
        self.property_mut(property).constraints.extend(constraints);
        self
    }

    /// Validates `property` as a nested `R` (or a list of them).
    pub fn add_property_cascade<R: Record>(&mut self, property: &str) -> &mut Self {
        self.set_property_cascade(property, Shape::of::<R>());
        self
    }

    pub(crate) fn set_property_cascade(&mut self, property: &str, shape: Shape) {
        self.property_mut(property).cascade = Some(shape);
    }

    /// Record-level constraints.
    #[must_use]
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Properties in first-declaration order.
    #[must_use]
    pub fn properties(&self) -> &IndexMap<String, PropertyMetadata> {
        &self.properties
    }

    /// Metadata of one property.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&PropertyMetadata> {
        self.properties.get(name)
    }

    /// Returns true when nothing was declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty() && self.properties.is_empty()
    }

    /// Flattens into `(path, constraints)` entries, record-level first.
    #[must_use]
    pub fn entries(&self) -> Vec<MetadataEntry> {
        let root = (!self.constraints.is_empty()).then(|| MetadataEntry {
            path: PropertyPath::root(),
            constraints: self.constraints.clone(),
        });
        root.into_iter()
            .chain(self.properties.iter().map(|(name, property)| MetadataEntry {
                path: PropertyPath::from(name.as_str()),
                constraints: property.constraints.clone(),
            }))
            .collect()
    }

    /// Applies a later source on top of this one.
    ///
    /// Each property declared by `layer` replaces the constraints of the
    /// same property here. A cascade declared earlier survives unless `layer`
    /// declares its own. Record-level constraints are replaced when `layer`
    /// declares any.
    pub(crate) fn merge(&mut self, layer: ClassMetadata, source: &str) {
        if !layer.constraints.is_empty() {
            if !self.constraints.is_empty() {
                tracing::trace!(shape = %self.name, source, "record-level constraints overridden");
            }
            self.constraints = layer.constraints;
        }
        for (name, mut property) in layer.properties {
            if let Some(existing) = self.properties.get_mut(&name) {
                tracing::trace!(shape = %self.name, property = %name, source, "property overridden");
                if property.cascade.is_none() {
                    property.cascade = existing.cascade.take();
                }
            }
            self.properties.insert(name, property);
        }
    }

    fn property_mut(&mut self, property: &str) -> &mut PropertyMetadata {
        self.properties.entry(property.to_owned()).or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validators::{GreaterThanOrEqual, Length, NotBlank};
    use pretty_assertions::assert_eq;

    #[test]
    fn later_source_replaces_per_property() {
        let mut base = ClassMetadata::new("User");
        base.add_property_constraint("firstName", NotBlank::new())
            .add_property_constraint("age", GreaterThanOrEqual::new(18));

        let mut later = ClassMetadata::new("User");
        later.add_property_constraint("firstName", Length::min(3));

        base.merge(later, "yaml");

        let names: Vec<&str> = base.properties().keys().map(String::as_str).collect();
        assert_eq!(names, ["firstName", "age"]);
        assert_eq!(
            base.property("firstName").map(PropertyMetadata::constraints),
            Some(&[Constraint::from(Length::min(3))][..])
        );
        assert_eq!(base.property("age").map(|p| p.constraints().len()), Some(1));
    }

    #[test]
    fn entries_flatten_in_order() {
        let mut metadata = ClassMetadata::new("User");
        metadata
            .add_constraint(NotBlank::new())
            .add_property_constraints(
                "firstName",
                [Constraint::from(NotBlank::new()), Constraint::from(Length::min(3))],
            );

        let entries = metadata.entries();
        let paths: Vec<String> = entries.iter().map(|e| e.path.to_string()).collect();
        assert_eq!(paths, ["", "firstName"]);
        assert_eq!(entries[1].constraints.len(), 2);
    }
}
