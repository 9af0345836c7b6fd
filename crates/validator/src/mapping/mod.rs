//! Record metadata
//!
//! A [`Record`] is a typed value whose constraints are declared once per
//! type instead of being passed on every call. Declarations come from three
//! kinds of source, each a [`MetadataLoader`]:
//!
//! - [`StaticMethodLoader`]: [`Record::load_validator_metadata`]
//! - [`AttributeLoader`]: the table produced by `#[derive(Record)]`
//! - [`YamlFileLoader`]: mapping documents keyed by record name
//!
//! [`MetadataFactory`] runs the configured loaders in order, merges their
//! results (a later source replaces an earlier one per property) and caches
//! the outcome per type.

mod factory;
mod loader;
mod metadata;
mod yaml;

use std::any::TypeId;
use std::fmt;

use serde::Serialize;

use crate::constraint::ConstraintSpec;
use crate::foundation::ConfigurationError;

pub use factory::MetadataFactory;
pub use loader::{AttributeLoader, MetadataLoader, StaticMethodLoader};
pub use metadata::{ClassMetadata, MetadataEntry, PropertyMetadata};
pub use yaml::YamlFileLoader;

// ============================================================================
// RECORD
// ============================================================================

/// A typed value with per-type constraint metadata.
///
/// Records are validated through their serde representation, so property
/// names are the serialized field names.
///
/// # Examples
///
/// ```rust
/// use assay_validator::prelude::*;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Signup {
///     email: String,
/// }
///
/// impl Record for Signup {
///     const NAME: &'static str = "Signup";
///
///     fn load_validator_metadata(metadata: &mut ClassMetadata) -> Result<(), ConfigurationError> {
///         metadata.add_property_constraint("email", Email::new());
///         Ok(())
///     }
/// }
/// ```
pub trait Record: Serialize + 'static {
    /// Name used by mapping files and in rendered violations.
    const NAME: &'static str;

    /// Programmatic metadata declaration.
    fn load_validator_metadata(metadata: &mut ClassMetadata) -> Result<(), ConfigurationError> {
        let _ = metadata;
        Ok(())
    }

    /// Attribute table, normally generated by `#[derive(Record)]`.
    fn property_attributes() -> Vec<PropertyAttribute> {
        Vec::new()
    }
}

// ============================================================================
// SHAPE
// ============================================================================

type StaticMethod = fn(&mut ClassMetadata) -> Result<(), ConfigurationError>;

/// Type-erased handle on a [`Record`] type.
#[derive(Clone, Copy)]
pub struct Shape {
    name: &'static str,
    type_id: TypeId,
    static_method: StaticMethod,
    attributes: fn() -> Vec<PropertyAttribute>,
}

impl Shape {
    /// The shape of `R`.
    #[must_use]
    pub fn of<R: Record>() -> Self {
        Self {
            name: R::NAME,
            type_id: TypeId::of::<R>(),
            static_method: R::load_validator_metadata,
            attributes: R::property_attributes,
        }
    }

    /// Record name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Identity of the record type.
    #[must_use]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub(crate) fn load_static(&self, metadata: &mut ClassMetadata) -> Result<(), ConfigurationError> {
        (self.static_method)(metadata)
    }

    pub(crate) fn attributes(&self) -> Vec<PropertyAttribute> {
        (self.attributes)()
    }
}

impl fmt::Debug for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Shape").field(&self.name).finish()
    }
}

impl PartialEq for Shape {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for Shape {}

// ============================================================================
// PROPERTY ATTRIBUTE
// ============================================================================

/// Attribute-style declaration for one property.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyAttribute {
    property: String,
    constraints: Vec<ConstraintSpec>,
    cascade: Option<Shape>,
}

impl PropertyAttribute {
    /// An empty declaration for `property`.
    pub fn new(property: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            constraints: Vec::new(),
            cascade: None,
        }
    }

    /// Appends a constraint declaration.
    #[must_use]
    pub fn constraint(mut self, spec: ConstraintSpec) -> Self {
        self.constraints.push(spec);
        self
    }

    /// Validates the property's value as a nested record.
    #[must_use]
    pub fn cascade(mut self, shape: Shape) -> Self {
        self.cascade = Some(shape);
        self
    }

    /// Serialized property name.
    #[must_use]
    pub fn property(&self) -> &str {
        &self.property
    }

    /// Constraint declarations in order.
    #[must_use]
    pub fn constraints(&self) -> &[ConstraintSpec] {
        &self.constraints
    }

    /// Nested record shape, if cascading.
    #[must_use]
    pub fn cascade_shape(&self) -> Option<Shape> {
        self.cascade
    }
}
