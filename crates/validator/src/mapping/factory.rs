//! Metadata resolution and caching.

use std::any::TypeId;
use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;

use crate::foundation::MappingError;
use crate::mapping::loader::MetadataLoader;
use crate::mapping::{ClassMetadata, Shape};
use crate::registry::ConstraintRegistry;

/// Resolves [`ClassMetadata`] for record types.
///
/// Loaders run in registration order; each one fills a fresh layer which is
/// then merged over the previous ones, so a later source replaces an earlier
/// source's declarations per property. Resolved metadata is cached per type
/// when caching is enabled. Concurrent first resolutions of the same type may
/// both load; the first one inserted is kept.
pub struct MetadataFactory {
    loaders: Vec<Box<dyn MetadataLoader>>,
    cache: Option<DashMap<TypeId, Arc<ClassMetadata>>>,
}

impl MetadataFactory {
    /// Creates a factory over `loaders`.
    #[must_use]
    pub fn new(loaders: Vec<Box<dyn MetadataLoader>>, cache_enabled: bool) -> Self {
        Self {
            loaders,
            cache: cache_enabled.then(DashMap::new),
        }
    }

    /// Source names of the configured loaders, in order.
    pub fn sources(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.loaders.iter().map(|loader| loader.source())
    }

    /// Number of cached record types.
    #[must_use]
    pub fn cached(&self) -> usize {
        self.cache.as_ref().map_or(0, DashMap::len)
    }

    /// Returns the merged metadata of `shape`.
    pub fn metadata_for(
        &self,
        shape: &Shape,
        registry: &ConstraintRegistry,
    ) -> Result<Arc<ClassMetadata>, MappingError> {
        if let Some(cached) = self
            .cache
            .as_ref()
            .and_then(|cache| cache.get(&shape.type_id()))
        {
            tracing::trace!(shape = shape.name(), "metadata cache hit");
            return Ok(Arc::clone(cached.value()));
        }

        let mut metadata = ClassMetadata::new(shape.name());
        for loader in &self.loaders {
            let mut layer = ClassMetadata::new(shape.name());
            if loader.load(shape, registry, &mut layer)? {
                tracing::debug!(
                    shape = shape.name(),
                    source = loader.source(),
                    properties = layer.properties().len(),
                    "loaded metadata"
                );
                metadata.merge(layer, loader.source());
            }
        }

        let metadata = Arc::new(metadata);
        match &self.cache {
            Some(cache) => Ok(Arc::clone(
                cache
                    .entry(shape.type_id())
                    .or_insert(metadata)
                    .value(),
            )),
            None => Ok(metadata),
        }
    }
}

impl fmt::Debug for MetadataFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetadataFactory")
            .field("sources", &self.sources().collect::<Vec<_>>())
            .field("cached", &self.cached())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraint::{Constraint, ConstraintSpec};
    use crate::foundation::ConfigurationError;
    use crate::mapping::{
        AttributeLoader, PropertyAttribute, Record, StaticMethodLoader, YamlFileLoader,
    };
    use crate::validators::{Length, NotBlank};
    use pretty_assertions::assert_eq;
    use serde::Serialize;
    use serde_json::json;

    #[derive(Serialize)]
    struct Author;

    impl Record for Author {
        const NAME: &'static str = "Author";

        fn load_validator_metadata(metadata: &mut ClassMetadata) -> Result<(), ConfigurationError> {
            metadata
                .add_property_constraint("name", NotBlank::new())
                .add_property_constraint("bio", NotBlank::new());
            Ok(())
        }

        fn property_attributes() -> Vec<PropertyAttribute> {
            vec![
                PropertyAttribute::new("name")
                    .constraint(ConstraintSpec::new("Length", json!({"max": 40}))),
            ]
        }
    }

    fn factory(cache_enabled: bool) -> MetadataFactory {
        let yaml = YamlFileLoader::parse("inline", "Author:\n  properties:\n    bio:\n      - Length: { min: 10 }\n")
            .expect("mapping parses");
        MetadataFactory::new(
            vec![
                Box::new(StaticMethodLoader),
                Box::new(AttributeLoader),
                Box::new(yaml),
            ],
            cache_enabled,
        )
    }

    #[test]
    fn later_sources_win_per_property() {
        let metadata = factory(true)
            .metadata_for(&Shape::of::<Author>(), &ConstraintRegistry::new())
            .expect("metadata resolves");
        assert_eq!(
            metadata.property("name").map(|p| p.constraints().to_vec()),
            Some(vec![Constraint::from(Length::max(40))])
        );
        assert_eq!(
            metadata.property("bio").map(|p| p.constraints().to_vec()),
            Some(vec![Constraint::from(Length::min(10))])
        );
    }

    #[test]
    fn cache_returns_the_same_instance() {
        let factory = factory(true);
        let registry = ConstraintRegistry::new();
        let first = factory.metadata_for(&Shape::of::<Author>(), &registry);
        let second = factory.metadata_for(&Shape::of::<Author>(), &registry);
        match (first, second) {
            (Ok(first), Ok(second)) => assert!(Arc::ptr_eq(&first, &second)),
            other => panic!("metadata should resolve: {other:?}"),
        }
        assert_eq!(factory.cached(), 1);
    }

    #[test]
    fn disabled_cache_stays_empty() {
        let factory = factory(false);
        let resolved = factory.metadata_for(&Shape::of::<Author>(), &ConstraintRegistry::new());
        assert!(resolved.is_ok());
        assert_eq!(factory.cached(), 0);
        assert_eq!(
            factory.sources().collect::<Vec<_>>(),
            ["static method", "attribute", "yaml"]
        );
    }
}
