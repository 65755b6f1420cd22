//! # Schema-Driven Mapper
//!
//! One mapper for every metadata type. Given a [`SchemaCatalog`] describing
//! each bean's fixed shape and a [`TypeRegistry`] for formal type lookups, it
//! translates repository instances to typed beans and back:
//!
//! ```text
//! EntityDetail ──entity_to_bean──▶ EntityBean
//!      ▲                               │
//!      └────────bean_to_entity─────────┘
//! ```
//!
//! Forward translation dispatches every property on its category, assigning
//! modeled names onto the bean (casting scalars to their declared category)
//! and routing everything else through the unmodeled-property policy. The
//! reverse path rebuilds property values from the modeled fields, re-emits the
//! extra attributes, and resolves the instance type through the registry.
//!
//! A translation either fully succeeds or returns the first error; nothing is
//! half-applied.

mod forward;
mod reverse;

use crate::config::{MapperConfig, UnmodeledPolicy};
use crate::model::{InstanceKind, InstanceType, PropertyValue};
use crate::registry::TypeRegistry;
use crate::schema::{BeanSchema, SchemaCatalog};
use crate::{Error, Result};

use std::collections::BTreeMap;

/// Generic bean mapper.
#[derive(Debug, Clone)]
pub struct Mapper<R> {
    registry: R,
    catalog: SchemaCatalog,
    config: MapperConfig,
}

impl<R: TypeRegistry> Mapper<R> {
    pub fn new(registry: R, catalog: SchemaCatalog) -> Self {
        Self::with_config(registry, catalog, MapperConfig::default())
    }

    pub fn with_config(registry: R, catalog: SchemaCatalog, config: MapperConfig) -> Self {
        Self { registry, catalog, config }
    }

    pub fn registry(&self) -> &R { &self.registry }
    pub fn catalog(&self) -> &SchemaCatalog { &self.catalog }
    pub fn config(&self) -> &MapperConfig { &self.config }

    /// Add or replace a bean schema after construction.
    pub fn register_schema(&mut self, schema: BeanSchema) -> Result<()> {
        self.catalog.register(schema).map(|_| ())
    }

    /// The instance type for a registered type name.
    pub fn instance_type(&self, type_name: &str) -> Result<InstanceType> {
        self.registry
            .resolve(type_name)
            .map(|d| d.to_instance_type())
            .ok_or_else(|| Error::UnknownTypeName {
                type_name: type_name.to_owned(),
                context: "Mapper::instance_type",
            })
    }

    /// Resolve a type that must be registered as `kind`.
    fn resolve_type(&self, type_name: &str, kind: InstanceKind, context: &'static str) -> Result<InstanceType> {
        let descriptor = self.registry.resolve(type_name).ok_or_else(|| Error::UnknownTypeName {
            type_name: type_name.to_owned(),
            context,
        })?;
        if descriptor.kind != kind {
            return Err(Error::TypeCategoryMismatch {
                type_name: type_name.to_owned(),
                registered: descriptor.kind,
                requested: kind,
            });
        }
        Ok(descriptor.to_instance_type())
    }

    /// Apply the unmodeled-property policy to one property. `property` is the
    /// dotted path used in diagnostics; extras are keyed by the bare `name`.
    fn divert_unmodeled(
        &self,
        type_name: &str,
        name: &str,
        property: &str,
        value: &PropertyValue,
        extras: &mut BTreeMap<String, PropertyValue>,
    ) -> Result<()> {
        match self.config.unmodeled_properties {
            UnmodeledPolicy::Preserve => {
                tracing::trace!(type_name, property, category = %value.category(), "preserving unmodeled property");
                extras.insert(name.to_owned(), value.clone());
                Ok(())
            }
            UnmodeledPolicy::Reject => Err(Error::UnmodeledProperty {
                property: property.to_owned(),
                type_name: type_name.to_owned(),
            }),
            UnmodeledPolicy::Ignore => {
                tracing::warn!(type_name, property, "dropping unmodeled property");
                Ok(())
            }
        }
    }
}

/// Dotted path of a property inside nested structs.
fn qualify(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_owned()
    } else {
        format!("{prefix}.{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{InMemoryTypeRegistry, TypeDescriptor};

    fn mapper() -> Mapper<InMemoryTypeRegistry> {
        let registry = InMemoryTypeRegistry::new();
        registry.register(TypeDescriptor::new("g-rating", "Rating", InstanceKind::Entity));
        registry.register(TypeDescriptor::new("g-attached", "AttachedRating", InstanceKind::Relationship));
        Mapper::new(registry, SchemaCatalog::builtin().unwrap())
    }

    #[test]
    fn test_instance_type() {
        let m = mapper();
        let t = m.instance_type("Rating").unwrap();
        assert_eq!(t.type_def_guid.as_deref(), Some("g-rating"));
        assert!(matches!(m.instance_type("Nope"), Err(Error::UnknownTypeName { .. })));
    }

    #[test]
    fn test_resolve_type_checks_kind() {
        let m = mapper();
        assert!(m.resolve_type("Rating", InstanceKind::Entity, "test").is_ok());
        assert!(matches!(
            m.resolve_type("AttachedRating", InstanceKind::Entity, "test"),
            Err(Error::TypeCategoryMismatch { registered: InstanceKind::Relationship, .. })
        ));
    }

    #[test]
    fn test_qualify() {
        assert_eq!(qualify("", "a"), "a");
        assert_eq!(qualify("a", "b"), "a.b");
    }
}
