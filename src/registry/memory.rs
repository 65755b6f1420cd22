//! In-memory type registry.
//!
//! Reference implementation of `TypeRegistry`: a name-keyed map behind a
//! `RwLock`. Clones share the same map, so a loader can keep registering
//! while mappers hold their own handle. Reads never block each other.

use std::sync::Arc;

use hashbrown::HashMap;
use parking_lot::RwLock;

use super::{TypeDescriptor, TypeRegistry};

/// Shared, name-keyed registry of type descriptors.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTypeRegistry {
    inner: Arc<RegistryInner>,
}

#[derive(Debug, Default)]
struct RegistryInner {
    by_name: RwLock<HashMap<String, TypeDescriptor>>,
}

impl InMemoryTypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a descriptor. Returns the one it replaced, if any.
    pub fn register(&self, descriptor: TypeDescriptor) -> Option<TypeDescriptor> {
        tracing::debug!(type_name = %descriptor.name, kind = %descriptor.kind, "registering type");
        self.inner.by_name.write().insert(descriptor.name.clone(), descriptor)
    }

    pub fn unregister(&self, type_name: &str) -> Option<TypeDescriptor> {
        self.inner.by_name.write().remove(type_name)
    }

    pub fn len(&self) -> usize {
        self.inner.by_name.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.by_name.read().is_empty()
    }

    /// Registered type names, sorted.
    pub fn type_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.inner.by_name.read().keys().cloned().collect();
        names.sort();
        names
    }
}

impl TypeRegistry for InMemoryTypeRegistry {
    fn resolve(&self, type_name: &str) -> Option<TypeDescriptor> {
        self.inner.by_name.read().get(type_name).cloned()
    }
}

impl FromIterator<TypeDescriptor> for InMemoryTypeRegistry {
    fn from_iter<I: IntoIterator<Item = TypeDescriptor>>(iter: I) -> Self {
        let registry = InMemoryTypeRegistry::new();
        {
            let mut map = registry.inner.by_name.write();
            for descriptor in iter {
                map.insert(descriptor.name.clone(), descriptor);
            }
        }
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::InstanceKind;

    #[test]
    fn test_register_and_resolve() {
        let registry = InMemoryTypeRegistry::new();
        assert!(registry.resolve("Rating").is_none());
        registry.register(TypeDescriptor::new("g1", "Rating", InstanceKind::Entity));
        let found = registry.resolve("Rating").unwrap();
        assert_eq!(found.guid, "g1");
        assert_eq!(found.to_instance_type().type_def_guid.as_deref(), Some("g1"));
    }

    #[test]
    fn test_clones_share_state() {
        let registry = InMemoryTypeRegistry::new();
        let handle = registry.clone();
        registry.register(TypeDescriptor::new("g1", "Rating", InstanceKind::Entity));
        assert_eq!(handle.len(), 1);

        let replaced = handle.register(TypeDescriptor::new("g2", "Rating", InstanceKind::Entity));
        assert_eq!(replaced.map(|d| d.guid), Some("g1".to_owned()));
        assert_eq!(registry.resolve("Rating").map(|d| d.guid), Some("g2".to_owned()));
    }

    #[test]
    fn test_from_iter_and_names() {
        let registry: InMemoryTypeRegistry = [
            TypeDescriptor::new("g2", "InformalTag", InstanceKind::Entity),
            TypeDescriptor::new("g1", "AttachedTag", InstanceKind::Relationship),
        ]
        .into_iter()
        .collect();
        assert_eq!(registry.type_names(), ["AttachedTag", "InformalTag"]);
    }
}
