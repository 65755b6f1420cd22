//! # Type Registry
//!
//! The one process-wide collaborator of the mapping layer: a read-only
//! lookup from type name to type descriptor, populated at startup by the
//! embedding service (typically from a type archive).
//!
//! The mapper takes any `TypeRegistry` by value, so tests can hand it an
//! [`InMemoryTypeRegistry`] without bootstrapping a full archive.
//!
//! ## Implementations
//!
//! | Registry | Module | Description |
//! |----------|--------|-------------|
//! | `InMemoryTypeRegistry` | `memory` | Shared map, cheap to clone |

pub mod memory;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::model::{InstanceKind, InstanceType};

pub use memory::InMemoryTypeRegistry;

/// Lookup-by-name service for formal type definitions.
pub trait TypeRegistry: Send + Sync {
    /// Resolve a type by its unique name. `None` when the name is not known.
    fn resolve(&self, type_name: &str) -> Option<TypeDescriptor>;
}

impl<T: TypeRegistry + ?Sized> TypeRegistry for &T {
    fn resolve(&self, type_name: &str) -> Option<TypeDescriptor> {
        (**self).resolve(type_name)
    }
}

impl<T: TypeRegistry + ?Sized> TypeRegistry for Arc<T> {
    fn resolve(&self, type_name: &str) -> Option<TypeDescriptor> {
        (**self).resolve(type_name)
    }
}

impl<T: TypeRegistry + ?Sized> TypeRegistry for Box<T> {
    fn resolve(&self, type_name: &str) -> Option<TypeDescriptor> {
        (**self).resolve(type_name)
    }
}

// ============================================================================
// TypeDescriptor
// ============================================================================

/// Formal description of a type, as held by the registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeDescriptor {
    pub guid: String,
    pub name: String,
    #[serde(default = "default_version")]
    pub version: i64,
    pub kind: InstanceKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub super_types: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

fn default_version() -> i64 { 1 }

impl TypeDescriptor {
    pub fn new(guid: impl Into<String>, name: impl Into<String>, kind: InstanceKind) -> Self {
        Self {
            guid: guid.into(),
            name: name.into(),
            version: default_version(),
            kind,
            super_types: Vec::new(),
            description: None,
        }
    }

    pub fn with_super_types(mut self, super_types: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.super_types = super_types.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_version(mut self, version: i64) -> Self {
        self.version = version;
        self
    }

    /// The descriptor an instance of this type carries.
    pub fn to_instance_type(&self) -> InstanceType {
        InstanceType {
            type_def_guid: Some(self.guid.clone()),
            type_def_name: self.name.clone(),
            type_def_version: self.version,
            type_def_category: self.kind,
            type_def_super_types: self.super_types.clone(),
        }
    }
}
