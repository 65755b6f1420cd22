//! # Open Metadata Property Model
//!
//! DTOs that define property values and the repository instances carrying them.
//! These types cross every boundary: repository ↔ mapper ↔ bean ↔ REST converter.
//!
//! Design rule: NO schema knowledge, NO registry lookups here.
//! This module is pure data: no I/O and no shared state.

pub mod value;
pub mod primitive;
pub mod property_value;
pub mod element_properties;
pub mod instance;
pub mod entity;
pub mod relationship;
pub mod classification;

pub use value::Value;
pub use primitive::{PrimitiveCategory, PrimitiveValue};
pub use property_value::{
    PropertyValue, PropertyCategory, PrimitivePropertyValue, EnumPropertyValue,
    StructPropertyValue, MapPropertyValue, ArrayPropertyValue,
};
pub use element_properties::{ElementProperties, PropertyNames};
pub use instance::{InstanceType, InstanceStatus, InstanceAuditHeader, InstanceKind};
pub use entity::EntityDetail;
pub use relationship::{Relationship, EntityProxy};
pub use classification::Classification;
