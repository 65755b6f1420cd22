//! # open-metadata-types: Typed Property Values for Open Metadata
//!
//! The typed property-value model shared by every open metadata repository
//! instance, and one schema-driven engine that maps those instances onto
//! fixed-shape beans and back.
//!
//! ## Design Principles
//!
//! 1. **Closed value model**: `PropertyValue` is a tagged union of
//!    {Primitive, Enum, Struct, Map, Array}; a primitive cannot disagree with its category
//! 2. **Schema-driven mapping**: one `Mapper` plus a `SchemaCatalog` table replaces
//!    a generated mapper per metadata type
//! 3. **Lossless passthrough**: anything a bean does not model lands in its
//!    extra attributes / extra classifications, never on the floor
//! 4. **Trait-first registry**: `TypeRegistry` is the only process-wide collaborator
//!    and is injected, so the engine is testable without a full type archive
//!
//! ## Quick Start
//!
//! ```rust
//! use open_metadata_types::{
//!     EntityDetail, InMemoryTypeRegistry, Mapper, PropertyValue, SchemaCatalog, StarRating,
//!     TypeDescriptor, InstanceKind,
//! };
//!
//! # fn example() -> open_metadata_types::Result<()> {
//! let registry = InMemoryTypeRegistry::new();
//! registry.register(TypeDescriptor::new("rating-guid", "Rating", InstanceKind::Entity));
//!
//! let mapper = Mapper::new(registry, SchemaCatalog::builtin()?);
//!
//! let entity = EntityDetail::new("guid-1", mapper.instance_type("Rating")?)
//!     .with_property("stars", PropertyValue::enumeration(2, "TWO_STARS")?)
//!     .with_property("futureField", "x");
//!
//! let bean = mapper.entity_to_bean(&entity)?;
//! assert_eq!(bean.properties.enum_field::<StarRating>("stars"), Some(StarRating::TwoStars));
//! assert!(bean.properties.extra_attributes.contains_key("futureField"));
//!
//! let back = mapper.bean_to_entity(&bean)?;
//! assert_eq!(back.properties, entity.properties);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod ffdc;
pub mod registry;
pub mod schema;
pub mod bean;
pub mod mapper;
pub mod converter;
pub mod config;

// ============================================================================
// Re-exports: Model (the property-value DTOs)
// ============================================================================

pub use model::{
    Value, PrimitiveCategory, PrimitiveValue,
    PropertyValue, PropertyCategory, PrimitivePropertyValue, EnumPropertyValue,
    StructPropertyValue, MapPropertyValue, ArrayPropertyValue,
    ElementProperties, PropertyNames,
    InstanceType, InstanceStatus, InstanceAuditHeader, InstanceKind,
    EntityDetail, Relationship, EntityProxy, Classification,
};

// ============================================================================
// Re-exports: Registry, Schema, Beans, Mapping
// ============================================================================

pub use ffdc::{ErrorCode, ErrorReport, MessageDefinition};
pub use registry::{TypeRegistry, TypeDescriptor, InMemoryTypeRegistry};
pub use schema::{
    BeanSchema, FieldDef, FieldKind, EnumDef, EnumElement, SchemaCatalog,
    OpenEnum, StarRating, AnnotationStatus,
};
pub use bean::{
    SystemAttributes, FieldValue, BeanProperties,
    EntityBean, RelationshipBean, ClassificationBean,
};
pub use mapper::Mapper;
pub use converter::{
    MetadataElementConverter, ElementHeader, ElementClassification,
    RatingConverter, RatingElement, InformalTagConverter, InformalTagElement,
    DataFileConverter, DataFileElement,
};
pub use config::{MapperConfig, UnmodeledPolicy};

// ============================================================================
// Error Types
// ============================================================================

/// Every failure raised by the property model and the mapping layer.
///
/// Each variant maps to exactly one row of the [`ffdc::ErrorCode`] catalog;
/// use [`Error::report`] to obtain the operator-facing rendering.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Null property name passed to {context}")]
    NullPropertyName { context: &'static str },

    #[error("{value_type} cannot set element {index} of an array of size {count}")]
    ArrayOutOfBounds { value_type: &'static str, index: usize, count: usize },

    #[error("Primitive of category {category} expected as {expected}, got {actual}")]
    InvalidPrimitiveType { category: PrimitiveCategory, expected: &'static str, actual: String },

    #[error("Property {property} of type {type_name}: cannot cast {from} to {to}")]
    InvalidPrimitiveCast {
        property: String,
        type_name: String,
        from: PrimitiveCategory,
        to: PrimitiveCategory,
    },

    #[error("Invalid enum value {ordinal:?}/{symbolic_name:?} for {enum_name}")]
    InvalidEnum { enum_name: String, ordinal: Option<i32>, symbolic_name: Option<String> },

    #[error("Unknown type name '{type_name}' requested by {context}")]
    UnknownTypeName { type_name: String, context: &'static str },

    #[error("No bean schema registered for type '{type_name}'")]
    NoSchemaForType { type_name: String },

    #[error("Type '{type_name}' is a {registered}, not a {requested}")]
    TypeCategoryMismatch { type_name: String, registered: InstanceKind, requested: InstanceKind },

    #[error("Property {property} of type {type_name} is declared {declared}, got {actual}")]
    InvalidPropertyCategory {
        property: String,
        type_name: String,
        declared: String,
        actual: PropertyCategory,
    },

    #[error("Property {property} is not modeled by type {type_name}")]
    UnmodeledProperty { property: String, type_name: String },

    #[error("Classification {classification} is not modeled (entity type {type_name})")]
    UnmodeledClassification { classification: String, type_name: String },

    #[error("Array property {property} of type {type_name} declares {count} elements, element {missing} is missing")]
    IncompleteArray { property: String, type_name: String, count: usize, missing: usize },

    #[error("Relationship {guid} of type {type_name} has no {end} end")]
    MissingRelationshipEnd { guid: String, type_name: String, end: &'static str },

    #[error("Invalid bean schema for '{type_name}': {reason}")]
    InvalidSchema { type_name: String, reason: String },

    #[error("Invalid mapper configuration: {0}")]
    InvalidConfiguration(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
