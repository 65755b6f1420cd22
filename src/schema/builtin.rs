//! Built-in bean schemas for the open metadata types this crate ships beans for.

use super::{AnnotationStatus, BeanSchema, FieldKind, OpenEnum, StarRating};
use crate::model::InstanceKind::{Classification, Entity, Relationship};
use crate::model::PrimitiveCategory::{Boolean, Date, Int, String as Str};

pub(super) fn schemas() -> Vec<BeanSchema> {
    vec![
        // Entities
        BeanSchema::new("RelationalColumnType", Entity)
            .with_field("qualifiedName", FieldKind::Primitive(Str))
            .with_field("displayName", FieldKind::Primitive(Str))
            .with_field("dataType", FieldKind::Primitive(Str))
            .with_field("defaultValue", FieldKind::Primitive(Str))
            .with_field("versionNumber", FieldKind::Primitive(Str))
            .with_field("author", FieldKind::Primitive(Str))
            .with_field("usage", FieldKind::Primitive(Str))
            .with_field("encodingStandard", FieldKind::Primitive(Str))
            .with_field("additionalProperties", FieldKind::Map(Str)),
        BeanSchema::new("DataSourcePhysicalStatusAnnotation", Entity)
            .with_field("createTime", FieldKind::Primitive(Date))
            .with_field("modifiedTime", FieldKind::Primitive(Date))
            .with_field("size", FieldKind::Primitive(Int))
            .with_field("encoding", FieldKind::Primitive(Str))
            .with_field("dataSourceProperties", FieldKind::Map(Str))
            .with_field("annotationType", FieldKind::Primitive(Str))
            .with_field("summary", FieldKind::Primitive(Str))
            .with_field("confidenceLevel", FieldKind::Primitive(Int))
            .with_field("expression", FieldKind::Primitive(Str))
            .with_field("explanation", FieldKind::Primitive(Str))
            .with_field("analysisStep", FieldKind::Primitive(Str))
            .with_field("jsonProperties", FieldKind::Primitive(Str))
            .with_field("additionalProperties", FieldKind::Map(Str))
            .with_field("annotationStatus", FieldKind::Enum(AnnotationStatus::enum_def())),
        BeanSchema::new("Rating", Entity)
            .with_field("stars", FieldKind::Enum(StarRating::enum_def()))
            .with_field("review", FieldKind::Primitive(Str)),
        BeanSchema::new("InformalTag", Entity)
            .with_field("tagName", FieldKind::Primitive(Str))
            .with_field("tagDescription", FieldKind::Primitive(Str))
            .with_field("isPublic", FieldKind::Primitive(Boolean)),
        BeanSchema::new("DataFile", Entity)
            .with_field("qualifiedName", FieldKind::Primitive(Str))
            .with_field("name", FieldKind::Primitive(Str))
            .with_field("description", FieldKind::Primitive(Str))
            .with_field("owner", FieldKind::Primitive(Str))
            .with_field("zoneMembership", FieldKind::Array(Str))
            .with_field("createTime", FieldKind::Primitive(Date))
            .with_field("modifiedTime", FieldKind::Primitive(Date))
            .with_field("encoding", FieldKind::Primitive(Str))
            .with_field("encodingLanguage", FieldKind::Primitive(Str))
            .with_field("encodingDescription", FieldKind::Primitive(Str))
            .with_field("additionalProperties", FieldKind::Map(Str)),
        // Relationships
        BeanSchema::new("CategoryHierarchyLink", Relationship),
        BeanSchema::new("ConnectionConnectorType", Relationship),
        BeanSchema::new("AttachedRating", Relationship)
            .with_field("isPublic", FieldKind::Primitive(Boolean)),
        BeanSchema::new("AttachedTag", Relationship)
            .with_field("isPublic", FieldKind::Primitive(Boolean)),
        // Classifications
        BeanSchema::new("SpineObject", Classification),
        BeanSchema::new("Confidentiality", Classification)
            .with_field("level", FieldKind::Primitive(Int))
            .with_field("confidence", FieldKind::Primitive(Int))
            .with_field("steward", FieldKind::Primitive(Str))
            .with_field("source", FieldKind::Primitive(Str))
            .with_field("notes", FieldKind::Primitive(Str)),
    ]
}
