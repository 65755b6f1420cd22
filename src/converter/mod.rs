//! # Metadata Element Converters
//!
//! REST-facing shapes built from repository instances. Each converter takes
//! the properties it models out of a copy of the entity's bag; whatever is
//! left becomes the element's `extended_properties`. A modeled name holding
//! a value of the wrong category fails the conversion. `to_properties` goes
//! the other way, for requests that create or update an element.
//!
//! | Converter | Entity type | Element |
//! |-----------|-------------|---------|
//! | `RatingConverter` | Rating | `RatingElement` |
//! | `InformalTagConverter` | InformalTag | `InformalTagElement` |
//! | `DataFileConverter` | DataFile | `DataFileElement` |

pub mod properties;
mod data_file;
mod informal_tag;
mod rating;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{Classification, ElementProperties, EntityDetail, InstanceStatus, Relationship};
use crate::Result;

pub use data_file::{DataFileConverter, DataFileElement};
pub use informal_tag::{InformalTagConverter, InformalTagElement};
pub use rating::{RatingConverter, RatingElement};

/// Builds one kind of metadata element from an entity (and, when the element
/// was reached through one, the relationship that attached it).
pub trait MetadataElementConverter {
    type Element;

    /// Entity type name this converter understands.
    fn type_name(&self) -> &'static str;

    fn convert(&self, entity: &EntityDetail, relationship: Option<&Relationship>) -> Result<Self::Element>;

    /// The property bag an element of this kind is stored as.
    fn to_properties(&self, element: &Self::Element) -> Result<ElementProperties>;
}

// ============================================================================
// Element header
// ============================================================================

/// Identity, type and audit information common to every metadata element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementHeader {
    pub guid: String,
    pub type_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_guid: Option<String>,
    #[serde(default)]
    pub status: InstanceStatus,
    #[serde(default)]
    pub version: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option", skip_serializing_if = "Option::is_none")]
    pub create_time: Option<DateTime<Utc>>,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option", skip_serializing_if = "Option::is_none")]
    pub update_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub classifications: Vec<ElementClassification>,
}

impl ElementHeader {
    pub fn from_entity(entity: &EntityDetail) -> Self {
        Self {
            guid: entity.guid.clone(),
            type_name: entity.type_name().to_owned(),
            type_guid: entity.instance_type.type_def_guid.clone(),
            status: entity.header.status,
            version: entity.header.version,
            created_by: entity.header.created_by.clone(),
            updated_by: entity.header.updated_by.clone(),
            create_time: entity.header.create_time,
            update_time: entity.header.update_time,
            classifications: entity.classifications.iter().map(ElementClassification::from).collect(),
        }
    }
}

/// Name and properties of a classification attached to an element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementClassification {
    pub classification_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classification_properties: Option<ElementProperties>,
}

impl From<&Classification> for ElementClassification {
    fn from(c: &Classification) -> Self {
        Self {
            classification_name: c.name.clone(),
            classification_properties: (!c.properties.is_empty()).then(|| c.properties.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{InstanceAuditHeader, InstanceKind, InstanceType};

    #[test]
    fn test_header_from_entity() {
        let entity = EntityDetail::new("g1", InstanceType::new("Rating", InstanceKind::Entity).with_guid("t1"))
            .with_header(InstanceAuditHeader { created_by: Some("bob".into()), version: 4, ..Default::default() })
            .with_classification(Classification::new("SpineObject"))
            .with_classification(Classification::new("Confidentiality").with_property("level", 1));
        let header = ElementHeader::from_entity(&entity);
        assert_eq!(header.type_guid.as_deref(), Some("t1"));
        assert_eq!(header.version, 4);
        assert_eq!(header.classifications.len(), 2);
        assert!(header.classifications[0].classification_properties.is_none());
        assert!(header.classifications[1].classification_properties.is_some());
    }
}
