//! InformalTag entity → `InformalTagElement`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::properties::{read_bool, restore_extended, PropertyReader};
use super::{ElementHeader, MetadataElementConverter};
use crate::model::{ElementProperties, EntityDetail, Relationship, Value};
use crate::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InformalTagElement {
    pub element_header: ElementHeader,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    /// A private tag is only visible to its creator. Stored as `isPublic` on the entity.
    #[serde(default)]
    pub is_private_tag: bool,
    /// Whether the attachment is public; from the attaching relationship.
    #[serde(default)]
    pub is_public: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extended_properties: Option<BTreeMap<String, Value>>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct InformalTagConverter;

impl MetadataElementConverter for InformalTagConverter {
    type Element = InformalTagElement;

    fn type_name(&self) -> &'static str {
        "InformalTag"
    }

    fn convert(&self, entity: &EntityDetail, relationship: Option<&Relationship>) -> Result<InformalTagElement> {
        tracing::debug!(guid = %entity.guid, "converting informal tag");
        let mut reader = PropertyReader::new(entity.type_name(), &entity.properties);
        let name = reader.take_string("tagName")?;
        let description = reader.take_string("tagDescription")?;
        let is_private_tag = reader.take_bool("isPublic")?.is_some_and(|public| !public);
        let is_public = match relationship {
            Some(r) => read_bool(r.type_name(), &r.properties, "isPublic")?.unwrap_or(false),
            None => false,
        };
        Ok(InformalTagElement {
            element_header: ElementHeader::from_entity(entity),
            name,
            description,
            user: entity.header.created_by.clone(),
            is_private_tag,
            is_public,
            extended_properties: reader.into_extended(),
        })
    }

    fn to_properties(&self, element: &InformalTagElement) -> Result<ElementProperties> {
        let mut props = ElementProperties::new().with_property("isPublic", !element.is_private_tag);
        if let Some(name) = &element.name {
            props.insert("tagName", name.as_str());
        }
        if let Some(description) = &element.description {
            props.insert("tagDescription", description.as_str());
        }
        restore_extended(&mut props, element.extended_properties.as_ref());
        Ok(props)
    }
}
