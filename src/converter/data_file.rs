//! DataFile entity → `DataFileElement`.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::properties::{restore_extended, PropertyReader};
use super::{ElementHeader, MetadataElementConverter};
use crate::model::{ArrayPropertyValue, ElementProperties, EntityDetail, MapPropertyValue, Relationship, Value};
use crate::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataFileElement {
    pub element_header: ElementHeader,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qualified_name: Option<String>,
    /// Stored as `name`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub zone_membership: Vec<String>,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option", skip_serializing_if = "Option::is_none")]
    pub create_time: Option<DateTime<Utc>>,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option", skip_serializing_if = "Option::is_none")]
    pub modified_time: Option<DateTime<Utc>>,
    /// Stored as `encoding`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoding_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoding_language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoding_description: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub additional_properties: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extended_properties: Option<BTreeMap<String, Value>>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DataFileConverter;

impl MetadataElementConverter for DataFileConverter {
    type Element = DataFileElement;

    fn type_name(&self) -> &'static str {
        "DataFile"
    }

    fn convert(&self, entity: &EntityDetail, _relationship: Option<&Relationship>) -> Result<DataFileElement> {
        tracing::debug!(guid = %entity.guid, "converting data file");
        let mut reader = PropertyReader::new(entity.type_name(), &entity.properties);
        Ok(DataFileElement {
            element_header: ElementHeader::from_entity(entity),
            qualified_name: reader.take_string("qualifiedName")?,
            display_name: reader.take_string("name")?,
            description: reader.take_string("description")?,
            owner: reader.take_string("owner")?,
            zone_membership: reader.take_string_array("zoneMembership")?.unwrap_or_default(),
            create_time: reader.take_date("createTime")?,
            modified_time: reader.take_date("modifiedTime")?,
            encoding_type: reader.take_string("encoding")?,
            encoding_language: reader.take_string("encodingLanguage")?,
            encoding_description: reader.take_string("encodingDescription")?,
            additional_properties: reader.take_string_map("additionalProperties")?.unwrap_or_default(),
            extended_properties: reader.into_extended(),
        })
    }

    fn to_properties(&self, element: &DataFileElement) -> Result<ElementProperties> {
        let mut props = ElementProperties::new();
        let strings = [
            ("qualifiedName", &element.qualified_name),
            ("name", &element.display_name),
            ("description", &element.description),
            ("owner", &element.owner),
            ("encoding", &element.encoding_type),
            ("encodingLanguage", &element.encoding_language),
            ("encodingDescription", &element.encoding_description),
        ];
        for (name, value) in strings {
            if let Some(value) = value {
                props.insert(name, value.as_str());
            }
        }
        for (name, value) in [("createTime", element.create_time), ("modifiedTime", element.modified_time)] {
            if let Some(value) = value {
                props.insert(name, value);
            }
        }
        if !element.zone_membership.is_empty() {
            props.insert(
                "zoneMembership",
                ArrayPropertyValue::from_values(element.zone_membership.iter().map(String::as_str)),
            );
        }
        if !element.additional_properties.is_empty() {
            props.insert(
                "additionalProperties",
                MapPropertyValue::from_pairs(element.additional_properties.iter().map(|(k, v)| (k.as_str(), v.as_str()))),
            );
        }
        restore_extended(&mut props, element.extended_properties.as_ref());
        Ok(props)
    }
}
