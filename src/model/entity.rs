//! Entity instance with its properties and classifications.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Classification, ElementProperties, InstanceAuditHeader, InstanceType, PropertyValue};

/// An entity as returned by a metadata repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityDetail {
    pub guid: String,
    #[serde(rename = "type")]
    pub instance_type: InstanceType,
    #[serde(default)]
    pub header: InstanceAuditHeader,
    #[serde(default)]
    pub properties: ElementProperties,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option", skip_serializing_if = "Option::is_none")]
    pub effective_from_time: Option<DateTime<Utc>>,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option", skip_serializing_if = "Option::is_none")]
    pub effective_to_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub classifications: Vec<Classification>,
}

impl EntityDetail {
    pub fn new(guid: impl Into<String>, instance_type: InstanceType) -> Self {
        Self {
            guid: guid.into(),
            instance_type,
            header: InstanceAuditHeader::default(),
            properties: ElementProperties::new(),
            effective_from_time: None,
            effective_to_time: None,
            classifications: Vec::new(),
        }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(key, value);
        self
    }

    pub fn with_header(mut self, header: InstanceAuditHeader) -> Self {
        self.header = header;
        self
    }

    pub fn with_classification(mut self, classification: Classification) -> Self {
        self.classifications.push(classification);
        self
    }

    pub fn type_name(&self) -> &str {
        &self.instance_type.type_def_name
    }

    pub fn get(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get_property_value(key)
    }

    pub fn classification(&self, name: &str) -> Option<&Classification> {
        self.classifications.iter().find(|c| c.name == name)
    }
}
