//! Classification attached to an entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ElementProperties, InstanceAuditHeader, InstanceType, PropertyValue};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub instance_type: Option<InstanceType>,
    #[serde(default)]
    pub header: InstanceAuditHeader,
    #[serde(default)]
    pub properties: ElementProperties,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option", skip_serializing_if = "Option::is_none")]
    pub effective_from_time: Option<DateTime<Utc>>,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option", skip_serializing_if = "Option::is_none")]
    pub effective_to_time: Option<DateTime<Utc>>,
}

impl Classification {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            instance_type: None,
            header: InstanceAuditHeader::default(),
            properties: ElementProperties::new(),
            effective_from_time: None,
            effective_to_time: None,
        }
    }

    pub fn with_type(mut self, instance_type: InstanceType) -> Self {
        self.instance_type = Some(instance_type);
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(key, value);
        self
    }
}
