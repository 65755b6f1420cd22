//! Relationship between two entities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ElementProperties, InstanceAuditHeader, InstanceType, PropertyValue};

/// Lightweight reference to the entity at one end of a relationship.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityProxy {
    pub guid: String,
    pub type_name: String,
}

impl EntityProxy {
    pub fn new(guid: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self { guid: guid.into(), type_name: type_name.into() }
    }
}

/// A relationship instance linking two entities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
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
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_one_proxy: Option<EntityProxy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_two_proxy: Option<EntityProxy>,
}

impl Relationship {
    pub fn new(guid: impl Into<String>, instance_type: InstanceType) -> Self {
        Self {
            guid: guid.into(),
            instance_type,
            header: InstanceAuditHeader::default(),
            properties: ElementProperties::new(),
            effective_from_time: None,
            effective_to_time: None,
            entity_one_proxy: None,
            entity_two_proxy: None,
        }
    }

    pub fn with_ends(mut self, one: EntityProxy, two: EntityProxy) -> Self {
        self.entity_one_proxy = Some(one);
        self.entity_two_proxy = Some(two);
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(key, value);
        self
    }

    pub fn with_header(mut self, header: InstanceAuditHeader) -> Self {
        self.header = header;
        self
    }

    pub fn type_name(&self) -> &str {
        &self.instance_type.type_def_name
    }

    /// The "other" end of the relationship from the given entity GUID.
    pub fn other_end(&self, from_guid: &str) -> Option<&EntityProxy> {
        let one = self.entity_one_proxy.as_ref()?;
        let two = self.entity_two_proxy.as_ref()?;
        if one.guid == from_guid { Some(two) }
        else if two.guid == from_guid { Some(one) }
        else { None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::InstanceKind;

    #[test]
    fn test_other_end() {
        let rel = Relationship::new("r1", InstanceType::new("AttachedRating", InstanceKind::Relationship))
            .with_ends(EntityProxy::new("e1", "Referenceable"), EntityProxy::new("e2", "Rating"));
        assert_eq!(rel.other_end("e1").map(|p| p.guid.as_str()), Some("e2"));
        assert_eq!(rel.other_end("e2").map(|p| p.guid.as_str()), Some("e1"));
        assert!(rel.other_end("e3").is_none());
    }
}
