//! Header data shared by entities, relationships and classifications.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What kind of instance a type describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InstanceKind {
    Entity,
    Relationship,
    Classification,
}

impl fmt::Display for InstanceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            InstanceKind::Entity => "entity",
            InstanceKind::Relationship => "relationship",
            InstanceKind::Classification => "classification",
        })
    }
}

/// Lifecycle status of an instance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InstanceStatus {
    Unknown,
    Proposed,
    Draft,
    Prepared,
    #[default]
    Active,
    Deleted,
}

/// The type an instance was created from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceType {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_def_guid: Option<String>,
    pub type_def_name: String,
    #[serde(default)]
    pub type_def_version: i64,
    pub type_def_category: InstanceKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub type_def_super_types: Vec<String>,
}

impl InstanceType {
    pub fn new(type_def_name: impl Into<String>, type_def_category: InstanceKind) -> Self {
        Self {
            type_def_guid: None,
            type_def_name: type_def_name.into(),
            type_def_version: 1,
            type_def_category,
            type_def_super_types: Vec::new(),
        }
    }

    pub fn with_guid(mut self, guid: impl Into<String>) -> Self {
        self.type_def_guid = Some(guid.into());
        self
    }
}

/// Audit fields maintained by the repository.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceAuditHeader {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option", skip_serializing_if = "Option::is_none")]
    pub create_time: Option<DateTime<Utc>>,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option", skip_serializing_if = "Option::is_none")]
    pub update_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub version: i64,
    #[serde(default)]
    pub status: InstanceStatus,
}
