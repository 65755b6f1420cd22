//! # Typed Beans
//!
//! The fixed-shape side of the mapping. A bean holds the modeled fields of
//! its type as [`FieldValue`]s, the repository's audit data in a separate
//! [`SystemAttributes`], and two escape hatches for everything its schema
//! does not model:
//!
//! - `BeanProperties::extra_attributes`: unmodeled properties, verbatim
//! - `EntityBean::extra_classifications`: unmodeled classifications, verbatim
//!
//! Beans are pure data; the `Mapper` fills and drains them.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{
    Classification, EntityProxy, InstanceAuditHeader, InstanceStatus, PrimitiveValue, PropertyValue,
};
use crate::schema::OpenEnum;

// ============================================================================
// System attributes
// ============================================================================

/// Repository-maintained identity and audit fields, kept apart from the
/// user-visible properties.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemAttributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<InstanceStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option", skip_serializing_if = "Option::is_none")]
    pub create_time: Option<DateTime<Utc>>,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option", skip_serializing_if = "Option::is_none")]
    pub update_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,
}

impl SystemAttributes {
    pub fn from_header(guid: Option<&str>, header: &InstanceAuditHeader) -> Self {
        Self {
            guid: guid.map(str::to_owned),
            status: Some(header.status),
            created_by: header.created_by.clone(),
            updated_by: header.updated_by.clone(),
            create_time: header.create_time,
            update_time: header.update_time,
            version: Some(header.version),
        }
    }

    /// Audit header for a repository instance. Status defaults to `Active`.
    pub fn to_header(&self) -> InstanceAuditHeader {
        InstanceAuditHeader {
            created_by: self.created_by.clone(),
            updated_by: self.updated_by.clone(),
            create_time: self.create_time,
            update_time: self.update_time,
            version: self.version.unwrap_or_default(),
            status: self.status.unwrap_or_default(),
        }
    }
}

// ============================================================================
// Field values
// ============================================================================

/// Value of one modeled field, shaped by its `FieldKind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "category", content = "value", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FieldValue {
    Primitive(PrimitiveValue),
    Enum { ordinal: i32, symbolic_name: String },
    Map(BTreeMap<String, PrimitiveValue>),
    Array(Vec<PrimitiveValue>),
    Struct(Box<BeanProperties>),
}

impl FieldValue {
    pub fn enumeration<E: OpenEnum>(value: E) -> Self {
        FieldValue::Enum { ordinal: value.ordinal(), symbolic_name: value.symbolic_name().to_owned() }
    }

    pub fn string_map<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        FieldValue::Map(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), PrimitiveValue::String(v.into())))
                .collect(),
        )
    }

    pub fn string_array(values: impl IntoIterator<Item = impl Into<String>>) -> Self {
        FieldValue::Array(values.into_iter().map(|v| PrimitiveValue::String(v.into())).collect())
    }
}

impl From<PrimitiveValue> for FieldValue {
    fn from(v: PrimitiveValue) -> Self { FieldValue::Primitive(v) }
}
impl From<BeanProperties> for FieldValue {
    fn from(v: BeanProperties) -> Self { FieldValue::Struct(Box::new(v)) }
}
impl From<bool> for FieldValue { fn from(v: bool) -> Self { FieldValue::Primitive(v.into()) } }
impl From<i32> for FieldValue { fn from(v: i32) -> Self { FieldValue::Primitive(v.into()) } }
impl From<i64> for FieldValue { fn from(v: i64) -> Self { FieldValue::Primitive(v.into()) } }
impl From<f64> for FieldValue { fn from(v: f64) -> Self { FieldValue::Primitive(v.into()) } }
impl From<String> for FieldValue { fn from(v: String) -> Self { FieldValue::Primitive(v.into()) } }
impl From<&str> for FieldValue { fn from(v: &str) -> Self { FieldValue::Primitive(v.into()) } }
impl From<DateTime<Utc>> for FieldValue {
    fn from(v: DateTime<Utc>) -> Self { FieldValue::Primitive(v.into()) }
}

// ============================================================================
// BeanProperties
// ============================================================================

/// Modeled fields plus the unmodeled-property escape hatch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeanProperties {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, FieldValue>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra_attributes: BTreeMap<String, PropertyValue>,
}

impl BeanProperties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn with_extra_attribute(mut self, name: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.extra_attributes.insert(name.into(), value.into());
        self
    }

    pub fn set_field(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn remove_field(&mut self, name: &str) -> Option<FieldValue> {
        self.fields.remove(name)
    }

    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.extra_attributes.is_empty()
    }

    pub fn primitive_field(&self, name: &str) -> Option<&PrimitiveValue> {
        match self.fields.get(name)? {
            FieldValue::Primitive(p) => Some(p),
            _ => None,
        }
    }

    pub fn string_field(&self, name: &str) -> Option<&str> {
        self.primitive_field(name)?.as_str()
    }

    pub fn bool_field(&self, name: &str) -> Option<bool> {
        self.primitive_field(name)?.as_bool()
    }

    pub fn int_field(&self, name: &str) -> Option<i64> {
        self.primitive_field(name)?.as_i64()
    }

    pub fn date_field(&self, name: &str) -> Option<DateTime<Utc>> {
        self.primitive_field(name)?.as_date()
    }

    /// Decode an enum field. `None` when absent or when the ordinal is not
    /// one of `E`'s declared values.
    pub fn enum_field<E: OpenEnum>(&self, name: &str) -> Option<E> {
        match self.fields.get(name)? {
            FieldValue::Enum { ordinal, .. } => E::from_ordinal(*ordinal),
            _ => None,
        }
    }

    pub fn set_enum_field<E: OpenEnum>(&mut self, name: impl Into<String>, value: E) {
        self.fields.insert(name.into(), FieldValue::enumeration(value));
    }

    pub fn map_field(&self, name: &str) -> Option<&BTreeMap<String, PrimitiveValue>> {
        match self.fields.get(name)? {
            FieldValue::Map(m) => Some(m),
            _ => None,
        }
    }

    /// A map field with string values, the common `Map<String, String>` case.
    /// Entries of other categories are skipped.
    pub fn string_map_field(&self, name: &str) -> Option<BTreeMap<String, String>> {
        self.map_field(name).map(|m| {
            m.iter()
                .filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_owned())))
                .collect()
        })
    }

    pub fn array_field(&self, name: &str) -> Option<&[PrimitiveValue]> {
        match self.fields.get(name)? {
            FieldValue::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn string_array_field(&self, name: &str) -> Option<Vec<String>> {
        self.array_field(name)
            .map(|a| a.iter().filter_map(|v| v.as_str().map(str::to_owned)).collect())
    }

    pub fn struct_field(&self, name: &str) -> Option<&BeanProperties> {
        match self.fields.get(name)? {
            FieldValue::Struct(s) => Some(s),
            _ => None,
        }
    }
}

// ============================================================================
// Beans
// ============================================================================

/// Typed view of an entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityBean {
    pub type_name: String,
    #[serde(default)]
    pub system_attributes: SystemAttributes,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option", skip_serializing_if = "Option::is_none")]
    pub effective_from_time: Option<DateTime<Utc>>,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option", skip_serializing_if = "Option::is_none")]
    pub effective_to_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub properties: BeanProperties,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub classifications: Vec<ClassificationBean>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra_classifications: BTreeMap<String, Classification>,
}

impl EntityBean {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            system_attributes: SystemAttributes::default(),
            effective_from_time: None,
            effective_to_time: None,
            properties: BeanProperties::new(),
            classifications: Vec::new(),
            extra_classifications: BTreeMap::new(),
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.properties.set_field(name, value);
        self
    }

    pub fn with_guid(mut self, guid: impl Into<String>) -> Self {
        self.system_attributes.guid = Some(guid.into());
        self
    }

    pub fn with_classification(mut self, classification: ClassificationBean) -> Self {
        self.classifications.push(classification);
        self
    }

    pub fn guid(&self) -> Option<&str> {
        self.system_attributes.guid.as_deref()
    }

    pub fn classification(&self, name: &str) -> Option<&ClassificationBean> {
        self.classifications.iter().find(|c| c.name == name)
    }
}

/// Typed view of a relationship.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipBean {
    pub type_name: String,
    #[serde(default)]
    pub system_attributes: SystemAttributes,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option", skip_serializing_if = "Option::is_none")]
    pub effective_from_time: Option<DateTime<Utc>>,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option", skip_serializing_if = "Option::is_none")]
    pub effective_to_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub properties: BeanProperties,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_one: Option<EntityProxy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_two: Option<EntityProxy>,
}

impl RelationshipBean {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            system_attributes: SystemAttributes::default(),
            effective_from_time: None,
            effective_to_time: None,
            properties: BeanProperties::new(),
            end_one: None,
            end_two: None,
        }
    }

    pub fn with_ends(mut self, one: EntityProxy, two: EntityProxy) -> Self {
        self.end_one = Some(one);
        self.end_two = Some(two);
        self
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.properties.set_field(name, value);
        self
    }

    pub fn with_guid(mut self, guid: impl Into<String>) -> Self {
        self.system_attributes.guid = Some(guid.into());
        self
    }
}

/// Typed view of a classification. `name` is the classification type name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationBean {
    pub name: String,
    #[serde(default)]
    pub system_attributes: SystemAttributes,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option", skip_serializing_if = "Option::is_none")]
    pub effective_from_time: Option<DateTime<Utc>>,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option", skip_serializing_if = "Option::is_none")]
    pub effective_to_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub properties: BeanProperties,
}

impl ClassificationBean {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            system_attributes: SystemAttributes::default(),
            effective_from_time: None,
            effective_to_time: None,
            properties: BeanProperties::new(),
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.properties.set_field(name, value);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::StarRating;

    #[test]
    fn test_typed_accessors() {
        let mut props = BeanProperties::new()
            .with_field("review", "fine")
            .with_field("size", 42)
            .with_field("additionalProperties", FieldValue::string_map([("k", "v")]))
            .with_field("zoneMembership", FieldValue::string_array(["a", "b"]));
        props.set_enum_field("stars", StarRating::ThreeStars);

        assert_eq!(props.string_field("review"), Some("fine"));
        assert_eq!(props.int_field("size"), Some(42));
        assert_eq!(props.enum_field::<StarRating>("stars"), Some(StarRating::ThreeStars));
        assert_eq!(props.string_map_field("additionalProperties").unwrap()["k"], "v");
        assert_eq!(props.string_array_field("zoneMembership").unwrap(), ["a", "b"]);
        assert_eq!(props.string_field("size"), None);
    }

    #[test]
    fn test_unknown_ordinal_decodes_to_none() {
        let props = BeanProperties::new()
            .with_field("stars", FieldValue::Enum { ordinal: 7, symbolic_name: "SEVEN".into() });
        assert_eq!(props.enum_field::<StarRating>("stars"), None);
    }

    #[test]
    fn test_system_attributes_header_round_trip() {
        let header = InstanceAuditHeader {
            created_by: Some("alice".into()),
            version: 3,
            status: InstanceStatus::Draft,
            ..Default::default()
        };
        let attrs = SystemAttributes::from_header(Some("g1"), &header);
        assert_eq!(attrs.guid.as_deref(), Some("g1"));
        assert_eq!(attrs.to_header(), header);
        assert_eq!(SystemAttributes::default().to_header().status, InstanceStatus::Active);
    }
}
