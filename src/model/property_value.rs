//! Property values: the tagged union stored in every property bag.
//!
//! Each variant carries only the fields its category needs, plus the optional
//! type GUID / type name of the attribute type it was created for. Equality and
//! hashing cover category and payload; the type GUID and name are descriptive.

use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ElementProperties, PrimitiveValue, Value};
use crate::{Error, Result};

/// Category tag of a property value; fixed when the value is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PropertyCategory {
    Primitive,
    Enum,
    Struct,
    Map,
    Array,
}

impl fmt::Display for PropertyCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PropertyCategory::Primitive => "PRIMITIVE",
            PropertyCategory::Enum => "ENUM",
            PropertyCategory::Struct => "STRUCT",
            PropertyCategory::Map => "MAP",
            PropertyCategory::Array => "ARRAY",
        })
    }
}

/// A property value.
#[derive(Debug, Clone, PartialEq, Hash, Serialize, Deserialize)]
#[serde(tag = "class")]
pub enum PropertyValue {
    #[serde(rename = "PrimitivePropertyValue")]
    Primitive(PrimitivePropertyValue),
    #[serde(rename = "EnumPropertyValue")]
    Enum(EnumPropertyValue),
    #[serde(rename = "StructPropertyValue")]
    Struct(StructPropertyValue),
    #[serde(rename = "MapPropertyValue")]
    Map(MapPropertyValue),
    #[serde(rename = "ArrayPropertyValue")]
    Array(ArrayPropertyValue),
}

// ============================================================================
// Variants
// ============================================================================

/// A single scalar.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrimitivePropertyValue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_guid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    pub primitive_value: PrimitiveValue,
}

/// An enumeration value: ordinal and symbolic name, always together.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "EnumPropertyValueRepr")]
pub struct EnumPropertyValue {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_guid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    ordinal: i32,
    symbolic_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A property bag nested inside a property value, keyed by field name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructPropertyValue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_guid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    #[serde(default)]
    attributes: ElementProperties,
}

/// A map keyed by arbitrary map keys.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapPropertyValue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_guid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    #[serde(default)]
    map_values: ElementProperties,
}

/// A sparse array: a declared element count plus elements keyed "0".."count-1".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "ArrayPropertyValueRepr")]
pub struct ArrayPropertyValue {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_guid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    array_count: usize,
    array_values: ElementProperties,
}

// ============================================================================
// PropertyValue
// ============================================================================

impl PropertyValue {
    pub fn primitive(value: impl Into<PrimitiveValue>) -> Self {
        PropertyValue::Primitive(PrimitivePropertyValue::new(value))
    }

    pub fn enumeration(ordinal: i32, symbolic_name: impl Into<String>) -> Result<Self> {
        EnumPropertyValue::new(ordinal, symbolic_name).map(PropertyValue::Enum)
    }

    pub fn structure(attributes: ElementProperties) -> Self {
        PropertyValue::Struct(StructPropertyValue::new(attributes))
    }

    pub fn map(map_values: ElementProperties) -> Self {
        PropertyValue::Map(MapPropertyValue::from_properties(map_values))
    }

    pub fn category(&self) -> PropertyCategory {
        match self {
            PropertyValue::Primitive(_) => PropertyCategory::Primitive,
            PropertyValue::Enum(_) => PropertyCategory::Enum,
            PropertyValue::Struct(_) => PropertyCategory::Struct,
            PropertyValue::Map(_) => PropertyCategory::Map,
            PropertyValue::Array(_) => PropertyCategory::Array,
        }
    }

    pub fn type_guid(&self) -> Option<&str> {
        match self {
            PropertyValue::Primitive(v) => v.type_guid.as_deref(),
            PropertyValue::Enum(v) => v.type_guid.as_deref(),
            PropertyValue::Struct(v) => v.type_guid.as_deref(),
            PropertyValue::Map(v) => v.type_guid.as_deref(),
            PropertyValue::Array(v) => v.type_guid.as_deref(),
        }
    }

    pub fn type_name(&self) -> Option<&str> {
        match self {
            PropertyValue::Primitive(v) => v.type_name.as_deref(),
            PropertyValue::Enum(v) => v.type_name.as_deref(),
            PropertyValue::Struct(v) => v.type_name.as_deref(),
            PropertyValue::Map(v) => v.type_name.as_deref(),
            PropertyValue::Array(v) => v.type_name.as_deref(),
        }
    }

    /// Attach the attribute type this value was created for.
    pub fn with_type(mut self, type_guid: Option<String>, type_name: Option<String>) -> Self {
        let (guid, name) = match &mut self {
            PropertyValue::Primitive(v) => (&mut v.type_guid, &mut v.type_name),
            PropertyValue::Enum(v) => (&mut v.type_guid, &mut v.type_name),
            PropertyValue::Struct(v) => (&mut v.type_guid, &mut v.type_name),
            PropertyValue::Map(v) => (&mut v.type_guid, &mut v.type_name),
            PropertyValue::Array(v) => (&mut v.type_guid, &mut v.type_name),
        };
        *guid = type_guid;
        *name = type_name;
        self
    }

    /// Plain-data representation for comparison and serialization.
    ///
    /// Containers unwrap recursively: structs and maps become `Value::Map`,
    /// arrays become a `Value::List` of the elements actually present, in index
    /// order, and enums become their symbolic name. The declared `array_count`
    /// plays no part, so a large count with few elements stays cheap.
    pub fn value_as_object(&self) -> Value {
        match self {
            PropertyValue::Primitive(v) => v.primitive_value.to_value(),
            PropertyValue::Enum(v) => Value::String(v.symbolic_name.clone()),
            PropertyValue::Struct(v) => v.attributes.to_value(),
            PropertyValue::Map(v) => v.map_values.to_value(),
            PropertyValue::Array(v) => {
                Value::List(v.present().map(|(_, e)| e.value_as_object()).collect())
            }
        }
    }

    /// Human-readable rendering for diagnostics. Not for round-tripping.
    pub fn value_as_string(&self) -> String {
        self.to_string()
    }

    pub fn as_primitive(&self) -> Option<&PrimitiveValue> {
        match self {
            PropertyValue::Primitive(v) => Some(&v.primitive_value),
            _ => None,
        }
    }

    pub fn as_enum(&self) -> Option<&EnumPropertyValue> {
        match self {
            PropertyValue::Enum(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_struct(&self) -> Option<&StructPropertyValue> {
        match self {
            PropertyValue::Struct(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&MapPropertyValue> {
        match self {
            PropertyValue::Map(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&ArrayPropertyValue> {
        match self {
            PropertyValue::Array(v) => Some(v),
            _ => None,
        }
    }

    /// Shorthand for a string primitive's payload.
    pub fn as_str(&self) -> Option<&str> {
        self.as_primitive().and_then(PrimitiveValue::as_str)
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Primitive(v) => write!(f, "{}", v.primitive_value),
            PropertyValue::Enum(v) => f.write_str(&v.symbolic_name),
            PropertyValue::Struct(v) => write!(f, "{}", v.attributes),
            PropertyValue::Map(v) => write!(f, "{}", v.map_values),
            PropertyValue::Array(v) => {
                write!(f, "[")?;
                for (i, (_, element)) in v.present().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{element}")?;
                }
                write!(f, "]")
            }
        }
    }
}

// ============================================================================
// Conversions (From impls)
// ============================================================================

impl From<PrimitiveValue> for PropertyValue {
    fn from(v: PrimitiveValue) -> Self { PropertyValue::primitive(v) }
}
impl From<PrimitivePropertyValue> for PropertyValue {
    fn from(v: PrimitivePropertyValue) -> Self { PropertyValue::Primitive(v) }
}
impl From<EnumPropertyValue> for PropertyValue {
    fn from(v: EnumPropertyValue) -> Self { PropertyValue::Enum(v) }
}
impl From<StructPropertyValue> for PropertyValue {
    fn from(v: StructPropertyValue) -> Self { PropertyValue::Struct(v) }
}
impl From<MapPropertyValue> for PropertyValue {
    fn from(v: MapPropertyValue) -> Self { PropertyValue::Map(v) }
}
impl From<ArrayPropertyValue> for PropertyValue {
    fn from(v: ArrayPropertyValue) -> Self { PropertyValue::Array(v) }
}
impl From<bool> for PropertyValue { fn from(v: bool) -> Self { PropertyValue::primitive(v) } }
impl From<i32> for PropertyValue { fn from(v: i32) -> Self { PropertyValue::primitive(v) } }
impl From<i64> for PropertyValue { fn from(v: i64) -> Self { PropertyValue::primitive(v) } }
impl From<f64> for PropertyValue { fn from(v: f64) -> Self { PropertyValue::primitive(v) } }
impl From<String> for PropertyValue { fn from(v: String) -> Self { PropertyValue::primitive(v) } }
impl From<&str> for PropertyValue { fn from(v: &str) -> Self { PropertyValue::primitive(v) } }
impl From<DateTime<Utc>> for PropertyValue {
    fn from(v: DateTime<Utc>) -> Self { PropertyValue::primitive(v) }
}

// ============================================================================
// PrimitivePropertyValue
// ============================================================================

impl PrimitivePropertyValue {
    pub fn new(value: impl Into<PrimitiveValue>) -> Self {
        Self { type_guid: None, type_name: None, primitive_value: value.into() }
    }

    pub fn primitive_value(&self) -> &PrimitiveValue {
        &self.primitive_value
    }
}

impl PartialEq for PrimitivePropertyValue {
    fn eq(&self, other: &Self) -> bool {
        self.primitive_value == other.primitive_value
    }
}

impl Hash for PrimitivePropertyValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.primitive_value.hash(state);
    }
}

// ============================================================================
// EnumPropertyValue
// ============================================================================

impl EnumPropertyValue {
    /// Fails with `InvalidEnum` when the symbolic name is blank.
    pub fn new(ordinal: i32, symbolic_name: impl Into<String>) -> Result<Self> {
        Self::from_parts(Some(ordinal), Some(symbolic_name.into()))
    }

    /// Both halves must be present; an ordinal without a name (or the reverse)
    /// is rejected rather than stored half-formed.
    pub fn from_parts(ordinal: Option<i32>, symbolic_name: Option<String>) -> Result<Self> {
        match (ordinal, symbolic_name) {
            (Some(ordinal), Some(symbolic_name)) if !symbolic_name.trim().is_empty() => Ok(Self {
                type_guid: None,
                type_name: None,
                ordinal,
                symbolic_name,
                description: None,
            }),
            (ordinal, symbolic_name) => Err(Error::InvalidEnum {
                enum_name: "EnumPropertyValue".to_owned(),
                ordinal,
                symbolic_name,
            }),
        }
    }

    pub fn ordinal(&self) -> i32 { self.ordinal }
    pub fn symbolic_name(&self) -> &str { &self.symbolic_name }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl PartialEq for EnumPropertyValue {
    fn eq(&self, other: &Self) -> bool {
        self.ordinal == other.ordinal && self.symbolic_name == other.symbolic_name
    }
}

impl Hash for EnumPropertyValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.ordinal.hash(state);
        self.symbolic_name.hash(state);
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct EnumPropertyValueRepr {
    type_guid: Option<String>,
    type_name: Option<String>,
    ordinal: Option<i32>,
    symbolic_name: Option<String>,
    description: Option<String>,
}

impl TryFrom<EnumPropertyValueRepr> for EnumPropertyValue {
    type Error = Error;

    fn try_from(repr: EnumPropertyValueRepr) -> Result<Self> {
        let mut value = EnumPropertyValue::from_parts(repr.ordinal, repr.symbolic_name)?;
        value.type_guid = repr.type_guid;
        value.type_name = repr.type_name;
        value.description = repr.description;
        Ok(value)
    }
}

// ============================================================================
// StructPropertyValue
// ============================================================================

impl StructPropertyValue {
    pub fn new(attributes: ElementProperties) -> Self {
        Self { type_guid: None, type_name: None, attributes }
    }

    pub fn attributes(&self) -> &ElementProperties { &self.attributes }

    pub fn attribute(&self, name: &str) -> Option<&PropertyValue> {
        self.attributes.get_property_value(name)
    }

    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<PropertyValue>) {
        self.attributes.insert(name, value);
    }
}

impl PartialEq for StructPropertyValue {
    fn eq(&self, other: &Self) -> bool { self.attributes == other.attributes }
}

impl Hash for StructPropertyValue {
    fn hash<H: Hasher>(&self, state: &mut H) { self.attributes.hash(state); }
}

// ============================================================================
// MapPropertyValue
// ============================================================================

impl MapPropertyValue {
    pub fn new() -> Self { Self::default() }

    pub fn from_properties(map_values: ElementProperties) -> Self {
        Self { type_guid: None, type_name: None, map_values }
    }

    /// Build a map whose values are all primitives.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<PrimitiveValue>,
    {
        let mut map = Self::new();
        for (k, v) in pairs {
            map.set_map_value(k, PropertyValue::primitive(v));
        }
        map
    }

    pub fn map_values(&self) -> &ElementProperties { &self.map_values }

    pub fn map_value(&self, key: &str) -> Option<&PropertyValue> {
        self.map_values.get_property_value(key)
    }

    pub fn set_map_value(&mut self, key: impl Into<String>, value: impl Into<PropertyValue>) {
        self.map_values.insert(key, value);
    }

    pub fn remove_map_value(&mut self, key: &str) -> Option<PropertyValue> {
        self.map_values.remove_property(key)
    }

    pub fn map_element_count(&self) -> usize { self.map_values.property_count() }
}

impl PartialEq for MapPropertyValue {
    fn eq(&self, other: &Self) -> bool { self.map_values == other.map_values }
}

impl Hash for MapPropertyValue {
    fn hash<H: Hasher>(&self, state: &mut H) { self.map_values.hash(state); }
}

// ============================================================================
// ArrayPropertyValue
// ============================================================================

impl ArrayPropertyValue {
    const VALUE_TYPE: &'static str = "ArrayPropertyValue";

    /// An array of `array_count` slots, all empty.
    pub fn new(array_count: usize) -> Self {
        Self { array_count, ..Self::default() }
    }

    /// A dense array holding `values` in order.
    pub fn from_values<V: Into<PropertyValue>>(values: impl IntoIterator<Item = V>) -> Self {
        let mut array = Self::default();
        for (index, value) in values.into_iter().enumerate() {
            array.array_count = index + 1;
            array.array_values.insert(index.to_string(), value);
        }
        array
    }

    pub fn array_count(&self) -> usize { self.array_count }

    /// Resize the array. Elements at indices `>= array_count` are dropped.
    pub fn set_array_count(&mut self, array_count: usize) {
        let stale: Vec<String> = self
            .array_values
            .property_names()
            .filter(|key| key.parse::<usize>().map_or(true, |index| index >= array_count))
            .map(str::to_owned)
            .collect();
        for key in stale {
            self.array_values.remove_property(&key);
        }
        self.array_count = array_count;
    }

    /// Store `value` at `index`.
    ///
    /// Fails with `ArrayOutOfBounds` (carrying the index and declared count)
    /// unless `index < array_count`; state is left untouched on failure.
    pub fn set_array_value(&mut self, index: usize, value: impl Into<PropertyValue>) -> Result<()> {
        if index >= self.array_count {
            return Err(Error::ArrayOutOfBounds {
                value_type: Self::VALUE_TYPE,
                index,
                count: self.array_count,
            });
        }
        self.array_values.insert(index.to_string(), value);
        Ok(())
    }

    pub fn remove_array_value(&mut self, index: usize) -> Option<PropertyValue> {
        self.array_values.remove_property(&index.to_string())
    }

    pub fn array_value(&self, index: usize) -> Option<&PropertyValue> {
        self.array_values.get_property_value(&index.to_string())
    }

    pub fn array_values(&self) -> &ElementProperties { &self.array_values }

    /// Stored elements with their indices, in index order.
    ///
    /// Walks what is stored, never the declared range: `array_count` comes
    /// from the caller and may be far larger than the elements present.
    pub fn present(&self) -> impl Iterator<Item = (usize, &PropertyValue)> + '_ {
        let mut indexed: Vec<(usize, &PropertyValue)> = self
            .array_values
            .iter()
            .filter_map(|(key, value)| key.parse::<usize>().ok().map(|index| (index, value)))
            .collect();
        indexed.sort_unstable_by_key(|(index, _)| *index);
        indexed.into_iter()
    }

    /// Index of the first empty slot, if any.
    pub fn first_gap(&self) -> Option<usize> {
        let mut expected = 0;
        for (index, _) in self.present() {
            if index != expected {
                return Some(expected);
            }
            expected += 1;
        }
        (expected < self.array_count).then_some(expected)
    }
}

impl PartialEq for ArrayPropertyValue {
    fn eq(&self, other: &Self) -> bool {
        self.array_count == other.array_count && self.array_values == other.array_values
    }
}

impl Hash for ArrayPropertyValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.array_count.hash(state);
        self.array_values.hash(state);
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ArrayPropertyValueRepr {
    type_guid: Option<String>,
    type_name: Option<String>,
    array_count: usize,
    #[serde(default)]
    array_values: ElementProperties,
}

impl TryFrom<ArrayPropertyValueRepr> for ArrayPropertyValue {
    type Error = Error;

    fn try_from(repr: ArrayPropertyValueRepr) -> Result<Self> {
        let mut array = ArrayPropertyValue::new(repr.array_count);
        array.type_guid = repr.type_guid;
        array.type_name = repr.type_name;
        for (key, value) in repr.array_values {
            let index = key.parse::<usize>().map_err(|_| Error::ArrayOutOfBounds {
                value_type: Self::VALUE_TYPE,
                index: usize::MAX,
                count: repr.array_count,
            })?;
            array.set_array_value(index, value)?;
        }
        Ok(array)
    }
}
