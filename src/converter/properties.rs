//! Typed reads out of a property bag.
//!
//! A [`PropertyReader`] works on a copy of an instance's properties. Each
//! `take_*` call removes the named property and decodes it; whatever is left
//! at the end becomes the element's extended properties. A property stored
//! under a modeled name with the wrong shape is an error, never a silent
//! default.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::model::{
    ArrayPropertyValue, ElementProperties, MapPropertyValue, PrimitiveCategory, PrimitiveValue, PropertyValue,
    Value,
};
use crate::schema::{FieldKind, OpenEnum};
use crate::{Error, Result};

#[derive(Debug, Clone)]
pub struct PropertyReader<'a> {
    type_name: &'a str,
    props: ElementProperties,
}

impl<'a> PropertyReader<'a> {
    /// Reader over a copy of `props`; `type_name` names the instance in errors.
    pub fn new(type_name: &'a str, props: &ElementProperties) -> Self {
        Self { type_name, props: props.clone() }
    }

    pub fn take_string(&mut self, name: &str) -> Result<Option<String>> {
        let Some(value) = self.take_primitive(name, PrimitiveCategory::String)? else {
            return Ok(None);
        };
        match value {
            PrimitiveValue::String(s) => Ok(Some(s)),
            PrimitiveValue::Char(c) => Ok(Some(c.to_string())),
            other => Err(self.cast_error(name, &other, PrimitiveCategory::String)),
        }
    }

    pub fn take_bool(&mut self, name: &str) -> Result<Option<bool>> {
        let Some(value) = self.take_primitive(name, PrimitiveCategory::Boolean)? else {
            return Ok(None);
        };
        value
            .as_bool()
            .map(Some)
            .ok_or_else(|| self.cast_error(name, &value, PrimitiveCategory::Boolean))
    }

    /// A date, or an integral count of milliseconds since the epoch.
    pub fn take_date(&mut self, name: &str) -> Result<Option<DateTime<Utc>>> {
        let Some(value) = self.take_primitive(name, PrimitiveCategory::Date)? else {
            return Ok(None);
        };
        value
            .as_date()
            .or_else(|| value.as_i64().and_then(DateTime::<Utc>::from_timestamp_millis))
            .map(Some)
            .ok_or_else(|| self.cast_error(name, &value, PrimitiveCategory::Date))
    }

    /// An ordinal `E` does not declare is `InvalidEnum` rather than a default.
    pub fn take_enum<E: OpenEnum>(&mut self, name: &str) -> Result<Option<E>> {
        let Some(value) = self.props.remove_property(name) else {
            return Ok(None);
        };
        let PropertyValue::Enum(e) = &value else {
            return Err(self.category_error(name, FieldKind::Enum(E::enum_def()), &value));
        };
        E::from_ordinal(e.ordinal()).map(Some).ok_or_else(|| Error::InvalidEnum {
            enum_name: E::TYPE_NAME.to_owned(),
            ordinal: Some(e.ordinal()),
            symbolic_name: Some(e.symbolic_name().to_owned()),
        })
    }

    /// The stored elements in index order; gaps are skipped.
    pub fn take_string_array(&mut self, name: &str) -> Result<Option<Vec<String>>> {
        let Some(value) = self.props.remove_property(name) else {
            return Ok(None);
        };
        let PropertyValue::Array(array) = &value else {
            return Err(self.category_error(name, FieldKind::Array(PrimitiveCategory::String), &value));
        };
        array
            .present()
            .map(|(index, element)| self.string_element(&format!("{name}.{index}"), element))
            .collect::<Result<Vec<_>>>()
            .map(Some)
    }

    pub fn take_string_map(&mut self, name: &str) -> Result<Option<BTreeMap<String, String>>> {
        let Some(value) = self.props.remove_property(name) else {
            return Ok(None);
        };
        let PropertyValue::Map(map) = &value else {
            return Err(self.category_error(name, FieldKind::Map(PrimitiveCategory::String), &value));
        };
        map.map_values()
            .iter()
            .map(|(key, entry)| Ok((key.clone(), self.string_element(&format!("{name}.{key}"), entry)?)))
            .collect::<Result<BTreeMap<_, _>>>()
            .map(Some)
    }

    /// Whatever was not taken, as plain data. `None` when nothing is left.
    pub fn into_extended(self) -> Option<BTreeMap<String, Value>> {
        if self.props.is_empty() {
            return None;
        }
        Some(self.props.into_iter().map(|(k, v)| (k, v.value_as_object())).collect())
    }

    fn take_primitive(&mut self, name: &str, category: PrimitiveCategory) -> Result<Option<PrimitiveValue>> {
        match self.props.remove_property(name) {
            None => Ok(None),
            Some(PropertyValue::Primitive(p)) => Ok(Some(p.primitive_value().clone())),
            Some(other) => Err(self.category_error(name, FieldKind::Primitive(category), &other)),
        }
    }

    fn string_element(&self, property: &str, element: &PropertyValue) -> Result<String> {
        match element {
            PropertyValue::Primitive(p) => match p.primitive_value() {
                PrimitiveValue::String(s) => Ok(s.clone()),
                other => Err(self.cast_error(property, other, PrimitiveCategory::String)),
            },
            other => Err(self.category_error(property, FieldKind::Primitive(PrimitiveCategory::String), other)),
        }
    }

    fn category_error(&self, property: &str, declared: FieldKind, actual: &PropertyValue) -> Error {
        tracing::debug!(type_name = self.type_name, property, %declared, actual = %actual.category(), "property has the wrong category");
        Error::InvalidPropertyCategory {
            property: property.to_owned(),
            type_name: self.type_name.to_owned(),
            declared: declared.to_string(),
            actual: actual.category(),
        }
    }

    fn cast_error(&self, property: &str, value: &PrimitiveValue, to: PrimitiveCategory) -> Error {
        Error::InvalidPrimitiveCast {
            property: property.to_owned(),
            type_name: self.type_name.to_owned(),
            from: value.category(),
            to,
        }
    }
}

/// Read a boolean without removing it. Absent is `None`; any other shape is an error.
pub fn read_bool(type_name: &str, props: &ElementProperties, name: &str) -> Result<Option<bool>> {
    match props.get_property_value(name) {
        None => Ok(None),
        Some(PropertyValue::Primitive(p)) => match p.primitive_value() {
            PrimitiveValue::Boolean(b) => Ok(Some(*b)),
            other => Err(Error::InvalidPrimitiveCast {
                property: name.to_owned(),
                type_name: type_name.to_owned(),
                from: other.category(),
                to: PrimitiveCategory::Boolean,
            }),
        },
        Some(other) => Err(Error::InvalidPropertyCategory {
            property: name.to_owned(),
            type_name: type_name.to_owned(),
            declared: FieldKind::Primitive(PrimitiveCategory::Boolean).to_string(),
            actual: other.category(),
        }),
    }
}

/// Rebuild a property value from plain data. `Null` has no property form.
pub fn property_value_from(value: &Value) -> Option<PropertyValue> {
    Some(match value {
        Value::Null => return None,
        Value::Bool(b) => PropertyValue::from(*b),
        Value::Int(i) => PropertyValue::from(*i),
        Value::Float(f) => PropertyValue::from(*f),
        Value::String(s) => PropertyValue::from(s.as_str()),
        Value::BigInt(b) => PropertyValue::primitive(PrimitiveValue::BigInteger(b.clone())),
        Value::Decimal(d) => PropertyValue::primitive(PrimitiveValue::BigDecimal(d.clone())),
        Value::Date(d) => PropertyValue::from(*d),
        Value::List(items) => {
            let mut array = ArrayPropertyValue::new(items.len());
            for (index, item) in items.iter().enumerate() {
                if let Some(element) = property_value_from(item) {
                    array.set_array_value(index, element).ok()?;
                }
            }
            array.into()
        }
        Value::Map(entries) => {
            let mut map = MapPropertyValue::new();
            for (k, v) in entries {
                if let Some(element) = property_value_from(v) {
                    map.set_map_value(k.clone(), element);
                }
            }
            map.into()
        }
    })
}

/// Put extended properties back into a bag without overwriting modeled ones.
pub fn restore_extended(props: &mut ElementProperties, extended: Option<&BTreeMap<String, Value>>) {
    for (name, value) in extended.into_iter().flatten() {
        if props.contains_property(name) {
            continue;
        }
        if let Some(value) = property_value_from(value) {
            props.insert(name.clone(), value);
        }
    }
}
