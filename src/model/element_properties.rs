//! ElementProperties: the property bag carried by every instance.

use std::collections::BTreeMap;
use std::collections::btree_map;
use std::fmt;
use std::iter::FusedIterator;

use serde::{Deserialize, Serialize};

use super::{PropertyValue, Value};
use crate::{Error, Result};

/// A map of property name to property value.
///
/// Names are unique and non-null, values are never null (setting a null value
/// removes the name). Backed by a `BTreeMap`, so equality and hashing do not
/// depend on insertion order and iteration is sorted by name.
#[derive(Debug, Clone, Default, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementProperties {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    instance_properties: BTreeMap<String, PropertyValue>,
}

impl ElementProperties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: add or replace a property.
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Set or clear a property.
    ///
    /// A missing name fails with `NullPropertyName` and leaves the bag unchanged,
    /// whatever the value. A missing value removes `name` if present.
    pub fn set_property(&mut self, name: Option<&str>, value: Option<PropertyValue>) -> Result<()> {
        self.set_property_from("ElementProperties::set_property", name, value)
    }

    /// [`set_property`](Self::set_property) on behalf of `context`, which is
    /// reported in the `NullPropertyName` error.
    pub fn set_property_from(
        &mut self,
        context: &'static str,
        name: Option<&str>,
        value: Option<PropertyValue>,
    ) -> Result<()> {
        let Some(name) = name else {
            return Err(Error::NullPropertyName { context });
        };
        match value {
            Some(value) => { self.instance_properties.insert(name.to_owned(), value); }
            None => { self.instance_properties.remove(name); }
        }
        Ok(())
    }

    /// Infallible insert for callers that already hold an owned name.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<PropertyValue>) -> Option<PropertyValue> {
        self.instance_properties.insert(name.into(), value.into())
    }

    pub fn remove_property(&mut self, name: &str) -> Option<PropertyValue> {
        self.instance_properties.remove(name)
    }

    pub fn get_property_value(&self, name: &str) -> Option<&PropertyValue> {
        self.instance_properties.get(name)
    }

    pub fn contains_property(&self, name: &str) -> bool {
        self.instance_properties.contains_key(name)
    }

    /// Lazy, one-shot iterator over the property names.
    pub fn property_names(&self) -> PropertyNames<'_> {
        PropertyNames { inner: self.instance_properties.keys() }
    }

    pub fn property_count(&self) -> usize {
        self.instance_properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instance_properties.is_empty()
    }

    /// The whole map, or `None` when it holds no properties.
    pub fn instance_properties(&self) -> Option<&BTreeMap<String, PropertyValue>> {
        if self.instance_properties.is_empty() {
            None
        } else {
            Some(&self.instance_properties)
        }
    }

    /// Replace the whole map. `None` clears it.
    pub fn set_instance_properties(&mut self, properties: Option<BTreeMap<String, PropertyValue>>) {
        self.instance_properties = properties.unwrap_or_default();
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, PropertyValue> {
        self.instance_properties.iter()
    }

    /// Plain-data view: every value unwrapped through `value_as_object`.
    pub fn to_value(&self) -> Value {
        Value::Map(
            self.instance_properties
                .iter()
                .map(|(k, v)| (k.clone(), v.value_as_object()))
                .collect(),
        )
    }
}

// ============================================================================
// PropertyNames
// ============================================================================

/// Iterator returned by [`ElementProperties::property_names`]. One pass only;
/// call `property_names` again for a fresh sequence.
///
/// ```compile_fail
/// let props = open_metadata_types::ElementProperties::new().with_property("a", 1);
/// let names = props.property_names();
/// let again = names.clone();
/// ```
#[derive(Debug)]
pub struct PropertyNames<'a> {
    inner: btree_map::Keys<'a, String, PropertyValue>,
}

impl<'a> Iterator for PropertyNames<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        self.inner.next().map(String::as_str)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for PropertyNames<'_> {}
impl FusedIterator for PropertyNames<'_> {}

// ============================================================================
// Collection traits
// ============================================================================

impl<K: Into<String>, V: Into<PropertyValue>> FromIterator<(K, V)> for ElementProperties {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut props = ElementProperties::new();
        props.extend(iter);
        props
    }
}

impl<K: Into<String>, V: Into<PropertyValue>> Extend<(K, V)> for ElementProperties {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl IntoIterator for ElementProperties {
    type Item = (String, PropertyValue);
    type IntoIter = btree_map::IntoIter<String, PropertyValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.instance_properties.into_iter()
    }
}

impl<'a> IntoIterator for &'a ElementProperties {
    type Item = (&'a String, &'a PropertyValue);
    type IntoIter = btree_map::Iter<'a, String, PropertyValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.instance_properties.iter()
    }
}

impl fmt::Display for ElementProperties {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (k, v)) in self.instance_properties.iter().enumerate() {
            if i > 0 { write!(f, ", ")?; }
            write!(f, "{k}: {v}")?;
        }
        write!(f, "}}")
    }
}
