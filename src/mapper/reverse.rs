//! Typed bean → repository instance.

use uuid::Uuid;

use super::{qualify, Mapper};
use crate::bean::{BeanProperties, ClassificationBean, EntityBean, FieldValue, RelationshipBean};
use crate::config::UnmodeledPolicy;
use crate::model::{
    ArrayPropertyValue, Classification, ElementProperties, EntityDetail, EnumPropertyValue, InstanceKind,
    MapPropertyValue, PropertyCategory, PropertyValue, Relationship, StructPropertyValue,
};
use crate::registry::TypeRegistry;
use crate::schema::{FieldDef, FieldKind};
use crate::{Error, Result};

impl<R: TypeRegistry> Mapper<R> {
    /// Build an entity from a typed bean.
    ///
    /// The type is resolved through the registry and must be an entity type.
    /// A bean without a GUID is a new element and gets a fresh one.
    pub fn bean_to_entity(&self, bean: &EntityBean) -> Result<EntityDetail> {
        let type_name = bean.type_name.as_str();
        tracing::debug!(type_name, guid = ?bean.system_attributes.guid, "mapping bean to entity");

        let instance_type = self.resolve_type(type_name, InstanceKind::Entity, "Mapper::bean_to_entity")?;
        let schema = self.catalog.require(type_name, InstanceKind::Entity)?;
        let properties = self.write_properties(type_name, "", &schema.fields, &bean.properties)?;

        let mut classifications = bean
            .classifications
            .iter()
            .map(|c| self.bean_to_classification(c))
            .collect::<Result<Vec<_>>>()?;
        if self.config.reemit_extra_attributes {
            for (name, extra) in &bean.extra_classifications {
                if !classifications.iter().any(|c| c.name == *name) {
                    classifications.push(extra.clone());
                }
            }
        }

        Ok(EntityDetail {
            guid: self.guid_for(type_name, bean.system_attributes.guid.as_deref()),
            instance_type,
            header: bean.system_attributes.to_header(),
            properties,
            effective_from_time: bean.effective_from_time,
            effective_to_time: bean.effective_to_time,
            classifications,
        })
    }

    /// Build a relationship from a typed bean. Both ends are required.
    pub fn bean_to_relationship(&self, bean: &RelationshipBean) -> Result<Relationship> {
        let type_name = bean.type_name.as_str();
        tracing::debug!(type_name, guid = ?bean.system_attributes.guid, "mapping bean to relationship");

        let instance_type =
            self.resolve_type(type_name, InstanceKind::Relationship, "Mapper::bean_to_relationship")?;
        let schema = self.catalog.require(type_name, InstanceKind::Relationship)?;
        let guid = self.guid_for(type_name, bean.system_attributes.guid.as_deref());

        let missing = |end: &'static str| Error::MissingRelationshipEnd {
            guid: guid.clone(),
            type_name: type_name.to_owned(),
            end,
        };
        let one = bean.end_one.clone().ok_or_else(|| missing("one"))?;
        let two = bean.end_two.clone().ok_or_else(|| missing("two"))?;

        let properties = self.write_properties(type_name, "", &schema.fields, &bean.properties)?;

        Ok(Relationship {
            guid,
            instance_type,
            header: bean.system_attributes.to_header(),
            properties,
            effective_from_time: bean.effective_from_time,
            effective_to_time: bean.effective_to_time,
            entity_one_proxy: Some(one),
            entity_two_proxy: Some(two),
        })
    }

    pub fn bean_to_classification(&self, bean: &ClassificationBean) -> Result<Classification> {
        let name = bean.name.as_str();
        tracing::debug!(type_name = name, "mapping bean to classification");

        let instance_type =
            self.resolve_type(name, InstanceKind::Classification, "Mapper::bean_to_classification")?;
        let schema = self.catalog.require(name, InstanceKind::Classification)?;
        let properties = self.write_properties(name, "", &schema.fields, &bean.properties)?;

        Ok(Classification {
            name: name.to_owned(),
            instance_type: Some(instance_type),
            header: bean.system_attributes.to_header(),
            properties,
            effective_from_time: bean.effective_from_time,
            effective_to_time: bean.effective_to_time,
        })
    }

    fn guid_for(&self, type_name: &str, guid: Option<&str>) -> String {
        match guid {
            Some(guid) => guid.to_owned(),
            None => {
                let guid = Uuid::new_v4().to_string();
                tracing::debug!(type_name, %guid, "assigned guid to new instance");
                guid
            }
        }
    }

    // ========================================================================
    // Bean properties → property bag
    // ========================================================================

    fn write_properties(
        &self,
        type_name: &str,
        prefix: &str,
        fields: &[FieldDef],
        source: &BeanProperties,
    ) -> Result<ElementProperties> {
        let mut out = ElementProperties::new();
        for (name, value) in &source.fields {
            let property = qualify(prefix, name);
            match fields.iter().find(|f| f.name == *name) {
                Some(def) => {
                    out.insert(name.clone(), self.write_field(type_name, &property, &def.kind, value)?);
                }
                None => match self.config.unmodeled_properties {
                    UnmodeledPolicy::Preserve => {
                        out.insert(name.clone(), untyped_property_value(value)?);
                    }
                    UnmodeledPolicy::Reject => {
                        return Err(Error::UnmodeledProperty { property, type_name: type_name.to_owned() });
                    }
                    UnmodeledPolicy::Ignore => {
                        tracing::warn!(type_name, property = %property, "dropping unmodeled bean field");
                    }
                },
            }
        }
        if self.config.reemit_extra_attributes {
            for (name, extra) in &source.extra_attributes {
                // Modeled fields win over a stale extra of the same name.
                if !out.contains_property(name) {
                    out.insert(name.clone(), extra.clone());
                }
            }
        }
        Ok(out)
    }

    fn write_field(&self, type_name: &str, property: &str, kind: &FieldKind, value: &FieldValue) -> Result<PropertyValue> {
        match (kind, value) {
            (FieldKind::Primitive(category), FieldValue::Primitive(p)) => {
                self.cast(type_name, property, p, *category).map(PropertyValue::primitive)
            }
            (FieldKind::Enum(def), FieldValue::Enum { ordinal, symbolic_name }) => {
                self.check_enum(def, *ordinal, symbolic_name)?;
                let value = EnumPropertyValue::new(*ordinal, symbolic_name.as_str())?;
                Ok(PropertyValue::Enum(value).with_type(None, Some(def.name.clone())))
            }
            (FieldKind::Map(category), FieldValue::Map(entries)) => {
                let mut map = MapPropertyValue::new();
                for (key, entry) in entries {
                    let path = qualify(property, key);
                    map.set_map_value(key.clone(), self.cast(type_name, &path, entry, *category)?);
                }
                Ok(map.into())
            }
            (FieldKind::Array(category), FieldValue::Array(elements)) => {
                let cast = elements
                    .iter()
                    .enumerate()
                    .map(|(i, e)| self.cast(type_name, &qualify(property, &i.to_string()), e, *category))
                    .collect::<Result<Vec<_>>>()?;
                Ok(ArrayPropertyValue::from_values(cast).into())
            }
            (FieldKind::Struct(fields), FieldValue::Struct(nested)) => {
                let attributes = self.write_properties(type_name, property, fields, nested)?;
                Ok(StructPropertyValue::new(attributes).into())
            }
            _ => Err(Error::InvalidPropertyCategory {
                property: property.to_owned(),
                type_name: type_name.to_owned(),
                declared: kind.to_string(),
                actual: field_category(value),
            }),
        }
    }
}

fn field_category(value: &FieldValue) -> PropertyCategory {
    match value {
        FieldValue::Primitive(_) => PropertyCategory::Primitive,
        FieldValue::Enum { .. } => PropertyCategory::Enum,
        FieldValue::Map(_) => PropertyCategory::Map,
        FieldValue::Array(_) => PropertyCategory::Array,
        FieldValue::Struct(_) => PropertyCategory::Struct,
    }
}

/// Property value for a bean field with no schema entry, built from the
/// field's own shape.
fn untyped_property_value(value: &FieldValue) -> Result<PropertyValue> {
    Ok(match value {
        FieldValue::Primitive(p) => PropertyValue::primitive(p.clone()),
        FieldValue::Enum { ordinal, symbolic_name } => {
            PropertyValue::enumeration(*ordinal, symbolic_name.as_str())?
        }
        FieldValue::Map(entries) => MapPropertyValue::from_pairs(entries.clone()).into(),
        FieldValue::Array(elements) => ArrayPropertyValue::from_values(elements.iter().cloned()).into(),
        FieldValue::Struct(nested) => {
            let mut attributes = ElementProperties::new();
            for (name, field) in &nested.fields {
                attributes.insert(name.clone(), untyped_property_value(field)?);
            }
            for (name, extra) in &nested.extra_attributes {
                if !attributes.contains_property(name) {
                    attributes.insert(name.clone(), extra.clone());
                }
            }
            StructPropertyValue::new(attributes).into()
        }
    })
}
