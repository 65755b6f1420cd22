//! Repository instance → typed bean.

use std::collections::BTreeMap;

use super::{qualify, Mapper};
use crate::bean::{BeanProperties, ClassificationBean, EntityBean, FieldValue, RelationshipBean, SystemAttributes};
use crate::config::UnmodeledPolicy;
use crate::model::{
    Classification, ElementProperties, EntityDetail, InstanceKind, PrimitiveCategory, PrimitiveValue,
    PropertyValue, Relationship,
};
use crate::registry::TypeRegistry;
use crate::schema::{EnumDef, FieldDef, FieldKind};
use crate::{Error, Result};

impl<R: TypeRegistry> Mapper<R> {
    /// Translate an entity and its classifications into a typed bean.
    pub fn entity_to_bean(&self, entity: &EntityDetail) -> Result<EntityBean> {
        let type_name = entity.type_name();
        tracing::debug!(type_name, guid = %entity.guid, "mapping entity to bean");

        let schema = self.catalog.require(type_name, InstanceKind::Entity)?;
        let properties = self.read_properties(type_name, "", &schema.fields, &entity.properties)?;

        let mut classifications = Vec::new();
        let mut extra_classifications = BTreeMap::new();
        for classification in &entity.classifications {
            if self.catalog.classification(&classification.name).is_some() {
                classifications.push(self.classification_to_bean(classification)?);
                continue;
            }
            match self.config.unmodeled_classifications {
                UnmodeledPolicy::Preserve => {
                    tracing::trace!(type_name, classification = %classification.name, "preserving unmodeled classification");
                    extra_classifications.insert(classification.name.clone(), classification.clone());
                }
                UnmodeledPolicy::Reject => {
                    return Err(Error::UnmodeledClassification {
                        classification: classification.name.clone(),
                        type_name: type_name.to_owned(),
                    });
                }
                UnmodeledPolicy::Ignore => {
                    tracing::warn!(type_name, classification = %classification.name, "dropping unmodeled classification");
                }
            }
        }

        Ok(EntityBean {
            type_name: type_name.to_owned(),
            system_attributes: SystemAttributes::from_header(Some(&entity.guid), &entity.header),
            effective_from_time: entity.effective_from_time,
            effective_to_time: entity.effective_to_time,
            properties,
            classifications,
            extra_classifications,
        })
    }

    /// Translate a relationship into a typed bean. Ends are copied as found.
    pub fn relationship_to_bean(&self, relationship: &Relationship) -> Result<RelationshipBean> {
        let type_name = relationship.type_name();
        tracing::debug!(type_name, guid = %relationship.guid, "mapping relationship to bean");

        let schema = self.catalog.require(type_name, InstanceKind::Relationship)?;
        let properties = self.read_properties(type_name, "", &schema.fields, &relationship.properties)?;

        Ok(RelationshipBean {
            type_name: type_name.to_owned(),
            system_attributes: SystemAttributes::from_header(Some(&relationship.guid), &relationship.header),
            effective_from_time: relationship.effective_from_time,
            effective_to_time: relationship.effective_to_time,
            properties,
            end_one: relationship.entity_one_proxy.clone(),
            end_two: relationship.entity_two_proxy.clone(),
        })
    }

    pub fn classification_to_bean(&self, classification: &Classification) -> Result<ClassificationBean> {
        let name = classification.name.as_str();
        tracing::debug!(type_name = name, "mapping classification to bean");

        let schema = self.catalog.require(name, InstanceKind::Classification)?;
        let properties = self.read_properties(name, "", &schema.fields, &classification.properties)?;

        Ok(ClassificationBean {
            name: name.to_owned(),
            system_attributes: SystemAttributes::from_header(None, &classification.header),
            effective_from_time: classification.effective_from_time,
            effective_to_time: classification.effective_to_time,
            properties,
        })
    }

    // ========================================================================
    // Property bag → bean properties
    // ========================================================================

    fn read_properties(
        &self,
        type_name: &str,
        prefix: &str,
        fields: &[FieldDef],
        source: &ElementProperties,
    ) -> Result<BeanProperties> {
        let mut out = BeanProperties::new();
        for (name, value) in source {
            match fields.iter().find(|f| f.name == *name) {
                Some(def) => {
                    let field = self.read_field(type_name, &qualify(prefix, name), &def.kind, value)?;
                    out.fields.insert(name.clone(), field);
                }
                None => {
                    let property = qualify(prefix, name);
                    self.divert_unmodeled(type_name, name, &property, value, &mut out.extra_attributes)?;
                }
            }
        }
        Ok(out)
    }

    fn read_field(&self, type_name: &str, property: &str, kind: &FieldKind, value: &PropertyValue) -> Result<FieldValue> {
        match (kind, value) {
            (FieldKind::Primitive(category), PropertyValue::Primitive(p)) => {
                self.cast(type_name, property, p.primitive_value(), *category).map(FieldValue::Primitive)
            }
            (FieldKind::Enum(def), PropertyValue::Enum(e)) => {
                self.check_enum(def, e.ordinal(), e.symbolic_name())?;
                Ok(FieldValue::Enum { ordinal: e.ordinal(), symbolic_name: e.symbolic_name().to_owned() })
            }
            (FieldKind::Map(category), PropertyValue::Map(map)) => {
                let mut entries = BTreeMap::new();
                for (key, entry) in map.map_values() {
                    let path = qualify(property, key);
                    let scalar = self.expect_primitive(type_name, &path, *category, entry)?;
                    entries.insert(key.clone(), scalar);
                }
                Ok(FieldValue::Map(entries))
            }
            (FieldKind::Array(category), PropertyValue::Array(array)) => {
                if let Some(missing) = array.first_gap() {
                    return Err(Error::IncompleteArray {
                        property: property.to_owned(),
                        type_name: type_name.to_owned(),
                        count: array.array_count(),
                        missing,
                    });
                }
                // No gap, so the stored elements are exactly 0..array_count.
                let mut elements = Vec::with_capacity(array.array_values().property_count());
                for (index, element) in array.present() {
                    let path = qualify(property, &index.to_string());
                    elements.push(self.expect_primitive(type_name, &path, *category, element)?);
                }
                Ok(FieldValue::Array(elements))
            }
            (FieldKind::Struct(fields), PropertyValue::Struct(s)) => {
                let nested = self.read_properties(type_name, property, fields, s.attributes())?;
                Ok(FieldValue::Struct(Box::new(nested)))
            }
            _ => Err(Error::InvalidPropertyCategory {
                property: property.to_owned(),
                type_name: type_name.to_owned(),
                declared: kind.to_string(),
                actual: value.category(),
            }),
        }
    }

    fn expect_primitive(
        &self,
        type_name: &str,
        property: &str,
        category: PrimitiveCategory,
        value: &PropertyValue,
    ) -> Result<PrimitiveValue> {
        match value {
            PropertyValue::Primitive(p) => self.cast(type_name, property, p.primitive_value(), category),
            other => Err(Error::InvalidPropertyCategory {
                property: property.to_owned(),
                type_name: type_name.to_owned(),
                declared: FieldKind::Primitive(category).to_string(),
                actual: other.category(),
            }),
        }
    }

    /// Convert a scalar to its field's declared category.
    pub(super) fn cast(
        &self,
        type_name: &str,
        property: &str,
        value: &PrimitiveValue,
        target: PrimitiveCategory,
    ) -> Result<PrimitiveValue> {
        if value.category() == target {
            return Ok(value.clone());
        }
        let cast = if self.config.allow_narrowing_casts { value.cast_to(target) } else { None };
        cast.ok_or_else(|| Error::InvalidPrimitiveCast {
            property: property.to_owned(),
            type_name: type_name.to_owned(),
            from: value.category(),
            to: target,
        })
    }

    /// The ordinal must be declared; under strict names the symbolic name must match it.
    pub(super) fn check_enum(&self, def: &EnumDef, ordinal: i32, symbolic_name: &str) -> Result<()> {
        let invalid = || Error::InvalidEnum {
            enum_name: def.name.clone(),
            ordinal: Some(ordinal),
            symbolic_name: Some(symbolic_name.to_owned()),
        };
        let element = def.by_ordinal(ordinal).ok_or_else(invalid)?;
        if self.config.strict_enum_names && element.symbolic_name != symbolic_name {
            return Err(invalid());
        }
        Ok(())
    }
}
