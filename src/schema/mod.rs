//! # Bean Schemas
//!
//! Declarative description of each typed bean: which property names it
//! models and what category and scalar type each one has. One table of
//! these replaces a generated mapper per metadata type.
//!
//! ```text
//! BeanSchema "Rating" (entity)
//!   stars  -> ENUM<StarRating>
//!   review -> PRIMITIVE<string>
//! ```

mod builtin;
mod enums;

use std::fmt;

use hashbrown::{HashMap, HashSet};
use serde::{Deserialize, Serialize};

use crate::model::{InstanceKind, PrimitiveCategory, PropertyCategory};
use crate::{Error, Result};

pub use enums::{AnnotationStatus, OpenEnum, StarRating};

// ============================================================================
// Field definitions
// ============================================================================

/// Declared shape of a modeled field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "category", content = "of", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FieldKind {
    /// A single scalar of the given category.
    Primitive(PrimitiveCategory),
    /// One element of the given enum.
    Enum(EnumDef),
    /// A map from string keys to scalars of the given category.
    Map(PrimitiveCategory),
    /// A dense list of scalars of the given category.
    Array(PrimitiveCategory),
    /// A nested bag with its own modeled fields.
    Struct(Vec<FieldDef>),
}

impl FieldKind {
    pub fn category(&self) -> PropertyCategory {
        match self {
            FieldKind::Primitive(_) => PropertyCategory::Primitive,
            FieldKind::Enum(_) => PropertyCategory::Enum,
            FieldKind::Map(_) => PropertyCategory::Map,
            FieldKind::Array(_) => PropertyCategory::Array,
            FieldKind::Struct(_) => PropertyCategory::Struct,
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::Primitive(c) => write!(f, "PRIMITIVE<{}>", c.type_name()),
            FieldKind::Enum(e) => write!(f, "ENUM<{}>", e.name),
            FieldKind::Map(c) => write!(f, "MAP<{}>", c.type_name()),
            FieldKind::Array(c) => write!(f, "ARRAY<{}>", c.type_name()),
            FieldKind::Struct(_) => write!(f, "STRUCT"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDef {
    pub name: String,
    pub kind: FieldKind,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self { name: name.into(), kind }
    }

    pub fn primitive(name: impl Into<String>, category: PrimitiveCategory) -> Self {
        Self::new(name, FieldKind::Primitive(category))
    }
}

/// An enum type: its name and the declared (ordinal, symbolic name) pairs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumDef {
    pub name: String,
    pub elements: Vec<EnumElement>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumElement {
    pub ordinal: i32,
    pub symbolic_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl EnumDef {
    pub fn by_ordinal(&self, ordinal: i32) -> Option<&EnumElement> {
        self.elements.iter().find(|e| e.ordinal == ordinal)
    }

    pub fn by_symbolic_name(&self, symbolic_name: &str) -> Option<&EnumElement> {
        self.elements.iter().find(|e| e.symbolic_name == symbolic_name)
    }

    fn validate(&self, type_name: &str) -> Result<()> {
        let invalid = |reason: String| Error::InvalidSchema { type_name: type_name.to_owned(), reason };
        if self.elements.is_empty() {
            return Err(invalid(format!("enum {} declares no elements", self.name)));
        }
        let mut ordinals = HashSet::new();
        let mut names = HashSet::new();
        for element in &self.elements {
            if element.symbolic_name.trim().is_empty() {
                return Err(invalid(format!("enum {} has a blank symbolic name", self.name)));
            }
            if !ordinals.insert(element.ordinal) {
                return Err(invalid(format!("enum {} repeats ordinal {}", self.name, element.ordinal)));
            }
            if !names.insert(element.symbolic_name.as_str()) {
                return Err(invalid(format!("enum {} repeats {}", self.name, element.symbolic_name)));
            }
        }
        Ok(())
    }
}

// ============================================================================
// BeanSchema
// ============================================================================

/// The fixed shape of one typed bean.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeanSchema {
    pub type_name: String,
    pub kind: InstanceKind,
    #[serde(default)]
    pub fields: Vec<FieldDef>,
}

impl BeanSchema {
    pub fn new(type_name: impl Into<String>, kind: InstanceKind) -> Self {
        Self { type_name: type_name.into(), kind, fields: Vec::new() }
    }

    pub fn with_field(mut self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.fields.push(FieldDef::new(name, kind));
        self
    }

    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn validate(&self) -> Result<()> {
        if self.type_name.trim().is_empty() {
            return Err(Error::InvalidSchema {
                type_name: self.type_name.clone(),
                reason: "type name is blank".to_owned(),
            });
        }
        validate_fields(&self.type_name, &self.fields)
    }
}

fn validate_fields(type_name: &str, fields: &[FieldDef]) -> Result<()> {
    let mut seen = HashSet::new();
    for field in fields {
        if field.name.trim().is_empty() {
            return Err(Error::InvalidSchema {
                type_name: type_name.to_owned(),
                reason: "field name is blank".to_owned(),
            });
        }
        if !seen.insert(field.name.as_str()) {
            return Err(Error::InvalidSchema {
                type_name: type_name.to_owned(),
                reason: format!("field {} declared twice", field.name),
            });
        }
        match &field.kind {
            FieldKind::Enum(def) => def.validate(type_name)?,
            FieldKind::Struct(nested) => validate_fields(type_name, nested)?,
            FieldKind::Primitive(_) | FieldKind::Map(_) | FieldKind::Array(_) => {}
        }
    }
    Ok(())
}

// ============================================================================
// SchemaCatalog
// ============================================================================

/// All bean schemas known to a mapper, keyed by type name.
#[derive(Debug, Clone, Default)]
pub struct SchemaCatalog {
    schemas: HashMap<String, BeanSchema>,
}

impl SchemaCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog preloaded with the built-in open metadata types.
    pub fn builtin() -> Result<Self> {
        let mut catalog = Self::new();
        for schema in builtin::schemas() {
            catalog.register(schema)?;
        }
        Ok(catalog)
    }

    /// Parse a JSON array of schemas into a fresh catalog.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let mut catalog = Self::new();
        catalog.extend_from_json_str(json)?;
        Ok(catalog)
    }

    /// Parse a JSON array of schemas and add them, replacing same-named entries.
    pub fn extend_from_json_str(&mut self, json: &str) -> Result<()> {
        let schemas: Vec<BeanSchema> = serde_json::from_str(json)?;
        for schema in schemas {
            self.register(schema)?;
        }
        Ok(())
    }

    /// Validate and add a schema. Returns the schema it replaced, if any.
    pub fn register(&mut self, schema: BeanSchema) -> Result<Option<BeanSchema>> {
        schema.validate()?;
        tracing::trace!(type_name = %schema.type_name, fields = schema.fields.len(), "registering bean schema");
        Ok(self.schemas.insert(schema.type_name.clone(), schema))
    }

    pub fn get(&self, type_name: &str) -> Option<&BeanSchema> {
        self.schemas.get(type_name)
    }

    /// Look up a schema that must exist and be of the given kind.
    pub fn require(&self, type_name: &str, kind: InstanceKind) -> Result<&BeanSchema> {
        let schema = self.get(type_name).ok_or_else(|| Error::NoSchemaForType {
            type_name: type_name.to_owned(),
        })?;
        if schema.kind != kind {
            return Err(Error::TypeCategoryMismatch {
                type_name: type_name.to_owned(),
                registered: schema.kind,
                requested: kind,
            });
        }
        Ok(schema)
    }

    /// Schema of a classification type, if that classification is modeled.
    pub fn classification(&self, name: &str) -> Option<&BeanSchema> {
        self.get(name).filter(|s| s.kind == InstanceKind::Classification)
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    pub fn type_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.schemas.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
