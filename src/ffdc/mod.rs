//! # First-Failure Data Capture
//!
//! Static catalog of error rows. Every [`crate::Error`] selects exactly one
//! row and supplies its fields as positional parameters (`{0}`, `{1}`, ...)
//! substituted into the row's message template.
//!
//! Status classes: 400 invalid parameters, 404 not found, 409 conflict,
//! 500 internal.

use std::fmt;

use serde::Serialize;
use smallvec::SmallVec;

use crate::Error;

/// Positional message inserts; most rows take four or fewer.
pub type MessageParams = SmallVec<[String; 4]>;

/// One catalog row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageDefinition {
    pub http_status: u16,
    pub message_id: &'static str,
    pub template: &'static str,
    pub system_action: &'static str,
    pub user_action: &'static str,
}

/// Symbolic identifier of a catalog row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    NullPropertyName,
    ArrayOutOfBounds,
    InvalidPrimitiveType,
    InvalidEnum,
    InvalidPrimitiveCast,
    InvalidPropertyCategory,
    UnmodeledProperty,
    UnmodeledClassification,
    IncompleteArray,
    MissingRelationshipEnd,
    UnknownTypeName,
    NoSchemaForType,
    TypeCategoryMismatch,
    InvalidSchema,
    InvalidConfiguration,
    MalformedJson,
    IoFailure,
}

// ============================================================================
// Catalog
// ============================================================================

const NULL_PROPERTY_NAME: MessageDefinition = MessageDefinition {
    http_status: 400,
    message_id: "OMT-PROPERTIES-400-001",
    template: "Null property name passed to properties object by {0}",
    system_action: "A request to set a property failed because the property name passed was null.",
    user_action: "Recode the call to the property object with a valid property name and retry.",
};

const ARRAY_OUT_OF_BOUNDS: MessageDefinition = MessageDefinition {
    http_status: 400,
    message_id: "OMT-PROPERTIES-400-002",
    template: "{0} is unable to add a new element to location {1} of an array of size {2} value",
    system_action: "There is an error in the update of an ArrayPropertyValue.",
    user_action: "Recode the call to the property object with a valid element location and retry.",
};

const INVALID_PRIMITIVE_TYPE: MessageDefinition = MessageDefinition {
    http_status: 400,
    message_id: "OMT-PROPERTIES-400-003",
    template: "The value supplied for an attribute of primitive category {0} is expected as {1} but was supplied as {2}",
    system_action: "The primitive property value was not created because its payload does not match its category.",
    user_action: "Supply a payload of the representation named in the message and retry.",
};

const INVALID_ENUM: MessageDefinition = MessageDefinition {
    http_status: 400,
    message_id: "OMT-PROPERTIES-400-004",
    template: "The enum value with ordinal {1} and symbolic name {2} is not valid for {0}",
    system_action: "The enum property value was rejected because its ordinal and symbolic name do not form a valid pair.",
    user_action: "Supply both the ordinal and the matching symbolic name of a declared enum element and retry.",
};

const INVALID_PRIMITIVE_CAST: MessageDefinition = MessageDefinition {
    http_status: 400,
    message_id: "OMT-MAPPER-400-001",
    template: "Property {0} of type {1} holds a value of category {2} that cannot be converted to {3}",
    system_action: "The instance was not translated because a property value is outside the range of its declared field.",
    user_action: "Correct the stored property value or the bean schema for the type and retry.",
};

const INVALID_PROPERTY_CATEGORY: MessageDefinition = MessageDefinition {
    http_status: 400,
    message_id: "OMT-MAPPER-400-002",
    template: "Property {0} of type {1} is declared as {2} but was supplied as a {3} value",
    system_action: "The instance was not translated because a property value has the wrong category for its field.",
    user_action: "Correct the stored property value or the bean schema for the type and retry.",
};

const UNMODELED_PROPERTY: MessageDefinition = MessageDefinition {
    http_status: 400,
    message_id: "OMT-MAPPER-400-003",
    template: "Property {0} is not modeled by type {1}",
    system_action: "The instance was not translated because unmodeled properties are configured to be rejected.",
    user_action: "Remove the property, extend the bean schema, or relax the unmodeled property policy and retry.",
};

const UNMODELED_CLASSIFICATION: MessageDefinition = MessageDefinition {
    http_status: 400,
    message_id: "OMT-MAPPER-400-004",
    template: "Classification {0} attached to an instance of type {1} is not modeled",
    system_action: "The entity was not translated because unmodeled classifications are configured to be rejected.",
    user_action: "Remove the classification, register a schema for it, or relax the unmodeled classification policy and retry.",
};

const INCOMPLETE_ARRAY: MessageDefinition = MessageDefinition {
    http_status: 400,
    message_id: "OMT-MAPPER-400-005",
    template: "Array property {0} of type {1} declares {2} elements but element {3} is missing",
    system_action: "The instance was not translated because a typed array field requires every element to be present.",
    user_action: "Populate every element of the array property and retry.",
};

const MISSING_RELATIONSHIP_END: MessageDefinition = MessageDefinition {
    http_status: 400,
    message_id: "OMT-MAPPER-400-006",
    template: "Relationship {0} of type {1} has no entity at end {2}",
    system_action: "The relationship was not created because one of its entity proxies is missing.",
    user_action: "Supply both ends of the relationship and retry.",
};

const UNKNOWN_TYPE_NAME: MessageDefinition = MessageDefinition {
    http_status: 404,
    message_id: "OMT-MAPPER-404-001",
    template: "Type {0} requested by {1} is not known to the type registry",
    system_action: "The instance was not created because its type could not be resolved.",
    user_action: "Check that the type archive defining the type has been loaded and retry.",
};

const NO_SCHEMA_FOR_TYPE: MessageDefinition = MessageDefinition {
    http_status: 404,
    message_id: "OMT-MAPPER-404-002",
    template: "No bean schema is registered for type {0}",
    system_action: "The instance was not translated because no bean shape is defined for its type.",
    user_action: "Register a bean schema for the type in the schema catalog and retry.",
};

const TYPE_CATEGORY_MISMATCH: MessageDefinition = MessageDefinition {
    http_status: 409,
    message_id: "OMT-MAPPER-409-001",
    template: "Type {0} is registered as a {1} type but was requested as a {2} type",
    system_action: "The instance was not created because its type belongs to a different instance category.",
    user_action: "Use a type of the correct category for this instance and retry.",
};

const INVALID_SCHEMA: MessageDefinition = MessageDefinition {
    http_status: 500,
    message_id: "OMT-SCHEMA-500-001",
    template: "The bean schema for type {0} is invalid: {1}",
    system_action: "The schema was not registered.",
    user_action: "Correct the bean schema definition. This is a configuration or code error.",
};

const INVALID_CONFIGURATION: MessageDefinition = MessageDefinition {
    http_status: 400,
    message_id: "OMT-CONFIG-400-001",
    template: "The mapper configuration is invalid: {0}",
    system_action: "The mapper configuration was not loaded.",
    user_action: "Correct the configuration document and retry.",
};

const MALFORMED_JSON: MessageDefinition = MessageDefinition {
    http_status: 400,
    message_id: "OMT-CONFIG-400-002",
    template: "The JSON document could not be parsed: {0}",
    system_action: "The document was rejected.",
    user_action: "Correct the JSON document and retry.",
};

const IO_FAILURE: MessageDefinition = MessageDefinition {
    http_status: 500,
    message_id: "OMT-CONFIG-500-001",
    template: "An I/O error occurred: {0}",
    system_action: "The document could not be read.",
    user_action: "Check the file path and its permissions and retry.",
};

impl ErrorCode {
    pub const ALL: [ErrorCode; 17] = [
        ErrorCode::NullPropertyName,
        ErrorCode::ArrayOutOfBounds,
        ErrorCode::InvalidPrimitiveType,
        ErrorCode::InvalidEnum,
        ErrorCode::InvalidPrimitiveCast,
        ErrorCode::InvalidPropertyCategory,
        ErrorCode::UnmodeledProperty,
        ErrorCode::UnmodeledClassification,
        ErrorCode::IncompleteArray,
        ErrorCode::MissingRelationshipEnd,
        ErrorCode::UnknownTypeName,
        ErrorCode::NoSchemaForType,
        ErrorCode::TypeCategoryMismatch,
        ErrorCode::InvalidSchema,
        ErrorCode::InvalidConfiguration,
        ErrorCode::MalformedJson,
        ErrorCode::IoFailure,
    ];

    pub fn definition(self) -> &'static MessageDefinition {
        match self {
            ErrorCode::NullPropertyName => &NULL_PROPERTY_NAME,
            ErrorCode::ArrayOutOfBounds => &ARRAY_OUT_OF_BOUNDS,
            ErrorCode::InvalidPrimitiveType => &INVALID_PRIMITIVE_TYPE,
            ErrorCode::InvalidEnum => &INVALID_ENUM,
            ErrorCode::InvalidPrimitiveCast => &INVALID_PRIMITIVE_CAST,
            ErrorCode::InvalidPropertyCategory => &INVALID_PROPERTY_CATEGORY,
            ErrorCode::UnmodeledProperty => &UNMODELED_PROPERTY,
            ErrorCode::UnmodeledClassification => &UNMODELED_CLASSIFICATION,
            ErrorCode::IncompleteArray => &INCOMPLETE_ARRAY,
            ErrorCode::MissingRelationshipEnd => &MISSING_RELATIONSHIP_END,
            ErrorCode::UnknownTypeName => &UNKNOWN_TYPE_NAME,
            ErrorCode::NoSchemaForType => &NO_SCHEMA_FOR_TYPE,
            ErrorCode::TypeCategoryMismatch => &TYPE_CATEGORY_MISMATCH,
            ErrorCode::InvalidSchema => &INVALID_SCHEMA,
            ErrorCode::InvalidConfiguration => &INVALID_CONFIGURATION,
            ErrorCode::MalformedJson => &MALFORMED_JSON,
            ErrorCode::IoFailure => &IO_FAILURE,
        }
    }

    /// Render this row with the given inserts.
    pub fn report<I, S>(self, params: I) -> ErrorReport
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let def = self.definition();
        let params: MessageParams = params.into_iter().map(Into::into).collect();
        ErrorReport {
            code: self,
            http_status: def.http_status,
            message_id: def.message_id,
            message: render(def.template, &params),
            system_action: def.system_action,
            user_action: def.user_action,
            params,
        }
    }
}

/// Substitute `{n}` placeholders. Unknown or unmatched placeholders are kept
/// verbatim so a short parameter list still yields a readable message.
fn render(template: &str, params: &[String]) -> String {
    let mut out = String::with_capacity(template.len() + params.iter().map(String::len).sum::<usize>());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let substituted = after.find('}').and_then(|close| {
            let index: usize = after[..close].parse().ok()?;
            params.get(index).map(|p| (p, close))
        });
        match substituted {
            Some((param, close)) => {
                out.push_str(param);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

// ============================================================================
// ErrorReport
// ============================================================================

/// Operator-facing rendering of a raised error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorReport {
    pub code: ErrorCode,
    pub http_status: u16,
    pub message_id: &'static str,
    pub message: String,
    pub system_action: &'static str,
    pub user_action: &'static str,
    pub params: MessageParams,
}

impl ErrorReport {
    /// 5xx rows describe internal faults; everything else is the caller's input.
    pub fn is_internal(&self) -> bool {
        self.http_status >= 500
    }
}

impl fmt::Display for ErrorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.message_id, self.message)
    }
}

// ============================================================================
// Error -> catalog row
// ============================================================================

impl Error {
    pub fn code(&self) -> ErrorCode {
        match self {
            Error::NullPropertyName { .. } => ErrorCode::NullPropertyName,
            Error::ArrayOutOfBounds { .. } => ErrorCode::ArrayOutOfBounds,
            Error::InvalidPrimitiveType { .. } => ErrorCode::InvalidPrimitiveType,
            Error::InvalidPrimitiveCast { .. } => ErrorCode::InvalidPrimitiveCast,
            Error::InvalidEnum { .. } => ErrorCode::InvalidEnum,
            Error::UnknownTypeName { .. } => ErrorCode::UnknownTypeName,
            Error::NoSchemaForType { .. } => ErrorCode::NoSchemaForType,
            Error::TypeCategoryMismatch { .. } => ErrorCode::TypeCategoryMismatch,
            Error::InvalidPropertyCategory { .. } => ErrorCode::InvalidPropertyCategory,
            Error::UnmodeledProperty { .. } => ErrorCode::UnmodeledProperty,
            Error::UnmodeledClassification { .. } => ErrorCode::UnmodeledClassification,
            Error::IncompleteArray { .. } => ErrorCode::IncompleteArray,
            Error::MissingRelationshipEnd { .. } => ErrorCode::MissingRelationshipEnd,
            Error::InvalidSchema { .. } => ErrorCode::InvalidSchema,
            Error::InvalidConfiguration(_) => ErrorCode::InvalidConfiguration,
            Error::Json(_) => ErrorCode::MalformedJson,
            Error::Io(_) => ErrorCode::IoFailure,
        }
    }

    /// The catalog row for this error with its fields inserted.
    pub fn report(&self) -> ErrorReport {
        self.code().report(self.message_params())
    }

    fn message_params(&self) -> MessageParams {
        let mut p = MessageParams::new();
        match self {
            Error::NullPropertyName { context } => p.push((*context).to_owned()),
            Error::ArrayOutOfBounds { value_type, index, count } => {
                p.push((*value_type).to_owned());
                p.push(index.to_string());
                p.push(count.to_string());
            }
            Error::InvalidPrimitiveType { category, expected, actual } => {
                p.push(category.to_string());
                p.push((*expected).to_owned());
                p.push(actual.clone());
            }
            Error::InvalidPrimitiveCast { property, type_name, from, to } => {
                p.push(property.clone());
                p.push(type_name.clone());
                p.push(from.to_string());
                p.push(to.to_string());
            }
            Error::InvalidEnum { enum_name, ordinal, symbolic_name } => {
                p.push(enum_name.clone());
                p.push(ordinal.map_or_else(|| "<none>".to_owned(), |o| o.to_string()));
                p.push(symbolic_name.clone().unwrap_or_else(|| "<none>".to_owned()));
            }
            Error::UnknownTypeName { type_name, context } => {
                p.push(type_name.clone());
                p.push((*context).to_owned());
            }
            Error::NoSchemaForType { type_name } => p.push(type_name.clone()),
            Error::TypeCategoryMismatch { type_name, registered, requested } => {
                p.push(type_name.clone());
                p.push(registered.to_string());
                p.push(requested.to_string());
            }
            Error::InvalidPropertyCategory { property, type_name, declared, actual } => {
                p.push(property.clone());
                p.push(type_name.clone());
                p.push(declared.clone());
                p.push(actual.to_string());
            }
            Error::UnmodeledProperty { property, type_name } => {
                p.push(property.clone());
                p.push(type_name.clone());
            }
            Error::UnmodeledClassification { classification, type_name } => {
                p.push(classification.clone());
                p.push(type_name.clone());
            }
            Error::IncompleteArray { property, type_name, count, missing } => {
                p.push(property.clone());
                p.push(type_name.clone());
                p.push(count.to_string());
                p.push(missing.to_string());
            }
            Error::MissingRelationshipEnd { guid, type_name, end } => {
                p.push(guid.clone());
                p.push(type_name.clone());
                p.push((*end).to_owned());
            }
            Error::InvalidSchema { type_name, reason } => {
                p.push(type_name.clone());
                p.push(reason.clone());
            }
            Error::InvalidConfiguration(reason) => p.push(reason.clone()),
            Error::Json(e) => p.push(e.to_string()),
            Error::Io(e) => p.push(e.to_string()),
        }
        p
    }
}
