//! Rating entity → `RatingElement`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::properties::{read_bool, restore_extended, PropertyReader};
use super::{ElementHeader, MetadataElementConverter};
use crate::model::{ElementProperties, EntityDetail, PropertyValue, Relationship, Value};
use crate::schema::{OpenEnum, StarRating};
use crate::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingElement {
    pub element_header: ElementHeader,
    pub star_rating: StarRating,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review: Option<String>,
    /// The user who created the rating.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    /// Taken from the attaching relationship; `false` when there is none.
    #[serde(default)]
    pub is_public: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extended_properties: Option<BTreeMap<String, Value>>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RatingConverter;

impl MetadataElementConverter for RatingConverter {
    type Element = RatingElement;

    fn type_name(&self) -> &'static str {
        "Rating"
    }

    fn convert(&self, entity: &EntityDetail, relationship: Option<&Relationship>) -> Result<RatingElement> {
        tracing::debug!(guid = %entity.guid, "converting rating");
        let mut reader = PropertyReader::new(entity.type_name(), &entity.properties);
        let star_rating = reader.take_enum::<StarRating>("stars")?.unwrap_or_default();
        let review = reader.take_string("review")?;
        let is_public = match relationship {
            Some(r) => read_bool(r.type_name(), &r.properties, "isPublic")?.unwrap_or(false),
            None => false,
        };
        Ok(RatingElement {
            element_header: ElementHeader::from_entity(entity),
            star_rating,
            review,
            user: entity.header.created_by.clone(),
            is_public,
            extended_properties: reader.into_extended(),
        })
    }

    fn to_properties(&self, element: &RatingElement) -> Result<ElementProperties> {
        let rating = element.star_rating;
        let mut props = ElementProperties::new().with_property(
            "stars",
            PropertyValue::enumeration(rating.ordinal(), rating.symbolic_name())?
                .with_type(None, Some(StarRating::TYPE_NAME.to_owned())),
        );
        if let Some(review) = &element.review {
            props.insert("review", review.as_str());
        }
        restore_extended(&mut props, element.extended_properties.as_ref());
        Ok(props)
    }
}
