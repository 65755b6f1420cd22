//! End-to-end tests for the metadata element converters.
//!
//! Instances are built through the mapper so they carry registry types, then
//! converted to their REST-facing element shapes and back to property bags.

use open_metadata_types::{
    Classification, EntityDetail, EntityProxy, InMemoryTypeRegistry, InformalTagConverter, InstanceAuditHeader,
    InstanceKind, Mapper, MetadataElementConverter, PropertyValue, RatingConverter, Relationship, SchemaCatalog,
    StarRating, TypeDescriptor, Value, DataFileConverter, ArrayPropertyValue, MapPropertyValue, Error, ErrorCode,
};
use pretty_assertions::assert_eq;

fn mapper() -> Mapper<InMemoryTypeRegistry> {
    let registry: InMemoryTypeRegistry = [
        TypeDescriptor::new("g-rating", "Rating", InstanceKind::Entity),
        TypeDescriptor::new("g-tag", "InformalTag", InstanceKind::Entity),
        TypeDescriptor::new("g-file", "DataFile", InstanceKind::Entity),
        TypeDescriptor::new("g-attached-rating", "AttachedRating", InstanceKind::Relationship),
        TypeDescriptor::new("g-attached-tag", "AttachedTag", InstanceKind::Relationship),
    ]
    .into_iter()
    .collect();
    Mapper::new(registry, SchemaCatalog::builtin().unwrap())
}

#[test]
fn test_rating_element() {
    let m = mapper();
    let entity = EntityDetail::new("rating-1", m.instance_type("Rating").unwrap())
        .with_header(InstanceAuditHeader { created_by: Some("erin".into()), version: 2, ..Default::default() })
        .with_property("stars", PropertyValue::enumeration(99, "FIVE_STARS").unwrap())
        .with_property("review", "excellent")
        .with_property("futureField", 7)
        .with_classification(Classification::new("Memento"));
    let attached = Relationship::new("rel-1", m.instance_type("AttachedRating").unwrap())
        .with_ends(EntityProxy::new("asset-1", "Asset"), EntityProxy::new("rating-1", "Rating"))
        .with_property("isPublic", true);

    let element = RatingConverter.convert(&entity, Some(&attached)).unwrap();
    assert_eq!(element.star_rating, StarRating::FiveStars);
    assert_eq!(element.review.as_deref(), Some("excellent"));
    assert_eq!(element.user.as_deref(), Some("erin"));
    assert!(element.is_public);
    assert_eq!(element.element_header.type_guid.as_deref(), Some("g-rating"));
    assert_eq!(element.element_header.version, 2);
    assert_eq!(element.element_header.classifications[0].classification_name, "Memento");
    assert_eq!(element.extended_properties.as_ref().map(|e| e["futureField"].clone()), Some(Value::Int(7)));

    assert_eq!(RatingConverter.to_properties(&element).unwrap(), entity.properties);

    // The mapper accepts what the converter writes.
    let rebuilt = EntityDetail { properties: RatingConverter.to_properties(&element).unwrap(), ..entity };
    let bean = m.entity_to_bean(&rebuilt).unwrap();
    assert_eq!(bean.properties.enum_field::<StarRating>("stars"), Some(StarRating::FiveStars));
}

#[test]
fn test_rating_rejects_unknown_stars() {
    let m = mapper();
    let entity = EntityDetail::new("rating-2", m.instance_type("Rating").unwrap())
        .with_property("stars", PropertyValue::enumeration(5, "FIVE_AND_A_BIT").unwrap());
    assert!(RatingConverter.convert(&entity, None).is_err());
}

#[test]
fn test_informal_tag_element() {
    let m = mapper();
    let tag = EntityDetail::new("tag-1", m.instance_type("InformalTag").unwrap())
        .with_property("tagName", "quarterly")
        .with_property("tagDescription", "Quarterly reporting inputs")
        .with_property("isPublic", true);

    let element = InformalTagConverter.convert(&tag, None).unwrap();
    assert_eq!(element.name.as_deref(), Some("quarterly"));
    assert_eq!(element.description.as_deref(), Some("Quarterly reporting inputs"));
    assert!(!element.is_private_tag);
    assert!(!element.is_public);
    assert!(element.extended_properties.is_none());

    assert_eq!(InformalTagConverter.to_properties(&element).unwrap(), tag.properties);
}

#[test]
fn test_data_file_element_json() {
    let m = mapper();
    let entity = EntityDetail::new("file-1", m.instance_type("DataFile").unwrap())
        .with_property("qualifiedName", "file://landing/orders.csv")
        .with_property("name", "orders.csv")
        .with_property("owner", "ops")
        .with_property("zoneMembership", ArrayPropertyValue::from_values(["landing"]))
        .with_property("additionalProperties", MapPropertyValue::from_pairs([("delimiter", ",")]))
        .with_property("fileType", "csv");

    let element = DataFileConverter.convert(&entity, None).unwrap();
    let json = serde_json::to_value(&element).unwrap();
    assert_eq!(json["displayName"], "orders.csv");
    assert_eq!(json["zoneMembership"][0], "landing");
    assert_eq!(json["additionalProperties"]["delimiter"], ",");
    assert_eq!(json["elementHeader"]["typeName"], "DataFile");
    assert!(json.get("encodingType").is_none());

    assert_eq!(DataFileConverter.to_properties(&element).unwrap(), entity.properties);
    assert_eq!(DataFileConverter.type_name(), "DataFile");
}

#[test]
fn test_rating_stars_stored_as_string() {
    let m = mapper();
    let entity = EntityDetail::new("rating-3", m.instance_type("Rating").unwrap())
        .with_property("stars", "TWO_STARS")
        .with_property("review", "fine");

    let err = RatingConverter.convert(&entity, None).unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidPropertyCategory);
    assert_eq!(
        err.report().message,
        "Property stars of type Rating is declared as ENUM<StarRating> but was supplied as a PRIMITIVE value"
    );
}

#[test]
fn test_data_file_wrong_categories() {
    let m = mapper();
    let base = EntityDetail::new("file-2", m.instance_type("DataFile").unwrap()).with_property("name", "orders.csv");

    let zones_as_string = base.clone().with_property("zoneMembership", "landing");
    assert!(matches!(
        DataFileConverter.convert(&zones_as_string, None),
        Err(Error::InvalidPropertyCategory { property, .. }) if property == "zoneMembership"
    ));

    let mut nested = MapPropertyValue::new();
    nested.set_map_value("inner", MapPropertyValue::from_pairs([("a", "b")]));
    let nested_map = base.clone().with_property("additionalProperties", nested);
    assert!(matches!(
        DataFileConverter.convert(&nested_map, None),
        Err(Error::InvalidPropertyCategory { property, .. }) if property == "additionalProperties.inner"
    ));

    let owner_as_number = base.with_property("owner", 42);
    assert!(matches!(DataFileConverter.convert(&owner_as_number, None), Err(Error::InvalidPrimitiveCast { .. })));
}

#[test]
fn test_attachment_flag_with_wrong_category() {
    let m = mapper();
    let tag = EntityDetail::new("tag-2", m.instance_type("InformalTag").unwrap()).with_property("tagName", "pii");
    let attached = Relationship::new("rel-9", m.instance_type("AttachedTag").unwrap())
        .with_ends(EntityProxy::new("asset-1", "Asset"), EntityProxy::new("tag-2", "InformalTag"))
        .with_property("isPublic", "true");

    let err = InformalTagConverter.convert(&tag, Some(&attached)).unwrap_err();
    assert!(matches!(err, Error::InvalidPrimitiveCast { ref type_name, .. } if type_name == "AttachedTag"));
}
