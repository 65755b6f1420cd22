//! End-to-end tests for the schema-driven mapper.
//!
//! Each test builds repository instances against the built-in schema table,
//! maps them to beans and back, and checks what survived the trip.

use chrono::{DateTime, Utc};
use open_metadata_types::{
    ArrayPropertyValue, BeanProperties, BeanSchema, Classification, ClassificationBean, ElementProperties,
    EntityBean, EntityDetail, EntityProxy, Error, ErrorCode, FieldDef, FieldKind, InMemoryTypeRegistry,
    InstanceAuditHeader, InstanceKind, MapPropertyValue, Mapper, MapperConfig, OpenEnum, PrimitiveCategory,
    PrimitiveValue, PropertyValue, Relationship, RelationshipBean, SchemaCatalog, StarRating,
    StructPropertyValue, TypeDescriptor, UnmodeledPolicy,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

// ============================================================================
// Helpers
// ============================================================================

fn registry() -> InMemoryTypeRegistry {
    [
        TypeDescriptor::new("g-rating", "Rating", InstanceKind::Entity),
        TypeDescriptor::new("g-tag", "InformalTag", InstanceKind::Entity),
        TypeDescriptor::new("g-file", "DataFile", InstanceKind::Entity).with_super_types(["DataStore", "Asset"]),
        TypeDescriptor::new("g-attached-rating", "AttachedRating", InstanceKind::Relationship),
        TypeDescriptor::new("g-spine", "SpineObject", InstanceKind::Classification),
        TypeDescriptor::new("g-conf", "Confidentiality", InstanceKind::Classification),
        TypeDescriptor::new("g-location", "Location", InstanceKind::Entity),
    ]
    .into_iter()
    .collect()
}

fn mapper() -> Mapper<InMemoryTypeRegistry> {
    Mapper::new(registry(), SchemaCatalog::builtin().unwrap())
}

fn mapper_with(config: MapperConfig) -> Mapper<InMemoryTypeRegistry> {
    Mapper::with_config(registry(), SchemaCatalog::builtin().unwrap(), config)
}

fn millis(ms: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp_millis(ms).unwrap()
}

fn rating(m: &Mapper<InMemoryTypeRegistry>) -> EntityDetail {
    EntityDetail::new("rating-1", m.instance_type("Rating").unwrap())
        .with_header(InstanceAuditHeader {
            created_by: Some("erin".into()),
            create_time: Some(millis(1_700_000_000_000)),
            version: 3,
            ..Default::default()
        })
        .with_property("stars", PropertyValue::enumeration(2, "TWO_STARS").unwrap())
        .with_property("review", "does the job")
}

// ============================================================================
// 1. Enum fields and unmodeled properties
// ============================================================================

#[test]
fn test_enum_field_round_trip() {
    let m = mapper();
    let entity = rating(&m);

    let bean = m.entity_to_bean(&entity).unwrap();
    assert_eq!(bean.properties.enum_field::<StarRating>("stars"), Some(StarRating::TwoStars));
    assert_eq!(bean.properties.string_field("review"), Some("does the job"));
    assert_eq!(bean.guid(), Some("rating-1"));
    assert_eq!(bean.system_attributes.version, Some(3));

    let back = m.bean_to_entity(&bean).unwrap();
    assert_eq!(back, entity);
}

#[test]
fn test_unmodeled_property_preserved() {
    let m = mapper();
    let entity = rating(&m).with_property("futureField", "x");

    let bean = m.entity_to_bean(&entity).unwrap();
    assert!(bean.properties.field("futureField").is_none());
    assert_eq!(
        bean.properties.extra_attributes.get("futureField").and_then(PropertyValue::as_str),
        Some("x")
    );

    let back = m.bean_to_entity(&bean).unwrap();
    assert_eq!(back.properties, entity.properties);
}

#[test]
fn test_unmodeled_property_rejected() {
    let m = mapper_with(MapperConfig::new().with_unmodeled_properties(UnmodeledPolicy::Reject));
    let entity = rating(&m).with_property("futureField", "x");

    let err = m.entity_to_bean(&entity).unwrap_err();
    assert!(matches!(&err, Error::UnmodeledProperty { property, .. } if property == "futureField"));
    assert_eq!(err.report().message, "Property futureField is not modeled by type Rating");
}

#[test]
fn test_unmodeled_property_ignored() {
    let m = mapper_with(MapperConfig::new().with_unmodeled_properties(UnmodeledPolicy::Ignore));
    let bean = m.entity_to_bean(&rating(&m).with_property("futureField", "x")).unwrap();
    assert!(bean.properties.extra_attributes.is_empty());
}

#[test]
fn test_unknown_enum_ordinal() {
    let m = mapper();
    let entity = rating(&m).with_property("stars", PropertyValue::enumeration(7, "SEVEN_STARS").unwrap());
    let err = m.entity_to_bean(&entity).unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidEnum);
    assert_eq!(err.report().http_status, 400);
}

#[test]
fn test_enum_name_mismatch_tolerated_when_lenient() {
    let entity = rating(&mapper()).with_property("stars", PropertyValue::enumeration(2, "two").unwrap());
    assert!(mapper().entity_to_bean(&entity).is_err());

    let lenient = mapper_with(MapperConfig::new().with_strict_enum_names(false));
    let bean = lenient.entity_to_bean(&entity).unwrap();
    assert_eq!(bean.properties.enum_field::<StarRating>("stars"), Some(StarRating::TwoStars));
}

#[test]
fn test_wrong_category_for_modeled_field() {
    let m = mapper();
    let entity = rating(&m).with_property("stars", 2);
    match m.entity_to_bean(&entity).unwrap_err() {
        Error::InvalidPropertyCategory { property, declared, .. } => {
            assert_eq!(property, "stars");
            assert_eq!(declared, "ENUM<StarRating>");
        }
        other => panic!("unexpected error {other:?}"),
    }
}

// ============================================================================
// 2. Collections and casts
// ============================================================================

fn data_file(m: &Mapper<InMemoryTypeRegistry>) -> EntityDetail {
    EntityDetail::new("file-1", m.instance_type("DataFile").unwrap())
        .with_property("qualifiedName", "file://landing/orders.csv")
        .with_property("name", "orders.csv")
        .with_property("zoneMembership", ArrayPropertyValue::from_values(["landing", "raw"]))
        .with_property("additionalProperties", MapPropertyValue::from_pairs([("delimiter", ",")]))
        .with_property("createTime", millis(1_600_000_000_000))
}

#[test]
fn test_collections_round_trip() {
    let m = mapper();
    let entity = data_file(&m);

    let bean = m.entity_to_bean(&entity).unwrap();
    assert_eq!(bean.properties.string_array_field("zoneMembership"), Some(vec!["landing".into(), "raw".into()]));
    assert_eq!(bean.properties.string_map_field("additionalProperties").unwrap()["delimiter"], ",");
    assert_eq!(bean.properties.date_field("createTime"), Some(millis(1_600_000_000_000)));

    assert_eq!(m.bean_to_entity(&bean).unwrap(), entity);
}

#[test]
fn test_sparse_array_is_incomplete() {
    let m = mapper();
    let mut zones = ArrayPropertyValue::new(3);
    zones.set_array_value(0, "landing").unwrap();
    zones.set_array_value(2, "raw").unwrap();
    let entity = data_file(&m).with_property("zoneMembership", zones);

    match m.entity_to_bean(&entity).unwrap_err() {
        Error::IncompleteArray { property, count, missing, .. } => {
            assert_eq!(property, "zoneMembership");
            assert_eq!((count, missing), (3, 1));
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn test_non_primitive_map_entry() {
    let m = mapper();
    let mut extras = MapPropertyValue::new();
    extras.set_map_value("nested", MapPropertyValue::from_pairs([("a", "b")]));
    let entity = data_file(&m).with_property("additionalProperties", extras);

    let err = m.entity_to_bean(&entity).unwrap_err();
    assert!(matches!(&err, Error::InvalidPropertyCategory { property, .. } if property == "additionalProperties.nested"));
}

#[test]
fn test_narrowing_cast_policy() {
    let m = mapper();
    let strict = mapper_with(MapperConfig::strict());

    // A Long where the schema declares Int.
    let conf = Classification::new("Confidentiality").with_property("level", PrimitiveValue::Long(2));
    let bean = m.classification_to_bean(&conf).unwrap();
    assert_eq!(bean.properties.primitive_field("level"), Some(&PrimitiveValue::Int(2)));

    let too_big = Classification::new("Confidentiality").with_property("level", PrimitiveValue::Long(i64::MAX));
    assert!(matches!(m.classification_to_bean(&too_big), Err(Error::InvalidPrimitiveCast { .. })));

    let err = strict.classification_to_bean(&conf).unwrap_err();
    assert!(matches!(
        err,
        Error::InvalidPrimitiveCast { from: PrimitiveCategory::Long, to: PrimitiveCategory::Int, .. }
    ));
}

// ============================================================================
// 3. Classifications
// ============================================================================

#[test]
fn test_classifications_split_and_rejoin() {
    let m = mapper();
    let spine = Classification::new("SpineObject").with_type(m.instance_type("SpineObject").unwrap());
    let conf = Classification::new("Confidentiality")
        .with_type(m.instance_type("Confidentiality").unwrap())
        .with_property("level", 3)
        .with_property("steward", "dana");
    let unmodeled = Classification::new("Memento").with_property("archiveDate", "2024-01-01");
    let entity = rating(&m)
        .with_classification(spine)
        .with_classification(conf)
        .with_classification(unmodeled);

    let bean = m.entity_to_bean(&entity).unwrap();
    assert_eq!(bean.classifications.len(), 2);
    assert_eq!(bean.classification("Confidentiality").and_then(|c| c.properties.int_field("level")), Some(3));
    assert!(bean.extra_classifications.contains_key("Memento"));

    let back = m.bean_to_entity(&bean).unwrap();
    assert_eq!(back.classifications, entity.classifications);
}

#[test]
fn test_unmodeled_classification_rejected() {
    let m = mapper_with(MapperConfig::new().with_unmodeled_classifications(UnmodeledPolicy::Reject));
    let entity = rating(&m).with_classification(Classification::new("Memento"));
    let err = m.entity_to_bean(&entity).unwrap_err();
    assert_eq!(err.code(), ErrorCode::UnmodeledClassification);
}

#[test]
fn test_classification_bean_needs_registered_type() {
    let m = mapper();
    let bean = EntityBean::new("Rating")
        .with_guid("r9")
        .with_classification(ClassificationBean::new("Confidentiality").with_field("level", 1));
    let entity = m.bean_to_entity(&bean).unwrap();
    let conf = entity.classification("Confidentiality").unwrap();
    assert_eq!(conf.instance_type.as_ref().and_then(|t| t.type_def_guid.as_deref()), Some("g-conf"));

    let unknown = EntityBean::new("Rating").with_classification(ClassificationBean::new("Memento"));
    assert!(matches!(m.bean_to_entity(&unknown), Err(Error::UnknownTypeName { .. })));
}

// ============================================================================
// 4. Relationships and type resolution
// ============================================================================

#[test]
fn test_relationship_round_trip() {
    let m = mapper();
    let relationship = Relationship::new("rel-1", m.instance_type("AttachedRating").unwrap())
        .with_ends(EntityProxy::new("asset-1", "Asset"), EntityProxy::new("rating-1", "Rating"))
        .with_property("isPublic", true);

    let bean = m.relationship_to_bean(&relationship).unwrap();
    assert_eq!(bean.properties.bool_field("isPublic"), Some(true));
    assert_eq!(bean.end_two.as_ref().map(|e| e.guid.as_str()), Some("rating-1"));

    assert_eq!(m.bean_to_relationship(&bean).unwrap(), relationship);
}

#[test]
fn test_relationship_missing_end() {
    let m = mapper();
    let mut bean = RelationshipBean::new("AttachedRating")
        .with_guid("rel-2")
        .with_ends(EntityProxy::new("a", "Asset"), EntityProxy::new("b", "Rating"));
    bean.end_two = None;

    let err = m.bean_to_relationship(&bean).unwrap_err();
    assert!(matches!(&err, Error::MissingRelationshipEnd { end: "two", .. }));
    assert_eq!(err.report().message, "Relationship rel-2 of type AttachedRating has no entity at end two");
}

#[test]
fn test_type_resolution_errors() {
    let m = mapper();

    let err = m.bean_to_entity(&EntityBean::new("Glossary")).unwrap_err();
    assert_eq!(err.code(), ErrorCode::UnknownTypeName);
    assert_eq!(err.report().http_status, 404);

    let err = m.bean_to_entity(&EntityBean::new("AttachedRating")).unwrap_err();
    assert!(matches!(
        err,
        Error::TypeCategoryMismatch { registered: InstanceKind::Relationship, requested: InstanceKind::Entity, .. }
    ));
}

#[test]
fn test_new_bean_gets_guid() {
    let m = mapper();
    let bean = EntityBean::new("InformalTag").with_field("tagName", "pii").with_field("isPublic", false);
    let first = m.bean_to_entity(&bean).unwrap();
    let second = m.bean_to_entity(&bean).unwrap();
    assert!(!first.guid.is_empty());
    assert_ne!(first.guid, second.guid);
    assert_eq!(first.get("isPublic").and_then(PropertyValue::as_primitive), Some(&PrimitiveValue::Boolean(false)));
}

#[test]
fn test_super_types_come_from_registry() {
    let m = mapper();
    let entity = m.bean_to_entity(&EntityBean::new("DataFile").with_guid("f")).unwrap();
    assert_eq!(entity.instance_type.type_def_super_types, vec!["DataStore".to_owned(), "Asset".to_owned()]);
}

// ============================================================================
// 5. Schemas from JSON and configuration files
// ============================================================================

const LOCATION_SCHEMA: &str = r#"[{
    "typeName": "Location",
    "kind": "ENTITY",
    "fields": [
        {"name": "displayName", "kind": {"category": "PRIMITIVE", "of": "OM_PRIMITIVE_TYPE_STRING"}},
        {"name": "coordinates", "kind": {"category": "STRUCT", "of": [
            {"name": "lat", "kind": {"category": "PRIMITIVE", "of": "OM_PRIMITIVE_TYPE_DOUBLE"}},
            {"name": "lon", "kind": {"category": "PRIMITIVE", "of": "OM_PRIMITIVE_TYPE_DOUBLE"}}
        ]}}
    ]
}]"#;

#[test]
fn test_struct_field_from_json_schema() {
    let mut catalog = SchemaCatalog::builtin().unwrap();
    catalog.extend_from_json_str(LOCATION_SCHEMA).unwrap();
    let m = Mapper::new(registry(), catalog);

    let coordinates = StructPropertyValue::new(
        ElementProperties::new().with_property("lat", 51.05).with_property("lon", 3.72),
    );
    let entity = EntityDetail::new("loc-1", m.instance_type("Location").unwrap())
        .with_property("displayName", "Ghent")
        .with_property("coordinates", coordinates);

    let bean = m.entity_to_bean(&entity).unwrap();
    let nested = bean.properties.struct_field("coordinates").unwrap();
    assert_eq!(nested.primitive_field("lat"), Some(&PrimitiveValue::Double(51.05)));

    assert_eq!(m.bean_to_entity(&bean).unwrap(), entity);
}

#[test]
fn test_struct_field_nested_error_path() {
    let mut m = mapper();
    m.register_schema(
        BeanSchema::new("Location", InstanceKind::Entity).with_field(
            "coordinates",
            FieldKind::Struct(vec![FieldDef::primitive("lat", PrimitiveCategory::Double)]),
        ),
    )
    .unwrap();

    let mut bean = EntityBean::new("Location").with_guid("loc-2");
    bean.properties
        .set_field("coordinates", BeanProperties::new().with_field("lat", "north"));
    match m.bean_to_entity(&bean).unwrap_err() {
        Error::InvalidPrimitiveCast { property, .. } => assert_eq!(property, "coordinates.lat"),
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn test_invalid_schema_json() {
    let err = SchemaCatalog::from_json_str("{not json").unwrap_err();
    assert_eq!(err.code(), ErrorCode::MalformedJson);
}

#[test]
fn test_config_file() {
    let path = std::env::temp_dir().join(format!("mapper-config-{}.json", uuid::Uuid::new_v4()));
    std::fs::write(&path, r#"{"unmodeledProperties": "reject", "allowNarrowingCasts": false}"#).unwrap();

    let config = MapperConfig::from_json_file(&path).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert_eq!(config.unmodeled_properties, UnmodeledPolicy::Reject);
    assert_eq!(config.unmodeled_classifications, UnmodeledPolicy::Preserve);
    assert!(!config.allow_narrowing_casts);

    let m = mapper_with(config);
    assert!(m.entity_to_bean(&rating(&m).with_property("futureField", 1)).is_err());
}

#[test]
fn test_config_errors() {
    let err = MapperConfig::from_json_str(r#"{"unmodeledProps": "reject"}"#).unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidConfiguration);

    let err = MapperConfig::from_json_file("/nonexistent/mapper.json").unwrap_err();
    assert_eq!(err.code(), ErrorCode::IoFailure);
    assert!(err.report().is_internal());
}

// ============================================================================
// 6. Round-trip properties
// ============================================================================

proptest! {
    #[test]
    fn prop_data_file_round_trip(
        qualified_name in "[a-z]{1,12}",
        zones in prop::collection::vec("[a-z]{1,8}", 0..5),
        additional in prop::collection::btree_map("[a-z]{1,6}", "[a-z0-9]{0,6}", 0..4),
        extras in prop::collection::btree_map("x[a-z]{1,6}", any::<i64>(), 0..4),
        created in 0i64..4_000_000_000_000,
    ) {
        let m = mapper();
        let mut entity = EntityDetail::new("file-p", m.instance_type("DataFile").unwrap())
            .with_property("qualifiedName", qualified_name.as_str())
            .with_property("createTime", millis(created));
        if !zones.is_empty() {
            entity = entity.with_property("zoneMembership", ArrayPropertyValue::from_values(zones.iter().map(String::as_str)));
        }
        if !additional.is_empty() {
            entity = entity.with_property(
                "additionalProperties",
                MapPropertyValue::from_pairs(additional.iter().map(|(k, v)| (k.as_str(), v.as_str()))),
            );
        }
        for (name, value) in &extras {
            entity = entity.with_property(name.as_str(), *value);
        }

        let bean = m.entity_to_bean(&entity).unwrap();
        prop_assert_eq!(bean.properties.extra_attributes.len(), extras.len());
        prop_assert_eq!(m.bean_to_entity(&bean).unwrap(), entity);
    }

    #[test]
    fn prop_rating_bean_round_trip(ordinal in prop::sample::select(vec![0, 1, 2, 3, 4, 99]), review in "[ -~]{0,40}") {
        let m = mapper();
        let stars = StarRating::from_ordinal(ordinal).unwrap();
        let mut bean = EntityBean::new("Rating").with_guid("r-p").with_field("review", review.as_str());
        bean.properties.set_enum_field("stars", stars);

        let entity = m.bean_to_entity(&bean).unwrap();
        let back = m.entity_to_bean(&entity).unwrap();
        prop_assert_eq!(back.properties.enum_field::<StarRating>("stars"), Some(stars));
        prop_assert_eq!(back.properties, bean.properties);
    }
}
