//! End-to-end tests for the property-value model.
//!
//! Container invariants of `ElementProperties`, array bounds, the absence
//! convention, value rendering and the JSON wire shape.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use open_metadata_types::{
    ArrayPropertyValue, ElementProperties, EntityDetail, EnumPropertyValue, Error, ErrorCode, InMemoryTypeRegistry,
    InstanceKind, InstanceType, MapPropertyValue, Mapper, PrimitiveCategory, PrimitiveValue, PropertyCategory,
    PropertyValue, SchemaCatalog, StructPropertyValue, Value,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn hash_of<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

// ============================================================================
// 1. ElementProperties container
// ============================================================================

#[test]
fn test_set_then_get() {
    let mut props = ElementProperties::new();
    props.set_property(Some("name"), Some(PropertyValue::from("orders"))).unwrap();
    assert_eq!(props.get_property_value("name").and_then(PropertyValue::as_str), Some("orders"));
    assert_eq!(props.property_count(), 1);
}

#[test]
fn test_set_none_removes() {
    let mut props = ElementProperties::new().with_property("name", "orders");
    props.set_property(Some("name"), None).unwrap();
    assert!(!props.contains_property("name"));
    assert!(props.is_empty());

    // Removing a property that was never there is not an error.
    props.set_property(Some("missing"), None).unwrap();
}

#[test]
fn test_null_name_rejected() {
    let mut props = ElementProperties::new();
    let err = props.set_property(None, Some(PropertyValue::from(1))).unwrap_err();
    assert!(matches!(err, Error::NullPropertyName { .. }));
    assert_eq!(err.code(), ErrorCode::NullPropertyName);
    assert!(props.is_empty());
}

#[test]
fn test_null_name_rejected_even_with_null_value() {
    let mut props = ElementProperties::new().with_property("kept", "yes");
    let before = props.clone();

    let err = props.set_property(None, None).unwrap_err();
    assert_eq!(err.code(), ErrorCode::NullPropertyName);
    assert_eq!(props, before);

    let err = props.set_property_from("AssetConverter::update", None, None).unwrap_err();
    assert!(matches!(err, Error::NullPropertyName { context: "AssetConverter::update" }));
    assert_eq!(props, before);
}

#[test]
fn test_absent_properties_convention() {
    let mut props = ElementProperties::new();
    assert!(props.instance_properties().is_none());

    props.insert("a", 1);
    assert_eq!(props.instance_properties().map(|m| m.len()), Some(1));

    props.set_instance_properties(None);
    assert!(props.instance_properties().is_none());
    assert_eq!(props.property_names().count(), 0);
}

#[test]
fn test_property_names_sorted() {
    let props: ElementProperties = [("b", PropertyValue::from(2)), ("a", PropertyValue::from(1))]
        .into_iter()
        .collect();
    let names: Vec<_> = props.property_names().collect();
    assert_eq!(names, vec!["a", "b"]);
    assert_eq!(props.property_names().len(), 2);
}

#[test]
fn test_display_is_stable() {
    let props = ElementProperties::new().with_property("b", 2).with_property("a", "x");
    assert_eq!(props.to_string(), "{a: x, b: 2}");
}

proptest! {
    #[test]
    fn prop_equality_ignores_insertion_order(entries in prop::collection::btree_map("[a-z]{1,6}", any::<i64>(), 0..12)) {
        let forward: ElementProperties = entries.iter().map(|(k, v)| (k.clone(), PropertyValue::from(*v))).collect();
        let backward: ElementProperties = entries.iter().rev().map(|(k, v)| (k.clone(), PropertyValue::from(*v))).collect();
        prop_assert_eq!(&forward, &backward);
        prop_assert_eq!(hash_of(&forward), hash_of(&backward));
        prop_assert_eq!(forward.property_count(), entries.len());
    }

    #[test]
    fn prop_set_none_always_removes(names in prop::collection::vec("[a-z]{1,4}", 1..10)) {
        let mut props = ElementProperties::new();
        for name in &names {
            props.set_property(Some(name.as_str()), Some(PropertyValue::from(name.as_str()))).unwrap();
        }
        for name in &names {
            props.set_property(Some(name.as_str()), None).unwrap();
            prop_assert!(!props.contains_property(name));
        }
        prop_assert!(props.instance_properties().is_none());
    }
}

// ============================================================================
// 2. Array bounds
// ============================================================================

#[test]
fn test_array_bounds_edge() {
    let mut array = ArrayPropertyValue::new(3);
    array.set_array_value(2, "last").unwrap();

    let err = array.set_array_value(3, "over").unwrap_err();
    match &err {
        Error::ArrayOutOfBounds { index, count, .. } => {
            assert_eq!(*index, 3);
            assert_eq!(*count, 3);
        }
        other => panic!("unexpected error {other:?}"),
    }
    assert_eq!(array.array_values().property_count(), 1);

    let report = err.report();
    assert_eq!(report.message_id, "OMT-PROPERTIES-400-002");
    assert_eq!(
        report.message,
        "ArrayPropertyValue is unable to add a new element to location 3 of an array of size 3 value"
    );
}

#[test]
fn test_zero_length_array_rejects_everything() {
    let mut array = ArrayPropertyValue::new(0);
    assert!(array.set_array_value(0, 1).is_err());
    assert_eq!(PropertyValue::from(array).value_as_object(), Value::List(Vec::new()));
}

#[test]
fn test_sparse_array_renders_present_elements() {
    let mut array = ArrayPropertyValue::new(3);
    array.set_array_value(2, "c").unwrap();
    array.set_array_value(0, "a").unwrap();
    let value = PropertyValue::from(array);
    assert_eq!(value.value_as_object(), Value::List(vec![Value::from("a"), Value::from("c")]));
    assert_eq!(value.value_as_string(), "[a, c]");
}

#[test]
fn test_huge_array_count_from_json() {
    let json = r#"{"class": "ArrayPropertyValue", "arrayCount": 1099511627776}"#;
    let value: PropertyValue = serde_json::from_str(json).unwrap();
    assert_eq!(value.as_array().map(ArrayPropertyValue::array_count), Some(1 << 40));

    // Rendering and gap detection walk the stored elements, not the declared size.
    assert_eq!(value.value_as_object(), Value::List(Vec::new()));
    assert_eq!(value.value_as_string(), "[]");
    assert_eq!(value.as_array().and_then(ArrayPropertyValue::first_gap), Some(0));

    let props = ElementProperties::new().with_property("zones", value);
    assert_eq!(props.to_value(), Value::map([("zones", Value::List(Vec::new()))]));
}

#[test]
fn test_huge_array_count_in_mapper_is_incomplete() {
    let json = r#"{"class": "ArrayPropertyValue", "arrayCount": 1099511627776, "arrayValues": {"instanceProperties": {
        "0": {"class": "PrimitivePropertyValue", "primitiveValue": {"primitiveDefCategory": "OM_PRIMITIVE_TYPE_STRING", "primitiveValue": "landing"}}
    }}}"#;
    let zones: PropertyValue = serde_json::from_str(json).unwrap();
    let entity = EntityDetail::new("f1", InstanceType::new("DataFile", InstanceKind::Entity))
        .with_property("zoneMembership", zones);
    let mapper = Mapper::new(InMemoryTypeRegistry::new(), SchemaCatalog::builtin().unwrap());
    match mapper.entity_to_bean(&entity).unwrap_err() {
        Error::IncompleteArray { missing, count, .. } => assert_eq!((missing, count), (1, 1 << 40)),
        other => panic!("unexpected error {other:?}"),
    }
}

proptest! {
    #[test]
    fn prop_array_accepts_exactly_below_count(count in 0usize..16, index in 0usize..32) {
        let mut array = ArrayPropertyValue::new(count);
        let result = array.set_array_value(index, index as i64);
        prop_assert_eq!(result.is_ok(), index < count);
    }
}

// ============================================================================
// 3. Value variants
// ============================================================================

#[test]
fn test_enum_requires_both_parts() {
    assert!(matches!(EnumPropertyValue::from_parts(Some(1), None), Err(Error::InvalidEnum { .. })));
    assert!(matches!(EnumPropertyValue::from_parts(None, Some("ONE".into())), Err(Error::InvalidEnum { .. })));
    let e = EnumPropertyValue::from_parts(Some(1), Some("ONE".into())).unwrap();
    assert_eq!((e.ordinal(), e.symbolic_name()), (1, "ONE"));
}

#[test]
fn test_primitive_category_matches_value() {
    let value = PropertyValue::from(PrimitiveValue::Long(7));
    assert_eq!(value.category(), PropertyCategory::Primitive);
    assert_eq!(value.as_primitive().map(PrimitiveValue::category), Some(PrimitiveCategory::Long));
    assert!(PrimitiveValue::from_value(PrimitiveCategory::Boolean, &Value::from("yes")).is_err());
}

#[test]
fn test_nested_struct_and_map() {
    let address = StructPropertyValue::new(ElementProperties::new().with_property("city", "Ghent"));
    let tags = MapPropertyValue::from_pairs([("tier", "gold")]);
    let props = ElementProperties::new().with_property("address", address).with_property("tags", tags);

    assert_eq!(
        props.to_value(),
        Value::map([
            ("address", Value::map([("city", Value::from("Ghent"))])),
            ("tags", Value::map([("tier", Value::from("gold"))])),
        ])
    );
}

#[test]
fn test_json_wire_shape() {
    let props = ElementProperties::new()
        .with_property("stars", PropertyValue::enumeration(2, "TWO_STARS").unwrap())
        .with_property("review", "good");
    let json = serde_json::to_string(&props).unwrap();
    assert!(json.contains("\"instanceProperties\""));
    assert!(json.contains("\"EnumPropertyValue\""));

    let back: ElementProperties = serde_json::from_str(&json).unwrap();
    assert_eq!(back, props);
}

#[test]
fn test_json_rejects_array_index_past_count() {
    let json = r#"{
        "class": "ArrayPropertyValue",
        "arrayCount": 1,
        "arrayValues": {"instanceProperties": {"5": {"class": "PrimitivePropertyValue", "primitiveValue": {"primitiveDefCategory": "OM_PRIMITIVE_TYPE_INT", "primitiveValue": 1}}}}
    }"#;
    assert!(serde_json::from_str::<PropertyValue>(json).is_err());
}
