//! Array property decoding
//!
//! A JSON array does not reveal its intended element type, so the declared
//! `items.type` from the blueprint decides how every element is read. Arrays
//! the blueprint does not type (mirror and aggregation values, or an array
//! declared without `items`) are grouped by the shape of their elements.

use log::debug;
use serde_json::Value as Json;

use crate::entity::model::ArrayPropsModel;
use crate::error::{MappingError, MappingResult};
use crate::schema::{Blueprint, ItemType};
use crate::value::PropertyValue;

/// Decode one array-valued property into the matching item group
pub(crate) fn refresh_array_property(
    array_props: &mut ArrayPropsModel,
    name: &str,
    items: Vec<Json>,
    blueprint: &Blueprint,
) -> MappingResult<()> {
    let item_type = match blueprint.items_type(name) {
        Some(declared) => declared,
        None => {
            let inferred = ItemType::infer(&items);
            debug!(
                "array property '{}' has no declared items.type, decoding as {}",
                name, inferred
            );
            inferred
        }
    };
    debug!(
        "decoding array property '{}' ({} items) as {}",
        name,
        items.len(),
        item_type
    );

    match item_type {
        ItemType::String => {
            let values = decode_items(name, item_type, items, |value| match value {
                PropertyValue::String(s) => Ok(s),
                other => Err(other),
            })?;
            array_props.string_items.insert(name.to_string(), values);
        }
        ItemType::Number => {
            let values = decode_items(name, item_type, items, |value| match value {
                PropertyValue::Number(n) => Ok(n),
                other => Err(other),
            })?;
            array_props.number_items.insert(name.to_string(), values);
        }
        ItemType::Boolean => {
            let values = decode_items(name, item_type, items, |value| match value {
                PropertyValue::Bool(b) => Ok(b),
                other => Err(other),
            })?;
            array_props.boolean_items.insert(name.to_string(), values);
        }
        ItemType::Object => {
            // Any element shape is accepted and kept as its own JSON text
            let values = items.iter().map(Json::to_string).collect();
            array_props.object_items.insert(name.to_string(), values);
        }
    }

    Ok(())
}

/// Decode every element with `accept`, failing on the first rejected one
fn decode_items<T>(
    name: &str,
    expected: ItemType,
    items: Vec<Json>,
    accept: impl Fn(PropertyValue) -> Result<T, PropertyValue>,
) -> MappingResult<Vec<T>> {
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            accept(PropertyValue::from_json(item)).map_err(|rejected| {
                MappingError::ItemTypeMismatch {
                    property: name.to_string(),
                    index,
                    expected,
                    found: rejected.kind(),
                }
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{BlueprintProperty, PropertyType};
    use serde_json::json;

    fn blueprint() -> Blueprint {
        Blueprint::new("service")
            .property("tags", BlueprintProperty::array_of(ItemType::String))
            .property("ports", BlueprintProperty::array_of(ItemType::Number))
            .property("flags", BlueprintProperty::array_of(ItemType::Boolean))
            .property("configs", BlueprintProperty::array_of(ItemType::Object))
    }

    fn items(value: Json) -> Vec<Json> {
        match value {
            Json::Array(items) => items,
            _ => unreachable!(),
        }
    }

    #[test]
    fn string_items() {
        let mut arrays = ArrayPropsModel::default();
        refresh_array_property(&mut arrays, "tags", items(json!(["a", "b"])), &blueprint())
            .unwrap();
        assert_eq!(arrays.string_items["tags"], vec!["a", "b"]);
    }

    #[test]
    fn numeric_looking_strings_stay_strings() {
        let mut arrays = ArrayPropsModel::default();
        refresh_array_property(&mut arrays, "tags", items(json!(["1", "2"])), &blueprint())
            .unwrap();
        assert_eq!(arrays.string_items["tags"], vec!["1", "2"]);
        assert!(arrays.number_items.is_empty());
    }

    #[test]
    fn number_and_boolean_items() {
        let mut arrays = ArrayPropsModel::default();
        let bp = blueprint();
        refresh_array_property(&mut arrays, "ports", items(json!([80, 443.5])), &bp).unwrap();
        refresh_array_property(&mut arrays, "flags", items(json!([true, false])), &bp).unwrap();
        assert_eq!(arrays.number_items["ports"], vec![80.0, 443.5]);
        assert_eq!(arrays.boolean_items["flags"], vec![true, false]);
    }

    #[test]
    fn object_items_are_reencoded_in_order() {
        let mut arrays = ArrayPropsModel::default();
        refresh_array_property(
            &mut arrays,
            "configs",
            items(json!([{ "k": 1 }, { "k": 2 }, "loose"])),
            &blueprint(),
        )
        .unwrap();
        assert_eq!(
            arrays.object_items["configs"],
            vec![r#"{"k":1}"#, r#"{"k":2}"#, r#""loose""#]
        );
    }

    #[test]
    fn properties_accumulate_within_a_group() {
        let bp = blueprint().property("aliases", BlueprintProperty::array_of(ItemType::String));
        let mut arrays = ArrayPropsModel::default();
        refresh_array_property(&mut arrays, "tags", items(json!(["a"])), &bp).unwrap();
        refresh_array_property(&mut arrays, "aliases", items(json!(["b"])), &bp).unwrap();
        assert_eq!(arrays.string_items.len(), 2);
    }

    #[test]
    fn mismatched_item_is_an_error() {
        let mut arrays = ArrayPropsModel::default();
        let err =
            refresh_array_property(&mut arrays, "ports", items(json!([80, "443"])), &blueprint())
                .unwrap_err();
        match err {
            MappingError::ItemTypeMismatch {
                property,
                index,
                expected,
                found,
            } => {
                assert_eq!(property, "ports");
                assert_eq!(index, 1);
                assert_eq!(expected, ItemType::Number);
                assert_eq!(found, "string");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(arrays.number_items.is_empty());
    }

    #[test]
    fn undeclared_items_are_grouped_by_shape() {
        let bp = blueprint().property("labels", BlueprintProperty::new(PropertyType::Array));
        let mut arrays = ArrayPropsModel::default();
        refresh_array_property(&mut arrays, "labels", items(json!(["a", "b"])), &bp).unwrap();
        refresh_array_property(&mut arrays, "sizes", items(json!([1, 2.5])), &bp).unwrap();
        refresh_array_property(&mut arrays, "toggles", items(json!([true])), &bp).unwrap();
        refresh_array_property(&mut arrays, "mixed", items(json!([1, "a", { "k": 1 }])), &bp)
            .unwrap();
        refresh_array_property(&mut arrays, "none", items(json!([])), &bp).unwrap();

        assert_eq!(arrays.string_items["labels"], vec!["a", "b"]);
        assert_eq!(arrays.number_items["sizes"], vec![1.0, 2.5]);
        assert_eq!(arrays.boolean_items["toggles"], vec![true]);
        assert_eq!(arrays.object_items["mixed"], vec!["1", r#""a""#, r#"{"k":1}"#]);
        assert!(arrays.string_items["none"].is_empty());
    }

    #[test]
    fn unsupported_declared_items_type_falls_back_to_shape() {
        let mut property = BlueprintProperty::new(PropertyType::Array);
        property.items = Some(json!({ "type": "geo" }).as_object().cloned().unwrap());
        let bp = blueprint().property("points", property);
        let mut arrays = ArrayPropsModel::default();
        refresh_array_property(&mut arrays, "points", items(json!([1, 2])), &bp).unwrap();
        assert_eq!(arrays.number_items["points"], vec![1.0, 2.0]);
    }
}
