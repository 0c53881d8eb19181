//! Wire blueprint → configuration model

use std::collections::BTreeMap;

use log::warn;
use serde_json::Value as Json;

use crate::blueprint::model::{
    AggregationMethod, AggregationPropertyModel, ArrayPropModel, BlueprintModel,
    BlueprintPropertiesModel, BooleanPropModel, ItemsModel, NumberPropModel, ObjectPropModel,
    PropertyMetaModel, StringItemsModel, StringPropModel, default_average_of,
    default_measure_time_by,
};
use crate::error::{MappingError, MappingResult};
use crate::schema::{
    AggregationProperty, Blueprint, BlueprintProperty, BlueprintSchema, ItemType, PropertyType,
};

/// Rebuild the configuration model of a blueprint from its wire record
///
/// Properties of a type this provider does not know are left out. An array
/// without a declared item type gets an item group only when its default
/// reveals one.
pub fn refresh_blueprint_state(blueprint: Blueprint) -> MappingResult<BlueprintModel> {
    let properties = schema_to_state(&blueprint.schema)?;

    let aggregation_properties = blueprint
        .aggregation_properties
        .into_iter()
        .map(|(name, aggregation)| {
            let model = aggregation_to_state(&name, aggregation)?;
            Ok((name, model))
        })
        .collect::<MappingResult<BTreeMap<_, _>>>()?;

    Ok(BlueprintModel {
        title: blueprint.title.unwrap_or_default(),
        icon: blueprint.icon,
        description: blueprint.description,
        properties: (!properties.is_empty()).then_some(properties),
        relations: blueprint.relations,
        mirror_properties: blueprint.mirror_properties,
        calculation_properties: blueprint.calculation_properties,
        aggregation_properties,
        changelog_destination: blueprint.changelog_destination,
        created_at: blueprint.created_at.map(|t| t.to_rfc3339()),
        created_by: blueprint.created_by,
        updated_at: blueprint.updated_at.map(|t| t.to_rfc3339()),
        updated_by: blueprint.updated_by,
        identifier: blueprint.identifier,
    })
}

fn schema_to_state(schema: &BlueprintSchema) -> MappingResult<BlueprintPropertiesModel> {
    let mut props = BlueprintPropertiesModel::default();

    for (name, property) in &schema.properties {
        let meta = PropertyMetaModel {
            title: property.title.clone(),
            description: property.description.clone(),
            icon: property.icon.clone(),
            required: schema.required.contains(name),
        };

        match property.property_type {
            PropertyType::String => {
                let model = StringPropModel {
                    meta,
                    default: declared_value(name, "default", property.default.as_ref(), &STRING)?,
                    format: property.format.clone(),
                    min_length: property.min_length,
                    max_length: property.max_length,
                    pattern: property.pattern.clone(),
                    enum_values: declared_values(name, "enum", property.enum_values.as_deref(), &STRING)?,
                    enum_colors: property.enum_colors.clone(),
                    spec: property.spec.clone(),
                    spec_authentication: property.spec_authentication.clone(),
                };
                props.string_props.insert(name.clone(), model);
            }
            PropertyType::Number => {
                let model = NumberPropModel {
                    meta,
                    default: declared_value(name, "default", property.default.as_ref(), &NUMBER)?,
                    minimum: property.minimum,
                    maximum: property.maximum,
                    enum_values: declared_values(name, "enum", property.enum_values.as_deref(), &NUMBER)?,
                    enum_colors: property.enum_colors.clone(),
                };
                props.number_props.insert(name.clone(), model);
            }
            PropertyType::Boolean => {
                let model = BooleanPropModel {
                    meta,
                    default: declared_value(name, "default", property.default.as_ref(), &BOOLEAN)?,
                };
                props.boolean_props.insert(name.clone(), model);
            }
            PropertyType::Object => {
                let model = ObjectPropModel {
                    meta,
                    default: property.default.as_ref().map(Json::to_string),
                    spec: property.spec.clone(),
                };
                props.object_props.insert(name.clone(), model);
            }
            PropertyType::Array => {
                let model = array_to_state(name, meta, property)?;
                props.array_props.insert(name.clone(), model);
            }
            PropertyType::Unknown => {
                warn!("Skipping property '{}' of unsupported type", name);
            }
        }
    }

    Ok(props)
}

fn array_to_state(
    name: &str,
    meta: PropertyMetaModel,
    property: &BlueprintProperty,
) -> MappingResult<ArrayPropModel> {
    let defaults = match &property.default {
        Some(Json::Array(items)) => Some(items.as_slice()),
        Some(_) => {
            return Err(MappingError::InvalidDeclaration {
                property: name.to_string(),
                field: "default",
                expected: "array",
            });
        }
        None => None,
    };

    let item_type = property
        .items_type()
        .or_else(|| defaults.map(ItemType::infer));

    let mut model = ArrayPropModel {
        meta,
        min_items: property.min_items,
        max_items: property.max_items,
        ..ArrayPropModel::default()
    };

    match item_type {
        Some(ItemType::String) => {
            let format = property
                .items
                .as_ref()
                .and_then(|items| items.get("format"))
                .and_then(Json::as_str)
                .map(str::to_string);
            model.string_items = Some(StringItemsModel {
                format,
                default: declared_values(name, "default", defaults, &STRING)?,
            });
        }
        Some(ItemType::Number) => {
            model.number_items = Some(ItemsModel {
                default: declared_values(name, "default", defaults, &NUMBER)?,
            });
        }
        Some(ItemType::Boolean) => {
            model.boolean_items = Some(ItemsModel {
                default: declared_values(name, "default", defaults, &BOOLEAN)?,
            });
        }
        Some(ItemType::Object) => {
            model.object_items = Some(ItemsModel {
                default: defaults.map(|items| items.iter().map(Json::to_string).collect()),
            });
        }
        None => {}
    }

    Ok(model)
}

fn aggregation_to_state(
    name: &str,
    aggregation: AggregationProperty,
) -> MappingResult<AggregationPropertyModel> {
    let spec = aggregation.calculation_spec;
    let method = match (spec.calculation_by.as_str(), spec.func.as_str(), spec.property) {
        ("entities", "count", _) => AggregationMethod::CountEntities,
        ("entities", "average", _) => AggregationMethod::AverageEntities {
            average_of: spec.average_of.unwrap_or_else(default_average_of),
            measure_time_by: spec.measure_time_by.unwrap_or_else(default_measure_time_by),
        },
        ("property", "average", Some(property))
            if spec.average_of.is_some() || spec.measure_time_by.is_some() =>
        {
            AggregationMethod::AverageByProperty {
                average_of: spec.average_of.unwrap_or_else(default_average_of),
                measure_time_by: spec.measure_time_by.unwrap_or_else(default_measure_time_by),
                property,
            }
        }
        ("property", func, Some(property)) => AggregationMethod::AggregateByProperty {
            func: func.to_string(),
            property,
        },
        (calculation_by, func, _) => {
            return Err(MappingError::UnsupportedAggregation {
                property: name.to_string(),
                calculation_by: calculation_by.to_string(),
                func: func.to_string(),
            });
        }
    };

    Ok(AggregationPropertyModel {
        title: aggregation.title,
        description: aggregation.description,
        icon: aggregation.icon,
        target: aggregation.target,
        method,
        query: aggregation.query.as_ref().map(Json::to_string),
    })
}

// =============================================================================
// Declared value decoding
// =============================================================================

/// Reads one declared value of the property's own type
struct Reader<T> {
    expected: &'static str,
    read: fn(&Json) -> Option<T>,
}

const STRING: Reader<String> = Reader {
    expected: "string",
    read: read_string,
};

const NUMBER: Reader<f64> = Reader {
    expected: "number",
    read: Json::as_f64,
};

const BOOLEAN: Reader<bool> = Reader {
    expected: "boolean",
    read: Json::as_bool,
};

fn read_string(value: &Json) -> Option<String> {
    value.as_str().map(str::to_string)
}

fn declared_value<T>(
    property: &str,
    field: &'static str,
    value: Option<&Json>,
    reader: &Reader<T>,
) -> MappingResult<Option<T>> {
    value.map(|v| reader.decode(property, field, v)).transpose()
}

fn declared_values<T>(
    property: &str,
    field: &'static str,
    values: Option<&[Json]>,
    reader: &Reader<T>,
) -> MappingResult<Option<Vec<T>>> {
    values
        .map(|values| {
            values
                .iter()
                .map(|v| reader.decode(property, field, v))
                .collect()
        })
        .transpose()
}

impl<T> Reader<T> {
    fn decode(&self, property: &str, field: &'static str, value: &Json) -> MappingResult<T> {
        (self.read)(value).ok_or_else(|| MappingError::InvalidDeclaration {
            property: property.to_string(),
            field,
            expected: self.expected,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ChangelogDestination;
    use serde_json::json;

    fn blueprint(value: Json) -> Blueprint {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn schema_properties_are_grouped_by_type() {
        let model = refresh_blueprint_state(blueprint(json!({
            "identifier": "service",
            "title": "Service",
            "icon": "Microservice",
            "schema": {
                "properties": {
                    "env": {
                        "type": "string",
                        "title": "Environment",
                        "default": "dev",
                        "enum": ["dev", "prod"],
                        "enumColors": { "dev": "green", "prod": "red" },
                        "minLength": 1
                    },
                    "replicas": { "type": "number", "default": 3, "enum": [1, 2, 3] },
                    "public": { "type": "boolean", "default": false },
                    "meta": { "type": "object", "default": { "key": "value" } },
                    "geo": { "type": "geo" }
                },
                "required": ["env", "public"]
            },
            "createdAt": "2024-01-02T03:04:05Z"
        })))
        .unwrap();

        assert_eq!(model.title, "Service");
        let props = model.properties.unwrap();
        let env = &props.string_props["env"];
        assert!(env.meta.required);
        assert_eq!(env.meta.title.as_deref(), Some("Environment"));
        assert_eq!(env.default.as_deref(), Some("dev"));
        assert_eq!(env.enum_values, Some(vec!["dev".to_string(), "prod".to_string()]));
        assert_eq!(env.enum_colors.as_ref().unwrap()["prod"], "red");
        assert_eq!(env.min_length, Some(1));
        assert_eq!(props.number_props["replicas"].default, Some(3.0));
        assert_eq!(props.number_props["replicas"].enum_values, Some(vec![1.0, 2.0, 3.0]));
        assert!(!props.number_props["replicas"].meta.required);
        assert_eq!(props.boolean_props["public"].default, Some(false));
        assert!(props.boolean_props["public"].meta.required);
        assert_eq!(props.object_props["meta"].default.as_deref(), Some(r#"{"key":"value"}"#));
        assert!(!props.string_props.contains_key("geo"));
        assert_eq!(model.created_at.as_deref(), Some("2024-01-02T03:04:05+00:00"));
    }

    #[test]
    fn blueprint_without_properties_has_none() {
        let model = refresh_blueprint_state(blueprint(json!({
            "identifier": "bare",
            "title": "Bare",
            "schema": { "properties": {} }
        })))
        .unwrap();
        assert!(model.properties.is_none());
    }

    #[test]
    fn array_defaults_land_in_their_item_group() {
        let model = refresh_blueprint_state(blueprint(json!({
            "identifier": "service",
            "schema": {
                "properties": {
                    "tags": {
                        "type": "array",
                        "items": { "type": "string", "format": "user" },
                        "default": ["a", "b"],
                        "minItems": 1
                    },
                    "ports": { "type": "array", "items": { "type": "number" }, "default": [80] },
                    "flags": { "type": "array", "items": { "type": "boolean" } },
                    "configs": {
                        "type": "array",
                        "items": { "type": "object" },
                        "default": [{ "a": "b" }]
                    },
                    "loose": { "type": "array", "default": [true, false] },
                    "untyped": { "type": "array" }
                }
            }
        })))
        .unwrap();

        let arrays = model.properties.unwrap().array_props;
        let tags = arrays["tags"].string_items.as_ref().unwrap();
        assert_eq!(tags.format.as_deref(), Some("user"));
        assert_eq!(tags.default, Some(vec!["a".to_string(), "b".to_string()]));
        assert_eq!(arrays["tags"].min_items, Some(1));
        assert_eq!(arrays["ports"].number_items.as_ref().unwrap().default, Some(vec![80.0]));
        assert_eq!(arrays["flags"].boolean_items, Some(ItemsModel { default: None }));
        assert_eq!(
            arrays["configs"].object_items.as_ref().unwrap().default,
            Some(vec![r#"{"a":"b"}"#.to_string()])
        );
        assert_eq!(
            arrays["loose"].boolean_items.as_ref().unwrap().default,
            Some(vec![true, false])
        );
        assert!(arrays["untyped"].item_groups().is_empty());
    }

    #[test]
    fn mistyped_default_is_an_error() {
        let err = refresh_blueprint_state(blueprint(json!({
            "identifier": "service",
            "schema": {
                "properties": {
                    "ports": { "type": "array", "items": { "type": "number" }, "default": [80, "443"] }
                }
            }
        })))
        .unwrap_err();
        assert!(matches!(
            err,
            MappingError::InvalidDeclaration { property, field: "default", expected: "number" }
                if property == "ports"
        ));
    }

    #[test]
    fn aggregations_and_mirrors_are_kept() {
        let model = refresh_blueprint_state(blueprint(json!({
            "identifier": "team",
            "mirrorProperties": {
                "lead_name": { "title": "Lead", "path": "lead.$title" }
            },
            "aggregationProperties": {
                "services": {
                    "target": "service",
                    "calculationSpec": { "calculationBy": "entities", "func": "count" }
                },
                "avg_deploys": {
                    "target": "deployment",
                    "calculationSpec": { "calculationBy": "entities", "func": "average" }
                },
                "max_age": {
                    "target": "service",
                    "calculationSpec": { "calculationBy": "property", "func": "max", "property": "age" },
                    "query": { "combinator": "and", "rules": [] }
                }
            },
            "changelogDestination": { "type": "KAFKA" }
        })))
        .unwrap();

        assert_eq!(model.mirror_properties["lead_name"].path, "lead.$title");
        let aggregations = &model.aggregation_properties;
        assert_eq!(aggregations["services"].method, AggregationMethod::CountEntities);
        assert_eq!(
            aggregations["avg_deploys"].method,
            AggregationMethod::AverageEntities {
                average_of: "day".into(),
                measure_time_by: "$createdAt".into()
            }
        );
        assert_eq!(
            aggregations["max_age"].method,
            AggregationMethod::AggregateByProperty {
                func: "max".into(),
                property: "age".into()
            }
        );
        assert_eq!(
            aggregations["max_age"].query.as_deref(),
            Some(r#"{"combinator":"and","rules":[]}"#)
        );
        assert_eq!(model.changelog_destination, Some(ChangelogDestination::Kafka));
    }

    #[test]
    fn unknown_aggregation_spec_is_an_error() {
        let err = refresh_blueprint_state(blueprint(json!({
            "identifier": "team",
            "aggregationProperties": {
                "odd": {
                    "target": "service",
                    "calculationSpec": { "calculationBy": "pairs", "func": "zip" }
                }
            }
        })))
        .unwrap_err();
        assert!(matches!(err, MappingError::UnsupportedAggregation { property, .. } if property == "odd"));
    }
}
