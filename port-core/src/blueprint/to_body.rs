//! Configuration model → wire blueprint

use std::collections::BTreeMap;

use serde_json::{Value as Json, json};

use crate::blueprint::model::{
    AggregationMethod, AggregationPropertyModel, ArrayPropModel, BlueprintModel,
    BlueprintPropertiesModel, PropertyMetaModel,
};
use crate::error::{MappingError, MappingResult};
use crate::schema::{
    AggregationProperty, Blueprint, BlueprintProperty, BlueprintSchema, CalculationSpec, ItemType,
    PropertyType, item_schema,
};
use crate::value::{decode_json, decode_object};

/// Build the create/update request body for a blueprint
///
/// Fails without side effects when a property name appears in two groups, an
/// array declaration sets more than one item group, or JSON text is malformed.
pub fn blueprint_to_body(model: &BlueprintModel) -> MappingResult<Blueprint> {
    let schema = match &model.properties {
        Some(properties) => schema_to_body(properties)?,
        None => BlueprintSchema::default(),
    };

    let aggregation_properties = model
        .aggregation_properties
        .iter()
        .map(|(name, aggregation)| Ok((name.clone(), aggregation_to_body(name, aggregation)?)))
        .collect::<MappingResult<BTreeMap<_, _>>>()?;

    Ok(Blueprint {
        identifier: model.identifier.clone(),
        title: Some(model.title.clone()),
        icon: model.icon.clone(),
        description: model.description.clone(),
        schema,
        relations: model.relations.clone(),
        mirror_properties: model.mirror_properties.clone(),
        calculation_properties: model.calculation_properties.clone(),
        aggregation_properties,
        changelog_destination: model.changelog_destination.clone(),
        ..Blueprint::default()
    })
}

fn schema_to_body(props: &BlueprintPropertiesModel) -> MappingResult<BlueprintSchema> {
    let mut schema = BlueprintSchema::default();

    for (name, prop) in &props.string_props {
        let property = BlueprintProperty {
            default: prop.default.clone().map(Json::String),
            format: prop.format.clone(),
            min_length: prop.min_length,
            max_length: prop.max_length,
            pattern: prop.pattern.clone(),
            enum_values: prop.enum_values.as_ref().map(|values| values.iter().map(|v| json!(v)).collect()),
            enum_colors: prop.enum_colors.clone(),
            spec: prop.spec.clone(),
            spec_authentication: prop.spec_authentication.clone(),
            ..declared(PropertyType::String, &prop.meta)
        };
        insert_property(&mut schema, name, &prop.meta, property)?;
    }

    for (name, prop) in &props.number_props {
        let property = BlueprintProperty {
            default: prop.default.map(|n| json!(n)),
            minimum: prop.minimum,
            maximum: prop.maximum,
            enum_values: prop.enum_values.as_ref().map(|values| values.iter().map(|v| json!(v)).collect()),
            enum_colors: prop.enum_colors.clone(),
            ..declared(PropertyType::Number, &prop.meta)
        };
        insert_property(&mut schema, name, &prop.meta, property)?;
    }

    for (name, prop) in &props.boolean_props {
        let property = BlueprintProperty {
            default: prop.default.map(Json::Bool),
            ..declared(PropertyType::Boolean, &prop.meta)
        };
        insert_property(&mut schema, name, &prop.meta, property)?;
    }

    for (name, prop) in &props.object_props {
        let default = match &prop.default {
            Some(text) => Some(Json::Object(decode_object(&format!("{}.default", name), text)?)),
            None => None,
        };
        let property = BlueprintProperty {
            default,
            spec: prop.spec.clone(),
            ..declared(PropertyType::Object, &prop.meta)
        };
        insert_property(&mut schema, name, &prop.meta, property)?;
    }

    for (name, prop) in &props.array_props {
        let property = array_to_body(name, prop)?;
        insert_property(&mut schema, name, &prop.meta, property)?;
    }

    Ok(schema)
}

fn declared(property_type: PropertyType, meta: &PropertyMetaModel) -> BlueprintProperty {
    BlueprintProperty {
        title: meta.title.clone(),
        description: meta.description.clone(),
        icon: meta.icon.clone(),
        ..BlueprintProperty::new(property_type)
    }
}

fn array_to_body(name: &str, prop: &ArrayPropModel) -> MappingResult<BlueprintProperty> {
    let groups = prop.item_groups();
    if groups.len() > 1 {
        return Err(MappingError::ConflictingItems {
            property: name.to_string(),
            groups,
        });
    }

    let mut property = BlueprintProperty {
        min_items: prop.min_items,
        max_items: prop.max_items,
        ..declared(PropertyType::Array, &prop.meta)
    };

    if let Some(items) = &prop.string_items {
        let mut schema = item_schema(ItemType::String);
        if let Some(format) = &items.format {
            schema.insert("format".to_string(), Json::String(format.clone()));
        }
        property.items = Some(schema);
        property.default = items.default.as_ref().map(|d| json!(d));
    } else if let Some(items) = &prop.number_items {
        property.items = Some(item_schema(ItemType::Number));
        property.default = items.default.as_ref().map(|d| json!(d));
    } else if let Some(items) = &prop.boolean_items {
        property.items = Some(item_schema(ItemType::Boolean));
        property.default = items.default.as_ref().map(|d| json!(d));
    } else if let Some(items) = &prop.object_items {
        property.items = Some(item_schema(ItemType::Object));
        property.default = match &items.default {
            Some(texts) => Some(Json::Array(
                texts
                    .iter()
                    .enumerate()
                    .map(|(i, text)| decode_json(&format!("{}.default[{}]", name, i), text))
                    .collect::<MappingResult<Vec<_>>>()?,
            )),
            None => None,
        };
    }

    Ok(property)
}

fn insert_property(
    schema: &mut BlueprintSchema,
    name: &str,
    meta: &PropertyMetaModel,
    property: BlueprintProperty,
) -> MappingResult<()> {
    if schema.properties.contains_key(name) {
        return Err(MappingError::DuplicateProperty {
            property: name.to_string(),
        });
    }
    schema.properties.insert(name.to_string(), property);
    if meta.required {
        schema.required.push(name.to_string());
    }
    Ok(())
}

fn aggregation_to_body(
    name: &str,
    aggregation: &AggregationPropertyModel,
) -> MappingResult<AggregationProperty> {
    let calculation_spec = match &aggregation.method {
        AggregationMethod::CountEntities => CalculationSpec {
            calculation_by: "entities".to_string(),
            func: "count".to_string(),
            ..CalculationSpec::default()
        },
        AggregationMethod::AverageEntities {
            average_of,
            measure_time_by,
        } => CalculationSpec {
            calculation_by: "entities".to_string(),
            func: "average".to_string(),
            average_of: Some(average_of.clone()),
            measure_time_by: Some(measure_time_by.clone()),
            ..CalculationSpec::default()
        },
        AggregationMethod::AverageByProperty {
            average_of,
            measure_time_by,
            property,
        } => CalculationSpec {
            calculation_by: "property".to_string(),
            func: "average".to_string(),
            property: Some(property.clone()),
            average_of: Some(average_of.clone()),
            measure_time_by: Some(measure_time_by.clone()),
        },
        AggregationMethod::AggregateByProperty { func, property } => CalculationSpec {
            calculation_by: "property".to_string(),
            func: func.clone(),
            property: Some(property.clone()),
            ..CalculationSpec::default()
        },
    };

    let query = match &aggregation.query {
        Some(text) => Some(Json::Object(decode_object(&format!("{}.query", name), text)?)),
        None => None,
    };

    Ok(AggregationProperty {
        title: aggregation.title.clone(),
        description: aggregation.description.clone(),
        icon: aggregation.icon.clone(),
        target: aggregation.target.clone(),
        calculation_spec,
        query,
    })
}
