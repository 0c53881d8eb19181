//! Configuration model → wire entity

use serde_json::{Map, Value as Json, json};

use crate::entity::Entity;
use crate::entity::model::{EntityModel, EntityPropertiesModel, RelationModel};
use crate::error::{MappingError, MappingResult};
use crate::value::{decode_json, decode_object};

/// Build the create/update request body for an entity
///
/// Object values held as JSON text are decoded so the API receives structured
/// JSON; an object property must hold a JSON object, while object array items
/// may hold any JSON value. Fails without side effects on malformed text or on
/// a property declared in two groups.
pub fn entity_to_body(model: &EntityModel) -> MappingResult<Entity> {
    let properties = match &model.properties {
        Some(props) => properties_to_body(props)?,
        None => Map::new(),
    };
    let relations = match &model.relations {
        Some(relations) => relations_to_body(relations),
        None => Map::new(),
    };

    Ok(Entity {
        identifier: model.identifier.clone(),
        title: model.title.clone(),
        icon: model.icon.clone(),
        blueprint: model.blueprint.clone(),
        team: model.teams.clone(),
        properties,
        relations,
        ..Entity::default()
    })
}

fn properties_to_body(props: &EntityPropertiesModel) -> MappingResult<Map<String, Json>> {
    let mut body = Map::new();

    for (name, value) in &props.string_props {
        insert_property(&mut body, name, json!(value))?;
    }
    for (name, value) in &props.number_props {
        insert_property(&mut body, name, json!(value))?;
    }
    for (name, value) in &props.boolean_props {
        insert_property(&mut body, name, json!(value))?;
    }
    for (name, text) in &props.object_props {
        insert_property(&mut body, name, Json::Object(decode_object(name, text)?))?;
    }

    if let Some(arrays) = &props.array_props {
        for (name, items) in &arrays.string_items {
            insert_property(&mut body, name, json!(items))?;
        }
        for (name, items) in &arrays.number_items {
            insert_property(&mut body, name, json!(items))?;
        }
        for (name, items) in &arrays.boolean_items {
            insert_property(&mut body, name, json!(items))?;
        }
        for (name, items) in &arrays.object_items {
            let decoded = items
                .iter()
                .enumerate()
                .map(|(i, text)| decode_json(&format!("{}[{}]", name, i), text))
                .collect::<MappingResult<Vec<_>>>()?;
            insert_property(&mut body, name, Json::Array(decoded))?;
        }
    }

    Ok(body)
}

fn relations_to_body(relations: &RelationModel) -> Map<String, Json> {
    let single = relations
        .single_relations
        .iter()
        .filter(|(_, target)| !target.is_empty())
        .map(|(name, target)| (name.clone(), json!(target)));
    let many = relations
        .many_relations
        .iter()
        .filter(|(_, targets)| !targets.is_empty())
        .map(|(name, targets)| (name.clone(), json!(targets)));
    single.chain(many).collect()
}

fn insert_property(body: &mut Map<String, Json>, name: &str, value: Json) -> MappingResult<()> {
    if body.insert(name.to_string(), value).is_some() {
        return Err(MappingError::DuplicateProperty {
            property: name.to_string(),
        });
    }
    Ok(())
}
