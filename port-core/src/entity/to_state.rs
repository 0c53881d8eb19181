//! Wire entity → configuration model

use log::debug;
use serde_json::{Map, Value as Json};

use crate::entity::Entity;
use crate::entity::array::refresh_array_property;
use crate::entity::model::{EntityModel, EntityPropertiesModel, RelationModel};
use crate::error::{MappingError, MappingResult};
use crate::schema::Blueprint;
use crate::value::PropertyValue;

/// Rebuild the configuration model of an entity from its wire record
///
/// The blueprint is only consulted for array-valued properties. Request-only
/// fields such as `run_id` are left unset; the caller carries them over.
pub fn refresh_entity_state(entity: Entity, blueprint: &Blueprint) -> MappingResult<EntityModel> {
    let mut state = EntityModel {
        identifier: entity.identifier,
        blueprint: blueprint.identifier.clone(),
        title: entity.title,
        icon: entity.icon,
        created_at: entity.created_at.map(|t| t.to_rfc3339()),
        created_by: entity.created_by,
        updated_at: entity.updated_at.map(|t| t.to_rfc3339()),
        updated_by: entity.updated_by,
        ..EntityModel::default()
    };

    if !entity.team.is_empty() {
        state.teams = entity.team;
    }

    if !entity.properties.is_empty() {
        let properties = refresh_properties(entity.properties, blueprint)?;
        state.properties = (!properties.is_empty()).then_some(properties);
    }

    if !entity.relations.is_empty() {
        let relations = refresh_relations(entity.relations)?;
        state.relations = (!relations.is_empty()).then_some(relations);
    }

    Ok(state)
}

fn refresh_properties(
    properties: Map<String, Json>,
    blueprint: &Blueprint,
) -> MappingResult<EntityPropertiesModel> {
    let mut props = EntityPropertiesModel::default();

    for (name, raw) in properties {
        match PropertyValue::from_json(raw) {
            PropertyValue::Null => debug!("property '{}' is null, omitting", name),
            PropertyValue::Number(n) => {
                props.number_props.insert(name, n);
            }
            PropertyValue::String(s) => {
                props.string_props.insert(name, s);
            }
            PropertyValue::Bool(b) => {
                props.boolean_props.insert(name, b);
            }
            PropertyValue::List(items) => {
                let arrays = props.array_props.get_or_insert_with(Default::default);
                refresh_array_property(arrays, &name, items, blueprint)?;
            }
            PropertyValue::Object(map) => {
                props
                    .object_props
                    .insert(name, Json::Object(map).to_string());
            }
        }
    }

    Ok(props)
}

fn refresh_relations(relations: Map<String, Json>) -> MappingResult<RelationModel> {
    let mut model = RelationModel::default();

    for (name, raw) in relations {
        match PropertyValue::from_json(raw) {
            PropertyValue::Null => {}
            PropertyValue::List(items) => {
                if items.is_empty() {
                    debug!("relation '{}' is empty, omitting", name);
                    continue;
                }
                let targets = items
                    .into_iter()
                    .enumerate()
                    .map(|(index, item)| {
                        relation_target(item).ok_or_else(|| MappingError::RelationItemType {
                            relation: name.clone(),
                            index,
                        })
                    })
                    .collect::<MappingResult<Vec<_>>>()?;
                model.many_relations.insert(name, targets);
            }
            other => match relation_target(other.clone().into_json()) {
                Some(target) if target.is_empty() => {
                    debug!("relation '{}' is empty, omitting", name);
                }
                Some(target) => {
                    model.single_relations.insert(name, target);
                }
                None => {
                    return Err(MappingError::InvalidRelation {
                        relation: name,
                        found: other.kind(),
                    });
                }
            },
        }
    }

    Ok(model)
}

/// Identifier of a related entity
///
/// Relations are plain identifiers, or `{identifier, title}` objects when the
/// API was asked to attach titles.
fn relation_target(value: Json) -> Option<String> {
    match value {
        Json::String(s) => Some(s),
        Json::Object(mut map) => match map.remove("identifier") {
            Some(Json::String(s)) => Some(s),
            _ => None,
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{BlueprintProperty, ItemType};
    use serde_json::json;

    fn entity(value: Json) -> Entity {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn scalar_properties_and_relations() {
        let wire = entity(json!({
            "identifier": "svc-1",
            "title": "Service 1",
            "properties": { "env": "prod", "replicas": 3, "public": true },
            "relations": { "owner": "team-x", "depends_on": ["svc-2", "svc-3"] }
        }));

        let state = refresh_entity_state(wire, &Blueprint::new("service")).unwrap();

        assert_eq!(state.identifier, "svc-1");
        assert_eq!(state.title.as_deref(), Some("Service 1"));
        assert_eq!(state.blueprint, "service");

        let props = state.properties.unwrap();
        assert_eq!(props.string_props["env"], "prod");
        assert_eq!(props.number_props["replicas"], 3.0);
        assert!(props.boolean_props["public"]);
        assert!(props.object_props.is_empty());
        assert!(props.array_props.is_none());

        let relations = state.relations.unwrap();
        assert_eq!(relations.single_relations["owner"], "team-x");
        assert_eq!(relations.many_relations["depends_on"], vec!["svc-2", "svc-3"]);
    }

    #[test]
    fn arrays_follow_blueprint_items_type() {
        let blueprint = Blueprint::new("service")
            .property("tags", BlueprintProperty::array_of(ItemType::String))
            .property("configs", BlueprintProperty::array_of(ItemType::Object));
        let wire = entity(json!({
            "identifier": "svc-1",
            "properties": {
                "tags": ["a", "b"],
                "configs": [{ "k": 1 }, { "k": 2 }]
            }
        }));

        let props = refresh_entity_state(wire, &blueprint)
            .unwrap()
            .properties
            .unwrap();
        let arrays = props.array_props.unwrap();
        assert_eq!(arrays.string_items["tags"], vec!["a", "b"]);
        assert_eq!(arrays.object_items["configs"], vec![r#"{"k":1}"#, r#"{"k":2}"#]);
    }

    #[test]
    fn object_property_becomes_json_text() {
        let wire = entity(json!({
            "identifier": "svc-1",
            "properties": { "meta": { "a": [1, 2], "b": null } }
        }));
        let props = refresh_entity_state(wire, &Blueprint::new("service"))
            .unwrap()
            .properties
            .unwrap();
        assert_eq!(props.object_props["meta"], r#"{"a":[1,2],"b":null}"#);
    }

    #[test]
    fn null_properties_are_omitted() {
        let wire = entity(json!({
            "identifier": "svc-1",
            "properties": { "env": null, "replicas": 1 }
        }));
        let props = refresh_entity_state(wire, &Blueprint::new("service"))
            .unwrap()
            .properties
            .unwrap();
        assert!(props.groups_of("env").is_empty());
        assert_eq!(props.groups_of("replicas"), vec!["number_props"]);
    }

    #[test]
    fn only_null_properties_leave_no_group() {
        let wire = entity(json!({ "identifier": "svc-1", "properties": { "env": null } }));
        let state = refresh_entity_state(wire, &Blueprint::new("service")).unwrap();
        assert!(state.properties.is_none());
    }

    #[test]
    fn empty_relations_are_dropped() {
        let wire = entity(json!({
            "identifier": "svc-1",
            "relations": { "owner": "", "depends_on": [], "parent": null }
        }));
        let state = refresh_entity_state(wire, &Blueprint::new("service")).unwrap();
        assert!(state.relations.is_none());
    }

    #[test]
    fn relations_with_attached_titles() {
        let wire = entity(json!({
            "identifier": "svc-1",
            "relations": {
                "owner": { "identifier": "team-x", "title": "Team X" },
                "depends_on": [{ "identifier": "svc-2", "title": "Service 2" }, "svc-3"]
            }
        }));
        let relations = refresh_entity_state(wire, &Blueprint::new("service"))
            .unwrap()
            .relations
            .unwrap();
        assert_eq!(relations.single_relations["owner"], "team-x");
        assert_eq!(relations.many_relations["depends_on"], vec!["svc-2", "svc-3"]);
    }

    #[test]
    fn invalid_relation_values() {
        let wire = entity(json!({ "identifier": "svc-1", "relations": { "owner": 7 } }));
        let err = refresh_entity_state(wire, &Blueprint::new("service")).unwrap_err();
        assert!(matches!(err, MappingError::InvalidRelation { found: "number", .. }));

        let wire = entity(json!({ "identifier": "svc-1", "relations": { "deps": ["a", 1] } }));
        let err = refresh_entity_state(wire, &Blueprint::new("service")).unwrap_err();
        assert!(matches!(err, MappingError::RelationItemType { index: 1, .. }));
    }

    #[test]
    fn teams_and_audit_fields() {
        let wire = entity(json!({
            "identifier": "svc-1",
            "team": ["platform", "sre"],
            "createdAt": "2024-01-02T03:04:05Z",
            "createdBy": "alice",
            "updatedAt": "2024-01-03T03:04:05Z",
            "updatedBy": "bob"
        }));
        let state = refresh_entity_state(wire, &Blueprint::new("service")).unwrap();
        assert_eq!(state.teams, vec!["platform", "sre"]);
        assert_eq!(state.created_at.as_deref(), Some("2024-01-02T03:04:05+00:00"));
        assert_eq!(state.updated_by.as_deref(), Some("bob"));
        assert!(state.run_id.is_none());
    }
}
