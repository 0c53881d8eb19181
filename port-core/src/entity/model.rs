//! Configuration-side entity model
//!
//! The typed mirror of the untyped wire properties. Properties are partitioned by
//! declared type; objects are carried as JSON text because the configuration
//! grammar has no arbitrary nested type.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Entity as declared in configuration and persisted as state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityModel {
    pub identifier: String,
    pub blueprint: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Action run that owns changes to this entity (request-only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_id: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub teams: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<EntityPropertiesModel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relations: Option<RelationModel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
}

impl EntityModel {
    pub fn new(blueprint: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            blueprint: blueprint.into(),
            ..Self::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_properties(mut self, properties: EntityPropertiesModel) -> Self {
        self.properties = Some(properties);
        self
    }

    pub fn with_relations(mut self, relations: RelationModel) -> Self {
        self.relations = Some(relations);
        self
    }
}

/// Entity properties grouped by declared type
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityPropertiesModel {
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub string_props: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub number_props: BTreeMap<String, f64>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub boolean_props: BTreeMap<String, bool>,
    /// Object properties as JSON text
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub object_props: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub array_props: Option<ArrayPropsModel>,
}

impl EntityPropertiesModel {
    pub fn is_empty(&self) -> bool {
        self.string_props.is_empty()
            && self.number_props.is_empty()
            && self.boolean_props.is_empty()
            && self.object_props.is_empty()
            && self.array_props.as_ref().is_none_or(ArrayPropsModel::is_empty)
    }

    /// Names of the groups holding `name`; a well-formed model yields at most one
    pub fn groups_of(&self, name: &str) -> Vec<&'static str> {
        let mut groups = Vec::new();
        if self.string_props.contains_key(name) {
            groups.push("string_props");
        }
        if self.number_props.contains_key(name) {
            groups.push("number_props");
        }
        if self.boolean_props.contains_key(name) {
            groups.push("boolean_props");
        }
        if self.object_props.contains_key(name) {
            groups.push("object_props");
        }
        if let Some(arrays) = &self.array_props {
            groups.extend(arrays.groups_of(name));
        }
        groups
    }
}

/// Array properties grouped by declared item type
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArrayPropsModel {
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub string_items: BTreeMap<String, Vec<String>>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub number_items: BTreeMap<String, Vec<f64>>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub boolean_items: BTreeMap<String, Vec<bool>>,
    /// Object items, each element as JSON text
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub object_items: BTreeMap<String, Vec<String>>,
}

impl ArrayPropsModel {
    pub fn is_empty(&self) -> bool {
        self.string_items.is_empty()
            && self.number_items.is_empty()
            && self.boolean_items.is_empty()
            && self.object_items.is_empty()
    }

    fn groups_of(&self, name: &str) -> Vec<&'static str> {
        [
            ("array_props.string_items", self.string_items.contains_key(name)),
            ("array_props.number_items", self.number_items.contains_key(name)),
            ("array_props.boolean_items", self.boolean_items.contains_key(name)),
            ("array_props.object_items", self.object_items.contains_key(name)),
        ]
        .into_iter()
        .filter_map(|(group, present)| present.then_some(group))
        .collect()
    }
}

/// Entity relations by cardinality
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelationModel {
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub single_relations: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub many_relations: BTreeMap<String, Vec<String>>,
}

impl RelationModel {
    pub fn is_empty(&self) -> bool {
        self.single_relations.is_empty() && self.many_relations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserialize_config_with_missing_groups() {
        let model: EntityModel = serde_json::from_value(json!({
            "identifier": "svc-1",
            "blueprint": "service",
            "properties": {
                "string_props": { "env": "prod" },
                "array_props": { "number_items": { "ports": [80, 443] } }
            },
            "relations": { "single_relations": { "owner": "team-x" } }
        }))
        .unwrap();

        let props = model.properties.as_ref().unwrap();
        assert_eq!(props.string_props["env"], "prod");
        assert_eq!(
            props.array_props.as_ref().unwrap().number_items["ports"],
            vec![80.0, 443.0]
        );
        assert!(props.number_props.is_empty());
        assert_eq!(
            model.relations.unwrap().single_relations["owner"],
            "team-x"
        );
    }

    #[test]
    fn empty_array_groups_count_as_empty() {
        let props = EntityPropertiesModel {
            array_props: Some(ArrayPropsModel::default()),
            ..Default::default()
        };
        assert!(props.is_empty());
    }

    #[test]
    fn groups_of_reports_every_holder() {
        let mut props = EntityPropertiesModel::default();
        props.string_props.insert("x".to_string(), "a".to_string());
        props
            .array_props
            .get_or_insert_with(Default::default)
            .string_items
            .insert("x".to_string(), vec![]);
        assert_eq!(
            props.groups_of("x"),
            vec!["string_props", "array_props.string_items"]
        );
        assert!(props.groups_of("y").is_empty());
    }
}
