//! Schema - Blueprint type definitions
//!
//! A blueprint governs which properties an entity may carry and their declared
//! types. The entity mappers only need it to tell apart array element types,
//! which the JSON shape of an array does not reveal; the blueprint resource
//! manages the whole record.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as Json};

/// Declared type of a blueprint property
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    String,
    Number,
    Boolean,
    Object,
    Array,
    /// A type this provider does not know about
    #[default]
    #[serde(other)]
    Unknown,
}

/// Declared element type of an array property (`items.type`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemType {
    String,
    Number,
    Boolean,
    Object,
}

impl ItemType {
    /// Parse the value of an `items.type` declaration
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "string" => Some(ItemType::String),
            "number" => Some(ItemType::Number),
            "boolean" => Some(ItemType::Boolean),
            "object" => Some(ItemType::Object),
            _ => None,
        }
    }

    /// Item type implied by the elements themselves
    ///
    /// Homogeneous scalar arrays keep their scalar type; anything else,
    /// including a mixed array, is an object array. An empty array counts as
    /// strings.
    pub fn infer(items: &[Json]) -> Self {
        if items.iter().all(Json::is_string) {
            ItemType::String
        } else if items.iter().all(Json::is_number) {
            ItemType::Number
        } else if items.iter().all(Json::is_boolean) {
            ItemType::Boolean
        } else {
            ItemType::Object
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::String => "string",
            ItemType::Number => "number",
            ItemType::Boolean => "boolean",
            ItemType::Object => "object",
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single property declared in a blueprint schema
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlueprintProperty {
    #[serde(rename = "type")]
    pub property_type: PropertyType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Json>,
    #[serde(default, rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Json>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enum_colors: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_items: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_items: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spec: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spec_authentication: Option<SpecAuthentication>,
    /// Item schema for array properties; only `type` is interpreted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Map<String, Json>>,
}

impl BlueprintProperty {
    pub fn new(property_type: PropertyType) -> Self {
        Self {
            property_type,
            ..Self::default()
        }
    }

    /// Array property whose items have the given type
    pub fn array_of(item_type: ItemType) -> Self {
        Self {
            items: Some(item_schema(item_type)),
            ..Self::new(PropertyType::Array)
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Declared element type, if this property declares a supported one
    pub fn items_type(&self) -> Option<ItemType> {
        declared_items_type(self.items.as_ref())
    }
}

/// OAuth settings of an embedded URL property
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecAuthentication {
    pub client_id: String,
    pub authorization_url: String,
    pub token_url: String,
}

/// `{"type": <item_type>}`
pub(crate) fn item_schema(item_type: ItemType) -> Map<String, Json> {
    let mut items = Map::new();
    items.insert("type".to_string(), Json::String(item_type.as_str().to_string()));
    items
}

fn declared_items_type(items: Option<&Map<String, Json>>) -> Option<ItemType> {
    items
        .and_then(|items| items.get("type"))
        .and_then(Json::as_str)
        .and_then(ItemType::parse)
}

/// Property declarations of a blueprint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlueprintSchema {
    #[serde(default)]
    pub properties: BTreeMap<String, BlueprintProperty>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
}

/// A relation declared by a blueprint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlueprintRelation {
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub many: bool,
}

/// A property copied from a related entity
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MirrorProperty {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Relation path, e.g. `owner.$title`
    pub path: String,
}

/// A property computed from the entity's own fields
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculationProperty {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// jq expression evaluated against the entity
    pub calculation: String,
    #[serde(rename = "type")]
    pub property_type: PropertyType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colorized: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colors: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Map<String, Json>>,
}

impl CalculationProperty {
    pub fn items_type(&self) -> Option<ItemType> {
        declared_items_type(self.items.as_ref())
    }
}

/// A property aggregated over related entities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregationProperty {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Blueprint whose entities are aggregated
    pub target: String,
    pub calculation_spec: CalculationSpec,
    /// Filter applied to the target entities
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<Json>,
}

/// How an aggregation property is computed
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationSpec {
    /// `entities` or `property`
    pub calculation_by: String,
    pub func: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_of: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub measure_time_by: Option<String>,
}

/// Where changes to the blueprint's entities are reported
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub enum ChangelogDestination {
    Webhook {
        url: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        agent: Option<bool>,
    },
    Kafka,
}

/// A blueprint: the type definition an entity conforms to
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blueprint {
    pub identifier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub schema: BlueprintSchema,
    #[serde(default)]
    pub relations: BTreeMap<String, BlueprintRelation>,
    #[serde(default)]
    pub mirror_properties: BTreeMap<String, MirrorProperty>,
    #[serde(default)]
    pub calculation_properties: BTreeMap<String, CalculationProperty>,
    #[serde(default)]
    pub aggregation_properties: BTreeMap<String, AggregationProperty>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changelog_destination: Option<ChangelogDestination>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
}

impl Blueprint {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            ..Self::default()
        }
    }

    pub fn property(mut self, name: impl Into<String>, property: BlueprintProperty) -> Self {
        self.schema.properties.insert(name.into(), property);
        self
    }

    pub fn relation(mut self, name: impl Into<String>, relation: BlueprintRelation) -> Self {
        self.relations.insert(name.into(), relation);
        self
    }

    /// Declared element type of an array property
    ///
    /// Schema properties take precedence over calculation properties. Mirror
    /// and aggregation properties never declare one.
    pub fn items_type(&self, property: &str) -> Option<ItemType> {
        match self.schema.properties.get(property) {
            Some(declared) => declared.items_type(),
            None => self
                .calculation_properties
                .get(property)
                .and_then(CalculationProperty::items_type),
        }
    }
}
