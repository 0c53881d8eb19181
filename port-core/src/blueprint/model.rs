//! Configuration-side blueprint model
//!
//! Property declarations are partitioned by type like entity properties, so
//! each group only carries the settings its type supports. Defaults of object
//! type are JSON text.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::schema::{
    BlueprintRelation, CalculationProperty, ChangelogDestination, MirrorProperty,
    SpecAuthentication,
};

/// Blueprint as declared in configuration and persisted as state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlueprintModel {
    pub identifier: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<BlueprintPropertiesModel>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub relations: BTreeMap<String, BlueprintRelation>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub mirror_properties: BTreeMap<String, MirrorProperty>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub calculation_properties: BTreeMap<String, CalculationProperty>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub aggregation_properties: BTreeMap<String, AggregationPropertyModel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub changelog_destination: Option<ChangelogDestination>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
}

impl BlueprintModel {
    pub fn new(identifier: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_properties(mut self, properties: BlueprintPropertiesModel) -> Self {
        self.properties = Some(properties);
        self
    }
}

/// Property declarations grouped by type
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlueprintPropertiesModel {
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub string_props: BTreeMap<String, StringPropModel>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub number_props: BTreeMap<String, NumberPropModel>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub boolean_props: BTreeMap<String, BooleanPropModel>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub object_props: BTreeMap<String, ObjectPropModel>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub array_props: BTreeMap<String, ArrayPropModel>,
}

impl BlueprintPropertiesModel {
    pub fn is_empty(&self) -> bool {
        self.string_props.is_empty()
            && self.number_props.is_empty()
            && self.boolean_props.is_empty()
            && self.object_props.is_empty()
            && self.array_props.is_empty()
    }
}

/// Settings shared by every property group
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropertyMetaModel {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Listed in the schema's `required`
    pub required: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StringPropModel {
    #[serde(flatten)]
    pub meta: PropertyMetaModel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enum_colors: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spec: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spec_authentication: Option<SpecAuthentication>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NumberPropModel {
    #[serde(flatten)]
    pub meta: PropertyMetaModel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<f64>>,
    /// Keyed by the enum value as written, e.g. `"1"`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enum_colors: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BooleanPropModel {
    #[serde(flatten)]
    pub meta: PropertyMetaModel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectPropModel {
    #[serde(flatten)]
    pub meta: PropertyMetaModel,
    /// JSON text of an object
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spec: Option<String>,
}

/// Array property declaration; at most one item group may be set
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArrayPropModel {
    #[serde(flatten)]
    pub meta: PropertyMetaModel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_items: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_items: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub string_items: Option<StringItemsModel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_items: Option<ItemsModel<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boolean_items: Option<ItemsModel<bool>>,
    /// Defaults are JSON text, one value per element
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_items: Option<ItemsModel<String>>,
}

impl ArrayPropModel {
    /// Names of the item groups that are set
    pub fn item_groups(&self) -> Vec<&'static str> {
        let mut groups = Vec::new();
        if self.string_items.is_some() {
            groups.push("string_items");
        }
        if self.number_items.is_some() {
            groups.push("number_items");
        }
        if self.boolean_items.is_some() {
            groups.push("boolean_items");
        }
        if self.object_items.is_some() {
            groups.push("object_items");
        }
        groups
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StringItemsModel {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemsModel<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Vec<T>>,
}

impl<T> Default for ItemsModel<T> {
    fn default() -> Self {
        Self { default: None }
    }
}

/// Aggregation property as declared in configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregationPropertyModel {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub target: String,
    pub method: AggregationMethod,
    /// Filter on the target entities as JSON text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
}

/// How the target entities are aggregated
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregationMethod {
    #[default]
    CountEntities,
    AverageEntities {
        #[serde(default = "default_average_of")]
        average_of: String,
        #[serde(default = "default_measure_time_by")]
        measure_time_by: String,
    },
    AverageByProperty {
        #[serde(default = "default_average_of")]
        average_of: String,
        #[serde(default = "default_measure_time_by")]
        measure_time_by: String,
        property: String,
    },
    /// `func` is one of `sum`, `min`, `max`, `median`
    AggregateByProperty { func: String, property: String },
}

pub(crate) fn default_average_of() -> String {
    "day".to_string()
}

pub(crate) fn default_measure_time_by() -> String {
    "$createdAt".to_string()
}
