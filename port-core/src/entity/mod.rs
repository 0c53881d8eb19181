//! Entity - Catalog records and their configuration-side mirror
//!
//! - `Entity` is the wire record exchanged with the catalog API
//! - `model` holds the typed configuration containers
//! - `to_body` / `to_state` translate between the two

mod array;
pub mod model;
mod to_body;
mod to_state;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value as Json};

pub use model::{ArrayPropsModel, EntityModel, EntityPropertiesModel, RelationModel};
pub use to_body::entity_to_body;
pub use to_state::refresh_entity_state;

/// Entity record as exchanged with the catalog API
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    #[serde(default)]
    pub identifier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub blueprint: String,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub team: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub properties: Map<String, Json>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub relations: Map<String, Json>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
}

impl Entity {
    pub fn new(blueprint: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            blueprint: blueprint.into(),
            ..Self::default()
        }
    }
}

/// Treat an explicit `null` like a missing field
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
