//! Request and response envelopes of the catalog API
//!
//! Every response carries an `ok` flag next to its payload. The flag is checked
//! before these types are decoded, so they only describe the payload.

use port_core::entity::Entity;
use port_core::schema::Blueprint;
use port_core::scorecard::Scorecard;
use serde::{Deserialize, Serialize};
use serde_json::Value as Json;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AccessTokenRequest<'a> {
    pub client_id: &'a str,
    pub client_secret: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AccessTokenResponse {
    pub access_token: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EntityEnvelope {
    pub entity: Entity,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BlueprintEnvelope {
    pub blueprint: Blueprint,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ScorecardEnvelope {
    pub scorecard: Scorecard,
}

/// Entity search request
///
/// `query` is sent as the request body; the remaining fields become query
/// parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchRequest {
    pub query: Json,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude_calculated_properties: Option<bool>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub include: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub exclude: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attach_title_to_relation: Option<bool>,
}

impl SearchRequest {
    pub fn new(query: Json) -> Self {
        Self {
            query,
            ..Self::default()
        }
    }

    pub(crate) fn query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(exclude) = self.exclude_calculated_properties {
            params.push(("exclude_calculated_properties", exclude.to_string()));
        }
        params.extend(self.include.iter().map(|p| ("include", p.clone())));
        params.extend(self.exclude.iter().map(|p| ("exclude", p.clone())));
        if let Some(attach) = self.attach_title_to_relation {
            params.push(("attach_title_to_relation", attach.to_string()));
        }
        params
    }
}

/// Entities matching a search
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    #[serde(default)]
    pub matching_blueprints: Vec<String>,
    #[serde(default)]
    pub entities: Vec<Entity>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn search_query_params() {
        let request = SearchRequest {
            exclude_calculated_properties: Some(true),
            include: vec!["$identifier".into(), "$title".into()],
            attach_title_to_relation: Some(false),
            ..SearchRequest::new(json!({ "combinator": "and", "rules": [] }))
        };
        assert_eq!(
            request.query_params(),
            vec![
                ("exclude_calculated_properties", "true".to_string()),
                ("include", "$identifier".to_string()),
                ("include", "$title".to_string()),
                ("attach_title_to_relation", "false".to_string()),
            ]
        );
    }

    #[test]
    fn search_response_payload() {
        let response: SearchResponse = serde_json::from_value(json!({
            "ok": true,
            "matchingBlueprints": ["service"],
            "entities": [{ "identifier": "svc-1", "blueprint": "service" }]
        }))
        .unwrap();
        assert_eq!(response.matching_blueprints, vec!["service"]);
        assert_eq!(response.entities[0].identifier, "svc-1");
    }
}
