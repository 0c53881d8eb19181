//! Scorecard - Rule sets evaluated against the entities of a blueprint
//!
//! Rule conditions are arbitrary JSON on the wire and JSON text in
//! configuration; they are decoded on the way out and re-encoded on the way in.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as Json;

use crate::error::MappingResult;
use crate::value::decode_object;

/// Scorecard record as exchanged with the catalog API
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scorecard {
    pub identifier: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub blueprint: String,
    #[serde(default)]
    pub rules: Vec<Rule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub identifier: String,
    #[serde(default)]
    pub title: String,
    pub level: String,
    pub query: Query,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Query {
    pub combinator: String,
    #[serde(default)]
    pub conditions: Vec<Json>,
}

/// Scorecard as declared in configuration and persisted as state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScorecardModel {
    pub identifier: String,
    pub blueprint: String,
    pub title: String,
    pub rules: Vec<RuleModel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleModel {
    pub identifier: String,
    pub title: String,
    pub level: String,
    pub query: QueryModel,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryModel {
    pub combinator: String,
    /// Conditions as JSON text; null entries are ignored
    pub conditions: Vec<Option<String>>,
}

/// Build the create/update request body for a scorecard
pub fn scorecard_to_body(model: &ScorecardModel) -> MappingResult<Scorecard> {
    let rules = model
        .rules
        .iter()
        .enumerate()
        .map(|(rule_index, rule)| {
            let conditions = rule
                .query
                .conditions
                .iter()
                .enumerate()
                .filter_map(|(i, condition)| condition.as_deref().map(|text| (i, text)))
                .map(|(i, text)| {
                    let field = format!("rules[{}].query.conditions[{}]", rule_index, i);
                    decode_object(&field, text).map(Json::Object)
                })
                .collect::<MappingResult<Vec<_>>>()?;

            Ok(Rule {
                identifier: rule.identifier.clone(),
                title: rule.title.clone(),
                level: rule.level.clone(),
                query: Query {
                    combinator: rule.query.combinator.clone(),
                    conditions,
                },
            })
        })
        .collect::<MappingResult<Vec<_>>>()?;

    Ok(Scorecard {
        identifier: model.identifier.clone(),
        title: model.title.clone(),
        blueprint: model.blueprint.clone(),
        rules,
        ..Scorecard::default()
    })
}

/// Rebuild the configuration model of a scorecard from its wire record
///
/// `blueprint` is used when the record does not name its blueprint.
pub fn refresh_scorecard_state(scorecard: Scorecard, blueprint: &str) -> ScorecardModel {
    let blueprint = if scorecard.blueprint.is_empty() {
        blueprint.to_string()
    } else {
        scorecard.blueprint
    };

    ScorecardModel {
        identifier: scorecard.identifier,
        blueprint,
        title: scorecard.title,
        rules: scorecard
            .rules
            .into_iter()
            .map(|rule| RuleModel {
                identifier: rule.identifier,
                title: rule.title,
                level: rule.level,
                query: QueryModel {
                    combinator: rule.query.combinator,
                    conditions: rule
                        .query
                        .conditions
                        .iter()
                        .map(|c| Some(c.to_string()))
                        .collect(),
                },
            })
            .collect(),
        created_at: scorecard.created_at.map(|t| t.to_rfc3339()),
        created_by: scorecard.created_by,
        updated_at: scorecard.updated_at.map(|t| t.to_rfc3339()),
        updated_by: scorecard.updated_by,
    }
}
