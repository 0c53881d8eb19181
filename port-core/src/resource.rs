//! Resource - Identity and state of provider-managed resources

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::blueprint::BlueprintModel;
use crate::entity::EntityModel;
use crate::scorecard::ScorecardModel;

/// Kind of resource a provider manages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Blueprint,
    Entity,
    Scorecard,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Blueprint => "blueprint",
            ResourceKind::Entity => "entity",
            ResourceKind::Scorecard => "scorecard",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "blueprint" => Ok(ResourceKind::Blueprint),
            "entity" => Ok(ResourceKind::Entity),
            "scorecard" => Ok(ResourceKind::Scorecard),
            other => Err(format!(
                "unknown resource kind '{}', expected blueprint, entity or scorecard",
                other
            )),
        }
    }
}

/// Unique identifier for a resource
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceId {
    pub kind: ResourceKind,
    /// Blueprint the resource belongs to; a blueprint belongs to itself
    pub blueprint: String,
    /// Identifier of the resource within its blueprint
    pub identifier: String,
}

impl ResourceId {
    pub fn new(
        kind: ResourceKind,
        blueprint: impl Into<String>,
        identifier: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            blueprint: blueprint.into(),
            identifier: identifier.into(),
        }
    }

    /// Identity of a blueprint, which is its own blueprint
    pub fn blueprint(identifier: impl Into<String>) -> Self {
        let identifier = identifier.into();
        Self::new(ResourceKind::Blueprint, identifier.clone(), identifier)
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ResourceKind::Blueprint => write!(f, "{}.{}", self.kind, self.identifier),
            _ => write!(f, "{}.{}.{}", self.kind, self.blueprint, self.identifier),
        }
    }
}

/// Desired configuration of a resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Resource {
    Blueprint(BlueprintModel),
    Entity(EntityModel),
    Scorecard(ScorecardModel),
}

impl Resource {
    pub fn kind(&self) -> ResourceKind {
        match self {
            Resource::Blueprint(_) => ResourceKind::Blueprint,
            Resource::Entity(_) => ResourceKind::Entity,
            Resource::Scorecard(_) => ResourceKind::Scorecard,
        }
    }

    pub fn id(&self) -> ResourceId {
        match self {
            Resource::Blueprint(b) => ResourceId::blueprint(&b.identifier),
            Resource::Entity(e) => ResourceId::new(self.kind(), &e.blueprint, &e.identifier),
            Resource::Scorecard(s) => ResourceId::new(self.kind(), &s.blueprint, &s.identifier),
        }
    }
}

/// Current state fetched from the catalog
#[derive(Debug, Clone, PartialEq)]
pub struct State {
    pub id: ResourceId,
    /// Refreshed model; `None` when the resource does not exist
    pub resource: Option<Resource>,
}

impl State {
    pub fn not_found(id: ResourceId) -> Self {
        Self { id, resource: None }
    }

    pub fn existing(resource: Resource) -> Self {
        Self {
            id: resource.id(),
            resource: Some(resource),
        }
    }

    /// Whether this state exists
    pub fn exists(&self) -> bool {
        self.resource.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn tagged_resources_from_config() {
        let resources: Vec<Resource> = serde_json::from_value(json!([
            { "kind": "entity", "identifier": "svc-1", "blueprint": "service" },
            { "kind": "scorecard", "identifier": "readiness", "blueprint": "service", "title": "Readiness" }
        ]))
        .unwrap();

        assert_eq!(
            resources[0].id(),
            ResourceId::new(ResourceKind::Entity, "service", "svc-1")
        );
        assert_eq!(resources[1].kind(), ResourceKind::Scorecard);
        assert_eq!(resources[1].id().to_string(), "scorecard.service.readiness");
    }

    #[test]
    fn parse_kind() {
        assert_eq!("entity".parse::<ResourceKind>(), Ok(ResourceKind::Entity));
        assert_eq!("blueprint".parse::<ResourceKind>(), Ok(ResourceKind::Blueprint));
        assert!("team".parse::<ResourceKind>().is_err());
    }

    #[test]
    fn blueprint_identity_is_its_own_blueprint() {
        let resource: Resource = serde_json::from_value(json!({
            "kind": "blueprint",
            "identifier": "service",
            "title": "Service"
        }))
        .unwrap();
        let id = resource.id();
        assert_eq!(id, ResourceId::blueprint("service"));
        assert_eq!(id.blueprint, "service");
        assert_eq!(id.to_string(), "blueprint.service");
    }

    #[test]
    fn state_existence() {
        let id = ResourceId::new(ResourceKind::Entity, "service", "svc-1");
        assert!(!State::not_found(id.clone()).exists());
        let state = State::existing(Resource::Entity(EntityModel::new("service", "svc-1")));
        assert!(state.exists());
        assert_eq!(state.id, id);
    }
}
