//! Catalog provider implementation
//!
//! Turns resource configurations into catalog API calls and the API's
//! responses back into refreshed models. Blueprints are managed as resources
//! of their own and fetched on demand to supply array item types; nothing is
//! cached between calls.

use std::collections::HashMap;

use log::{debug, info};
use port_client::{ClientConfig, ClientError, PortClient, SearchRequest};
use port_core::MappingError;
use port_core::blueprint::{BlueprintModel, blueprint_to_body, refresh_blueprint_state};
use port_core::entity::{Entity, EntityModel, entity_to_body, refresh_entity_state};
use port_core::provider::{ProviderError, ProviderResult};
use port_core::resource::{Resource, ResourceId, ResourceKind, State};
use port_core::schema::Blueprint;
use port_core::scorecard::{ScorecardModel, refresh_scorecard_state, scorecard_to_body};
use serde::Serialize;

/// Entity field naming the blueprint in search `include` lists
const BLUEPRINT_FIELD: &str = "$blueprint";

/// Entities found by a search, refreshed into models
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchResult {
    pub matching_blueprints: Vec<String>,
    pub entities: Vec<EntityModel>,
}

/// Catalog Provider
pub struct PortProvider {
    client: PortClient,
}

impl PortProvider {
    pub fn new(client: PortClient) -> Self {
        Self { client }
    }

    /// Authenticate with the configured credentials and build a provider
    pub async fn connect(config: &ClientConfig) -> ProviderResult<Self> {
        let client = PortClient::connect(config)
            .await
            .map_err(|e| ProviderError::new("Failed to connect to the catalog").with_cause(e))?;
        Ok(Self::new(client))
    }

    pub fn client(&self) -> &PortClient {
        &self.client
    }

    // =========================================================================
    // Blueprint Operations
    // =========================================================================

    pub async fn read_blueprint(&self, id: &ResourceId) -> ProviderResult<State> {
        let blueprint = match self.client.read_blueprint(&id.identifier).await {
            Ok(blueprint) => blueprint,
            Err(e) if e.is_not_found() => {
                debug!("{} not found", id);
                return Ok(State::not_found(id.clone()));
            }
            Err(e) => return Err(request_error("Failed to read blueprint", id, e)),
        };

        let model = refresh_blueprint_state(blueprint).map_err(|e| mapping_error(id, e))?;
        Ok(State::existing(Resource::Blueprint(model)))
    }

    pub async fn create_blueprint(&self, model: &BlueprintModel) -> ProviderResult<State> {
        let id = ResourceId::blueprint(&model.identifier);
        let body = blueprint_to_body(model).map_err(|e| mapping_error(&id, e))?;

        let created = self
            .client
            .create_blueprint(&body)
            .await
            .map_err(|e| request_error("Failed to create blueprint", &id, e))?;
        info!("Created {}", id);

        let model = refresh_blueprint_state(created).map_err(|e| mapping_error(&id, e))?;
        Ok(State::existing(Resource::Blueprint(model)))
    }

    /// Replace the blueprint stored under `id`; a new identifier renames it
    pub async fn update_blueprint(
        &self,
        id: &ResourceId,
        model: &BlueprintModel,
    ) -> ProviderResult<State> {
        let body = blueprint_to_body(model).map_err(|e| mapping_error(id, e))?;

        let updated = self
            .client
            .update_blueprint(&id.identifier, &body)
            .await
            .map_err(|e| request_error("Failed to update blueprint", id, e))?;
        info!("Updated {}", id);

        let model = refresh_blueprint_state(updated).map_err(|e| mapping_error(id, e))?;
        Ok(State::existing(Resource::Blueprint(model)))
    }

    pub async fn delete_blueprint(&self, id: &ResourceId) -> ProviderResult<()> {
        match self.client.delete_blueprint(&id.identifier).await {
            Ok(()) => {
                info!("Deleted {}", id);
                Ok(())
            }
            Err(e) if e.is_not_found() => Ok(()),
            Err(e) => Err(request_error("Failed to delete blueprint", id, e)),
        }
    }

    // =========================================================================
    // Entity Operations
    // =========================================================================

    /// Read an entity; a missing entity yields `State::not_found`
    pub async fn read_entity(&self, id: &ResourceId) -> ProviderResult<State> {
        let entity = match self.client.read_entity(&id.identifier, &id.blueprint).await {
            Ok(entity) => entity,
            Err(e) if e.is_not_found() => {
                debug!("{} not found", id);
                return Ok(State::not_found(id.clone()));
            }
            Err(e) => return Err(request_error("Failed to read entity", id, e)),
        };

        let model = self.refresh_entity(entity, id).await?;
        Ok(State::existing(Resource::Entity(model)))
    }

    /// Upsert an entity and return its refreshed state
    pub async fn create_entity(&self, model: &EntityModel) -> ProviderResult<State> {
        let id = ResourceId::new(ResourceKind::Entity, &model.blueprint, &model.identifier);
        let body = entity_to_body(model).map_err(|e| mapping_error(&id, e))?;

        let created = self
            .client
            .create_entity(&body, model.run_id.as_deref())
            .await
            .map_err(|e| request_error("Failed to create entity", &id, e))?;
        info!("Upserted {}", id);

        let mut refreshed = self.refresh_entity(created, &id).await?;
        refreshed.run_id = model.run_id.clone();
        Ok(State::existing(Resource::Entity(refreshed)))
    }

    /// Update an entity
    ///
    /// The upsert is keyed by the configured identifier. When that differs
    /// from the identifier being updated, the old entity is deleted afterwards.
    pub async fn update_entity(&self, id: &ResourceId, model: &EntityModel) -> ProviderResult<State> {
        let state = self.create_entity(model).await?;

        if id.identifier != model.identifier || id.blueprint != model.blueprint {
            info!("Identifier changed, removing {}", id);
            self.delete_entity(id).await?;
        }

        Ok(state)
    }

    /// Delete an entity; deleting one that is already gone succeeds
    pub async fn delete_entity(&self, id: &ResourceId) -> ProviderResult<()> {
        match self.client.delete_entity(&id.identifier, &id.blueprint).await {
            Ok(()) => {
                info!("Deleted {}", id);
                Ok(())
            }
            Err(e) if e.is_not_found() => {
                debug!("{} already deleted", id);
                Ok(())
            }
            Err(e) => Err(request_error("Failed to delete entity", id, e)),
        }
    }

    async fn refresh_entity(&self, entity: Entity, id: &ResourceId) -> ProviderResult<EntityModel> {
        let blueprint = self.fetch_blueprint(&id.blueprint, id).await?;
        refresh_entity_state(entity, &blueprint).map_err(|e| mapping_error(id, e))
    }

    async fn fetch_blueprint(&self, identifier: &str, id: &ResourceId) -> ProviderResult<Blueprint> {
        self.client
            .read_blueprint(identifier)
            .await
            .map_err(|e| request_error("Failed to read blueprint", id, e))
    }

    // =========================================================================
    // Scorecard Operations
    // =========================================================================

    pub async fn read_scorecard(&self, id: &ResourceId) -> ProviderResult<State> {
        match self.client.read_scorecard(&id.blueprint, &id.identifier).await {
            Ok(scorecard) => {
                let model = refresh_scorecard_state(scorecard, &id.blueprint);
                Ok(State::existing(Resource::Scorecard(model)))
            }
            Err(e) if e.is_not_found() => Ok(State::not_found(id.clone())),
            Err(e) => Err(request_error("Failed to read scorecard", id, e)),
        }
    }

    pub async fn create_scorecard(&self, model: &ScorecardModel) -> ProviderResult<State> {
        let id = ResourceId::new(ResourceKind::Scorecard, &model.blueprint, &model.identifier);
        let body = scorecard_to_body(model).map_err(|e| mapping_error(&id, e))?;

        let created = self
            .client
            .create_scorecard(&model.blueprint, &body)
            .await
            .map_err(|e| request_error("Failed to create scorecard", &id, e))?;
        info!("Created {}", id);

        let model = refresh_scorecard_state(created, &model.blueprint);
        Ok(State::existing(Resource::Scorecard(model)))
    }

    /// Replace the scorecard stored under `id` with the configured one
    pub async fn update_scorecard(
        &self,
        id: &ResourceId,
        model: &ScorecardModel,
    ) -> ProviderResult<State> {
        let body = scorecard_to_body(model).map_err(|e| mapping_error(id, e))?;

        let updated = self
            .client
            .update_scorecard(&id.blueprint, &id.identifier, &body)
            .await
            .map_err(|e| request_error("Failed to update scorecard", id, e))?;
        info!("Updated {}", id);

        let model = refresh_scorecard_state(updated, &model.blueprint);
        Ok(State::existing(Resource::Scorecard(model)))
    }

    pub async fn delete_scorecard(&self, id: &ResourceId) -> ProviderResult<()> {
        match self.client.delete_scorecard(&id.blueprint, &id.identifier).await {
            Ok(()) => {
                info!("Deleted {}", id);
                Ok(())
            }
            Err(e) if e.is_not_found() => Ok(()),
            Err(e) => Err(request_error("Failed to delete scorecard", id, e)),
        }
    }

    // =========================================================================
    // Search
    // =========================================================================

    /// Search entities and refresh each match
    ///
    /// Calculated properties are excluded unless the request says otherwise.
    /// Each distinct blueprint among the matches is fetched once. An `include`
    /// list always asks for `$blueprint` as well; an entity that still comes
    /// back without one is attributed to the only matching blueprint, or else
    /// decoded by the shape of its values.
    pub async fn search(&self, mut request: SearchRequest) -> ProviderResult<SearchResult> {
        request.exclude_calculated_properties.get_or_insert(true);
        if !request.include.is_empty() && !request.include.iter().any(|f| f == BLUEPRINT_FIELD) {
            request.include.push(BLUEPRINT_FIELD.to_string());
        }

        let response = self
            .client
            .search_entities(&request)
            .await
            .map_err(|e| ProviderError::new("Failed to search entities").with_cause(e))?;
        debug!(
            "Search matched {} entities in {:?}",
            response.entities.len(),
            response.matching_blueprints
        );

        let mut blueprints: HashMap<String, Blueprint> = HashMap::new();
        let mut entities = Vec::with_capacity(response.entities.len());
        for mut entity in response.entities {
            if entity.blueprint.is_empty() {
                if let [only] = response.matching_blueprints.as_slice() {
                    entity.blueprint = only.clone();
                }
            }

            let id = ResourceId::new(ResourceKind::Entity, &entity.blueprint, &entity.identifier);
            if !blueprints.contains_key(&entity.blueprint) {
                let blueprint = if entity.blueprint.is_empty() {
                    debug!("{} has no blueprint, decoding arrays by shape", id);
                    Blueprint::default()
                } else {
                    self.fetch_blueprint(&entity.blueprint, &id).await?
                };
                blueprints.insert(entity.blueprint.clone(), blueprint);
            }
            let blueprint = &blueprints[&entity.blueprint];
            entities.push(refresh_entity_state(entity, blueprint).map_err(|e| mapping_error(&id, e))?);
        }

        Ok(SearchResult {
            matching_blueprints: response.matching_blueprints,
            entities,
        })
    }
}

// =============================================================================
// Error Helpers
// =============================================================================

fn request_error(message: &str, id: &ResourceId, e: ClientError) -> ProviderError {
    ProviderError::new(message)
        .for_resource(id.clone())
        .with_cause(e)
}

fn mapping_error(id: &ResourceId, e: MappingError) -> ProviderError {
    ProviderError::new("Failed to map resource")
        .for_resource(id.clone())
        .with_cause(e)
}
