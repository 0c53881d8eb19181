//! Port catalog provider
//!
//! Provider implementation backed by the catalog REST API.
//!
//! ## Module Structure
//!
//! - `resources` - Resource type definitions
//! - `provider` - PortProvider implementation

pub mod provider;
pub mod resources;

// Re-export main types
pub use provider::{PortProvider, SearchResult};

use port_core::provider::{BoxFuture, Provider, ProviderError, ProviderResult, ResourceType};
use port_core::resource::{Resource, ResourceId, ResourceKind, State};

use resources::resource_types;

// =============================================================================
// Provider Trait Implementation
// =============================================================================

impl Provider for PortProvider {
    fn name(&self) -> &'static str {
        "port"
    }

    fn resource_types(&self) -> Vec<Box<dyn ResourceType>> {
        resource_types()
    }

    fn read(&self, id: &ResourceId) -> BoxFuture<'_, ProviderResult<State>> {
        let id = id.clone();
        Box::pin(async move {
            match id.kind {
                ResourceKind::Blueprint => self.read_blueprint(&id).await,
                ResourceKind::Entity => self.read_entity(&id).await,
                ResourceKind::Scorecard => self.read_scorecard(&id).await,
            }
        })
    }

    fn create(&self, resource: &Resource) -> BoxFuture<'_, ProviderResult<State>> {
        let resource = resource.clone();
        Box::pin(async move {
            match &resource {
                Resource::Blueprint(model) => self.create_blueprint(model).await,
                Resource::Entity(model) => self.create_entity(model).await,
                Resource::Scorecard(model) => self.create_scorecard(model).await,
            }
        })
    }

    fn update(
        &self,
        id: &ResourceId,
        _from: &State,
        to: &Resource,
    ) -> BoxFuture<'_, ProviderResult<State>> {
        let id = id.clone();
        let to = to.clone();
        Box::pin(async move {
            match &to {
                Resource::Blueprint(model) if id.kind == ResourceKind::Blueprint => {
                    self.update_blueprint(&id, model).await
                }
                Resource::Entity(model) if id.kind == ResourceKind::Entity => {
                    self.update_entity(&id, model).await
                }
                Resource::Scorecard(model) if id.kind == ResourceKind::Scorecard => {
                    self.update_scorecard(&id, model).await
                }
                other => Err(ProviderError::new(format!(
                    "Cannot update {} with a {} configuration",
                    id.kind,
                    other.kind()
                ))
                .for_resource(id.clone())),
            }
        })
    }

    fn delete(&self, id: &ResourceId) -> BoxFuture<'_, ProviderResult<()>> {
        let id = id.clone();
        Box::pin(async move {
            match id.kind {
                ResourceKind::Blueprint => self.delete_blueprint(&id).await,
                ResourceKind::Entity => self.delete_entity(&id).await,
                ResourceKind::Scorecard => self.delete_scorecard(&id).await,
            }
        })
    }
}
