//! Provider - Trait abstracting resource operations
//!
//! A Provider maps resource configurations onto a remote catalog API.
//! It is responsible for turning create/read/update/delete requests into API calls
//! and API responses back into refreshed resource state.

use std::future::Future;
use std::pin::Pin;

use crate::resource::{Resource, ResourceId, ResourceKind, State};

/// Error type for Provider operations
#[derive(Debug)]
pub struct ProviderError {
    pub message: String,
    pub resource_id: Option<ResourceId>,
    pub cause: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl std::fmt::Display for ProviderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(ref id) = self.resource_id {
            write!(f, "[{}] {}", id, self.message)?;
        } else {
            write!(f, "{}", self.message)?;
        }
        if let Some(ref cause) = self.cause {
            write!(f, ": {}", cause)?;
        }
        Ok(())
    }
}

impl std::error::Error for ProviderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause
            .as_ref()
            .map(|e| e.as_ref() as &dyn std::error::Error)
    }
}

impl ProviderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            resource_id: None,
            cause: None,
        }
    }

    pub fn for_resource(mut self, id: ResourceId) -> Self {
        self.resource_id = Some(id);
        self
    }

    pub fn with_cause(mut self, cause: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }
}

pub type ProviderResult<T> = Result<T, ProviderError>;

/// Return type for async operations
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Definition of resource types that a Provider can handle
pub trait ResourceType: Send + Sync {
    /// Resource type name (e.g., "port_entity")
    fn name(&self) -> &'static str;

    /// Kind of resource this type manages
    fn kind(&self) -> ResourceKind;

    /// One-line description for help output
    fn description(&self) -> &'static str {
        ""
    }
}

/// Main Provider trait
///
/// All operations are async and involve exactly the API calls needed for the
/// requested change; nothing is cached between calls.
pub trait Provider: Send + Sync {
    /// Name of this Provider (e.g., "port")
    fn name(&self) -> &'static str;

    /// List of resource types this Provider can handle
    fn resource_types(&self) -> Vec<Box<dyn ResourceType>>;

    /// Get the current state of a resource
    ///
    /// Returns `State::not_found()` if the resource does not exist.
    fn read(&self, id: &ResourceId) -> BoxFuture<'_, ProviderResult<State>>;

    /// Create a resource and return its refreshed state
    fn create(&self, resource: &Resource) -> BoxFuture<'_, ProviderResult<State>>;

    /// Update a resource from its previous state to the desired configuration
    fn update(
        &self,
        id: &ResourceId,
        from: &State,
        to: &Resource,
    ) -> BoxFuture<'_, ProviderResult<State>>;

    /// Delete a resource
    fn delete(&self, id: &ResourceId) -> BoxFuture<'_, ProviderResult<()>>;
}

/// Provider implementation for Box<dyn Provider>
/// This enables dynamic dispatch for Providers
impl Provider for Box<dyn Provider> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn resource_types(&self) -> Vec<Box<dyn ResourceType>> {
        (**self).resource_types()
    }

    fn read(&self, id: &ResourceId) -> BoxFuture<'_, ProviderResult<State>> {
        (**self).read(id)
    }

    fn create(&self, resource: &Resource) -> BoxFuture<'_, ProviderResult<State>> {
        (**self).create(resource)
    }

    fn update(
        &self,
        id: &ResourceId,
        from: &State,
        to: &Resource,
    ) -> BoxFuture<'_, ProviderResult<State>> {
        (**self).update(id, from, to)
    }

    fn delete(&self, id: &ResourceId) -> BoxFuture<'_, ProviderResult<()>> {
        (**self).delete(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityModel;
    use crate::error::MappingError;

    // Mock Provider for testing
    struct MockProvider;

    impl Provider for MockProvider {
        fn name(&self) -> &'static str {
            "mock"
        }

        fn resource_types(&self) -> Vec<Box<dyn ResourceType>> {
            vec![]
        }

        fn read(&self, id: &ResourceId) -> BoxFuture<'_, ProviderResult<State>> {
            let id = id.clone();
            Box::pin(async move { Ok(State::not_found(id)) })
        }

        fn create(&self, resource: &Resource) -> BoxFuture<'_, ProviderResult<State>> {
            let resource = resource.clone();
            Box::pin(async move { Ok(State::existing(resource)) })
        }

        fn update(
            &self,
            _id: &ResourceId,
            _from: &State,
            to: &Resource,
        ) -> BoxFuture<'_, ProviderResult<State>> {
            let to = to.clone();
            Box::pin(async move { Ok(State::existing(to)) })
        }

        fn delete(&self, _id: &ResourceId) -> BoxFuture<'_, ProviderResult<()>> {
            Box::pin(async { Ok(()) })
        }
    }

    #[tokio::test]
    async fn mock_provider_read_returns_not_found() {
        let provider: Box<dyn Provider> = Box::new(MockProvider);
        let id = ResourceId::new(ResourceKind::Entity, "service", "svc-1");
        let state = provider.read(&id).await.unwrap();
        assert!(!state.exists());
    }

    #[tokio::test]
    async fn mock_provider_create_returns_existing() {
        let provider = MockProvider;
        let resource = Resource::Entity(EntityModel::new("service", "svc-1"));
        let state = provider.create(&resource).await.unwrap();
        assert!(state.exists());
        assert_eq!(state.id.identifier, "svc-1");
    }

    #[test]
    fn error_display_includes_resource_and_cause() {
        let err = ProviderError::new("Failed to build request body")
            .for_resource(ResourceId::new(ResourceKind::Entity, "service", "svc-1"))
            .with_cause(MappingError::DuplicateProperty {
                property: "x".into(),
            });
        assert_eq!(
            err.to_string(),
            "[entity.service.svc-1] Failed to build request body: Property 'x' is declared in more than one property group"
        );
        assert!(std::error::Error::source(&err).is_some());
    }
}
