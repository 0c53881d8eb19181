//! Entity endpoints.

use log::debug;
use port_core::entity::Entity;
use reqwest::Method;
use serde::de::IgnoredAny;

use super::PortClient;
use crate::error::Result;
use crate::models::EntityEnvelope;

impl PortClient {
    /// Read an entity without its calculated properties.
    pub async fn read_entity(&self, identifier: &str, blueprint: &str) -> Result<Entity> {
        let url = self.endpoint(&["v1", "blueprints", blueprint, "entities", identifier])?;
        let request = self
            .request(Method::GET, url)
            .query(&[("exclude_calculated_properties", "true")]);
        let envelope: EntityEnvelope = self.send("read entity", request).await?;
        Ok(envelope.entity)
    }

    /// Create or replace an entity, keyed by its identifier.
    ///
    /// `run_id` attributes the change to an action run.
    pub async fn create_entity(&self, entity: &Entity, run_id: Option<&str>) -> Result<Entity> {
        let url = self.endpoint(&["v1", "blueprints", entity.blueprint.as_str(), "entities"])?;
        let mut query = vec![("upsert", "true")];
        if let Some(run_id) = run_id.filter(|r| !r.is_empty()) {
            query.push(("run_id", run_id));
        }
        debug!("upserting entity {}/{}", entity.blueprint, entity.identifier);

        let request = self.request(Method::POST, url).query(&query).json(entity);
        let envelope: EntityEnvelope = self.send("create entity", request).await?;
        Ok(envelope.entity)
    }

    /// Delete an entity.
    pub async fn delete_entity(&self, identifier: &str, blueprint: &str) -> Result<()> {
        let url = self.endpoint(&["v1", "blueprints", blueprint, "entities", identifier])?;
        let _: IgnoredAny = self
            .send("delete entity", self.request(Method::DELETE, url))
            .await?;
        Ok(())
    }
}
