//! Blueprint endpoints.

use port_core::schema::Blueprint;
use reqwest::Method;
use serde::de::IgnoredAny;

use super::PortClient;
use crate::error::Result;
use crate::models::BlueprintEnvelope;

impl PortClient {
    /// Read a blueprint, including the schema needed to decode its entities.
    pub async fn read_blueprint(&self, identifier: &str) -> Result<Blueprint> {
        let url = self.endpoint(&["v1", "blueprints", identifier])?;
        let envelope: BlueprintEnvelope = self
            .send("read blueprint", self.request(Method::GET, url))
            .await?;
        Ok(envelope.blueprint)
    }

    pub async fn create_blueprint(&self, blueprint: &Blueprint) -> Result<Blueprint> {
        let url = self.endpoint(&["v1", "blueprints"])?;
        let request = self.request(Method::POST, url).json(blueprint);
        let envelope: BlueprintEnvelope = self.send("create blueprint", request).await?;
        Ok(envelope.blueprint)
    }

    /// Replace a blueprint; `identifier` addresses the existing one, so a
    /// body with a different identifier renames it.
    pub async fn update_blueprint(
        &self,
        identifier: &str,
        blueprint: &Blueprint,
    ) -> Result<Blueprint> {
        let url = self.endpoint(&["v1", "blueprints", identifier])?;
        let request = self.request(Method::PUT, url).json(blueprint);
        let envelope: BlueprintEnvelope = self.send("update blueprint", request).await?;
        Ok(envelope.blueprint)
    }

    pub async fn delete_blueprint(&self, identifier: &str) -> Result<()> {
        let url = self.endpoint(&["v1", "blueprints", identifier])?;
        let _: IgnoredAny = self
            .send("delete blueprint", self.request(Method::DELETE, url))
            .await?;
        Ok(())
    }
}
