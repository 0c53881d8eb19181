//! Scorecard endpoints.

use port_core::scorecard::Scorecard;
use reqwest::Method;
use serde::de::IgnoredAny;

use super::PortClient;
use crate::error::Result;
use crate::models::ScorecardEnvelope;

impl PortClient {
    pub async fn read_scorecard(&self, blueprint: &str, identifier: &str) -> Result<Scorecard> {
        let url = self.endpoint(&["v1", "blueprints", blueprint, "scorecards", identifier])?;
        let envelope: ScorecardEnvelope = self
            .send("read scorecard", self.request(Method::GET, url))
            .await?;
        Ok(envelope.scorecard)
    }

    pub async fn create_scorecard(
        &self,
        blueprint: &str,
        scorecard: &Scorecard,
    ) -> Result<Scorecard> {
        let url = self.endpoint(&["v1", "blueprints", blueprint, "scorecards"])?;
        let request = self.request(Method::POST, url).json(scorecard);
        let envelope: ScorecardEnvelope = self.send("create scorecard", request).await?;
        Ok(envelope.scorecard)
    }

    /// Replace a scorecard; `identifier` addresses the existing one.
    pub async fn update_scorecard(
        &self,
        blueprint: &str,
        identifier: &str,
        scorecard: &Scorecard,
    ) -> Result<Scorecard> {
        let url = self.endpoint(&["v1", "blueprints", blueprint, "scorecards", identifier])?;
        let request = self.request(Method::PUT, url).json(scorecard);
        let envelope: ScorecardEnvelope = self.send("update scorecard", request).await?;
        Ok(envelope.scorecard)
    }

    pub async fn delete_scorecard(&self, blueprint: &str, identifier: &str) -> Result<()> {
        let url = self.endpoint(&["v1", "blueprints", blueprint, "scorecards", identifier])?;
        let _: IgnoredAny = self
            .send("delete scorecard", self.request(Method::DELETE, url))
            .await?;
        Ok(())
    }
}
