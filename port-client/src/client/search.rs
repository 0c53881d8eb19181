//! Entity search.

use reqwest::Method;

use super::PortClient;
use crate::error::Result;
use crate::models::{SearchRequest, SearchResponse};

impl PortClient {
    /// Search entities across blueprints.
    pub async fn search_entities(&self, search: &SearchRequest) -> Result<SearchResponse> {
        let url = self.endpoint(&["v1", "entities", "search"])?;
        let request = self
            .request(Method::POST, url)
            .query(&search.query_params())
            .json(&search.query);
        self.send("search entities", request).await
    }
}
