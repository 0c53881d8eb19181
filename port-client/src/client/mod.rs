//! `PortClient` and the request/response plumbing shared by its operations.
//!
//! Per-resource operations live in the submodules:
//! - `auth` - access token exchange
//! - `entities` - read/upsert/delete entities
//! - `blueprints` - blueprint CRUD
//! - `scorecards` - scorecard CRUD
//! - `search` - entity search

mod auth;
mod blueprints;
mod entities;
mod scorecards;
mod search;

use log::debug;
use reqwest::header::ACCEPT;
use reqwest::{Method, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::Value as Json;

use crate::config::ClientConfig;
use crate::error::{ApiErrorDetail, ClientError, Result};

/// Catalog API client
///
/// Holds the access token obtained when connecting; it is not refreshed.
#[derive(Debug, Clone)]
pub struct PortClient {
    http: reqwest::Client,
    base_url: Url,
    access_token: String,
}

impl PortClient {
    /// Build a client and exchange the configured credentials for a token
    pub async fn connect(config: &ClientConfig) -> Result<Self> {
        let mut client = Self::build(config, String::new())?;
        client.access_token = client.fetch_access_token(config).await?;
        Ok(client)
    }

    /// Build a client around an already issued access token
    pub fn with_access_token(config: &ClientConfig, access_token: impl Into<String>) -> Result<Self> {
        Self::build(config, access_token.into())
    }

    fn build(config: &ClientConfig, access_token: String) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("port-provider/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            base_url: config.parsed_base_url()?,
            access_token,
        })
    }

    /// Resolve API path segments against the base URL, encoding each segment
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Authenticated request with JSON accept header
    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        debug!("{} {}", method, url);
        self.http
            .request(method, url)
            .bearer_auth(&self.access_token)
            .header(ACCEPT, "application/json")
    }

    /// Send a request and decode the payload of its response envelope
    async fn send<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> Result<T> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        debug!("{} -> {}", operation, status);
        parse_envelope(operation, status, &body)
    }
}

/// Interpret a response body
///
/// A 404 is reported as `NotFound`. Otherwise the `ok` flag decides success
/// regardless of the HTTP status, and the payload is decoded from the same body.
pub(crate) fn parse_envelope<T: DeserializeOwned>(
    operation: &'static str,
    status: StatusCode,
    body: &str,
) -> Result<T> {
    if status == StatusCode::NOT_FOUND {
        return Err(ClientError::NotFound {
            operation,
            body: body.to_string(),
        });
    }

    let value: Json = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(_) if !status.is_success() => Json::Null,
        Err(source) => return Err(ClientError::Decode { operation, source }),
    };

    let detail = ApiErrorDetail::from_json(&value);
    if !detail.ok {
        return Err(ClientError::Api {
            operation,
            status: status.as_u16(),
            body: body.to_string(),
            detail,
        });
    }

    serde_json::from_value(value).map_err(|source| ClientError::Decode { operation, source })
}
