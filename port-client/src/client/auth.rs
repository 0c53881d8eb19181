//! Access token exchange.

use reqwest::Method;
use reqwest::header::ACCEPT;
use secrecy::ExposeSecret;

use super::{PortClient, parse_envelope};
use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::models::{AccessTokenRequest, AccessTokenResponse};

impl PortClient {
    /// Exchange client credentials for an access token.
    ///
    /// A rejected exchange is reported as `ClientError::Auth`.
    pub(crate) async fn fetch_access_token(&self, config: &ClientConfig) -> Result<String> {
        let url = self.endpoint(&["v1", "auth", "access_token"])?;
        let body = AccessTokenRequest {
            client_id: &config.client_id,
            client_secret: config.client_secret.expose_secret(),
        };

        let response = self
            .http
            .request(Method::POST, url)
            .header(ACCEPT, "application/json")
            .json(&body)
            .send()
            .await?;
        let status = response.status();
        let text = response.text().await?;

        match parse_envelope::<AccessTokenResponse>("authenticate", status, &text) {
            Ok(token) => Ok(token.access_token),
            Err(e) => Err(ClientError::Auth(e.to_string())),
        }
    }
}
